use async_trait::async_trait;

use crate::spotify::{error::SpotifyError, model::Track};

/// Where sessions get their track data from.
///
/// `Ok(None)` means "nothing to show" and is not an error.
#[async_trait]
pub trait TrackSource: Send + Sync {
    async fn currently_playing(&self) -> Result<Option<Track>, SpotifyError>;
    async fn recently_played(&self) -> Result<Option<Track>, SpotifyError>;
}
