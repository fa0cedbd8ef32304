use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::{
    config::Endpoints,
    spotify::{
        auth::CredentialManager,
        error::SpotifyError,
        model::{CurrentlyPlaying, RecentlyPlayed, Track},
        traits::TrackSource,
    },
};

pub struct TrackFetcher {
    http: reqwest::Client,
    credentials: Arc<CredentialManager>,
    currently_playing_url: String,
    recently_played_url: String,
}

impl TrackFetcher {
    pub fn new(
        http: reqwest::Client,
        endpoints: &Endpoints,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        Self {
            http,
            credentials,
            currently_playing_url: endpoints.currently_playing_url(),
            recently_played_url: endpoints.recently_played_url(),
        }
    }

    /// The track playing right now. `None` when the player is idle (204) or
    /// reports no item.
    pub async fn get_currently_playing(&self) -> Result<Option<Track>, SpotifyError> {
        let response = self.get(&self.currently_playing_url).await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                debug!("currently_playing_empty");
                Ok(None)
            }
            StatusCode::OK => {
                let bytes = response.bytes().await?;
                let data: CurrentlyPlaying = serde_json::from_slice(&bytes)?;
                let track = data.item.map(|item| item.into_track(data.is_playing));
                if let Some(track) = &track {
                    info!(
                        track = track.name.as_str(),
                        artist = track.artist.as_str(),
                        playing = track.is_playing,
                        "currently_playing_fetched"
                    );
                }
                Ok(track)
            }
            _ => Err(Self::status_error("currently playing", response).await),
        }
    }

    /// The last track in the listening history. `None` when the history is empty.
    pub async fn get_recently_played(&self) -> Result<Option<Track>, SpotifyError> {
        let response = self.get(&self.recently_played_url).await?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error("recently played", response).await);
        }

        let bytes = response.bytes().await?;
        let data: RecentlyPlayed = serde_json::from_slice(&bytes)?;
        let track = data
            .items
            .into_iter()
            .next()
            .map(|history| history.track.into_track(false));

        if let Some(track) = &track {
            info!(
                track = track.name.as_str(),
                artist = track.artist.as_str(),
                "recently_played_fetched"
            );
        }
        Ok(track)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SpotifyError> {
        let bearer = self.credentials.ensure_bearer().await?;
        debug!(url, "spotify_request");
        Ok(self.http.get(url).bearer_auth(bearer).send().await?)
    }

    async fn status_error(operation: &'static str, response: reqwest::Response) -> SpotifyError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        warn!(status, body = body.as_str(), "spotify_request_failed");
        SpotifyError::Status {
            operation,
            status,
            body,
        }
    }
}

#[async_trait]
impl TrackSource for TrackFetcher {
    async fn currently_playing(&self) -> Result<Option<Track>, SpotifyError> {
        self.get_currently_playing().await
    }

    async fn recently_played(&self) -> Result<Option<Track>, SpotifyError> {
        self.get_recently_played().await
    }
}
