use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    albumart::ArtworkRenderer,
    config::Config,
    spotify::{CredentialManager, TrackFetcher, TrackSource},
};

/// Process-wide collaborators shared by every session.
///
/// `source` is `None` when credentials are missing; sessions then show the
/// empty widget for as long as they live.
#[derive(Clone)]
pub struct Services {
    pub source: Option<Arc<dyn TrackSource>>,
    pub renderer: Arc<ArtworkRenderer>,
}

impl Services {
    pub fn new(source: Option<Arc<dyn TrackSource>>, renderer: Arc<ArtworkRenderer>) -> Self {
        Self { source, renderer }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let source = match config.credentials.clone() {
            Some(credentials) => {
                let manager = Arc::new(CredentialManager::new(
                    http.clone(),
                    &config.endpoints,
                    credentials,
                ));
                info!("spotify_client_initialized");
                Some(Arc::new(TrackFetcher::new(http.clone(), &config.endpoints, manager))
                    as Arc<dyn TrackSource>)
            }
            None => {
                warn!("spotify_credentials_missing");
                None
            }
        };

        Ok(Self::new(source, Arc::new(ArtworkRenderer::new(http))))
    }
}
