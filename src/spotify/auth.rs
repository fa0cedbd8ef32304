use std::time::{Duration, Instant};

use base64::{Engine, engine::general_purpose::STANDARD};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    config::{Credentials, Endpoints},
    spotify::{error::SpotifyError, model::TokenResponse},
};

/// Seconds shaved off every `expires_in` so a handed-out bearer cannot
/// expire while a request using it is in flight.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

struct BearerState {
    bearer: String,
    expiry: Instant,
    refresh_token: String,
}

impl BearerState {
    fn valid_bearer(&self, now: Instant) -> Option<&str> {
        (!self.bearer.is_empty() && now < self.expiry).then_some(self.bearer.as_str())
    }
}

/// Keeps one short-lived bearer token valid for every session in the process.
pub struct CredentialManager {
    http: reqwest::Client,
    token_url: String,
    basic_auth: String,
    state: RwLock<BearerState>,
}

impl CredentialManager {
    pub fn new(http: reqwest::Client, endpoints: &Endpoints, credentials: Credentials) -> Self {
        let basic_auth = STANDARD.encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));

        Self {
            http,
            token_url: endpoints.token_url(),
            basic_auth,
            state: RwLock::new(BearerState {
                bearer: String::new(),
                expiry: Instant::now(),
                refresh_token: credentials.refresh_token,
            }),
        }
    }

    /// Returns a bearer token that stays valid for at least the expiry margin,
    /// refreshing it first if needed.
    ///
    /// Concurrent callers that find the token expired queue on the write
    /// lock; only the first performs the refresh, the rest reuse its result.
    pub async fn ensure_bearer(&self) -> Result<String, SpotifyError> {
        if let Some(bearer) = self.state.read().await.valid_bearer(Instant::now()) {
            return Ok(bearer.to_string());
        }

        let mut state = self.state.write().await;
        if let Some(bearer) = state.valid_bearer(Instant::now()) {
            debug!("access_token_refreshed_by_peer");
            return Ok(bearer.to_string());
        }

        let token = self.refresh(&state.refresh_token).await?;
        let lifetime = token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);

        state.bearer = token.access_token;
        state.expiry = Instant::now() + Duration::from_secs(lifetime);
        if let Some(rotated) = token.refresh_token.filter(|t| !t.is_empty()) {
            info!("refresh_token_rotated");
            state.refresh_token = rotated;
        }

        info!(expires_in = token.expires_in, "access_token_refreshed");
        Ok(state.bearer.clone())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, SpotifyError> {
        debug!(url = self.token_url.as_str(), "access_token_refresh_started");

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.basic_auth),
            )
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = body.as_str(), "access_token_refresh_failed");
            return Err(SpotifyError::Status {
                operation: "token refresh",
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[cfg(test)]
    async fn seed(&self, bearer: &str, expiry: Instant) {
        let mut state = self.state.write().await;
        state.bearer = bearer.to_string();
        state.expiry = expiry;
    }

    #[cfg(test)]
    async fn expiry(&self) -> Instant {
        self.state.read().await.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on the discard port, so any refresh attempt fails fast.
    fn unreachable_manager() -> CredentialManager {
        let endpoints = Endpoints::default().with_accounts_url("http://127.0.0.1:9");
        CredentialManager::new(
            reqwest::Client::new(),
            &endpoints,
            Credentials::new("id", "secret", "refresh"),
        )
    }

    #[tokio::test]
    async fn test_valid_bearer_is_reused_without_refresh() {
        let manager = unreachable_manager();
        manager
            .seed("cached", Instant::now() + Duration::from_secs(600))
            .await;

        assert_eq!(manager.ensure_bearer().await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_expired_bearer_triggers_refresh() {
        let manager = unreachable_manager();
        manager
            .seed("stale", Instant::now() - Duration::from_secs(10))
            .await;

        assert!(matches!(
            manager.ensure_bearer().await,
            Err(SpotifyError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_state_untouched() {
        let manager = unreachable_manager();
        let expiry = Instant::now() - Duration::from_secs(10);
        manager.seed("stale", expiry).await;

        let _ = manager.ensure_bearer().await;

        assert_eq!(manager.expiry().await, expiry);
        assert_eq!(manager.state.read().await.bearer, "stale");
    }

    #[tokio::test]
    async fn test_fresh_manager_starts_expired() {
        let manager = unreachable_manager();
        assert!(
            manager
                .state
                .read()
                .await
                .valid_bearer(Instant::now())
                .is_none()
        );
    }

    async fn token_endpoint(expires_in: u64) -> CredentialManager {
        let app = axum::Router::new().route(
            "/api/token",
            axum::routing::post(move || async move {
                axum::Json(serde_json::json!({
                    "access_token": "fresh",
                    "token_type": "Bearer",
                    "expires_in": expires_in,
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let endpoints = Endpoints::default().with_accounts_url(format!("http://{addr}"));
        CredentialManager::new(
            reqwest::Client::new(),
            &endpoints,
            Credentials::new("id", "secret", "refresh"),
        )
    }

    #[tokio::test]
    async fn test_refreshed_expiry_keeps_thirty_seconds() {
        let manager = token_endpoint(90).await;
        let before = Instant::now();

        assert_eq!(manager.ensure_bearer().await.unwrap(), "fresh");

        let expiry = manager.expiry().await;
        assert!(expiry.saturating_duration_since(before) >= Duration::from_secs(30));
        assert!(expiry.saturating_duration_since(Instant::now()) <= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_expiry_is_margin_shorter_than_lifetime() {
        let manager = token_endpoint(3600).await;
        let before = Instant::now();

        manager.ensure_bearer().await.unwrap();

        let expiry = manager.expiry().await;
        assert!(expiry >= before + Duration::from_secs(3600 - EXPIRY_MARGIN_SECS));
        assert!(expiry <= Instant::now() + Duration::from_secs(3600 - EXPIRY_MARGIN_SECS));
    }

    #[test]
    fn test_basic_auth_encoding() {
        let manager = unreachable_manager();
        assert_eq!(manager.basic_auth, STANDARD.encode("id:secret"));
    }
}
