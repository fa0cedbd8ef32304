use std::{fmt, time::Duration};

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Client credentials plus the long-lived refresh token minted out of band.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_REFRESH_TOKEN`. Returns `None` if any of them is unset or empty.
    pub fn from_env() -> Option<Self> {
        Some(Self::new(
            non_empty_var("SPOTIFY_CLIENT_ID")?,
            non_empty_var("SPOTIFY_CLIENT_SECRET")?,
            non_empty_var("SPOTIFY_REFRESH_TOKEN")?,
        ))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    accounts_url: String,
    api_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn from_env() -> Self {
        let mut endpoints = Self::default();
        if let Some(url) = non_empty_var("SPOTIFY_ACCOUNTS_URL") {
            endpoints = endpoints.with_accounts_url(url);
        }
        if let Some(url) = non_empty_var("SPOTIFY_API_URL") {
            endpoints = endpoints.with_api_url(url);
        }
        endpoints
    }

    #[must_use]
    pub fn with_accounts_url(mut self, url: impl Into<String>) -> Self {
        self.accounts_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    pub fn currently_playing_url(&self) -> String {
        format!("{}/v1/me/player/currently-playing", self.api_url)
    }

    pub fn recently_played_url(&self) -> String {
        format!("{}/v1/me/player/recently-played?limit=1", self.api_url)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Option<Credentials>,
    pub endpoints: Endpoints,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub art_cols: u16,
    pub art_rows: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: None,
            endpoints: Endpoints::default(),
            poll_interval: Duration::from_secs(10),
            http_timeout: Duration::from_secs(10),
            art_cols: 16,
            art_rows: 8,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self {
            credentials: Credentials::from_env(),
            endpoints: Endpoints::from_env(),
            ..Self::default()
        };

        if let Some(secs) = non_empty_var("NOWPLAYING_POLL_SECS").and_then(|s| s.parse().ok()) {
            config.poll_interval = Duration::from_secs(secs);
        }

        config
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
