pub mod auth;
pub mod client;
pub mod error;
pub mod model;
pub mod traits;

pub use auth::CredentialManager;
pub use client::TrackFetcher;
pub use error::SpotifyError;
pub use model::Track;
pub use traits::TrackSource;
