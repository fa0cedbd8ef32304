use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtworkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image host answered with status {0}")]
    Status(u16),

    #[error("Decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A render that fell back to the placeholder.
///
/// Callers that only need something to draw take `placeholder` and move on.
#[derive(Error, Debug)]
#[error("artwork unavailable: {source}")]
pub struct RenderFailure {
    pub placeholder: String,
    pub source: ArtworkError,
}

