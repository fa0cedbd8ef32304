pub mod cache;
pub mod error;
pub mod render;

use tracing::{debug, info};

pub use cache::RenderCache;
pub use error::{ArtworkError, RenderFailure};
pub use render::{parse_frame, render_image, render_placeholder};

/// Downloads album covers and turns them into half-block frames, sharing
/// one render cache between every session.
pub struct ArtworkRenderer {
    http: reqwest::Client,
    cache: RenderCache,
}

impl ArtworkRenderer {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_cache(http, RenderCache::default())
    }

    pub fn with_cache(http: reqwest::Client, cache: RenderCache) -> Self {
        Self { http, cache }
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Renders the image at `url` into `rows` lines of `cols` cells.
    ///
    /// An empty URL yields the placeholder without touching the network.
    /// Download or decode failures also yield the placeholder, wrapped in
    /// [`RenderFailure`], and leave the cache untouched.
    pub async fn render_from_url(
        &self,
        url: &str,
        cols: u16,
        rows: u16,
    ) -> Result<String, RenderFailure> {
        if url.is_empty() {
            return Ok(render_placeholder(cols, rows));
        }

        if let Some(frame) = self.cache.get(url) {
            debug!(url, "artwork_cache_hit");
            return Ok(frame);
        }
        debug!(url, "artwork_cache_miss");

        match self.download_and_render(url, cols, rows).await {
            Ok(frame) => {
                self.cache.insert(url, frame.clone());
                info!(url, cols, rows, "artwork_rendered");
                Ok(frame)
            }
            Err(source) => {
                info!(url, error = %source, "artwork_render_failed");
                Err(RenderFailure {
                    placeholder: render_placeholder(cols, rows),
                    source,
                })
            }
        }
    }

    async fn download_and_render(
        &self,
        url: &str,
        cols: u16,
        rows: u16,
    ) -> Result<String, ArtworkError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ArtworkError::Status(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;

        tokio::task::spawn_blocking(move || {
            let img = image::load_from_memory(&bytes)?;
            Ok::<_, ArtworkError>(render_image(&img, cols, rows))
        })
        .await?
    }
}
