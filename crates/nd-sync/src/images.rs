//! Image download for re-hosting.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::SyncError;

/// Download timeout in seconds; presigned image URLs can be slow.
const DOWNLOAD_TIMEOUT: u64 = 30;

/// Extensions kept as-is; anything else is treated as png.
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Downloads images referenced by rendered pages.
///
/// Image URLs from the source are presigned and unauthenticated, so this
/// uses a bare agent with no credentials.
#[derive(Debug)]
pub struct ImageFetcher {
    agent: Agent,
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher {
    #[must_use]
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DOWNLOAD_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    /// Fetch the image bytes.
    pub fn download(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        debug!("downloading image {url}");
        let response = self.agent.get(url).call()?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(SyncError::DownloadStatus {
                status,
                url: url.to_owned(),
            });
        }
        let bytes = response.into_body().read_to_vec()?;
        Ok(bytes)
    }
}

/// Guess a file extension from an image URL, stripping any query string.
///
/// Unknown extensions fall back to `png`.
#[must_use]
pub fn extension_for(url: &str) -> &'static str {
    let path = url.split('?').next().unwrap_or(url);
    let ext = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .find(|known| ext == **known)
        .copied()
        .unwrap_or("png")
}
