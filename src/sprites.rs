// Sprite image downloads.
// Keeps one PNG per creature name and never downloads the same one twice.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::api::Remote;
use crate::cache::{paths::sanitize_name, write_atomic};
use crate::fetch::{Fetcher, Sleep};

/// Directory of downloaded sprite images.
#[derive(Debug, Clone)]
pub struct SpriteStore {
    dir: PathBuf,
}

impl SpriteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", sanitize_name(name)))
    }

    /// Local path of `name`'s sprite, downloading it from `url` if missing.
    ///
    /// A download is paced like any other uncached call; an existing file
    /// costs no request and no delay.
    pub async fn fetch<R: Remote, S: Sleep>(
        &self,
        fetcher: &Fetcher<R, S>,
        url: &str,
        name: &str,
    ) -> Option<PathBuf> {
        let path = self.path_for(name);
        if path.exists() {
            debug!(pokemon = %name, "Using cached sprite");
            return Some(path);
        }

        info!(pokemon = %name, "Downloading sprite");
        let result = fetcher.remote().get_bytes(url).await;
        fetcher.pause().await;
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(pokemon = %name, error = %err, "Failed to download sprite");
                return None;
            }
        };

        match write_atomic(&path, &bytes) {
            Ok(()) => Some(path),
            Err(err) => {
                warn!(pokemon = %name, error = %err, "Failed to save sprite");
                None
            }
        }
    }
}
