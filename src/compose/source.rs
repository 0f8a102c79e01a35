//! Where image bytes come from.
//!
//! Backgrounds and artworks are referenced by a source string: an `http(s)://` URL or a
//! path relative to an assets root.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::foundation::error::{MuseumError, MuseumResult};

/// Fetch the raw encoded bytes behind an image source.
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &str) -> MuseumResult<Vec<u8>>;
}

/// Normalize a relative asset path: `\` becomes `/`, `.` segments and empty segments are
/// dropped, absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> MuseumResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MuseumError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(MuseumError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MuseumError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MuseumError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads sources as files under `root`.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, source: &str) -> MuseumResult<Vec<u8>> {
        let rel = normalize_rel_path(source)?;
        let path = self.root.join(&rel);
        tokio::fs::read(&path)
            .await
            .map_err(|e| MuseumError::image_load(format!("read \"{}\": {e}", path.display())))
    }
}

/// Fetches `http(s)` sources.
#[derive(Clone, Debug)]
pub struct HttpImageLoader {
    http: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new(timeout: Duration) -> MuseumResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MuseumError::configuration(format!("build http client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, source: &str) -> MuseumResult<Vec<u8>> {
        let response = self
            .http
            .get(source)
            .send()
            .await
            .map_err(|e| MuseumError::image_load(format!("fetch \"{source}\": {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MuseumError::image_load(format!(
                "fetch \"{source}\": status {}",
                status.as_u16()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MuseumError::image_load(format!("read \"{source}\": {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Sends URLs to the HTTP loader and everything else to the filesystem loader.
#[derive(Clone, Debug)]
pub struct RoutingImageLoader {
    fs: FsImageLoader,
    http: HttpImageLoader,
}

impl RoutingImageLoader {
    pub fn new(fs: FsImageLoader, http: HttpImageLoader) -> Self {
        Self { fs, http }
    }
}

#[async_trait::async_trait]
impl ImageLoader for RoutingImageLoader {
    async fn load(&self, source: &str) -> MuseumResult<Vec<u8>> {
        if is_remote(source) {
            self.http.load(source.trim()).await
        } else {
            self.fs.load(source).await
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/source.rs"]
mod tests;
