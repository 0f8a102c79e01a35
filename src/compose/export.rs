use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{compose::compositor::CompositeImage, foundation::error::MuseumResult};

/// File name every export is written under.
pub const EXPORT_FILE_NAME: &str = "museum.png";

/// Write the composite's PNG payload to `dir/museum.png`, replacing any earlier export.
#[tracing::instrument(skip(image), fields(token = image.token, dir = %dir.display()))]
pub async fn export_composite(image: &CompositeImage, dir: &Path) -> MuseumResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create export dir {}", dir.display()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    tokio::fs::write(&path, &image.png)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = image.png.len(), "composite exported");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/export.rs"]
mod tests;
