// src/fetch/download.rs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

/// Last non-empty path segment of `url`.
pub fn file_name_from_url(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
}

/// Write `body` under `dest_dir` using the URL's file name.
/// Returns the full path of the saved file.
pub async fn save_to_dir(url: &Url, body: &[u8], dest_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let filename = file_name_from_url(url).unwrap_or("download.zip");
    let dest_path = dest_dir.join(filename);

    fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("creating {:?}", dest_dir))?;
    fs::write(&dest_path, body)
        .await
        .with_context(|| format!("writing {:?}", dest_path))?;

    Ok(dest_path)
}
