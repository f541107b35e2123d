// src/fetch/cache.rs

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{trace, warn};
use url::Url;

/// Response bodies on disk, one file per URL, named by the SHA-256 of the
/// URL. Entries never expire; `clear` is the only way to drop them.
///
/// Bodies are written to `<name>.part` and renamed into place, so an
/// interrupted write never leaves a truncated entry behind.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).with_context(|| format!("creating cache dir {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key(url: &Url) -> String {
        let digest = Sha256::digest(url.as_str().as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(Self::key(url))
    }

    fn part_path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(format!("{}.part", Self::key(url)))
    }

    /// Cached body for `url`. Read errors other than "not there" are
    /// logged and treated as a miss.
    pub async fn get(&self, url: &Url) -> Option<Vec<u8>> {
        let path = self.path_for(url);
        match fs::read(&path).await {
            Ok(body) => {
                trace!(%url, "cache hit");
                Some(body)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(%url, path = %path.display(), error = %e, "cache read failed");
                None
            }
        }
    }

    pub async fn put(&self, url: &Url, body: &[u8]) {
        let part = self.part_path_for(url);
        let path = self.path_for(url);
        let written = match fs::write(&part, body).await {
            Ok(()) => fs::rename(&part, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!(%url, path = %path.display(), error = %e, "cache write failed");
            let _ = fs::remove_file(&part).await;
        }
    }

    /// Drop every entry.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("removing {:?}", self.dir)),
        }
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("recreating cache dir {:?}", self.dir))
    }
}
