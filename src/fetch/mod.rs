// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{debug, error};
use url::Url;

pub mod cache;
pub mod download;

use cache::DiskCache;

const USER_AGENT: &str = concat!("pydocs_scraper/", env!("CARGO_PKG_VERSION"));

/// HTTP client plus the on-disk response cache. Opened once per run.
pub struct Session {
    client: Client,
    cache: DiskCache,
}

impl Session {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            cache: DiskCache::open(cache_dir)?,
        })
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.clear().await
    }
}

/// A fetched (or cached) response body.
#[derive(Debug, Clone)]
pub struct Page {
    pub body: Vec<u8>,
}

impl Page {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

async fn get_bytes_core(client: &Client, url: &Url) -> Result<Vec<u8>> {
    debug!("Fetching {}", url);
    let bytes = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .bytes()
        .await
        .with_context(|| format!("Reading body from {}", url))?;
    Ok(bytes.to_vec())
}

/// GET `url` through the cache. Any transport failure is logged and turned
/// into `None`; callers skip that unit of work.
pub async fn get_response(session: &Session, url: &Url) -> Option<Page> {
    if let Some(body) = session.cache.get(url).await {
        return Some(Page { body });
    }
    match get_bytes_core(&session.client, url).await {
        Ok(body) => {
            session.cache.put(url, &body).await;
            Some(Page { body })
        }
        Err(e) => {
            error!(%url, error = %format!("{:#}", e), "request failed");
            None
        }
    }
}
