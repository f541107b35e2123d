// src/config.rs

use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use url::Url;

/// Python documentation root.
pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
/// Index of all PEPs.
pub const PEP_URL: &str = "https://peps.python.org/";

/// Timestamp format used in result file names.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const ENV_MAIN_DOC_URL: &str = "PYDOCS_MAIN_DOC_URL";
const ENV_PEP_URL: &str = "PYDOCS_PEP_URL";
const ENV_BASE_DIR: &str = "PYDOCS_BASE_DIR";

/// Where to scrape from and where to put things.
#[derive(Debug, Clone)]
pub struct Settings {
    pub main_doc_url: Url,
    pub pep_url: Url,
    pub base_dir: PathBuf,
}

impl Settings {
    pub fn new(main_doc_url: Url, pep_url: Url, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            main_doc_url,
            pep_url,
            base_dir: base_dir.into(),
        }
    }

    /// Defaults, overridden by `PYDOCS_MAIN_DOC_URL`, `PYDOCS_PEP_URL`
    /// and `PYDOCS_BASE_DIR` when set.
    pub fn from_env() -> Result<Self> {
        let main_doc_url = url_from_env(ENV_MAIN_DOC_URL, MAIN_DOC_URL)?;
        let pep_url = url_from_env(ENV_PEP_URL, PEP_URL)?;
        let base_dir = env::var_os(ENV_BASE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::new(main_doc_url, pep_url, base_dir))
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join(".http_cache")
    }
}

fn url_from_env(key: &str, default: &str) -> Result<Url> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).with_context(|| format!("parsing {} = {}", key, raw))
}
