// src/pipeline/mod.rs

use anyhow::Result;
use clap::ValueEnum;
use tracing::info;

use crate::config::Settings;
use crate::fetch::Session;
use crate::table::ResultTable;

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

/// Which pipeline to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Mode {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

/// Run one pipeline to completion. `Ok(None)` means there is nothing to
/// output: either the index page could not be fetched or the pipeline
/// leaves a file on disk instead of producing rows.
pub async fn run(
    mode: Mode,
    session: &Session,
    settings: &Settings,
) -> Result<Option<ResultTable>> {
    info!(mode = mode.as_str(), "running pipeline");
    match mode {
        Mode::WhatsNew => whats_new::whats_new(session, settings).await,
        Mode::LatestVersions => latest_versions::latest_versions(session, settings).await,
        Mode::Download => download::download(session, settings).await.map(|_| None),
        Mode::Pep => pep::pep(session, settings).await,
    }
}
