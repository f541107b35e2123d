// src/pipeline/download.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use url::Url;
use zip::ZipArchive;

use crate::config::Settings;
use crate::extract::{attr_required, find_required, Query};
use crate::fetch::{download::save_to_dir, get_response, Session};

static PDF_A4_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r".+pdf-a4\.zip$").expect("pdf-a4 regex"));

/// Save the PDF (A4) documentation archive under `downloads/`.
/// Returns the saved path, or `None` when a fetch failed.
pub async fn download(session: &Session, settings: &Settings) -> Result<Option<PathBuf>> {
    let index_url = settings
        .main_doc_url
        .join("download.html")
        .context("building download page URL")?;
    let Some(index) = get_response(session, &index_url).await else {
        return Ok(None);
    };
    let archive_url = archive_link(&index.text(), &index_url)?;

    let Some(archive) = get_response(session, &archive_url).await else {
        return Ok(None);
    };
    let path = save_to_dir(&archive_url, &archive.body, settings.downloads_dir()).await?;
    info!(path = %path.display(), "archive downloaded and saved");
    inspect_archive(&path);

    Ok(Some(path))
}

fn archive_link(html: &str, base: &Url) -> Result<Url> {
    let doc = Html::parse_document(html);
    let main = find_required(doc.root_element(), &Query::tag("div").attr("role", "main"))?;
    let table = find_required(main, &Query::tag("table").class("docutils"))?;
    let a = find_required(
        table,
        &Query::tag("a").attr_matching("href", PDF_A4_RE.clone()),
    )?;
    let href = attr_required(a, "href")?;
    base.join(href)
        .with_context(|| format!("joining {} onto {}", href, base))
}

/// Log how many entries the saved archive holds. A bad archive is only
/// worth a warning; the bytes are on disk as served.
fn inspect_archive(path: &Path) {
    let opened = File::open(path)
        .map_err(anyhow::Error::from)
        .and_then(|f| ZipArchive::new(f).map_err(anyhow::Error::from));
    match opened {
        Ok(archive) => info!(path = %path.display(), entries = archive.len(), "archive readable"),
        Err(e) => warn!(path = %path.display(), error = %e, "saved file is not a readable zip"),
    }
}
