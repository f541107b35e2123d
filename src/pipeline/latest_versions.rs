// src/pipeline/latest_versions.rs

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::config::Settings;
use crate::error::ScrapeError;
use crate::extract::{attr_required, find_all, find_required, text_of, Query};
use crate::fetch::{get_response, Session};
use crate::progress;
use crate::table::ResultTable;

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Python\s([\d\.]+)\s\((\w{1,}.*)\)").expect("version regex"));

/// Links, versions and statuses from the "All versions" sidebar list.
pub async fn latest_versions(
    session: &Session,
    settings: &Settings,
) -> Result<Option<ResultTable>> {
    let Some(page) = get_response(session, &settings.main_doc_url).await else {
        return Ok(None);
    };
    let links = version_links(&page.text())?;

    let mut table = ResultTable::new(HEADER);
    let pb = progress::bar(links.len(), "latest-versions");
    for (link, text) in links {
        pb.inc(1);
        let (version, status) = parse_version_text(&text);
        table.push([link, version, status]);
    }
    pb.finish_and_clear();

    Ok(Some(table))
}

/// `(href, text)` of every link in the sidebar list mentioning "All versions".
fn version_links(html: &str) -> Result<Vec<(String, String)>> {
    let doc = Html::parse_document(html);
    let sidebar = find_required(
        doc.root_element(),
        &Query::tag("div").class("sphinxsidebarwrapper"),
    )?;
    let list = find_all(sidebar, &Query::tag("ul"))
        .into_iter()
        .find(|ul| text_of(*ul).contains("All versions"))
        .ok_or(ScrapeError::VersionListNotFound)?;

    find_all(list, &Query::tag("a"))
        .into_iter()
        .map(|a| Ok::<_, anyhow::Error>((attr_required(a, "href")?.to_string(), text_of(a))))
        .collect()
}

/// `"Python 3.10 (in development)"` → `("3.10", "in development")`.
/// Anything else comes back whole as the version, with an empty status.
pub fn parse_version_text(text: &str) -> (String, String) {
    match VERSION_RE.captures(text) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (text.to_string(), String::new()),
    }
}
