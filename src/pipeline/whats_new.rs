// src/pipeline/whats_new.rs

use anyhow::{Context, Result};
use scraper::Html;
use url::Url;

use crate::config::Settings;
use crate::extract::{attr_required, find_all, find_required, text_of, Query};
use crate::fetch::{get_response, Session};
use crate::progress;
use crate::table::ResultTable;

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];

/// One row per "What's New In Python X.Y" article: link, heading and the
/// editor/author block.
pub async fn whats_new(session: &Session, settings: &Settings) -> Result<Option<ResultTable>> {
    let index_url = settings
        .main_doc_url
        .join("whatsnew/")
        .context("building whatsnew URL")?;
    let Some(index) = get_response(session, &index_url).await else {
        return Ok(None);
    };
    let links = article_links(&index.text(), &index_url)?;

    let mut table = ResultTable::new(HEADER);
    let pb = progress::bar(links.len(), "whats-new");
    for link in links {
        pb.inc(1);
        let Some(page) = get_response(session, &link).await else {
            continue;
        };
        let (title, editors) = article_fields(&page.text())?;
        table.push([link.to_string(), title, editors]);
    }
    pb.finish_and_clear();

    Ok(Some(table))
}

fn article_links(html: &str, base: &Url) -> Result<Vec<Url>> {
    let doc = Html::parse_document(html);
    let section = find_required(
        doc.root_element(),
        &Query::tag("section").attr("id", "what-s-new-in-python"),
    )?;
    let toc = find_required(section, &Query::tag("div").class("toctree-wrapper"))?;

    find_all(toc, &Query::tag("li").class("toctree-l1"))
        .into_iter()
        .map(|li| {
            let a = find_required(li, &Query::tag("a"))?;
            let href = attr_required(a, "href")?;
            base.join(href)
                .with_context(|| format!("joining {} onto {}", href, base))
        })
        .collect()
}

/// First `h1` text and first `dl` text with newlines flattened.
fn article_fields(html: &str) -> Result<(String, String)> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let h1 = find_required(root, &Query::tag("h1"))?;
    let dl = find_required(root, &Query::tag("dl"))?;
    Ok((text_of(h1), text_of(dl).replace('\n', " ")))
}
