// src/pipeline/pep.rs

use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::error::ScrapeError;
use crate::extract::{attr_required, find_all, find_required, text_of, Query};
use crate::fetch::{get_response, Session};
use crate::progress;
use crate::reconcile::{Mismatch, Reconciler, EXPECTED_STATUS_TABLE};
use crate::table::ResultTable;

/// One row of the numerical PEP index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub preview_code: String,
    pub link: Url,
}

/// Count PEPs per status, as shown on each PEP's own page.
pub async fn pep(session: &Session, settings: &Settings) -> Result<Option<ResultTable>> {
    let Some(reconciler) = reconcile_statuses(session, settings).await? else {
        return Ok(None);
    };
    log_mismatches(reconciler.mismatches());
    Ok(Some(reconciler.to_table()))
}

/// One warning per mismatch, emitted after the whole run.
fn log_mismatches(mismatches: &[Mismatch]) {
    for m in mismatches {
        warn!(
            pep = %m.pep_link,
            observed = %m.observed,
            expected = ?m.expected,
            "mismatched status"
        );
    }
}

/// Walk the index and reconcile every PEP whose page could be fetched.
/// Rows with a failed fetch are skipped and do not count towards the total.
pub async fn reconcile_statuses(
    session: &Session,
    settings: &Settings,
) -> Result<Option<Reconciler<'static>>> {
    let Some(index) = get_response(session, &settings.pep_url).await else {
        return Ok(None);
    };
    let rows = index_rows(&index.text(), &settings.pep_url)?;
    debug!(rows = rows.len(), "PEP index parsed");

    let mut reconciler = Reconciler::new(&EXPECTED_STATUS_TABLE);
    let pb = progress::bar(rows.len(), "pep");
    for row in rows {
        pb.inc(1);
        let Some(page) = get_response(session, &row.link).await else {
            continue;
        };
        let status = page_status(&page.text())
            .with_context(|| format!("reading status of {}", row.link))?;
        reconciler.record(row.link.as_str(), &row.preview_code, &status)?;
    }
    pb.finish_and_clear();

    Ok(Some(reconciler))
}

pub fn index_rows(html: &str, base: &Url) -> Result<Vec<IndexRow>> {
    let doc = Html::parse_document(html);
    let section = find_required(
        doc.root_element(),
        &Query::tag("section").attr("id", "numerical-index"),
    )?;
    let body = find_required(section, &Query::tag("tbody"))?;

    find_all(body, &Query::tag("tr"))
        .into_iter()
        .map(|tr| {
            let td = find_required(tr, &Query::tag("td"))?;
            let a = find_required(tr, &Query::tag("a"))?;
            let href = attr_required(a, "href")?;
            let link = base
                .join(href)
                .with_context(|| format!("joining {} onto {}", href, base))?;
            Ok::<_, anyhow::Error>(IndexRow {
                preview_code: preview_code(&text_of(td)),
                link,
            })
        })
        .collect()
}

/// Drop the leading type letter: `"SF"` → `"F"`, `"I"` → `""`.
fn preview_code(cell: &str) -> String {
    cell.trim().chars().skip(1).collect()
}

/// Text of the `dd` following the `Status` term in the PEP header list.
pub fn page_status(html: &str) -> Result<String, ScrapeError> {
    let doc = Html::parse_document(html);
    let dl = find_required(doc.root_element(), &Query::tag("dl"))?;
    let dt = find_all(dl, &Query::tag("dt"))
        .into_iter()
        .find(|dt| dt.text().any(|t| t.trim() == "Status"))
        .ok_or_else(|| ScrapeError::MissingNode {
            tag: "dt".to_string(),
            attrs: r#"[text="Status"]"#.to_string(),
        })?;
    let dd = dt
        .next_siblings()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ScrapeError::MissingNode {
            tag: "dd".to_string(),
            attrs: r#"[after dt="Status"]"#.to_string(),
        })?;
    Ok(text_of(dd).trim().to_string())
}
