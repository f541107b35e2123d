use pydocs_scraper::{
    config::Settings,
    error::ScrapeError,
    fetch::Session,
    pipeline::{self, download, pep, Mode},
};
use std::fs;
use tempfile::{tempdir, TempDir};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, TempDir, Settings, Session) {
    let server = MockServer::start().await;
    let tmp = tempdir().unwrap();
    let settings = Settings::new(
        Url::parse(&format!("{}/3/", server.uri())).unwrap(),
        Url::parse(&format!("{}/peps/", server.uri())).unwrap(),
        tmp.path(),
    );
    let session = Session::new(settings.cache_dir()).unwrap();
    (server, tmp, settings, session)
}

async fn serve(server: &MockServer, at: &str, body: impl Into<Vec<u8>>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into()))
        .mount(server)
        .await;
}

fn pep_index(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(code, href)| {
            format!(
                r#"<tr><td><abbr>{code}</abbr></td><td><a class="pep reference internal" href="{href}">n</a></td><td>title</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><section id="numerical-index"><table class="pep-zero-table docutils">
           <thead><tr><th>Type</th><th>PEP</th><th>Title</th></tr></thead>
           <tbody>{rows}</tbody></table></section></body></html>"#
    )
}

fn pep_page(status: &str) -> String {
    format!(
        r#"<html><body><h1>PEP</h1><dl class="rfc2822 field-list simple">
             <dt class="field-odd">Author<span class="colon">:</span></dt><dd class="field-odd">Someone</dd>
             <dt class="field-even">Status<span class="colon">:</span></dt>
             <dd class="field-even"><abbr title="x">{status}</abbr></dd>
           </dl></body></html>"#
    )
}

fn rows(table: &pydocs_scraper::table::ResultTable) -> Vec<Vec<&str>> {
    table
        .rows
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect()
}

#[tokio::test]
async fn pep_counts_successful_fetches_only() {
    let (server, _tmp, settings, session) = setup().await;
    serve(
        &server,
        "/peps/",
        pep_index(&[
            ("PA", "pep-0001/"),
            ("SF", "pep-0008/"),
            ("IF", "pep-0401/"),
            ("SF", "pep-0999/"),
            ("PA", "pep-0013/"),
        ]),
    )
    .await;
    serve(&server, "/peps/pep-0001/", pep_page("Active")).await;
    serve(&server, "/peps/pep-0008/", pep_page("Final")).await;
    serve(&server, "/peps/pep-0401/", pep_page("April Fool!")).await;
    serve(&server, "/peps/pep-0013/", pep_page("Active")).await;
    // pep-0999 is not mounted: 404, skipped

    let table = pipeline::run(Mode::Pep, &session, &settings)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.header, vec!["Status", "Count"]);
    assert_eq!(
        rows(&table),
        vec![
            vec!["Active", "2"],
            vec!["Final", "1"],
            vec!["April Fool!", "1"],
            vec!["Total", "4"],
        ]
    );
}

#[tokio::test]
async fn pep_mismatch_is_recorded_once() {
    let (server, _tmp, settings, session) = setup().await;
    serve(
        &server,
        "/peps/",
        pep_index(&[("SF", "pep-0008/"), ("IF", "pep-0401/")]),
    )
    .await;
    serve(&server, "/peps/pep-0008/", pep_page("Final")).await;
    serve(&server, "/peps/pep-0401/", pep_page("April Fool!")).await;

    let reconciler = pep::reconcile_statuses(&session, &settings)
        .await
        .unwrap()
        .unwrap();
    let mismatches = reconciler.mismatches();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].observed, "April Fool!");
    assert!(mismatches[0].pep_link.ends_with("/peps/pep-0401/"));
    assert_eq!(mismatches[0].expected, &["Final"]);
    assert_eq!(reconciler.total(), 2);
}

#[tokio::test]
async fn pep_unknown_code_aborts() {
    let (server, _tmp, settings, session) = setup().await;
    serve(&server, "/peps/", pep_index(&[("SX", "pep-0042/")])).await;
    serve(&server, "/peps/pep-0042/", pep_page("Final")).await;

    let err = pipeline::run(Mode::Pep, &session, &settings)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScrapeError>(),
        Some(ScrapeError::UnknownStatusCode(code)) if code == "X"
    ));
}

#[tokio::test]
async fn unreachable_index_gives_no_table() {
    let (_server, _tmp, settings, session) = setup().await;
    for mode in [Mode::WhatsNew, Mode::LatestVersions, Mode::Download, Mode::Pep] {
        assert!(pipeline::run(mode, &session, &settings)
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn responses_are_served_from_cache() {
    let (server, _tmp, settings, session) = setup().await;
    serve(&server, "/peps/", pep_index(&[("SF", "pep-0008/")])).await;
    serve(&server, "/peps/pep-0008/", pep_page("Final")).await;

    let first = pipeline::run(Mode::Pep, &session, &settings).await.unwrap();
    server.reset().await;
    let second = pipeline::run(Mode::Pep, &session, &settings).await.unwrap();
    assert!(second.is_some());
    assert_eq!(first, second);

    session.clear_cache().await.unwrap();
    let third = pipeline::run(Mode::Pep, &session, &settings).await.unwrap();
    assert!(third.is_none());
}

#[tokio::test]
async fn whats_new_skips_failed_articles() {
    let (server, _tmp, settings, session) = setup().await;
    serve(
        &server,
        "/3/whatsnew/",
        r#"<html><body><section id="what-s-new-in-python">
             <div class="toctree-wrapper compound"><ul>
               <li class="toctree-l1"><a href="3.12.html">What's New In Python 3.12</a></li>
               <li class="toctree-l1"><a href="3.11.html">What's New In Python 3.11</a></li>
             </ul></div></section></body></html>"#,
    )
    .await;
    serve(
        &server,
        "/3/whatsnew/3.12.html",
        "<html><body><h1>What's New In Python 3.12</h1>\
         <dl><dt>Editor</dt>\n<dd>Adam Turner</dd></dl></body></html>",
    )
    .await;

    let table = pipeline::run(Mode::WhatsNew, &session, &settings)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.header, vec!["Article link", "Title", "Editor, author"]);
    let link = format!("{}/3/whatsnew/3.12.html", server.uri());
    assert_eq!(
        rows(&table),
        vec![vec![link.as_str(), "What's New In Python 3.12", "Editor Adam Turner"]]
    );
}

#[tokio::test]
async fn latest_versions_parses_sidebar() {
    let (server, _tmp, settings, session) = setup().await;
    serve(
        &server,
        "/3/",
        r#"<html><body><div class="sphinxsidebarwrapper">
             <ul><li><a href="/3/tutorial/">Tutorial</a></li></ul>
             <ul>
               <li><a href="https://docs.python.org/3.10/">Python 3.10 (in development)</a></li>
               <li><a href="https://docs.python.org/2.0/">Python 2.0</a></li>
               <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
             </ul></div></body></html>"#,
    )
    .await;

    let table = pipeline::run(Mode::LatestVersions, &session, &settings)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.header, vec!["Documentation link", "Version", "Status"]);
    assert_eq!(
        rows(&table),
        vec![
            vec!["https://docs.python.org/3.10/", "3.10", "in development"],
            vec!["https://docs.python.org/2.0/", "Python 2.0", ""],
            vec!["https://www.python.org/doc/versions/", "All versions", ""],
        ]
    );
}

#[tokio::test]
async fn download_saves_archive_verbatim() {
    let (server, tmp, settings, session) = setup().await;
    serve(
        &server,
        "/3/download.html",
        r#"<html><body><div class="body" role="main">
             <table class="docutils align-default">
               <tr><td>PDF (A4)</td><td><a href="archives/python-3.12-docs-pdf-a4.zip">Download</a></td></tr>
               <tr><td>HTML</td><td><a href="archives/python-3.12-docs-html.zip">Download</a></td></tr>
             </table></div></body></html>"#,
    )
    .await;
    let archive: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    serve(&server, "/3/archives/python-3.12-docs-pdf-a4.zip", archive.clone()).await;

    let saved = download::download(&session, &settings).await.unwrap().unwrap();
    let expected = tmp.path().join("downloads/python-3.12-docs-pdf-a4.zip");
    assert_eq!(saved, expected);
    assert_eq!(fs::read(&expected).unwrap(), archive);

    // the download pipeline has no table output
    assert!(pipeline::run(Mode::Download, &session, &settings)
        .await
        .unwrap()
        .is_none());
}
