use anyhow::Result;
use clap::Parser;
use pydocs_scraper::{cli::Cli, config::Settings, fetch::Session, logging, output, pipeline};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let settings = Settings::from_env()?;
    let _guard = logging::init(&settings.log_dir())?;
    info!("parser started");

    let args = Cli::parse();
    info!(?args, "command-line arguments");

    // ─── 2) cached session ───────────────────────────────────────────
    let session = Session::new(settings.cache_dir())?;
    if args.clear_cache {
        session.clear_cache().await?;
        info!("HTTP cache cleared");
    }

    // ─── 3) run + output ─────────────────────────────────────────────
    let results = pipeline::run(args.mode, &session, &settings).await?;
    if let Some(table) = results {
        output::control_output(&table, args.output, args.mode, &settings)?;
    }

    info!("parser finished");
    Ok(())
}
