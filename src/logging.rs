// src/logging.rs

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::progress::ConsoleWriter;

const LOG_FILE_PREFIX: &str = "parser";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 5;

/// Console + rotating file logging. The file rotates daily and is named
/// `parser.<YYYY-MM-DD>.log` (UTC date) inside `log_dir`. Keep the returned
/// guard alive until exit, otherwise buffered file lines are lost.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).with_context(|| format!("creating {:?}", log_dir))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .with_context(|| format!("opening log file in {:?}", log_dir))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env)
        .with(fmt::layer().with_writer(|| ConsoleWriter))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}
