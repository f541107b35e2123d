// src/output.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use prettytable::{format, Cell, Row, Table};
use std::{
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::cli::OutputMode;
use crate::config::{Settings, DATETIME_FORMAT};
use crate::pipeline::Mode;
use crate::table::ResultTable;

/// Send a finished table wherever `output` asks for. Returns the CSV path
/// when one was written.
pub fn control_output(
    table: &ResultTable,
    output: Option<OutputMode>,
    mode: Mode,
    settings: &Settings,
) -> Result<Option<PathBuf>> {
    match output {
        None => {
            let stdout = io::stdout();
            default_output(table, &mut stdout.lock()).context("writing to stdout")?;
            Ok(None)
        }
        Some(OutputMode::Pretty) => {
            pretty_table(table).printstd();
            Ok(None)
        }
        Some(OutputMode::File) => {
            file_output(table, mode, &settings.results_dir(), Local::now()).map(Some)
        }
        Some(OutputMode::Both) => {
            pretty_table(table).printstd();
            file_output(table, mode, &settings.results_dir(), Local::now()).map(Some)
        }
    }
}

/// Header and rows, fields separated by single spaces.
pub fn default_output<W: Write>(table: &ResultTable, out: &mut W) -> io::Result<()> {
    for record in table.records() {
        writeln!(out, "{}", record.join(" "))?;
    }
    Ok(())
}

pub fn pretty_table(table: &ResultTable) -> Table {
    let mut pretty = Table::new();
    pretty.set_format(*format::consts::FORMAT_BOX_CHARS);
    pretty.set_titles(Row::new(
        table
            .header
            .iter()
            .map(|h| Cell::new(h).style_spec("bFg"))
            .collect(),
    ));
    for row in &table.rows {
        pretty.add_row(Row::new(row.iter().map(|f| Cell::new(f)).collect()));
    }
    pretty
}

/// `<mode>_<YYYY-mm-dd_HH-MM-SS>.csv`
pub fn results_file_name<Tz: TimeZone>(mode: Mode, now: DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{}_{}.csv", mode.as_str(), now.format(DATETIME_FORMAT))
}

/// Write the table as CSV (every field quoted, `\n` line ends) into
/// `results_dir`.
pub fn file_output<Tz: TimeZone>(
    table: &ResultTable,
    mode: Mode,
    results_dir: &Path,
    now: DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz::Offset: Display,
{
    fs::create_dir_all(results_dir).with_context(|| format!("creating {:?}", results_dir))?;
    let path = results_dir.join(results_file_name(mode, now));

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(&path)
        .with_context(|| format!("creating {:?}", path))?;
    for record in table.records() {
        writer
            .write_record(record)
            .with_context(|| format!("writing {:?}", path))?;
    }
    writer.flush().with_context(|| format!("flushing {:?}", path))?;

    info!(path = %path.display(), "results saved");
    Ok(path)
}
