// src/cli.rs

use clap::{Parser, ValueEnum};

use crate::pipeline::Mode;

#[derive(Debug, Parser)]
#[command(
    name = "pydocs_scraper",
    about = "Scrapes docs.python.org and peps.python.org",
    version
)]
pub struct Cli {
    /// Pipeline to run
    #[arg(value_enum)]
    pub mode: Mode,

    /// Clear the HTTP cache before running
    #[arg(short, long)]
    pub clear_cache: bool,

    /// Output mode; rows are printed plainly when omitted
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Box-drawn table on stdout
    Pretty,
    /// CSV file under results/
    File,
    /// Both of the above
    Both,
}
