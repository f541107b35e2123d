// src/progress.rs

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use std::io::{self, Write};

const TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len} ({elapsed})";

/// Every bar is drawn through this, so console logging can clear them
/// out of the way (see `ConsoleWriter`).
static BARS: Lazy<MultiProgress> = Lazy::new(MultiProgress::new);

/// Progress bar on stderr for a worklist of `len` items. Hidden when
/// stderr is not a terminal.
pub fn bar(len: usize, msg: &'static str) -> ProgressBar {
    let pb = BARS.add(ProgressBar::new(len as u64));
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(msg);
    pb
}

/// stderr writer for the console log layer. Suspends any live bar while a
/// line is written so log output and bar redraws don't interleave.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleWriter;

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        BARS.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        BARS.suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        BARS.suspend(|| io::stderr().flush())
    }
}
