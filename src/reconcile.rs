// src/reconcile.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::ScrapeError;
use crate::table::ResultTable;

/// Preview code (the PEP index type/status column minus its first
/// character) → statuses a detail page may legitimately show.
const EXPECTED_STATUS: &[(&str, &[&str])] = &[
    ("A", &["Active", "Accepted"]),
    ("D", &["Deferred"]),
    ("", &["Draft", "Active"]),
    ("F", &["Final"]),
    ("P", &["Provisional"]),
    ("R", &["Rejected"]),
    ("S", &["Superseded"]),
    ("W", &["Withdrawn"]),
];

pub static EXPECTED_STATUS_TABLE: Lazy<ExpectedStatusTable> =
    Lazy::new(|| ExpectedStatusTable::from_entries(EXPECTED_STATUS));

#[derive(Debug, Clone)]
pub struct ExpectedStatusTable {
    entries: HashMap<&'static str, &'static [&'static str]>,
}

impl ExpectedStatusTable {
    pub fn from_entries(entries: &[(&'static str, &'static [&'static str])]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// The table covers every code the index can show, so a miss is an error.
    pub fn expected(&self, code: &str) -> Result<&'static [&'static str], ScrapeError> {
        self.entries
            .get(code)
            .copied()
            .ok_or_else(|| ScrapeError::UnknownStatusCode(code.to_string()))
    }
}

/// A detail page whose status is not one the index code allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub pep_link: String,
    pub observed: String,
    pub expected: &'static [&'static str],
}

/// Counts observed statuses (in order of first appearance) and collects
/// mismatches for one pep run.
#[derive(Debug)]
pub struct Reconciler<'t> {
    table: &'t ExpectedStatusTable,
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    mismatches: Vec<Mismatch>,
}

impl<'t> Reconciler<'t> {
    pub fn new(table: &'t ExpectedStatusTable) -> Self {
        Self {
            table,
            counts: Vec::new(),
            index: HashMap::new(),
            mismatches: Vec::new(),
        }
    }

    /// Check `observed` against `preview_code` and count it either way.
    /// Returns `Ok(false)` on a mismatch.
    pub fn record(
        &mut self,
        pep_link: &str,
        preview_code: &str,
        observed: &str,
    ) -> Result<bool, ScrapeError> {
        let expected = self.table.expected(preview_code)?;
        let matched = expected.iter().any(|s| *s == observed);
        if !matched {
            self.mismatches.push(Mismatch {
                pep_link: pep_link.to_string(),
                observed: observed.to_string(),
                expected,
            });
        }

        match self.index.get(observed) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(observed.to_string(), self.counts.len());
                self.counts.push((observed.to_string(), 1));
            }
        }
        Ok(matched)
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn counts(&self) -> &[(String, usize)] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// `Status, Count` rows, then `Total`.
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::new(["Status", "Count"]);
        for (status, n) in &self.counts {
            table.push([status.clone(), n.to_string()]);
        }
        table.push(["Total".to_string(), self.total().to_string()]);
        table
    }
}
