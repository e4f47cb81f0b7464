use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::domain::extract_domain;
use crate::source::Row;
use crate::stats::{DomainCounts, ImportReport};

/// Receives rows that yielded no domain. Implementations must tolerate
/// calls from several worker threads.
pub trait Diagnostics: Sync {
    fn skipped_row(&self, row: &Row, column: usize);
}

/// Reports skipped rows as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn skipped_row(&self, row: &Row, column: usize) {
        warn!(
            action = "skip",
            component = "domain_aggregator",
            line = row.line(),
            column,
            row = %row,
            "Could not extract domain name from row"
        );
    }
}

/// Keeps the line numbers of skipped rows in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    lines: Mutex<Vec<u64>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skipped line numbers in ascending order.
    pub fn lines(&self) -> Vec<u64> {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        lines.sort_unstable();
        lines
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn skipped_row(&self, row: &Row, _column: usize) {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        lines.push(row.line());
    }
}

/// Running per-domain tally for one import run.
#[derive(Debug)]
pub struct DomainAggregator {
    column: usize,
    counts: HashMap<String, u64>,
    rows_read: u64,
    rows_skipped: u64,
}

impl DomainAggregator {
    /// `column` is the resolved index of the email column.
    pub fn new(column: usize) -> Self {
        Self {
            column,
            counts: HashMap::new(),
            rows_read: 0,
            rows_skipped: 0,
        }
    }

    pub fn push(&mut self, row: &Row, diagnostics: &dyn Diagnostics) {
        self.rows_read += 1;
        match extract_domain(row, self.column) {
            Some(domain) => *self.counts.entry(domain).or_insert(0) += 1,
            None => {
                self.rows_skipped += 1;
                diagnostics.skipped_row(row, self.column);
            }
        }
    }

    /// Folds another partial tally for the same column into this one.
    pub fn merge(&mut self, other: DomainAggregator) {
        for (domain, count) in other.counts {
            *self.counts.entry(domain).or_insert(0) += count;
        }
        self.rows_read += other.rows_read;
        self.rows_skipped += other.rows_skipped;
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn rows_skipped(&self) -> u64 {
        self.rows_skipped
    }

    pub fn distinct_domains(&self) -> usize {
        self.counts.len()
    }

    pub fn finish(self) -> ImportReport {
        ImportReport {
            domains: DomainCounts::from_map(self.counts),
            rows_read: self.rows_read,
            rows_skipped: self.rows_skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::DomainCount;

    fn rows(emails: &[&str]) -> Vec<Row> {
        emails
            .iter()
            .enumerate()
            .map(|(i, e)| Row::new(i as u64 + 2, [*e]))
            .collect()
    }

    fn tally(emails: &[&str], diagnostics: &dyn Diagnostics) -> ImportReport {
        let mut agg = DomainAggregator::new(0);
        for row in rows(emails) {
            agg.push(&row, diagnostics);
        }
        agg.finish()
    }

    #[test]
    fn counts_rows_per_domain() {
        let report = tally(&["a@x.com", "b@x.com", "c@y.com"], &CollectingDiagnostics::new());
        assert_eq!(
            report.domains.as_slice(),
            [DomainCount::new("x.com", 2), DomainCount::new("y.com", 1)]
        );
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn order_of_rows_does_not_matter() {
        let diag = CollectingDiagnostics::new();
        let forward = tally(&["c@y.com", "a@x.com", "z@A.io", "b@x.com"], &diag);
        let backward = tally(&["b@x.com", "z@A.io", "a@x.com", "c@y.com"], &diag);
        assert_eq!(forward, backward);
    }

    #[test]
    fn malformed_rows_are_skipped_and_reported() {
        let diag = CollectingDiagnostics::new();
        let report = tally(&["a@x.com", "nobody", "", "c@y.com", "d@"], &diag);
        let clean = tally(&["a@x.com", "c@y.com"], &CollectingDiagnostics::new());

        assert_eq!(report.domains, clean.domains);
        assert_eq!(report.rows_skipped, 3);
        assert_eq!(diag.lines(), vec![3, 4, 6]);
    }

    #[test]
    fn merge_sums_partials() {
        let diag = CollectingDiagnostics::new();
        let mut left = DomainAggregator::new(0);
        let mut right = DomainAggregator::new(0);
        for row in rows(&["a@x.com", "b@y.com"]) {
            left.push(&row, &diag);
        }
        for row in rows(&["c@x.com", "bad"]) {
            right.push(&row, &diag);
        }
        left.merge(right);
        assert_eq!(left.distinct_domains(), 2);

        let report = left.finish();
        assert_eq!(report.domains.get("x.com"), Some(2));
        assert_eq!(report.domains.get("y.com"), Some(1));
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_skipped, 1);
    }
}
