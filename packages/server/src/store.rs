//! In-memory report storage.

use chrono::{DateTime, Utc};
use water_report_readings_models::Report;

/// Reports held in memory, pruned to the serving window.
#[derive(Debug, Default)]
pub struct ReportStore {
    reports: Vec<Report>,
}

impl ReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report: Report) {
        self.reports.push(report);
    }

    /// Drops every report dated at or before `cutoff`, returning how many
    /// were removed.
    pub fn prune(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.reports.len();
        self.reports.retain(|r| r.date > cutoff);
        before - self.reports.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Reports of `title` dated strictly after `since`, newest first.
    #[must_use]
    pub fn recent(&self, title: &str, since: DateTime<Utc>) -> Vec<&Report> {
        let mut matching: Vec<&Report> = self
            .reports
            .iter()
            .filter(|r| r.title == title && r.date > since)
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        matching
    }
}
