// file: matcher.rs
// Purpose: Cross-references tracked school names against the closing records of the feed.

use crate::document::{ClosingRecord, FeedSnapshot};

/// Returns the records whose organization name contains any tracked name, in feed order.
///
/// Comparison is a case-insensitive substring test, so `high` matches `Highland School`.
/// Blank tracked names are skipped; they would otherwise match every record.
pub fn filter_closings<'a>(records: &'a [ClosingRecord], tracked_names: &[String]) -> Vec<&'a ClosingRecord> {
    let needles: Vec<String> = tracked_names
        .iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    if needles.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| {
            let org_name = record.organization_name.to_lowercase();
            needles.iter().any(|needle| org_name.contains(needle.as_str()))
        })
        .collect()
}

/// Result of checking one feed snapshot against the tracked names.
#[derive(Debug)]
pub struct MatchReport<'a> {
    pub run_date: &'a str,
    pub matches: Vec<&'a ClosingRecord>,
}

impl<'a> MatchReport<'a> {
    pub fn build(snapshot: &'a FeedSnapshot, tracked_names: &[String]) -> MatchReport<'a> {
        MatchReport {
            run_date: snapshot.run_date.as_str(),
            matches: filter_closings(&snapshot.records, tracked_names),
        }
    }

    pub fn found_closing(&self) -> bool {
        !self.matches.is_empty()
    }
}
