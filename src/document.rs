// file: document.rs

use std::fmt;

/// One `<RECORD>` entry of the closings feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingRecord {
    pub organization_name: String,
    pub status_name: String,
}

/// Everything parsed from a single fetch of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub run_date: String,
    pub records: Vec<ClosingRecord>,
}

impl ClosingRecord {
    pub fn new(organization_name: &str, status_name: &str) -> ClosingRecord {
        ClosingRecord {
            organization_name: organization_name.to_string(),
            status_name: status_name.to_string(),
        }
    }
}

impl fmt::Display for ClosingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.organization_name, self.status_name)
    }
}
