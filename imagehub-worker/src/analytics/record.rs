//! Analytics counter record and the two counters it tracks.

use std::fmt;

use chrono::{DateTime, Utc};

/// Which counter an increment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    View,
    Download,
}

impl CounterKind {
    /// Attribute holding the count.
    pub fn count_attribute(self) -> &'static str {
        match self {
            CounterKind::View => "viewCount",
            CounterKind::Download => "downloadCount",
        }
    }

    /// Attribute holding the time of the last increment.
    pub fn timestamp_attribute(self) -> &'static str {
        match self {
            CounterKind::View => "lastViewTimestamp",
            CounterKind::Download => "lastDownloadTimestamp",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKind::View => f.write_str("view"),
            CounterKind::Download => f.write_str("download"),
        }
    }
}

/// Per-image view and download counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub image_id: u64,
    pub view_count: u64,
    pub download_count: u64,
    pub last_view_timestamp: Option<DateTime<Utc>>,
    pub last_download_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CounterRecord {
    /// Record for an image's very first increment of `kind`.
    pub fn first(image_id: u64, kind: CounterKind, at: DateTime<Utc>) -> Self {
        let mut record = Self {
            image_id,
            view_count: 0,
            download_count: 0,
            last_view_timestamp: None,
            last_download_timestamp: None,
            created_at: at,
            updated_at: at,
        };

        match kind {
            CounterKind::View => {
                record.view_count = 1;
                record.last_view_timestamp = Some(at);
            }
            CounterKind::Download => {
                record.download_count = 1;
                record.last_download_timestamp = Some(at);
            }
        }

        record
    }

    pub fn count(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::View => self.view_count,
            CounterKind::Download => self.download_count,
        }
    }
}
