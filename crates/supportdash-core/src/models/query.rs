//! Query parameters sent to the metrics service

use std::fmt;

use serde::{Deserialize, Serialize};

/// Date range for a metrics query.
///
/// Both bounds are free text (normally `YYYY-MM-DD`). They are forwarded to
/// the service exactly as entered; the service decides what an empty or
/// malformed bound means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Sent as `startDate`
    pub start_date: String,
    /// Sent as `endDate`
    pub end_date: String,
}

impl DateRange {
    /// Create a range from two bounds
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Query string pairs in wire order
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [
            ("startDate", self.start_date.as_str()),
            ("endDate", self.end_date.as_str()),
        ]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |s: &str| if s.is_empty() { "…" } else { s }.to_string();
        write!(f, "{} → {}", bound(&self.start_date), bound(&self.end_date))
    }
}
