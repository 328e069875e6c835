//! Metrics data models
//!
//! These types mirror the JSON document returned by the metrics service.
//! Every field the service may omit carries a default so that a partial
//! response still decodes and renders.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used when a time average is missing from the response
pub const NO_DATA: &str = "N/A";

/// Ticket priority, P0 being the most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Critical
    P0,
    /// High
    P1,
    /// Medium
    P2,
    /// Low
    P3,
    /// Lowest
    P4,
}

impl Priority {
    /// All priorities in display order
    pub const ALL: [Priority; 5] = [
        Priority::P0,
        Priority::P1,
        Priority::P2,
        Priority::P3,
        Priority::P4,
    ];

    /// Wire and display label
    pub fn label(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticket counts for one tag, broken down by priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    /// Tickets carrying the tag
    #[serde(default)]
    pub total: u64,

    #[serde(rename = "P0", default)]
    pub p0: u64,

    #[serde(rename = "P1", default)]
    pub p1: u64,

    #[serde(rename = "P2", default)]
    pub p2: u64,

    #[serde(rename = "P3", default)]
    pub p3: u64,

    #[serde(rename = "P4", default)]
    pub p4: u64,
}

impl PriorityCounts {
    /// Count for a single priority
    pub fn get(&self, priority: Priority) -> u64 {
        match priority {
            Priority::P0 => self.p0,
            Priority::P1 => self.p1,
            Priority::P2 => self.p2,
            Priority::P3 => self.p3,
            Priority::P4 => self.p4,
        }
    }
}

/// Status breakdown for one primary tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTagEntry {
    /// Tickets with this primary tag across all statuses
    #[serde(rename = "Total", default)]
    pub total: u64,

    /// Count per status label ("In Process", "Resolved", ...)
    #[serde(flatten)]
    pub statuses: BTreeMap<String, u64>,
}

impl CrossTagEntry {
    /// Count for a status label, zero when the service did not report it
    pub fn count(&self, status: &str) -> u64 {
        self.statuses.get(status).copied().unwrap_or(0)
    }
}

/// A time average as reported by the service.
///
/// The service sends a number when it has data and a placeholder string
/// otherwise; decoding keeps the two cases apart so that formatting never
/// has to inspect the JSON type again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// Average in hours
    Numeric(f64),
    /// Placeholder text supplied by the service
    Unavailable(String),
}

impl Default for TimeValue {
    fn default() -> Self {
        Self::Unavailable(NO_DATA.to_string())
    }
}

/// Decode a time value, treating `null` like a missing field
fn time_value_or_unavailable<'de, D>(deserializer: D) -> Result<TimeValue, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TimeValue>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl TimeValue {
    /// Numeric value, if any
    pub fn as_hours(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            Self::Unavailable(_) => None,
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{v:.2}"),
            Self::Unavailable(text) => f.write_str(text),
        }
    }
}

/// Average closure and response times for one priority
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityAverage {
    /// Mean hours from creation to closure
    #[serde(default, deserialize_with = "time_value_or_unavailable")]
    pub avg_closure_time: TimeValue,

    /// Mean hours from creation to first response
    #[serde(default, deserialize_with = "time_value_or_unavailable")]
    pub avg_response_time: TimeValue,

    /// Tickets that contributed to the closure average
    #[serde(default)]
    pub closure_count: u64,

    /// Tickets that contributed to the response average
    #[serde(default)]
    pub response_count: u64,
}

/// Metrics for a date range, as computed by the metrics service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    /// Service-reported outcome
    #[serde(default = "default_success")]
    pub success: bool,

    /// Service-reported status code
    #[serde(default = "default_status")]
    pub status: u16,

    /// Tickets in the queried range
    pub total_rows: u64,

    /// Counts per tag name
    #[serde(default)]
    pub tag_counts: BTreeMap<String, PriorityCounts>,

    /// Primary tag x status breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_tag_analysis: Option<BTreeMap<String, CrossTagEntry>>,

    /// Per-priority time averages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_averages: Option<BTreeMap<String, PriorityAverage>>,

    /// Overall average closure time in hours
    pub avg_closure_time: f64,

    /// Overall average response time in hours
    pub avg_response_time: f64,
}

fn default_success() -> bool {
    true
}

fn default_status() -> u16 {
    200
}

impl MetricsResult {
    /// Counts for a tag, all zero when the tag is absent from the response
    pub fn tag_counts_for(&self, tag: &str) -> PriorityCounts {
        self.tag_counts.get(tag).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_response() -> serde_json::Value {
        json!({
            "success": true,
            "status": 200,
            "totalRows": 42,
            "tagCounts": {
                "Bug": { "total": 10, "P0": 2, "P1": 3, "P2": 2, "P3": 2, "P4": 1 },
                "Resolved": { "total": 7, "P0": 0, "P1": 1, "P2": 3, "P3": 2, "P4": 1 }
            },
            "crossTagAnalysis": {
                "Bug": { "In Process": 4, "Resolved": 5, "Total": 10 }
            },
            "priorityAverages": {
                "P0": {
                    "avgClosureTime": "N/A",
                    "avgResponseTime": 4.567,
                    "closureCount": 0,
                    "responseCount": 3
                }
            },
            "avgClosureTime": 12.3456,
            "avgResponseTime": 1.5
        })
    }

    #[test]
    fn test_decode_full_response() {
        let result: MetricsResult = serde_json::from_value(full_response()).unwrap();

        assert_eq!(result.total_rows, 42);
        assert_eq!(result.tag_counts_for("Bug").p1, 3);

        let cross = result.cross_tag_analysis.as_ref().unwrap();
        assert_eq!(cross["Bug"].total, 10);
        assert_eq!(cross["Bug"].count("Resolved"), 5);
        assert_eq!(cross["Bug"].count("Pending from Org"), 0);
        assert!(!cross["Bug"].statuses.contains_key("Total"));

        let averages = result.priority_averages.as_ref().unwrap();
        assert_eq!(
            averages["P0"].avg_closure_time,
            TimeValue::Unavailable("N/A".to_string())
        );
        assert_eq!(averages["P0"].avg_response_time, TimeValue::Numeric(4.567));
    }

    #[test]
    fn test_decode_degraded_response() {
        let result: MetricsResult = serde_json::from_value(json!({
            "success": true,
            "status": 200,
            "totalRows": 0,
            "tagCounts": {},
            "avgClosureTime": 0,
            "avgResponseTime": 0
        }))
        .unwrap();

        assert!(result.cross_tag_analysis.is_none());
        assert!(result.priority_averages.is_none());
    }

    #[test]
    fn test_missing_tag_defaults_to_zero() {
        let result: MetricsResult = serde_json::from_value(full_response()).unwrap();

        assert_eq!(result.tag_counts_for("Resources"), PriorityCounts::default());
    }

    #[test]
    fn test_partial_counts_default() {
        let counts: PriorityCounts = serde_json::from_value(json!({ "total": 3, "P2": 3 })).unwrap();

        assert_eq!(counts.total, 3);
        assert_eq!(counts.get(Priority::P2), 3);
        assert_eq!(counts.get(Priority::P0), 0);
    }

    #[test]
    fn test_missing_average_is_unavailable() {
        let avg: PriorityAverage =
            serde_json::from_value(json!({ "closureCount": 1, "responseCount": 1 })).unwrap();

        assert_eq!(avg.avg_closure_time.to_string(), NO_DATA);
        assert!(avg.avg_response_time.as_hours().is_none());
    }

    #[test]
    fn test_null_average_is_unavailable() {
        let result: MetricsResult = serde_json::from_value(json!({
            "totalRows": 2,
            "priorityAverages": {
                "P1": { "avgClosureTime": null, "avgResponseTime": 2.5 },
                "P2": { "avgClosureTime": 8, "avgResponseTime": null }
            },
            "avgClosureTime": 8,
            "avgResponseTime": 2.5
        }))
        .unwrap();

        let averages = result.priority_averages.unwrap();
        assert_eq!(averages["P1"].avg_closure_time, TimeValue::default());
        assert_eq!(averages["P1"].avg_response_time, TimeValue::Numeric(2.5));
        assert_eq!(averages["P2"].avg_response_time.to_string(), NO_DATA);
    }

    #[test]
    fn test_time_value_display() {
        assert_eq!(TimeValue::Numeric(4.567).to_string(), "4.57");
        assert_eq!(TimeValue::Numeric(3.0).to_string(), "3.00");
        assert_eq!(TimeValue::Unavailable("No data".into()).to_string(), "No data");
    }

    #[test]
    fn test_required_totals() {
        let err = serde_json::from_value::<MetricsResult>(json!({ "totalRows": 1 }));
        assert!(err.is_err());
    }
}
