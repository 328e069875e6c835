//! Rendering contract
//!
//! Turns a [`MetricsResult`] into a [`Dashboard`]: the summary cards and
//! table rows both front ends display. Everything here is a pure function
//! of the metrics; lookups into service-supplied maps always default.

use std::fmt::Write as _;

use crate::client::FetchError;
use crate::models::{MetricsResult, Priority, PriorityCounts};

/// Unit shown after every time average
pub const TIME_UNIT: &str = "hours";

/// Tags listed in the tag table, in display order
pub const TAG_ROWS: [&str; 5] = [
    "Knowledge Gap",
    "Bug",
    "New Feature",
    "Documentation update",
    "Resources",
];

/// Statuses listed in the status table and cross-tag columns, in display order
pub const STATUS_ROWS: [&str; 3] = ["In Process", "Resolved", "Pending from Org"];

/// Heading of the tag table
pub const TAG_TABLE_TITLE: &str = "Ticket Tags by Priority";
/// Heading of the status table
pub const STATUS_TABLE_TITLE: &str = "Ticket Status by Priority";
/// Heading of the cross-tag table
pub const CROSS_TAG_TITLE: &str = "Ticket Status by Category";
/// Heading of the priority averages table
pub const PRIORITY_AVERAGES_TITLE: &str = "Average Times by Priority";

/// One headline number
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    /// Card heading
    pub title: &'static str,
    /// Formatted figure
    pub value: String,
}

/// A tag or status with its counts per priority
#[derive(Debug, Clone, PartialEq)]
pub struct CountsRow {
    /// Tag or status name
    pub label: String,
    /// Per-priority counts, zero when absent
    pub counts: PriorityCounts,
}

/// Status breakdown for one primary tag
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTagRow {
    /// Primary tag
    pub tag: String,
    /// Counts in [`STATUS_ROWS`] order
    pub statuses: [u64; 3],
    /// Tickets with this tag across all statuses
    pub total: u64,
}

/// Formatted averages for one priority
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityAverageRow {
    /// Priority label as sent by the service
    pub priority: String,
    /// Two decimals, or the service placeholder
    pub avg_closure_time: String,
    /// Two decimals, or the service placeholder
    pub avg_response_time: String,
    /// Tickets behind the closure average
    pub closure_count: u64,
    /// Tickets behind the response average
    pub response_count: u64,
}

/// Everything shown once metrics are available
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Total tickets, average closure time, average response time
    pub cards: [SummaryCard; 3],
    /// One row per entry of [`TAG_ROWS`]
    pub tag_table: Vec<CountsRow>,
    /// One row per entry of [`STATUS_ROWS`]
    pub status_table: Vec<CountsRow>,
    /// Present only when the service sent a cross-tag analysis
    pub cross_tag: Option<Vec<CrossTagRow>>,
    /// Present only when the service sent priority averages
    pub priority_averages: Option<Vec<PriorityAverageRow>>,
}

impl Dashboard {
    /// Build the dashboard for a fetched result
    pub fn from_metrics(metrics: &MetricsResult) -> Self {
        let cards = [
            SummaryCard {
                title: "Total Tickets",
                value: metrics.total_rows.to_string(),
            },
            SummaryCard {
                title: "Avg Closure Time",
                value: format_hours(metrics.avg_closure_time),
            },
            SummaryCard {
                title: "Avg Response Time",
                value: format_hours(metrics.avg_response_time),
            },
        ];

        let counts_rows = |labels: &[&str]| -> Vec<CountsRow> {
            labels
                .iter()
                .map(|label| CountsRow {
                    label: (*label).to_string(),
                    counts: metrics.tag_counts_for(label),
                })
                .collect()
        };

        let cross_tag = metrics.cross_tag_analysis.as_ref().map(|analysis| {
            analysis
                .iter()
                .map(|(tag, entry)| CrossTagRow {
                    tag: tag.clone(),
                    statuses: STATUS_ROWS.map(|status| entry.count(status)),
                    total: entry.total,
                })
                .collect()
        });

        let priority_averages = metrics.priority_averages.as_ref().map(|averages| {
            averages
                .iter()
                .map(|(priority, avg)| PriorityAverageRow {
                    priority: priority.clone(),
                    avg_closure_time: avg.avg_closure_time.to_string(),
                    avg_response_time: avg.avg_response_time.to_string(),
                    closure_count: avg.closure_count,
                    response_count: avg.response_count,
                })
                .collect()
        });

        Self {
            cards,
            tag_table: counts_rows(&TAG_ROWS),
            status_table: counts_rows(&STATUS_ROWS),
            cross_tag,
            priority_averages,
        }
    }
}

/// Format a time average with two decimals and the unit
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2} {TIME_UNIT}")
}

/// Short user-facing description of a fetch failure
pub fn error_headline(err: &FetchError) -> &'static str {
    match err {
        FetchError::Transport(_) => "Could not reach the metrics service",
        FetchError::Timeout(_) => "The metrics service did not answer in time",
        FetchError::HttpStatus(_) => "The metrics service returned an HTTP error",
        FetchError::Decode(_) => "The metrics service sent an unreadable response",
        FetchError::Service { .. } => "The metrics service reported a failure",
    }
}

/// Header cells for a counts table
pub fn counts_header(first: &'static str) -> Vec<&'static str> {
    let mut header = vec![first, "Total"];
    header.extend(Priority::ALL.map(Priority::label));
    header
}

/// Cells of a counts row after the label
pub fn counts_cells(counts: &PriorityCounts) -> Vec<String> {
    std::iter::once(counts.total)
        .chain(Priority::ALL.map(|p| counts.get(p)))
        .map(|n| n.to_string())
        .collect()
}

/// Plain-text report for non-interactive output
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    for card in &dashboard.cards {
        let _ = writeln!(out, "{:<18} {}", format!("{}:", card.title), card.value);
    }

    let counts_table = |title: &str, first: &'static str, rows: &[CountsRow]| {
        let body = rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone()];
                cells.extend(counts_cells(&row.counts));
                cells
            })
            .collect::<Vec<_>>();
        text_table(title, &counts_header(first), &body)
    };

    out.push('\n');
    out.push_str(&counts_table(TAG_TABLE_TITLE, "Tag", &dashboard.tag_table));
    out.push('\n');
    out.push_str(&counts_table(STATUS_TABLE_TITLE, "Status", &dashboard.status_table));

    if let Some(rows) = &dashboard.cross_tag {
        let body = rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.tag.clone()];
                cells.extend(row.statuses.iter().map(u64::to_string));
                cells.push(row.total.to_string());
                cells
            })
            .collect::<Vec<_>>();
        let mut header = vec!["Primary Tag"];
        header.extend(STATUS_ROWS);
        header.push("Total");
        out.push('\n');
        out.push_str(&text_table(CROSS_TAG_TITLE, &header, &body));
    }

    if let Some(rows) = &dashboard.priority_averages {
        let body = rows
            .iter()
            .map(|row| {
                vec![
                    row.priority.clone(),
                    row.avg_closure_time.clone(),
                    row.avg_response_time.clone(),
                    row.closure_count.to_string(),
                    row.response_count.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        out.push('\n');
        out.push_str(&text_table(
            PRIORITY_AVERAGES_TITLE,
            &["Priority", "Avg Closure Time", "Avg Response Time", "Closures", "Responses"],
            &body,
        ));
    }

    out
}

fn text_table(title: &str, header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", pad_line(header.iter().copied(), &widths));
    let _ = writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in rows {
        let _ = writeln!(out, "{}", pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> MetricsResult {
        serde_json::from_value(value).unwrap()
    }

    fn bug_only() -> MetricsResult {
        decode(json!({
            "success": true,
            "status": 200,
            "totalRows": 10,
            "tagCounts": {
                "Bug": { "total": 10, "P0": 2, "P1": 3, "P2": 2, "P3": 2, "P4": 1 }
            },
            "avgClosureTime": 12.346,
            "avgResponseTime": 3.0
        }))
    }

    #[test]
    fn test_summary_cards() {
        let dashboard = Dashboard::from_metrics(&bug_only());

        let values: Vec<&str> = dashboard.cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["10", "12.35 hours", "3.00 hours"]);
    }

    #[test]
    fn test_tag_table_follows_fixed_order() {
        let dashboard = Dashboard::from_metrics(&bug_only());

        let labels: Vec<&str> = dashboard.tag_table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, TAG_ROWS.to_vec());
        let statuses: Vec<&str> = dashboard.status_table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(statuses, STATUS_ROWS.to_vec());
    }

    #[test]
    fn test_absent_tag_renders_zeros() {
        let dashboard = Dashboard::from_metrics(&bug_only());

        let resources = dashboard
            .tag_table
            .iter()
            .find(|r| r.label == "Resources")
            .unwrap();
        assert_eq!(resources.counts, PriorityCounts::default());
        assert_eq!(counts_cells(&resources.counts), vec!["0"; 6]);

        let bug = dashboard.tag_table.iter().find(|r| r.label == "Bug").unwrap();
        assert_eq!(counts_cells(&bug.counts), vec!["10", "2", "3", "2", "2", "1"]);
    }

    #[test]
    fn test_optional_sections_absent() {
        let dashboard = Dashboard::from_metrics(&bug_only());

        assert!(dashboard.cross_tag.is_none());
        assert!(dashboard.priority_averages.is_none());

        let text = render_text(&dashboard);
        assert!(!text.contains(CROSS_TAG_TITLE));
        assert!(!text.contains(PRIORITY_AVERAGES_TITLE));
        assert!(text.contains(TAG_TABLE_TITLE));
    }

    #[test]
    fn test_cross_tag_defaults_missing_statuses() {
        let mut metrics = bug_only();
        metrics.cross_tag_analysis = Some(decode_map(json!({
            "Bug": { "Resolved": 4, "Total": 6 },
            "Knowledge Gap": { "In Process": 1, "Pending from Org": 2 }
        })));

        let rows = Dashboard::from_metrics(&metrics).cross_tag.unwrap();

        assert_eq!(
            rows,
            vec![
                CrossTagRow { tag: "Bug".into(), statuses: [0, 4, 0], total: 6 },
                CrossTagRow { tag: "Knowledge Gap".into(), statuses: [1, 0, 2], total: 0 },
            ]
        );
    }

    #[test]
    fn test_priority_average_cells() {
        let mut metrics = bug_only();
        metrics.priority_averages = Some(decode_map(json!({
            "P0": {
                "avgClosureTime": "N/A",
                "avgResponseTime": 4.567,
                "closureCount": 0,
                "responseCount": 3
            },
            "P1": {
                "avgClosureTime": 20,
                "avgResponseTime": "No responses",
                "closureCount": 2,
                "responseCount": 0
            }
        })));

        let rows = Dashboard::from_metrics(&metrics).priority_averages.unwrap();

        assert_eq!(rows[0].priority, "P0");
        assert_eq!(rows[0].avg_closure_time, "N/A");
        assert_eq!(rows[0].avg_response_time, "4.57");
        assert_eq!(rows[0].response_count, 3);
        assert_eq!(rows[1].avg_closure_time, "20.00");
        assert_eq!(rows[1].avg_response_time, "No responses");
    }

    #[test]
    fn test_text_report_includes_present_sections() {
        let mut metrics = bug_only();
        metrics.priority_averages = Some(decode_map(json!({
            "P0": { "avgClosureTime": "N/A", "avgResponseTime": 4.567, "closureCount": 0, "responseCount": 3 }
        })));

        let text = render_text(&Dashboard::from_metrics(&metrics));

        assert!(text.contains("Total Tickets:     10"));
        assert!(text.contains(PRIORITY_AVERAGES_TITLE));
        assert!(text.contains("4.57"));
        assert!(text.lines().any(|l| l.starts_with("Resources") && l.ends_with('0')));
    }

    #[test]
    fn test_error_headlines_are_distinct() {
        let service = FetchError::Service { status: 500, message: "x".into() };
        let transport = FetchError::Transport("x".into());

        assert_ne!(error_headline(&service), error_headline(&transport));
    }

    fn decode_map<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }
}
