//! Metrics view state
//!
//! [`MetricsView`] owns the date inputs, the loading flag and the last
//! committed fetch outcome. A fetch is split in two halves so the request
//! can run outside the UI loop:
//!
//! 1. [`MetricsView::begin_fetch`] marks the view as loading and hands out a
//!    [`FetchTicket`] numbered from a monotonically increasing sequence.
//! 2. [`MetricsView::complete`] commits an outcome only when its ticket is
//!    the most recently issued one. Responses to superseded requests are
//!    dropped even when they arrive last.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::client::{FetchError, FetchOutcome, MetricsClient};
use crate::models::{DateRange, MetricsResult};

/// Which date input is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateField {
    /// Lower bound
    #[default]
    Start,
    /// Upper bound
    End,
}

impl DateField {
    /// The other field
    pub fn toggle(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    /// Input label
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start Date",
            Self::End => "End Date",
        }
    }
}

/// Handle for one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    range: DateRange,
}

impl FetchTicket {
    /// Position in the request sequence
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Range captured when the request was started
    pub fn range(&self) -> &DateRange {
        &self.range
    }
}

/// State behind the metrics screen
#[derive(Debug, Default)]
pub struct MetricsView {
    start_date: String,
    end_date: String,
    loading: bool,
    metrics: Option<MetricsResult>,
    error: Option<FetchError>,
    fetched_at: Option<DateTime<Local>>,
    seq: u64,
}

impl MetricsView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with prefilled dates
    pub fn with_range(range: DateRange) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            ..Self::default()
        }
    }

    /// Start date as typed
    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    /// End date as typed
    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    /// Replace the start date
    pub fn set_start_date(&mut self, value: impl Into<String>) {
        self.start_date = value.into();
    }

    /// Replace the end date
    pub fn set_end_date(&mut self, value: impl Into<String>) {
        self.end_date = value.into();
    }

    /// Text of a date input
    pub fn date(&self, field: DateField) -> &str {
        match field {
            DateField::Start => &self.start_date,
            DateField::End => &self.end_date,
        }
    }

    /// Mutable text of a date input, for character editing
    pub fn date_mut(&mut self, field: DateField) -> &mut String {
        match field {
            DateField::Start => &mut self.start_date,
            DateField::End => &mut self.end_date,
        }
    }

    /// Current inputs as a query range
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date.clone(), self.end_date.clone())
    }

    /// Whether a request is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last committed metrics
    pub fn metrics(&self) -> Option<&MetricsResult> {
        self.metrics.as_ref()
    }

    /// Last committed failure
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// When the displayed metrics arrived
    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    /// Start a fetch for the current inputs.
    ///
    /// Any earlier in-flight request is superseded.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.seq += 1;
        self.loading = true;
        self.error = None;

        let ticket = FetchTicket {
            seq: self.seq,
            range: self.range(),
        };
        info!(seq = ticket.seq, range = %ticket.range, "Fetch started");
        ticket
    }

    /// Commit the outcome of a fetch.
    ///
    /// Returns `false` and leaves the state untouched when `ticket` has been
    /// superseded by a newer fetch or by [`MetricsView::reset`].
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> bool {
        if ticket.seq != self.seq {
            warn!(
                seq = ticket.seq,
                latest = self.seq,
                "Discarding response to superseded request"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(metrics) => {
                info!(seq = ticket.seq, total_rows = metrics.total_rows, "Metrics committed");
                self.metrics = Some(metrics);
                self.error = None;
                self.fetched_at = Some(Local::now());
            }
            Err(err) => {
                warn!(seq = ticket.seq, error = %err, "Fetch failed");
                self.metrics = None;
                self.error = Some(err);
                self.fetched_at = None;
            }
        }
        true
    }

    /// Run a whole fetch inline: begin, request with a deadline, complete
    pub async fn fetch<C>(&mut self, client: &C, deadline: Duration) -> bool
    where
        C: MetricsClient + ?Sized,
    {
        let ticket = self.begin_fetch();
        let outcome = fetch_with_deadline(client, ticket.range(), deadline).await;
        self.complete(&ticket, outcome)
    }

    /// Clear inputs and results.
    ///
    /// Also supersedes any in-flight request so its response is ignored.
    pub fn reset(&mut self) {
        self.seq += 1;
        self.start_date.clear();
        self.end_date.clear();
        self.loading = false;
        self.metrics = None;
        self.error = None;
        self.fetched_at = None;
        info!(seq = self.seq, "View reset");
    }
}

/// Fetch through `client`, failing with [`FetchError::Timeout`] once
/// `deadline` has elapsed whatever the client does.
pub async fn fetch_with_deadline<C>(client: &C, range: &DateRange, deadline: Duration) -> FetchOutcome
where
    C: MetricsClient + ?Sized,
{
    match tokio::time::timeout(deadline, client.fetch(range)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(FetchError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn metrics(total_rows: u64) -> MetricsResult {
        MetricsResult {
            total_rows,
            avg_closure_time: 1.0,
            avg_response_time: 0.5,
            ..MetricsResult::default()
        }
    }

    struct FixedClient(FetchOutcome);

    #[async_trait]
    impl MetricsClient for FixedClient {
        async fn fetch(&self, _range: &DateRange) -> FetchOutcome {
            self.0.clone()
        }
    }

    struct HangingClient;

    #[async_trait]
    impl MetricsClient for HangingClient {
        async fn fetch(&self, _range: &DateRange) -> FetchOutcome {
            std::future::pending().await
        }
    }

    #[test]
    fn test_initial_state() {
        let view = MetricsView::new();

        assert_eq!(view.start_date(), "");
        assert_eq!(view.end_date(), "");
        assert!(!view.is_loading());
        assert!(view.metrics().is_none());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_begin_fetch_captures_raw_range() {
        let mut view = MetricsView::new();
        view.set_start_date("2024-02-30");

        let ticket = view.begin_fetch();

        assert!(view.is_loading());
        assert_eq!(ticket.range(), &DateRange::new("2024-02-30", ""));
    }

    #[test]
    fn test_success_replaces_metrics() {
        let mut view = MetricsView::new();
        let first = view.begin_fetch();
        assert!(view.complete(&first, Ok(metrics(1))));

        let second = view.begin_fetch();
        assert!(view.complete(&second, Ok(metrics(2))));

        assert!(!view.is_loading());
        assert_eq!(view.metrics().map(|m| m.total_rows), Some(2));
        assert!(view.fetched_at().is_some());
    }

    #[test]
    fn test_latest_started_request_wins() {
        let mut view = MetricsView::new();
        let a = view.begin_fetch();
        let b = view.begin_fetch();

        assert!(view.complete(&b, Ok(metrics(20))));
        assert!(!view.complete(&a, Ok(metrics(10))));

        assert_eq!(view.metrics().map(|m| m.total_rows), Some(20));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_stale_failure_does_not_clear_loading() {
        let mut view = MetricsView::new();
        let a = view.begin_fetch();
        let _b = view.begin_fetch();

        assert!(!view.complete(&a, Err(FetchError::HttpStatus(500))));

        assert!(view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_failure_sets_error_and_clears_loading() {
        let mut view = MetricsView::new();
        let ok = view.begin_fetch();
        view.complete(&ok, Ok(metrics(5)));

        let failing = view.begin_fetch();
        view.complete(&failing, Err(FetchError::Transport("connection refused".into())));

        assert!(!view.is_loading());
        assert!(view.metrics().is_none());
        assert_eq!(
            view.error(),
            Some(&FetchError::Transport("connection refused".into()))
        );
    }

    #[test]
    fn test_begin_fetch_clears_previous_error() {
        let mut view = MetricsView::new();
        let t = view.begin_fetch();
        view.complete(&t, Err(FetchError::Decode("eof".into())));

        view.begin_fetch();

        assert!(view.error().is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut view = MetricsView::with_range(DateRange::new("2024-01-01", "2024-01-31"));
        let t = view.begin_fetch();
        view.complete(&t, Ok(metrics(9)));

        view.reset();

        assert_eq!(view.start_date(), "");
        assert_eq!(view.end_date(), "");
        assert!(view.metrics().is_none());
        assert!(view.error().is_none());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_reset_discards_in_flight_response() {
        let mut view = MetricsView::new();
        let t = view.begin_fetch();

        view.reset();

        assert!(!view.complete(&t, Ok(metrics(3))));
        assert!(view.metrics().is_none());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_date_editing() {
        let mut view = MetricsView::new();
        view.date_mut(DateField::Start).push_str("2024-01-0");
        view.date_mut(DateField::Start).push('1');
        view.date_mut(DateField::End).push('x');
        view.date_mut(DateField::End).pop();

        assert_eq!(view.date(DateField::Start), "2024-01-01");
        assert_eq!(view.date(DateField::End), "");
        assert_eq!(DateField::Start.toggle(), DateField::End);
    }

    #[tokio::test]
    async fn test_fetch_inline() {
        let mut view = MetricsView::new();
        let client = FixedClient(Ok(metrics(7)));

        assert!(view.fetch(&client, Duration::from_secs(1)).await);

        assert_eq!(view.metrics().map(|m| m.total_rows), Some(7));
    }

    #[tokio::test]
    async fn test_service_failure_is_distinct_state() {
        let mut view = MetricsView::new();
        let client = FixedClient(Err(FetchError::Service {
            status: 500,
            message: "quota exceeded".into(),
        }));

        view.fetch(&client, Duration::from_secs(1)).await;

        assert!(matches!(view.error(), Some(FetchError::Service { status: 500, .. })));
        assert!(view.metrics().is_none());
    }

    #[tokio::test]
    async fn test_hanging_fetch_times_out() {
        let mut view = MetricsView::new();
        let deadline = Duration::from_millis(50);

        view.fetch(&HangingClient, deadline).await;

        assert!(!view.is_loading());
        assert_eq!(view.error(), Some(&FetchError::Timeout(deadline)));
    }
}
