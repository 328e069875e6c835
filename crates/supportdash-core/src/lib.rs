//! # SupportDash
//!
//! Terminal dashboard for support-ticket metrics.
//!
//! SupportDash asks an external metrics service for the tickets of a date
//! range and shows the answer as summary cards and tables: counts by tag
//! and priority, status breakdowns per tag, and average response and
//! closure times per priority.
//!
//! ## Architecture
//!
//! - **Client**: one HTTP GET per fetch, typed decoding of the response
//! - **View**: date inputs, loading and error state, request sequencing
//! - **Render**: pure mapping from metrics to cards and table rows
//! - **TUI**: Terminal-based dashboard
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the dashboard
//! supportdash dashboard
//!
//! # Print a report for January
//! supportdash fetch --start 2024-01-01 --end 2024-01-31
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod palette;
pub mod render;
pub mod tui;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::client::{FetchError, HttpMetricsClient, MetricsClient};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::view::MetricsView;
}
