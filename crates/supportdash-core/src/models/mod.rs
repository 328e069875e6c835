//! Data models for SupportDash

mod metrics;
mod query;

pub use metrics::*;
pub use query::*;
