//! Terminal User Interface for SupportDash
//!
//! Date inputs, Get Metrics / Reset actions and the metrics tables.

mod app;
mod components;
mod event;
mod ui;

pub use app::App;
pub use event::{Event, EventHandler};
