//! Dashboard module
//!
//! Provides an overview page with the monthly flow, the category and source
//! breakdowns and a summary of the selected month, plus the same views as JSON.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::{aggregate_endpoint, get_dashboard_json, get_dashboard_page};
