//! REST API for the collection reporting dashboard
//!
//! Exposes the aggregation outputs as JSON for presentation clients.

pub mod handlers;
pub mod service;

pub use service::ReportingService;
