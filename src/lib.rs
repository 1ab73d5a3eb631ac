pub mod aggregate;
pub mod api;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod report;
pub mod roster;
