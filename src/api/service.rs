//! Shared reporting service
//!
//! One instance is shared by all request handlers. Every call re-runs
//! the full pipeline over the cached table: load, filter, aggregate.

use crate::error::ReportError;
use crate::filter::{self, FilterSelection};
use crate::loader::DataSource;
use crate::report::{self, DashboardReport};

pub struct ReportingService {
    source: DataSource,
}

impl ReportingService {
    pub fn new(export_url: impl Into<String>) -> Self {
        Self {
            source: DataSource::new(export_url),
        }
    }

    /// One full render pass: load (cached), filter (fail-open),
    /// aggregate. Only a load failure is an error.
    pub async fn report(&self, selection: &FilterSelection) -> Result<DashboardReport, ReportError> {
        let table = self.source.load().await?;
        let rows = filter::apply(&table, &selection.clauses());
        Ok(report::build_report_today(&rows))
    }

    /// Invalidate the loader cache; returns the new generation.
    pub fn refresh(&self) -> u64 {
        self.source.refresh()
    }

    pub fn export_url(&self) -> &str {
        self.source.url()
    }
}
