//! Data loader for the form-aggregation export
//!
//! Fetches the semicolon-delimited CSV export, parses it into
//! `Submission` rows and memoizes the result per source URL. A manual
//! refresh bumps a generation counter so the next load re-fetches; a
//! fetch that raced a refresh stores under its captured generation and
//! is discarded on the next call.

use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::models::{CsvRecord, Submission};

/// Immutable table of submissions, shared read-only between passes.
pub type Table = Arc<Vec<Submission>>;

/// Parse a semicolon-delimited export into submission rows.
/// Any row failure fails the whole parse; no partial table.
pub fn parse_export<R: Read>(reader: R) -> Result<Vec<Submission>, ReportError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let record: CsvRecord = result?;
        rows.push(record.to_submission()?);
    }
    Ok(rows)
}

/// Read an export from a local file (synthetic data, offline use).
pub fn read_export_file(path: &Path) -> Result<Vec<Submission>, ReportError> {
    let file = std::fs::File::open(path)?;
    let rows = parse_export(file)?;
    info!("Parsed {} submissions from {:?}", rows.len(), path);
    Ok(rows)
}

struct CachedTable {
    generation: u64,
    table: Table,
}

/// Memoized remote data source.
///
/// One instance is shared process-wide; every render pass goes through
/// `load`. The cached table is never mutated, so concurrent passes can
/// share it without locking beyond the cache slot itself.
pub struct DataSource {
    url: String,
    client: reqwest::Client,
    generation: AtomicU64,
    cache: Mutex<Option<CachedTable>>,
}

impl DataSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            generation: AtomicU64::new(0),
            cache: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current cache generation. Bumped by `refresh`.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate the cached table. The next `load` re-fetches.
    pub fn refresh(&self) -> u64 {
        let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Cache invalidated, generation {}", gen);
        gen
    }

    /// Fetch and parse the export, or return the cached table if it is
    /// still valid for the current generation.
    pub async fn load(&self) -> Result<Table, ReportError> {
        let gen = self.generation();
        if let Some(cached) = self.cache.lock().unwrap().as_ref() {
            if cached.generation == gen {
                debug!("Cache hit for {} (generation {})", self.url, gen);
                return Ok(cached.table.clone());
            }
        }

        info!("Fetching export from {}", self.url);
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let table: Table = Arc::new(parse_export(body.as_bytes())?);
        info!("Loaded {} submissions", table.len());

        // Store under the generation captured before the fetch. If a
        // refresh landed mid-fetch the entry is already stale and the
        // next load fetches again.
        *self.cache.lock().unwrap() = Some(CachedTable {
            generation: gen,
            table: table.clone(),
        });
        Ok(table)
    }

    #[cfg(test)]
    fn prime(&self, table: Vec<Submission>) {
        *self.cache.lock().unwrap() = Some(CachedTable {
            generation: self.generation(),
            table: Arc::new(table),
        });
    }

    #[cfg(test)]
    fn cached(&self) -> Option<Table> {
        let gen = self.generation();
        self.cache
            .lock()
            .unwrap()
            .as_ref()
            .filter(|c| c.generation == gen)
            .map(|c| c.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
nom_CE;date_reporting;NomReg;NomDep;NomSp;NumZD;UEF_total;UEI_total;UE_total;refus_total;partiel_total;NbZD;UE_enq1;UE_enq2;UE_enq3
RGEECI_Ce0131;15/01/2024;GBEKE;BOUAKE;BOUAKE;0012,0013;3;2;5;0;1;2;2;2;1
RGEECI_Ce0134;16/01/2024;GBEKE;BEOUMI;BEOUMI;0000;1;2;3;1;0;1;1;1;1
";

    #[test]
    fn test_parse_export() {
        let rows = parse_export(EXPORT.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].zone_ids.as_deref(), Some("0012,0013"));
        assert_eq!(rows[1].supervisor.as_deref(), Some("KOUADIO"));
        assert_eq!(rows[0].agent_units, [2, 2, 1]);
    }

    #[test]
    fn test_parse_keeps_leading_zeros() {
        let rows = parse_export(EXPORT.as_bytes()).unwrap();
        assert_eq!(rows[1].zone_ids.as_deref(), Some("0000"));
    }

    #[test]
    fn test_malformed_export_fails_whole_parse() {
        let bad = EXPORT.replace(";3;2;5;", ";three;2;5;");
        assert!(matches!(
            parse_export(bad.as_bytes()),
            Err(ReportError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_cache_shares_same_table_until_refresh() {
        let source = DataSource::new("http://example.invalid/export.csv");
        source.prime(parse_export(EXPORT.as_bytes()).unwrap());

        let first = source.cached().unwrap();
        let second = source.cached().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        source.refresh();
        assert!(source.cached().is_none());
    }

    #[test]
    fn test_refresh_during_fetch_is_not_lost() {
        let source = DataSource::new("http://example.invalid/export.csv");
        // Simulate a fetch that captured generation 0, then a refresh
        // landing before the store.
        let stale_gen = source.generation();
        source.refresh();
        *source.cache.lock().unwrap() = Some(CachedTable {
            generation: stale_gen,
            table: Arc::new(parse_export(EXPORT.as_bytes()).unwrap()),
        });
        // The stale entry must not satisfy the current generation.
        assert!(source.cached().is_none());
    }
}
