use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::DashError;
use super::model::{Row, Table, Value};

// ---------------------------------------------------------------------------
// Fetching – where the raw bytes come from
// ---------------------------------------------------------------------------

/// Source of raw dataset bytes, keyed by a source identifier (URL or path).
/// The seam lets tests serve canned data and count fetches.
pub trait Fetch {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, DashError>;
}

/// Default fetcher: `http://` / `https://` sources over a blocking HTTP
/// client, anything else read from the filesystem.
#[derive(Debug, Default)]
pub struct SourceFetcher;

impl Fetch for SourceFetcher {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, DashError> {
        let fetch_err = |reason: String| DashError::Fetch {
            resource: source.to_string(),
            reason,
        };
        if source.starts_with("http://") || source.starts_with("https://") {
            let response = reqwest::blocking::get(source)
                .and_then(|r| r.error_for_status())
                .map_err(|e| fetch_err(e.to_string()))?;
            let body = response.bytes().map_err(|e| fetch_err(e.to_string()))?;
            Ok(body.to_vec())
        } else {
            std::fs::read(source).map_err(|e| fetch_err(e.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// DataLoader – fetch + parse + per-source cache
// ---------------------------------------------------------------------------

/// Loads delimited datasets and caches each parsed table under the source
/// string it was requested with. The cache compares source identifiers by
/// value and is never invalidated for the loader's lifetime, so a dashboard
/// re-rendering against the same URL parses the resource exactly once.
pub struct DataLoader<F: Fetch = SourceFetcher> {
    fetcher: F,
    cache: BTreeMap<String, Arc<Table>>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::with_fetcher(SourceFetcher)
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetch> DataLoader<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        DataLoader {
            fetcher,
            cache: BTreeMap::new(),
        }
    }

    /// Fetch and parse `source`, or return the table already cached for it.
    pub fn load(&mut self, source: &str) -> Result<Arc<Table>, DashError> {
        if let Some(table) = self.cache.get(source) {
            log::debug!("cache hit for {source}");
            return Ok(Arc::clone(table));
        }
        let bytes = self.fetcher.fetch(source)?;
        let table = Arc::new(parse_csv(source, &bytes)?);
        log::info!(
            "loaded {} rows x {} columns from {source}",
            table.len(),
            table.columns().len()
        );
        self.cache.insert(source.to_string(), Arc::clone(&table));
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// CSV parsing with per-column type inference
// ---------------------------------------------------------------------------

/// What a whole column can be parsed as, given every non-missing cell in it.
#[derive(Clone, Copy, PartialEq)]
enum ColumnType {
    Int,
    Float,
    Str,
}

/// Parse a comma-separated resource with a header row into a [`Table`].
///
/// Types are inferred per column over all rows: every cell parses as `i64`
/// → integer column; else every cell parses as `f64` → float column; else
/// text. Empty cells are missing (`Null`) and do not affect inference.
/// Ragged or undecodable input fails the load; callers never get a
/// best-effort table.
fn parse_csv(source: &str, bytes: &[u8]) -> Result<Table, DashError> {
    let malformed = |reason: String| DashError::Fetch {
        resource: source.to_string(),
        reason,
    };

    let mut reader = csv::Reader::from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result.map_err(|e| malformed(e.to_string()))?);
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|idx| infer_column_type(&records, idx))
        .collect();

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .zip(&types)
                .enumerate()
                .map(|(idx, (name, ty))| {
                    (name.clone(), parse_cell(record.get(idx).unwrap_or(""), *ty))
                })
                .collect()
        })
        .collect();

    Ok(Table::new(headers, rows))
}

fn infer_column_type(records: &[csv::StringRecord], idx: usize) -> ColumnType {
    let mut ty = ColumnType::Int;
    for record in records {
        let cell = record.get(idx).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        if ty == ColumnType::Int && cell.parse::<i64>().is_err() {
            ty = ColumnType::Float;
        }
        if ty == ColumnType::Float && cell.parse::<f64>().is_err() {
            return ColumnType::Str;
        }
    }
    ty
}

fn parse_cell(cell: &str, ty: ColumnType) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match ty {
        // Inference guaranteed these parses; fall back to text if a cell
        // slips through anyway rather than panicking.
        ColumnType::Int => trimmed
            .parse::<i64>()
            .map_or_else(|_| Value::Str(cell.to_string()), Value::Int),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .map_or_else(|_| Value::Str(cell.to_string()), Value::Float),
        ColumnType::Str => Value::Str(cell.to_string()),
    }
}
