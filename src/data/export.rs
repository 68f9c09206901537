use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::error::DashError;
use super::model::Table;

// ---------------------------------------------------------------------------
// CSV encoding
// ---------------------------------------------------------------------------

/// Encode a table as CSV bytes: a header row of column names in table
/// order, then one `\n`-terminated line per row, cells stringified with
/// `Value`'s stable formatting (missing cells are empty fields). Encoding
/// the same table twice yields byte-identical output.
pub fn encode_csv(table: &Table) -> Result<Vec<u8>, DashError> {
    let encode_err = |e: &dyn std::fmt::Display| DashError::Encode(e.to_string());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .map_err(|e| encode_err(&e))?;
    for row in table.rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|col| row.get(col).map(ToString::to_string).unwrap_or_default())
            .collect();
        writer.write_record(&record).map_err(|e| encode_err(&e))?;
    }
    writer.into_inner().map_err(|e| encode_err(&e))
}

// ---------------------------------------------------------------------------
// Memoized export
// ---------------------------------------------------------------------------

/// Memoizes encoded tables by content, so a download button wired through
/// repeated render cycles re-encodes nothing. Entries live as long as the
/// exporter; there is no invalidation.
#[derive(Debug, Default)]
pub struct CsvExporter {
    cache: BTreeMap<u64, Arc<Vec<u8>>>,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// CSV bytes for `table`, reusing the cached encoding when a table with
    /// identical content has been exported before.
    pub fn to_csv_bytes(&mut self, table: &Table) -> Result<Arc<Vec<u8>>, DashError> {
        let key = content_key(table);
        if let Some(bytes) = self.cache.get(&key) {
            log::debug!("export cache hit ({} bytes)", bytes.len());
            return Ok(Arc::clone(bytes));
        }
        let bytes = Arc::new(encode_csv(table)?);
        self.cache.insert(key, Arc::clone(&bytes));
        Ok(bytes)
    }
}

fn content_key(table: &Table) -> u64 {
    let mut hasher = DefaultHasher::new();
    table.hash(&mut hasher);
    hasher.finish()
}
