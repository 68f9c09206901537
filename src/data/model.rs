use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DashError;
use super::filter::{matching_row_indices, Predicate};

// ---------------------------------------------------------------------------
// Value – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, one variant per dtype the loader infers.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
///
/// `Display` is the stable stringification the CSV export relies on:
/// integers and floats in their shortest round-trippable form, `Null` as the
/// empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Int(_) => 1,
                Float(_) => 2,
                Str(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    /// Numeric view for aggregation. `None` for strings and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – uniform-schema rows in load order
// ---------------------------------------------------------------------------

/// One table row: column name → cell value.
pub type Row = BTreeMap<String, Value>;

/// An in-memory table: ordered rows sharing one column set.
///
/// `columns` preserves the source header order (the row maps are sorted by
/// name and cannot). Every row carries every column; cells absent from the
/// source are `Null`. Tables are read-only once built; the filtering and
/// renaming operations return derived copies.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, padding rows with `Null` for any column they lack.
    pub fn new(columns: Vec<String>, mut rows: Vec<Row>) -> Self {
        for row in &mut rows {
            for col in &columns {
                row.entry(col.clone()).or_insert(Value::Null);
            }
            row.retain(|col, _| columns.contains(col));
        }
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fail with an unknown-column error unless `name` is in the schema.
    pub fn require_column(&self, name: &str) -> Result<(), DashError> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(DashError::UnknownColumn(name.to_string()))
        }
    }

    /// Cell at (`row`, `column`), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Derived table keeping only the rows that satisfy every predicate,
    /// in source order. The source table is untouched.
    pub fn filter_rows(&self, predicates: &[Predicate]) -> Result<Table, DashError> {
        let indices = matching_row_indices(self, predicates)?;
        Ok(Table {
            columns: self.columns.clone(),
            rows: indices.into_iter().map(|i| self.rows[i].clone()).collect(),
        })
    }

    /// Derived table with columns renamed per `(from, to)` pairs. Fails with
    /// an unknown-column error when a `from` name is absent. Renaming onto a
    /// name the table already has is a caller bug and is not checked here.
    pub fn rename_columns(&self, renames: &[(&str, &str)]) -> Result<Table, DashError> {
        for (from, _) in renames {
            self.require_column(from)?;
        }
        let renamed = |name: &str| -> String {
            renames
                .iter()
                .find(|(from, _)| *from == name)
                .map_or_else(|| name.to_string(), |(_, to)| (*to).to_string())
        };
        let columns: Vec<String> = self.columns.iter().map(|c| renamed(c)).collect();
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(col, val)| (renamed(col), val.clone()))
                    .collect()
            })
            .collect();
        Ok(Table { columns, rows })
    }
}
