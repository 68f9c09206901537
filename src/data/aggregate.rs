use std::collections::BTreeMap;

use serde::Serialize;

use super::error::DashError;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Means
// ---------------------------------------------------------------------------

/// Arithmetic mean. `None` for an empty slice: "no observations" must stay
/// distinguishable from a mean that happens to be zero, so the empty case is
/// neither `0.0` nor NaN.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// One group of a [`GroupedAggregate`]: the group key and the mean of each
/// value column over the group's rows. A column with no non-missing cells in
/// the group has no entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: Value,
    pub means: BTreeMap<String, f64>,
}

/// Per-group means for one or more value columns. Groups appear in
/// first-appearance order of their key in the source table, not sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregate {
    pub group_column: String,
    pub value_columns: Vec<String>,
    pub groups: Vec<GroupRow>,
}

impl GroupedAggregate {
    /// Replace every group key through a fallible label function, e.g. month
    /// number → month abbreviation. A key outside the function's domain
    /// fails the whole relabel.
    pub fn relabel_keys<F>(self, label_fn: F) -> Result<Self, DashError>
    where
        F: Fn(&Value) -> Result<Value, DashError>,
    {
        let GroupedAggregate {
            group_column,
            value_columns,
            groups,
        } = self;
        let groups = groups
            .into_iter()
            .map(|group| {
                Ok(GroupRow {
                    key: label_fn(&group.key)?,
                    means: group.means,
                })
            })
            .collect::<Result<Vec<_>, DashError>>()?;
        Ok(GroupedAggregate {
            group_column,
            value_columns,
            groups,
        })
    }

    /// Rename the grouping column for display.
    pub fn rename_group_column(mut self, name: impl Into<String>) -> Self {
        self.group_column = name.into();
        self
    }

    /// Rename value columns for display, per `(from, to)` pairs. Fails with
    /// an unknown-column error when a `from` name was never aggregated.
    pub fn rename_value_columns(mut self, renames: &[(&str, &str)]) -> Result<Self, DashError> {
        for (from, _) in renames {
            if !self.value_columns.iter().any(|c| c == from) {
                return Err(DashError::UnknownColumn((*from).to_string()));
            }
        }
        let renamed = |name: &str| -> String {
            renames
                .iter()
                .find(|(from, _)| *from == name)
                .map_or_else(|| name.to_string(), |(_, to)| (*to).to_string())
        };
        self.value_columns = self.value_columns.iter().map(|c| renamed(c)).collect();
        for group in &mut self.groups {
            group.means = group
                .means
                .iter()
                .map(|(col, m)| (renamed(col), *m))
                .collect();
        }
        Ok(self)
    }
}

/// Partition rows by `group_column` and average each of `value_columns`
/// within every partition, ignoring missing cells. Rows whose group key is
/// missing are skipped entirely.
pub fn grouped_mean(
    table: &Table,
    group_column: &str,
    value_columns: &[&str],
) -> Result<GroupedAggregate, DashError> {
    table.require_column(group_column)?;
    for column in value_columns {
        table.require_column(column)?;
    }

    let mut order: Vec<Value> = Vec::new();
    let mut sums: BTreeMap<Value, BTreeMap<String, (f64, usize)>> = BTreeMap::new();

    for row in table.rows() {
        let key = match row.get(group_column) {
            None | Some(Value::Null) => continue,
            Some(key) => key.clone(),
        };
        if !sums.contains_key(&key) {
            order.push(key.clone());
        }
        let group = sums.entry(key).or_default();
        for column in value_columns {
            if let Some(v) = row.get(*column).and_then(Value::as_f64) {
                let (sum, count) = group.entry((*column).to_string()).or_insert((0.0, 0));
                *sum += v;
                *count += 1;
            }
        }
    }

    let groups = order
        .into_iter()
        .map(|key| {
            let means = sums[&key]
                .iter()
                .map(|(column, (sum, count))| (column.clone(), sum / *count as f64))
                .collect();
            GroupRow { key, means }
        })
        .collect();

    Ok(GroupedAggregate {
        group_column: group_column.to_string(),
        value_columns: value_columns.iter().map(|c| (*c).to_string()).collect(),
        groups,
    })
}

// ---------------------------------------------------------------------------
// Month labels
// ---------------------------------------------------------------------------

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label an integer month 1..=12 with its three-letter abbreviation.
/// Anything else (month 0, 13, a non-integer key) is out of range.
pub fn month_abbr(key: &Value) -> Result<Value, DashError> {
    match key {
        Value::Int(m) if (1..=12).contains(m) => {
            Ok(Value::Str(MONTH_ABBR[(*m - 1) as usize].to_string()))
        }
        other => Err(DashError::KeyOutOfRange(other.clone())),
    }
}
