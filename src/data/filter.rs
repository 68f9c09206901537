use std::collections::BTreeSet;

use super::error::DashError;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Predicates – which rows a dashboard selection keeps
// ---------------------------------------------------------------------------

/// A single column constraint. A filter is a conjunction: a row passes only
/// when every predicate in the slice holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell equals the value exactly.
    Equals(String, Value),
    /// Cell is one of the listed values (multi-select widgets).
    OneOf(String, Vec<Value>),
}

impl Predicate {
    pub fn equals(column: impl Into<String>, value: Value) -> Self {
        Predicate::Equals(column.into(), value)
    }

    pub fn one_of(column: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::OneOf(column.into(), values)
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::Equals(col, _) | Predicate::OneOf(col, _) => col,
        }
    }

    fn matches(&self, cell: &Value) -> bool {
        match self {
            Predicate::Equals(_, value) => cell == value,
            Predicate::OneOf(_, values) => values.contains(cell),
        }
    }
}

/// Indices of rows satisfying every predicate, in source order. An empty
/// predicate set selects every row. Fails if a predicate names a column the
/// table lacks.
pub(crate) fn matching_row_indices(
    table: &Table,
    predicates: &[Predicate],
) -> Result<Vec<usize>, DashError> {
    for predicate in predicates {
        table.require_column(predicate.column())?;
    }
    Ok(table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            predicates
                .iter()
                .all(|p| row.get(p.column()).is_some_and(|cell| p.matches(cell)))
        })
        .map(|(i, _)| i)
        .collect())
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// Values of `target_column` over the rows matching `predicates`, in source
/// row order. Missing cells are dropped, never defaulted.
pub fn filter_column(
    table: &Table,
    predicates: &[Predicate],
    target_column: &str,
) -> Result<Vec<Value>, DashError> {
    table.require_column(target_column)?;
    let indices = matching_row_indices(table, predicates)?;
    Ok(indices
        .into_iter()
        .filter_map(|i| match table.rows()[i].get(target_column) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        })
        .collect())
}

/// [`filter_column`] narrowed to numeric cells, ready for averaging.
pub fn filter_column_f64(
    table: &Table,
    predicates: &[Predicate],
    target_column: &str,
) -> Result<Vec<f64>, DashError> {
    Ok(filter_column(table, predicates, target_column)?
        .iter()
        .filter_map(Value::as_f64)
        .collect())
}

/// Distinct non-missing values of `column` among the matching rows, in
/// first-appearance order. Drives the selector widgets: the state list, the
/// city list dependent on the chosen state, the month and fiscal-year lists.
pub fn distinct_values(
    table: &Table,
    predicates: &[Predicate],
    column: &str,
) -> Result<Vec<Value>, DashError> {
    let mut seen: BTreeSet<Value> = BTreeSet::new();
    let mut ordered = Vec::new();
    for value in filter_column(table, predicates, column)? {
        if seen.insert(value.clone()) {
            ordered.push(value);
        }
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn table() -> Table {
        let mk = |state: &str, city: &str, month: i64, temp: Value| -> Row {
            [
                ("state".to_string(), Value::Str(state.into())),
                ("city".to_string(), Value::Str(city.into())),
                ("month".to_string(), Value::Int(month)),
                ("temp".to_string(), temp),
            ]
            .into_iter()
            .collect()
        };
        Table::new(
            vec!["state".into(), "city".into(), "month".into(), "temp".into()],
            vec![
                mk("Alabama", "Birmingham", 1, Value::Int(40)),
                mk("Alaska", "Anchorage", 1, Value::Int(10)),
                mk("Alabama", "Birmingham", 2, Value::Int(50)),
                mk("Alabama", "Huntsville", 1, Value::Null),
                mk("Alabama", "Birmingham", 1, Value::Int(44)),
            ],
        )
    }

    #[test]
    fn empty_predicate_set_selects_all_rows_in_order() {
        let values = filter_column(&table(), &[], "temp").unwrap();
        // Huntsville's missing temp is dropped; order stays by source row.
        assert_eq!(
            values,
            vec![
                Value::Int(40),
                Value::Int(10),
                Value::Int(50),
                Value::Int(44)
            ]
        );
    }

    #[test]
    fn conjunction_preserves_source_order() {
        let predicates = [
            Predicate::equals("state", Value::Str("Alabama".into())),
            Predicate::equals("city", Value::Str("Birmingham".into())),
            Predicate::equals("month", Value::Int(1)),
        ];
        let values = filter_column(&table(), &predicates, "temp").unwrap();
        assert_eq!(values, vec![Value::Int(40), Value::Int(44)]);
    }

    #[test]
    fn one_of_matches_membership() {
        let predicates = [Predicate::one_of(
            "city",
            vec![Value::Str("Anchorage".into()), Value::Str("Huntsville".into())],
        )];
        let values = filter_column(&table(), &predicates, "month").unwrap();
        assert_eq!(values, vec![Value::Int(1), Value::Int(1)]);
    }

    #[test]
    fn unknown_columns_are_schema_errors() {
        let t = table();
        assert!(matches!(
            filter_column(&t, &[Predicate::equals("nope", Value::Int(1))], "temp"),
            Err(DashError::UnknownColumn(_))
        ));
        assert!(matches!(
            filter_column(&t, &[], "nope"),
            Err(DashError::UnknownColumn(_))
        ));
    }

    #[test]
    fn no_matching_group_key_yields_empty_not_error() {
        // Month 0 exists in no row: the expected path for a January
        // dashboard looking up "last month".
        let values =
            filter_column(&table(), &[Predicate::equals("month", Value::Int(0))], "temp").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn distinct_values_follow_first_appearance() {
        let t = table();
        assert_eq!(
            distinct_values(&t, &[], "city").unwrap(),
            vec![
                Value::Str("Birmingham".into()),
                Value::Str("Anchorage".into()),
                Value::Str("Huntsville".into())
            ]
        );
        // Dependent dropdown: cities within the selected state.
        let alabama = [Predicate::equals("state", Value::Str("Alabama".into()))];
        assert_eq!(
            distinct_values(&t, &alabama, "city").unwrap(),
            vec![
                Value::Str("Birmingham".into()),
                Value::Str("Huntsville".into())
            ]
        );
    }

    #[test]
    fn numeric_view_skips_non_numeric_cells() {
        let values = filter_column_f64(&table(), &[], "temp").unwrap();
        assert_eq!(values, vec![40.0, 10.0, 50.0, 44.0]);
    }
}
