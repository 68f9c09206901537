//! One full dashboard render cycle against a small weather fixture:
//! loader → year filter → selection filters → means/deltas → grouped chart
//! data → csv export, the same path the binaries walk against the real
//! CORGIS dataset.

use std::cell::Cell;
use std::sync::Arc;

use tabdash::{
    delta, distinct_values, filter_column_f64, grouped_mean, mean, month_abbr, CsvExporter,
    DashError, DataLoader, Delta, Fetch, Predicate, Table, Value,
};

const WEATHER: &[u8] = include_bytes!("data/weather.csv");

const STATE: &str = "Station.State";
const CITY: &str = "Station.City";
const MONTH: &str = "Date.Month";
const YEAR: &str = "Date.Year";
const AVG_TEMP: &str = "Data.Temperature.Avg Temp";
const MAX_TEMP: &str = "Data.Temperature.Max Temp";
const MIN_TEMP: &str = "Data.Temperature.Min Temp";

/// Serves one canned payload and counts how often it gets fetched.
struct CannedFetcher {
    payload: Vec<u8>,
    fetches: Cell<usize>,
}

impl CannedFetcher {
    fn new(payload: &[u8]) -> Self {
        CannedFetcher {
            payload: payload.to_vec(),
            fetches: Cell::new(0),
        }
    }
}

impl Fetch for CannedFetcher {
    fn fetch(&self, _source: &str) -> Result<Vec<u8>, DashError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.payload.clone())
    }
}

fn load_2016(loader: &mut DataLoader<CannedFetcher>) -> Table {
    let table = loader.load("weather.csv").unwrap();
    table
        .filter_rows(&[Predicate::equals(YEAR, Value::Int(2016))])
        .unwrap()
}

fn selection(month: i64) -> Vec<Predicate> {
    vec![
        Predicate::equals(STATE, Value::Str("Alabama".into())),
        Predicate::equals(CITY, Value::Str("Birmingham".into())),
        Predicate::equals(MONTH, Value::Int(month)),
    ]
}

#[test]
fn repeated_loads_reuse_the_cached_table() {
    let mut loader = DataLoader::with_fetcher(CannedFetcher::new(WEATHER));
    let first = loader.load("weather.csv").unwrap();
    let second = loader.load("weather.csv").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 6);
}

#[test]
fn selector_lists_come_from_the_filtered_table() {
    let mut loader = DataLoader::with_fetcher(CannedFetcher::new(WEATHER));
    let table = load_2016(&mut loader);
    assert_eq!(table.len(), 5);

    assert_eq!(
        distinct_values(&table, &[], STATE).unwrap(),
        vec![Value::Str("Alabama".into()), Value::Str("Alaska".into())]
    );
    let alabama = [Predicate::equals(STATE, Value::Str("Alabama".into()))];
    assert_eq!(
        distinct_values(&table, &alabama, CITY).unwrap(),
        vec![Value::Str("Birmingham".into())]
    );
    assert_eq!(
        distinct_values(&table, &[], MONTH).unwrap(),
        vec![Value::Int(1), Value::Int(2)]
    );
}

#[test]
fn metrics_match_the_fixture_by_hand() {
    let mut loader = DataLoader::with_fetcher(CannedFetcher::new(WEATHER));
    let table = load_2016(&mut loader);

    // February: mean of the one non-missing avg temp, against January's 42.
    let current = filter_column_f64(&table, &selection(2), AVG_TEMP).unwrap();
    let prior = filter_column_f64(&table, &selection(1), AVG_TEMP).unwrap();
    let february = delta(&current, &prior).unwrap();
    assert_eq!(february.current_mean, 50.0);
    assert_eq!(february.delta, Delta::Change(8.0));

    // January: the prior-month lookup lands on month 0, which matches no
    // rows, so the delta is unavailable rather than an error.
    let current = filter_column_f64(&table, &selection(1), AVG_TEMP).unwrap();
    let prior = filter_column_f64(&table, &selection(0), AVG_TEMP).unwrap();
    let january = delta(&current, &prior).unwrap();
    assert_eq!(january.current_mean, 42.0);
    assert_eq!(january.delta, Delta::Unavailable);

    // High/low metric for February.
    let highs = filter_column_f64(&table, &selection(2), MAX_TEMP).unwrap();
    let lows = filter_column_f64(&table, &selection(2), MIN_TEMP).unwrap();
    assert_eq!(mean(&highs), Some(63.0));
    assert_eq!(mean(&lows), Some(39.0));
}

#[test]
fn chart_table_is_grouped_relabelled_and_renamed() {
    let mut loader = DataLoader::with_fetcher(CannedFetcher::new(WEATHER));
    let table = load_2016(&mut loader);
    let city_rows = table
        .filter_rows(&[
            Predicate::equals(STATE, Value::Str("Alabama".into())),
            Predicate::equals(CITY, Value::Str("Birmingham".into())),
        ])
        .unwrap();

    let chart = grouped_mean(&city_rows, MONTH, &[MAX_TEMP, MIN_TEMP])
        .unwrap()
        .relabel_keys(month_abbr)
        .unwrap()
        .rename_group_column("Month")
        .rename_value_columns(&[(MAX_TEMP, "High"), (MIN_TEMP, "Low")])
        .unwrap();

    assert_eq!(chart.group_column, "Month");
    assert_eq!(chart.value_columns, vec!["High".to_string(), "Low".into()]);

    let keys: Vec<&Value> = chart.groups.iter().map(|g| &g.key).collect();
    assert_eq!(keys, vec![&Value::Str("Jan".into()), &Value::Str("Feb".into())]);
    assert_eq!(chart.groups[0].means["High"], 52.0);
    assert_eq!(chart.groups[0].means["Low"], 32.0);
    assert_eq!(chart.groups[1].means["High"], 63.0);
    assert_eq!(chart.groups[1].means["Low"], 39.0);
}

#[test]
fn export_round_trips_through_the_loader() {
    let mut loader = DataLoader::with_fetcher(CannedFetcher::new(WEATHER));
    let table = load_2016(&mut loader);

    let mut exporter = CsvExporter::new();
    let bytes = exporter.to_csv_bytes(&table).unwrap();
    let again = exporter.to_csv_bytes(&table).unwrap();
    assert!(Arc::ptr_eq(&bytes, &again));

    // Re-parsing the exported bytes reconstructs the table exactly: all
    // fixture columns keep their inferred types through the round trip.
    let mut reload = DataLoader::with_fetcher(CannedFetcher::new(&bytes));
    let parsed = reload.load("export.csv").unwrap();
    assert_eq!(*parsed, table);
}
