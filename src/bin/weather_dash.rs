//! Weather dashboard demo: the terminal stand-in for the presentation
//! layer. Loads the CORGIS weather dataset, applies the dropdown-style
//! state/city/month selection, and prints the metrics and the 12-month
//! high/low chart table the widgets would render.
//!
//! Usage: `weather_dash [source] [state] [city] [month]`. Omitted
//! selections default to the first entry of each dropdown list, the same
//! rows a fresh render would show. `WEATHER_CSV` overrides the source.

use anyhow::{Context, Result};

use tabdash::{
    delta, distinct_values, filter_column_f64, grouped_mean, mean, month_abbr, DataLoader, Delta,
    Predicate, Value,
};

const WEATHER_CSV: &str = "https://corgis-edu.github.io/corgis/datasets/csv/weather/weather.csv";

/// Dashboard columns, by their exact CSV header names.
const STATE: &str = "Station.State";
const CITY: &str = "Station.City";
const MONTH: &str = "Date.Month";
const YEAR: &str = "Date.Year";
const AVG_TEMP: &str = "Data.Temperature.Avg Temp";
const MAX_TEMP: &str = "Data.Temperature.Max Temp";
const MIN_TEMP: &str = "Data.Temperature.Min Temp";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .or_else(|| std::env::var("WEATHER_CSV").ok())
        .unwrap_or_else(|| WEATHER_CSV.to_string());

    let mut loader = DataLoader::new();
    let table = loader.load(&source)?;

    // The dashboard looks at a single calendar year of observations.
    let table = table.filter_rows(&[Predicate::equals(YEAR, Value::Int(2016))])?;

    // Selector lists, with the city list dependent on the chosen state.
    let state = pick(args.next(), || distinct_values(&table, &[], STATE), "state")?;
    let city = pick(
        args.next(),
        || distinct_values(&table, &[Predicate::equals(STATE, state.clone())], CITY),
        "city",
    )?;
    let month = pick(args.next(), || distinct_values(&table, &[], MONTH), "month")?;

    let selection = |month: &Value| {
        vec![
            Predicate::equals(STATE, state.clone()),
            Predicate::equals(CITY, city.clone()),
            Predicate::equals(MONTH, month.clone()),
        ]
    };

    println!("Weather – {city}, {state}, month {month}");
    println!("---");

    // Average-temperature metric with its last-month delta. January's
    // lookup lands on month 0, matches nothing, and reads as unavailable.
    let current = filter_column_f64(&table, &selection(&month), AVG_TEMP)?;
    let prior = filter_column_f64(&table, &selection(&prior_month(&month)), AVG_TEMP)?;
    let avg = delta(&current, &prior)?;
    match avg.delta {
        Delta::Change(change) => println!(
            "Average Temperature: {:.1}\u{00b0} ({change:+.1}\u{00b0} from last month)",
            avg.current_mean
        ),
        Delta::Unavailable => println!(
            "Average Temperature: {:.1}\u{00b0} (n/a from last month)",
            avg.current_mean
        ),
    }

    let highs = filter_column_f64(&table, &selection(&month), MAX_TEMP)?;
    let lows = filter_column_f64(&table, &selection(&month), MIN_TEMP)?;
    let high = mean(&highs).context("no high temperatures for the selection")?;
    let low = mean(&lows).context("no low temperatures for the selection")?;
    println!("Average High/Low: {high:.1}\u{00b0}/{low:.1}\u{00b0}");
    println!("---");

    // High and low temperatures over the last 12 months, keyed by month
    // abbreviation, emitted as JSON for an external chart renderer.
    let city_rows = table.filter_rows(&[
        Predicate::equals(STATE, state.clone()),
        Predicate::equals(CITY, city.clone()),
    ])?;
    let chart = grouped_mean(&city_rows, MONTH, &[MAX_TEMP, MIN_TEMP])?
        .relabel_keys(month_abbr)?
        .rename_group_column("Month")
        .rename_value_columns(&[(MAX_TEMP, "High"), (MIN_TEMP, "Low")])?;
    println!("{}", serde_json::to_string_pretty(&chart)?);

    Ok(())
}

/// A selection: the explicit argument if given, otherwise the first entry
/// of the dropdown list.
fn pick(
    arg: Option<String>,
    options: impl FnOnce() -> Result<Vec<Value>, tabdash::DashError>,
    what: &str,
) -> Result<Value> {
    match arg {
        Some(raw) => Ok(parse_selection(&raw)),
        None => options()?
            .into_iter()
            .next()
            .with_context(|| format!("dataset has no {what} values to select")),
    }
}

/// Selections typed on the command line: integers become integer values so
/// they compare equal to integer-typed columns, everything else is text.
fn parse_selection(raw: &str) -> Value {
    raw.parse::<i64>().map_or_else(|_| Value::Str(raw.to_string()), Value::Int)
}

/// The prior period of a month selection. Month 1 yields month 0, which no
/// row has; the filter then returns nothing and the delta reads unavailable.
fn prior_month(month: &Value) -> Value {
    match month {
        Value::Int(m) => Value::Int(m - 1),
        other => other.clone(),
    }
}
