//! Municipal revenue dashboard demo: loads the city revenue dataset,
//! filters it by a fiscal year and a revenue-category multi-selection,
//! prints per-category mean revenue, and writes the filtered table through
//! the memoized CSV exporter the way a download button would.
//!
//! Usage: `revenue_dash [source] [fiscal_year] [category ...]`. The fiscal
//! year defaults to the latest one in the data (chronological order), the
//! category selection defaults to all categories. `REVENUE_CSV` overrides
//! the source.

use anyhow::{Context, Result};

use tabdash::{distinct_values, grouped_mean, CsvExporter, DataLoader, Predicate, Value};

const REVENUE_CSV: &str =
    "https://data.cityofnewyork.us/api/views/teqj-gi69/rows.csv?accessType=DOWNLOAD";

const FISCAL_YEAR: &str = "FISCAL YEAR";
const CATEGORY: &str = "REVENUE CATEGORY";
const AMOUNT: &str = "REVENUE AMOUNT";

const EXPORT_PATH: &str = "revenue_export.csv";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .or_else(|| std::env::var("REVENUE_CSV").ok())
        .unwrap_or_else(|| REVENUE_CSV.to_string());

    let mut loader = DataLoader::new();
    let table = loader.load(&source)?;

    // Fiscal years sorted chronologically (integer year labels order
    // numerically), defaulting to the latest.
    let mut years = distinct_values(&table, &[], FISCAL_YEAR)?;
    years.sort();
    let year = match args.next() {
        Some(raw) => parse_selection(&raw),
        None => years.last().cloned().context("dataset has no fiscal years")?,
    };

    // Category multi-selection, defaulting to every category.
    let all_categories = distinct_values(&table, &[], CATEGORY)?;
    let categories: Vec<Value> = {
        let picked: Vec<Value> = args.map(Value::Str).collect();
        if picked.is_empty() {
            all_categories
        } else {
            picked
        }
    };

    let filtered = table.filter_rows(&[
        Predicate::equals(FISCAL_YEAR, year.clone()),
        Predicate::one_of(CATEGORY, categories),
    ])?;

    println!("Revenue – fiscal year {year}, {} rows", filtered.len());
    println!("---");

    let by_category = grouped_mean(&filtered, CATEGORY, &[AMOUNT])?;
    for group in &by_category.groups {
        match group.means.get(AMOUNT) {
            Some(avg) => println!("{}: {avg:.2}", group.key),
            None => println!("{}: n/a", group.key),
        }
    }
    println!("---");

    // The download button: memoized byte-exact CSV of the filtered table.
    // Writing to disk is this layer's job, not the encoder's.
    let mut exporter = CsvExporter::new();
    let bytes = exporter.to_csv_bytes(&filtered)?;
    std::fs::write(EXPORT_PATH, bytes.as_slice())
        .with_context(|| format!("writing {EXPORT_PATH}"))?;
    println!("wrote {} bytes to {EXPORT_PATH}", bytes.len());

    Ok(())
}

/// Fiscal years typed on the command line: integer labels become integer
/// values so they compare equal to integer-typed columns.
fn parse_selection(raw: &str) -> Value {
    raw.parse::<i64>().map_or_else(|_| Value::Str(raw.to_string()), Value::Int)
}
