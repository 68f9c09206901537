//! tabdash – the in-memory tabular core behind two small CSV dashboards.
//!
//! The library loads delimited datasets into immutable [`Table`]s (cached
//! per source), filters rows by dropdown-style equality/membership
//! predicates, computes means, grouped means and period-over-period deltas,
//! and serializes tables back to byte-exact CSV for download. Widget layout
//! and chart rendering live with the caller; the binaries in `src/bin` are
//! thin stand-ins for that presentation layer.

pub mod data;

pub use data::aggregate::{grouped_mean, mean, month_abbr, GroupRow, GroupedAggregate};
pub use data::error::DashError;
pub use data::export::{encode_csv, CsvExporter};
pub use data::filter::{distinct_values, filter_column, filter_column_f64, Predicate};
pub use data::loader::{DataLoader, Fetch, SourceFetcher};
pub use data::metric::{delta, Delta, MetricDelta};
pub use data::model::{Row, Table, Value};
