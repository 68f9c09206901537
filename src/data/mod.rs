/// Data core: table model, loading, filtering, aggregation, and export.
///
/// Architecture:
/// ```text
///  .csv (url or path)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  fetch + parse → Table, cached per source
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  predicate conjunction → column values / derived table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐    ┌──────────┐
///   │ aggregate │ →  │  metric  │  means + grouped means → period deltas
///   └───────────┘    └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  byte-exact csv for download, memoized
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod metric;
pub mod model;
