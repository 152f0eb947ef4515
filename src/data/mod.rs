/// Data layer: schema policy, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///   players.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  classify columns → typed PlayerTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<PlayerTable> per path, per process
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  club → position → minutes  → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  summary metrics, group sums, top-N
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
