/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → VehicleDataset (manufacturer derived per row)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ VehicleDataset │  Vec<Listing>, condition set, year bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply the year interval → filtered indices
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
