/// Data layer: batch table types, loading, and CSV export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  ordered columns, typed cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Table + prediction column → CSV
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod table;
