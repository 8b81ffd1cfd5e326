// ============================================================
// Layer 4 — Data Layer
// ============================================================
// Everything between the raw catalog CSV and model-ready rows.
//
// The pipeline flows in this order:
//
//   dados.csv
//       │
//       ▼
//   CatalogStore      → parses rows, owns all mutations + backups
//       │
//       ▼
//   features          → drops unusable rows, builds [code, paginas,
//       │               avaliacao, ano] rows + preco targets
//       ▼
//   splitter          → shuffles and splits train/test
//
// generator.rs sits beside the pipeline: it fabricates catalog
// records for demos and tests.
//
// Each module is responsible for exactly one step, so each step
// is independently testable and replaceable.

/// The CSV-backed catalog store (list/create/update/delete)
pub mod catalog;

/// Record → feature-row conversion
pub mod features;

/// Shuffled train/test splitting
pub mod splitter;

/// Synthetic catalog records for seeding demos
pub mod generator;
