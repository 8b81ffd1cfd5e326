// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// The heart of the application — plain Rust structs, enums and
// traits that define what the system's concepts ARE.
//
// Rules for this layer:
//   - NO file I/O or CSV parsing
//   - NO linear algebra or model math
//   - Only data types, validation, and the trait seams
//
// Why keep this layer pure?
//   - Easy to unit test (no filesystem needed)
//   - Easy to swap implementations (just implement the trait)
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// The catalog record plus its untyped draft/patch forms
pub mod record;

/// The typed error taxonomy for the whole crate
pub mod error;

/// The Regressor seam plus the shared feature-row shape
pub mod traits;
