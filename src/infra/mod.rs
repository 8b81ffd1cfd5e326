// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns that don't belong to any
// single business layer:
//
//   artifact_store.rs — Model + encoder persistence as JSON
//                       slots, written atomically and paired by
//                       a shared version tag so train and
//                       predict always agree on the mapping.
//
//   backup.rs         — Timestamped catalog snapshots taken
//                       before every mutating store operation.
//
//   metrics.rs        — Appends one CSV row per training run
//                       for later comparison across model kinds.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but don't
//   belong to any one of them. Keeping them here makes it easy
//   to swap implementations (e.g. file slots for a blob store)
//   without touching the pipeline logic.
//
// Reference: Rust Book §7 (Modules), §9 (Error Handling)

/// Model/encoder artifact persistence
pub mod artifact_store;

/// Pre-mutation catalog snapshots
pub mod backup;

/// Training run CSV log
pub mod metrics;
