// ============================================================
// Layer 5 — ML Layer
// ============================================================
// All model math lives here. No other layer computes a single
// prediction — they go through the Regressor trait.
//
// What's in this layer:
//
//   encoder.rs — The categorical encoder registry: genero label
//                ↔ dense code, deterministic (sorted) fit,
//                strict unknown-label errors.
//
//   model.rs   — The three regressors (linear via nalgebra
//                normal equations, k-nearest-neighbours,
//                bagged regression trees) plus the ModelKind
//                closed enum and the PriceModel dispatch enum.
//
//   trainer.rs — Fit dispatch over ModelKind and held-out R²
//                evaluation.
//
// Reference: Rust Book §10 (Traits)

/// Genero label ↔ code registry
pub mod encoder;

/// Regressor implementations and model-kind selection
pub mod model;

/// Fit dispatch and evaluation
pub mod trainer;
