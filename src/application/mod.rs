// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal per use
// case: training a price model, or answering a price query.
//
// Rules for this layer:
//   - No model math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern

/// The training workflow: snapshot → encoder → fit → persist
pub mod train_use_case;

/// The prediction workflow: load pair → encode → predict
pub mod predict_use_case;
