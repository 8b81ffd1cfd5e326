// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seam between the pipeline and the model kinds:
// LinearRegressor / KnnRegressor / ForestRegressor all implement
// Regressor, so the pipeline is polymorphic over the single
// capability it needs: predict a row, score a set.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

/// Number of features in a model input row:
/// [genero_code, paginas, avaliacao, ano_publicacao]
pub const NUM_FEATURES: usize = 4;

/// One model input row.
pub type FeatureRow = [f64; NUM_FEATURES];

// ─── Regressor ────────────────────────────────────────────────────────────────
/// A fitted regression model over catalog feature rows.
///
/// Fitting is NOT part of this trait — each model kind has its own
/// hyperparameters, so construction stays with the concrete types.
/// Once fitted, every model answers through the same two methods.
pub trait Regressor {
    /// Predict the target (preco) for a single feature row.
    fn predict_row(&self, x: &FeatureRow) -> f64;

    /// Coefficient of determination (R²) on a labelled set.
    /// 1.0 is a perfect fit; can be arbitrarily negative for a
    /// model worse than predicting the mean.
    fn score(&self, xs: &[FeatureRow], ys: &[f64]) -> f64 {
        debug_assert_eq!(xs.len(), ys.len());
        if ys.is_empty() {
            return 0.0;
        }
        let mean = ys.iter().sum::<f64>() / ys.len() as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (x, &y) in xs.iter().zip(ys) {
            let pred = self.predict_row(x);
            ss_res += (y - pred) * (y - pred);
            ss_tot += (y - mean) * (y - mean);
        }
        if ss_tot == 0.0 {
            // Constant target: R² is defined only as "perfect or not".
            if ss_res < 1e-12 {
                return 1.0;
            }
            return f64::NEG_INFINITY;
        }
        1.0 - ss_res / ss_tot
    }
}
