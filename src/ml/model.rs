// ============================================================
// Layer 5 — Regression Models
// ============================================================
// The three model kinds the pipeline can fit, all answering
// through the Regressor trait from the domain layer:
//
//   LinearRegressor — ordinary least squares with an intercept,
//                     solved via the normal equations (nalgebra
//                     Cholesky). A tiny ridge term keeps the
//                     system solvable when there are fewer rows
//                     than features.
//
//   KnnRegressor    — k-nearest-neighbours: memorises the
//                     training rows and predicts the mean target
//                     of the k closest rows (Euclidean distance).
//
//   ForestRegressor — bagged regression trees: each tree is fit
//                     on a bootstrap resample and grown by
//                     variance-reduction splits; the forest
//                     predicts the mean over trees.
//
// Every fitted model is plain serde-serializable data (weights,
// stored rows, tree nodes), so the artifact store can persist
// and reload it as JSON without any framework-specific recorder.
//
// Model kind selection is a closed enum: an unrecognised kind
// string is a Validation error, never a silent default.

use nalgebra::{Cholesky, DMatrix, DVector};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::{Error, Result};
use crate::domain::traits::{FeatureRow, Regressor, NUM_FEATURES};

// ─── Model Kind ───────────────────────────────────────────────────────────────

/// The closed set of trainable model kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Linear,
    RandomForest,
    Knn,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::RandomForest, ModelKind::Knn];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::RandomForest => "random-forest",
            ModelKind::Knn => "knn",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    /// Strict parse: anything outside the closed set is a
    /// Validation error. "k-nearest-neighbors" is accepted as a
    /// spelled-out alias for "knn".
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ModelKind::Linear),
            "random-forest" => Ok(ModelKind::RandomForest),
            "knn" | "k-nearest-neighbors" => Ok(ModelKind::Knn),
            other => Err(Error::validation(
                "model",
                format!("unknown model kind '{other}' (expected linear, random-forest or knn)"),
            )),
        }
    }
}

// ─── Hyperparameters ──────────────────────────────────────────────────────────

/// Forest hyperparameters. Defaults follow common library defaults
/// scaled down to catalog-sized data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 60,
            max_depth: 10,
            min_samples_split: 4,
            min_leaf: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnParams {
    pub neighbors: usize,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { neighbors: 5 }
    }
}

// ─── Linear Regression ────────────────────────────────────────────────────────

/// Least-squares linear model: preco ≈ w₀ + w·x.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    /// weights[0] is the intercept, weights[1..] align with FeatureRow.
    weights: Vec<f64>,
}

impl LinearRegressor {
    /// Fit by solving the normal equations (XᵀX)w = Xᵀy.
    ///
    /// The plain system is tried first so a well-conditioned fit
    /// is exact least squares. When the Cholesky factorisation
    /// fails (rank-deficient data, e.g. fewer rows than features),
    /// an escalating ridge term is added to the diagonal until the
    /// system becomes solvable.
    pub fn fit(xs: &[FeatureRow], ys: &[f64]) -> Result<Self> {
        if xs.is_empty() {
            return Err(Error::Training("empty training partition".into()));
        }
        let n = xs.len();
        let p = NUM_FEATURES + 1; // intercept column first

        let mut data = Vec::with_capacity(n * p);
        for x in xs {
            data.push(1.0);
            data.extend_from_slice(x);
        }
        let x = DMatrix::from_row_slice(n, p, &data);
        let y = DVector::from_column_slice(ys);

        let xt = x.transpose();
        let xtx = &xt * &x;
        let xty = &xt * &y;
        let scale = (xtx.trace() / p as f64).max(1.0);

        for ridge in [0.0, 1e-9 * scale, 1e-6 * scale, 1e-3 * scale] {
            let mut lhs = xtx.clone();
            for i in 0..p {
                lhs[(i, i)] += ridge;
            }
            if let Some(chol) = Cholesky::new(lhs) {
                let w = chol.solve(&xty);
                return Ok(Self {
                    weights: w.iter().copied().collect(),
                });
            }
        }
        Err(Error::Training("normal equations are not solvable".into()))
    }
}

impl Regressor for LinearRegressor {
    fn predict_row(&self, x: &FeatureRow) -> f64 {
        let mut acc = self.weights[0];
        for (i, v) in x.iter().enumerate() {
            acc += self.weights[i + 1] * v;
        }
        acc
    }
}

// ─── K-Nearest-Neighbours Regression ──────────────────────────────────────────

/// Instance-based model: the fitted state IS the training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnRegressor {
    neighbors: usize,
    xs: Vec<FeatureRow>,
    ys: Vec<f64>,
}

impl KnnRegressor {
    pub fn fit(xs: &[FeatureRow], ys: &[f64], params: &KnnParams) -> Result<Self> {
        if xs.is_empty() {
            return Err(Error::Training("empty training partition".into()));
        }
        Ok(Self {
            // Never ask for more neighbours than rows
            neighbors: params.neighbors.clamp(1, xs.len()),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }
}

fn squared_distance(a: &FeatureRow, b: &FeatureRow) -> f64 {
    a.iter()
        .zip(b)
        .map(|(u, v)| (u - v) * (u - v))
        .sum::<f64>()
}

impl Regressor for KnnRegressor {
    fn predict_row(&self, x: &FeatureRow) -> f64 {
        let mut dist: Vec<(f64, f64)> = self
            .xs
            .iter()
            .zip(&self.ys)
            .map(|(row, &y)| (squared_distance(row, x), y))
            .collect();
        // total_cmp: distances are finite by construction, but NaN
        // in user data must not panic the sort
        dist.sort_by(|a, b| a.0.total_cmp(&b.0));
        let k = self.neighbors.min(dist.len());
        dist[..k].iter().map(|(_, y)| y).sum::<f64>() / k as f64
    }
}

// ─── Random Forest Regression ─────────────────────────────────────────────────

/// One node of a fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, x: &FeatureRow) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if x[*feature] <= *threshold {
                    left.predict(x)
                } else {
                    right.predict(x)
                }
            }
        }
    }
}

/// Bagged regression trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegressor {
    trees: Vec<TreeNode>,
}

impl ForestRegressor {
    /// Fit `params.trees` trees, each on a bootstrap resample of
    /// the training rows. The caller owns the RNG so a seeded run
    /// is fully reproducible.
    pub fn fit(
        xs: &[FeatureRow],
        ys: &[f64],
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if xs.is_empty() {
            return Err(Error::Training("empty training partition".into()));
        }
        if params.trees == 0 {
            return Err(Error::Training("forest must have at least one tree".into()));
        }
        let n = xs.len();
        let mut trees = Vec::with_capacity(params.trees);
        for _ in 0..params.trees {
            // Bootstrap: n draws with replacement
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(build_tree(xs, ys, &sample, 0, params));
        }
        Ok(Self { trees })
    }
}

impl Regressor for ForestRegressor {
    fn predict_row(&self, x: &FeatureRow) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len() as f64
    }
}

fn mean_of(ys: &[f64], idx: &[usize]) -> f64 {
    idx.iter().map(|&i| ys[i]).sum::<f64>() / idx.len() as f64
}

/// Grow one tree node recursively. Stops on depth, on too few
/// rows, or when no split reduces the squared error.
fn build_tree(
    xs: &[FeatureRow],
    ys: &[f64],
    idx: &[usize],
    depth: usize,
    params: &ForestParams,
) -> TreeNode {
    if depth >= params.max_depth || idx.len() < params.min_samples_split {
        return TreeNode::Leaf {
            value: mean_of(ys, idx),
        };
    }
    match best_split(xs, ys, idx, params.min_leaf) {
        Some((feature, threshold, left_idx, right_idx)) => TreeNode::Split {
            feature,
            threshold,
            left: Box::new(build_tree(xs, ys, &left_idx, depth + 1, params)),
            right: Box::new(build_tree(xs, ys, &right_idx, depth + 1, params)),
        },
        None => TreeNode::Leaf {
            value: mean_of(ys, idx),
        },
    }
}

/// Find the (feature, threshold) split minimising the summed
/// squared error of the two children. Uses running sums over the
/// rows sorted by each feature, so each feature is one O(n log n)
/// sort plus one O(n) sweep.
#[allow(clippy::type_complexity)]
fn best_split(
    xs: &[FeatureRow],
    ys: &[f64],
    idx: &[usize],
    min_leaf: usize,
) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
    let n = idx.len();
    let total_sum: f64 = idx.iter().map(|&i| ys[i]).sum();
    let total_sq: f64 = idx.iter().map(|&i| ys[i] * ys[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;

    let mut best: Option<(f64, usize, f64, usize)> = None; // (sse, feature, threshold, sorted split pos)
    let mut best_order: Vec<usize> = Vec::new();

    for feature in 0..NUM_FEATURES {
        let mut order = idx.to_vec();
        order.sort_by(|&a, &b| xs[a][feature].total_cmp(&xs[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for pos in 0..n - 1 {
            let i = order[pos];
            left_sum += ys[i];
            left_sq += ys[i] * ys[i];

            let left_n = pos + 1;
            let right_n = n - left_n;
            if left_n < min_leaf || right_n < min_leaf {
                continue;
            }
            // No valid threshold between equal feature values
            let v = xs[i][feature];
            let next = xs[order[pos + 1]][feature];
            if v == next {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n as f64)
                + (right_sq - right_sum * right_sum / right_n as f64);

            if best.is_none() || sse < best.as_ref().unwrap().0 {
                best = Some((sse, feature, (v + next) / 2.0, left_n));
                best_order = order.clone();
            }
        }
    }

    let (sse, feature, threshold, split_pos) = best?;
    // Require a real improvement, otherwise stop growing
    if sse >= parent_sse - 1e-12 {
        return None;
    }
    let left_idx = best_order[..split_pos].to_vec();
    let right_idx = best_order[split_pos..].to_vec();
    Some((feature, threshold, left_idx, right_idx))
}

// ─── Fitted Model Dispatch ────────────────────────────────────────────────────

/// A fitted model of any kind, as persisted by the artifact store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PriceModel {
    Linear(LinearRegressor),
    RandomForest(ForestRegressor),
    Knn(KnnRegressor),
}

impl PriceModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            PriceModel::Linear(_) => ModelKind::Linear,
            PriceModel::RandomForest(_) => ModelKind::RandomForest,
            PriceModel::Knn(_) => ModelKind::Knn,
        }
    }
}

impl Regressor for PriceModel {
    fn predict_row(&self, x: &FeatureRow) -> f64 {
        match self {
            PriceModel::Linear(m) => m.predict_row(x),
            PriceModel::RandomForest(m) => m.predict_row(x),
            PriceModel::Knn(m) => m.predict_row(x),
        }
    }
}
