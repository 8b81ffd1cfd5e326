// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one full training run in order:
//
//   Step 1: Validate the requested model kind   (Layer 5 - ml)
//   Step 2: Snapshot the catalog                (Layer 4 - data)
//   Step 3: Drop unusable rows                  (Layer 4 - data)
//   Step 4: Fit a fresh genero encoder          (Layer 5 - ml)
//   Step 5: Build feature rows                  (Layer 4 - data)
//   Step 6: Split train/test                    (Layer 4 - data)
//   Step 7: Fit the model                       (Layer 5 - ml)
//   Step 8: Score on the held-out partition     (Layer 5 - ml)
//   Step 9: Persist the artifact pair + config  (Layer 6 - infra)
//
// The catalog store's lock is held only inside the snapshot
// read (step 2) — fitting runs entirely on the in-memory copy,
// so a long training pass never blocks catalog mutations.
//
// Any failure before step 9 leaves previously persisted
// artifacts exactly as they were.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data::catalog::CatalogStore;
use crate::data::features::{build_samples, usable_records};
use crate::data::splitter::split_train_test;
use crate::domain::error::{Error, Result};
use crate::domain::traits::FeatureRow;
use crate::infra::artifact_store::ArtifactStore;
use crate::infra::metrics::RunLog;
use crate::ml::encoder::GeneroEncoder;
use crate::ml::model::{ForestParams, KnnParams, ModelKind};
use crate::ml::trainer::{evaluate, fit_model, FitOptions, TrainReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run needs. Serialisable so the effective
// config can be saved next to the artifacts it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub catalog_path: String,
    pub backup_dir: String,
    pub artifacts_dir: String,
    /// Model kind as entered by the user — validated strictly in
    /// step 1, a typo is a Validation error rather than a default.
    pub model: String,
    pub train_fraction: f64,
    /// Fixed seed for the split + forest bootstrap; None = random
    pub seed: Option<u64>,
    pub trees: usize,
    pub max_depth: usize,
    pub min_leaf: usize,
    pub neighbors: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let forest = ForestParams::default();
        Self {
            catalog_path: "dados.csv".to_string(),
            backup_dir: "backups".to_string(),
            artifacts_dir: "modelos".to_string(),
            model: ModelKind::RandomForest.to_string(),
            train_fraction: 0.8,
            seed: None,
            trees: forest.trees,
            max_depth: forest.max_depth,
            min_leaf: forest.min_leaf,
            neighbors: KnnParams::default().neighbors,
        }
    }
}

impl TrainConfig {
    fn fit_options(&self) -> FitOptions {
        FitOptions {
            forest: ForestParams {
                trees: self.trees,
                max_depth: self.max_depth,
                min_samples_split: (self.min_leaf * 2).max(2),
                min_leaf: self.min_leaf,
            },
            knn: KnnParams {
                neighbors: self.neighbors,
            },
            seed: self.seed,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training run end to end and return what
    /// it produced.
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Validate the requested model kind ─────────────────────────
        let kind = ModelKind::from_str(&cfg.model)?;
        if !(cfg.train_fraction > 0.0 && cfg.train_fraction <= 1.0) {
            return Err(Error::validation(
                "train_fraction",
                "must be within (0, 1]",
            ));
        }

        // ── Step 2: Snapshot the catalog ──────────────────────────────────────
        let store = CatalogStore::open(&cfg.catalog_path, &cfg.backup_dir, false)?;
        let snapshot = store.list()?;
        tracing::info!("Catalog snapshot: {} records", snapshot.len());

        // ── Step 3: Drop rows with missing required fields ────────────────────
        let usable = usable_records(&snapshot);
        if usable.is_empty() {
            return Err(Error::InsufficientData);
        }
        let rows_total = usable.len();

        // ── Step 4: Fit a fresh encoder over this snapshot's generos ──────────
        // Full replace, never incremental: the codes the model sees
        // are exactly the codes this encoder will produce later.
        let encoder = GeneroEncoder::fit(usable.iter().map(|r| r.genero.as_str()));
        tracing::info!("Encoder fitted over {} genero(s)", encoder.len());

        // ── Step 5: Build feature rows ────────────────────────────────────────
        let (xs, ys) = build_samples(&usable, &encoder)?;

        // ── Step 6: Train/test split ──────────────────────────────────────────
        let samples: Vec<(FeatureRow, f64)> = xs.into_iter().zip(ys).collect();
        let (train, test) = split_train_test(samples, cfg.train_fraction, cfg.seed);
        let (train_xs, train_ys): (Vec<FeatureRow>, Vec<f64>) = train.into_iter().unzip();
        let (test_xs, test_ys): (Vec<FeatureRow>, Vec<f64>) = test.into_iter().unzip();
        tracing::info!("Split: {} train, {} test", train_xs.len(), test_xs.len());

        // ── Step 7: Fit ───────────────────────────────────────────────────────
        let model = fit_model(kind, &train_xs, &train_ys, &cfg.fit_options())?;

        // ── Step 8: Held-out score ────────────────────────────────────────────
        let r2 = evaluate(&model, &test_xs, &test_ys, &train_xs, &train_ys);
        tracing::info!("{} model scored R² = {:.4}", kind, r2);

        // ── Step 9: Persist the matched pair ──────────────────────────────────
        let artifacts = ArtifactStore::new(&cfg.artifacts_dir);
        artifacts.save_pair(&model, &encoder)?;
        artifacts.save_config(cfg)?;

        let report = TrainReport {
            kind,
            rows_total,
            rows_train: train_xs.len(),
            rows_test: test_xs.len(),
            r2,
        };
        RunLog::new(&cfg.artifacts_dir)?.log(&report)?;

        Ok(report)
    }
}
