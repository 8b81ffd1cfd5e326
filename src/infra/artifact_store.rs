// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists the fitted model and the fitted genero encoder as
// named JSON slots, and reloads them across process restarts.
//
// What gets saved per training run:
//   modelos/
//     model.json          ← fitted PriceModel (slot "model")
//     genero-encoder.json ← fitted GeneroEncoder (slot "genero-encoder")
//     train_config.json   ← the config that produced them
//
// Two rules this module enforces:
//
//   1. Atomic slot writes. Every save goes to a temp file in the
//      same directory and is renamed into place, so a reader can
//      never observe a partially written artifact.
//
//   2. Matched pairs. A model is only meaningful together with
//      the encoder fitted in the same run — the feature codes
//      the model learned come from that exact mapping. Both
//      slots carry the same version tag, written together under
//      a lock; a tag mismatch at load is an ArtifactMismatch
//      error, never silently accepted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::{Error, Result};
use crate::ml::encoder::GeneroEncoder;
use crate::ml::model::PriceModel;

/// Slot name for the fitted regression model.
pub const MODEL_SLOT: &str = "model";

/// Slot name for the fitted genero encoder.
pub const ENCODER_SLOT: &str = "genero-encoder";

/// Envelope wrapped around every persisted artifact.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    /// Shared across the slots written by one training run
    version: String,
    saved_at: String,
    payload: T,
}

pub struct ArtifactStore {
    dir: PathBuf,
    /// Serialises pair writes so two trains cannot interleave
    /// their model/encoder slot updates.
    pair_lock: Mutex<()>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pair_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Serialize a value into a named slot, overwriting any prior
    /// artifact. Write-to-temp-then-rename keeps the slot readable
    /// at every instant.
    fn save<T: Serialize>(&self, name: &str, version: &str, payload: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let envelope = Envelope {
            version: version.to_string(),
            saved_at: chrono::Local::now().to_rfc3339(),
            payload,
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.slot_path(name)).map_err(|e| e.error)?;

        tracing::debug!("Saved artifact slot '{}' (version {})", name, version);
        Ok(())
    }

    /// Load a named slot. An empty slot is ArtifactNotFound.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Envelope<T>> {
        let path = self.slot_path(name);
        if !path.exists() {
            return Err(Error::ArtifactNotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Persist a freshly trained model/encoder pair under one new
    /// version tag. Returns the tag.
    pub fn save_pair(&self, model: &PriceModel, encoder: &GeneroEncoder) -> Result<String> {
        // Poisoning only happens if a writer panicked; the slots
        // themselves are still consistent, so keep going.
        let _guard = self
            .pair_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let version = format!(
            "{}-{:08x}",
            chrono::Local::now().format("%Y%m%d%H%M%S"),
            rand::random::<u32>()
        );
        self.save(ENCODER_SLOT, &version, encoder)?;
        self.save(MODEL_SLOT, &version, model)?;
        tracing::info!("Artifact pair saved (version {})", version);
        Ok(version)
    }

    /// Load the model/encoder pair, verifying both slots came from
    /// the same training run.
    pub fn load_pair(&self) -> Result<(PriceModel, GeneroEncoder)> {
        let model: Envelope<PriceModel> = self.load(MODEL_SLOT)?;
        let encoder: Envelope<GeneroEncoder> = self.load(ENCODER_SLOT)?;
        if model.version != encoder.version {
            return Err(Error::ArtifactMismatch {
                model: model.version,
                encoder: encoder.version,
            });
        }
        Ok((model.payload, encoder.payload))
    }

    /// Persist the training configuration next to the artifacts so
    /// a later predict/inspect run knows what produced them.
    pub fn save_config(&self, config: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(config)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.dir.join("train_config.json"))
            .map_err(|e| e.error)?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        if !path.exists() {
            return Err(Error::ArtifactNotFound("train_config".to_string()));
        }
        Ok(serde_json::from_str(&fs::read_to_string(&path)?)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Regressor;
    use crate::ml::model::{KnnParams, KnnRegressor};

    fn fitted_pair() -> (PriceModel, GeneroEncoder) {
        let xs = vec![[0.0, 100.0, 3.0, 2000.0], [1.0, 150.0, 4.0, 2010.0]];
        let ys = vec![20.0, 35.0];
        let model = PriceModel::Knn(KnnRegressor::fit(&xs, &ys, &KnnParams::default()).unwrap());
        let encoder = GeneroEncoder::fit(["Drama", "Terror"]);
        (model, encoder)
    }

    #[test]
    fn test_pair_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (model, encoder) = fitted_pair();

        store.save_pair(&model, &encoder).unwrap();
        let (loaded_model, loaded_encoder) = store.load_pair().unwrap();

        assert_eq!(loaded_encoder, encoder);
        let row = [0.0, 100.0, 3.0, 2000.0];
        assert!((loaded_model.predict_row(&row) - model.predict_row(&row)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_slot_is_artifact_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(matches!(
            store.load_pair().unwrap_err(),
            Error::ArtifactNotFound(_)
        ));
    }

    #[test]
    fn test_version_drift_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (model, encoder) = fitted_pair();

        store.save_pair(&model, &encoder).unwrap();
        // Overwrite only the encoder slot with a different version,
        // simulating a crash between the two slot writes
        store.save(ENCODER_SLOT, "someone-else", &encoder).unwrap();

        assert!(matches!(
            store.load_pair().unwrap_err(),
            Error::ArtifactMismatch { .. }
        ));
    }

    #[test]
    fn test_config_round_trips_beside_the_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        assert!(matches!(
            store.load_config().unwrap_err(),
            Error::ArtifactNotFound(_)
        ));

        let config = TrainConfig {
            model: "knn".into(),
            seed: Some(7),
            ..Default::default()
        };
        store.save_config(&config).unwrap();

        let loaded = store.load_config().unwrap();
        assert_eq!(loaded.model, "knn");
        assert_eq!(loaded.seed, Some(7));
    }

    #[test]
    fn test_retrain_overwrites_both_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (model, encoder) = fitted_pair();

        let v1 = store.save_pair(&model, &encoder).unwrap();
        let v2 = store.save_pair(&model, &encoder).unwrap();
        assert_ne!(v1, v2);
        store.load_pair().unwrap();
    }
}
