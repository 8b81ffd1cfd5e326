// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Answers a single price query from the persisted artifacts:
//
//   Step 1: Validate the query fields    (Layer 3 - domain)
//   Step 2: Load the model/encoder pair  (Layer 6 - infra)
//   Step 3: Encode the genero label      (Layer 5 - ml)
//   Step 4: Assemble the feature row     (Layer 4 - data)
//   Step 5: Predict and round            (Layer 5 - ml)
//
// Predict never mutates anything: no catalog access, no artifact
// writes. A missing artifact pair is ModelNotTrained; a genero
// outside the fitted domain is UnknownCategory — both surfaced
// to the user, never papered over with a default.

use crate::data::features::feature_row;
use crate::domain::error::{Error, Result};
use crate::domain::traits::Regressor;
use crate::infra::artifact_store::ArtifactStore;

/// One price query, already type-converted at the boundary.
#[derive(Debug, Clone)]
pub struct PredictQuery {
    pub genero: String,
    pub paginas: u32,
    pub avaliacao: f64,
    pub ano_publicacao: i32,
}

impl PredictQuery {
    /// Same field rules the catalog applies to a draft: a query
    /// that could not be stored cannot be priced either.
    fn validate(&self) -> Result<()> {
        if self.genero.trim().is_empty() {
            return Err(Error::validation("genero", "must not be blank"));
        }
        if self.paginas == 0 {
            return Err(Error::validation("paginas", "must be greater than zero"));
        }
        if !self.avaliacao.is_finite() {
            return Err(Error::validation("avaliacao", "must be a finite number"));
        }
        Ok(())
    }
}

pub struct PredictUseCase {
    artifacts: ArtifactStore,
}

impl PredictUseCase {
    pub fn new(artifacts_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            artifacts: ArtifactStore::new(artifacts_dir),
        }
    }

    /// Predict the preco for a single query, rounded to 2 decimal
    /// places.
    pub fn execute(&self, query: &PredictQuery) -> Result<f64> {
        // ── Step 1: Validate the query ────────────────────────────────────────
        query.validate()?;

        // ── Step 2: Load the matched pair ─────────────────────────────────────
        let (model, encoder) = self.artifacts.load_pair().map_err(|e| match e {
            // Either slot missing means nobody trained yet
            Error::ArtifactNotFound(_) => Error::ModelNotTrained,
            other => other,
        })?;

        // ── Step 3: Encode the label through the trained registry ─────────────
        let code = encoder.encode(&query.genero)?;

        // ── Step 4 + 5: Assemble, predict, round ──────────────────────────────
        let x = feature_row(code, query.paginas, query.avaliacao, query.ano_publicacao);
        let raw = model.predict_row(&x);
        let rounded = (raw * 100.0).round() / 100.0;

        tracing::info!(
            "Predicted preco {:.2} for genero '{}' ({} model)",
            rounded,
            query.genero,
            model.kind()
        );
        Ok(rounded)
    }
}

// ─── Integration Tests ────────────────────────────────────────────────────────
// Full train → predict cycles over a real temp directory.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::data::catalog::CatalogStore;
    use crate::domain::record::{Record, RecordDraft};
    use std::path::Path;

    fn draft(titulo: &str, genero: &str, preco: &str, paginas: &str, ano: &str) -> RecordDraft {
        RecordDraft {
            titulo: titulo.into(),
            autor: "Carlos Silva".into(),
            genero: genero.into(),
            ano_publicacao: ano.into(),
            paginas: paginas.into(),
            avaliacao: "4.2".into(),
            preco: preco.into(),
            estoque: "5".into(),
        }
    }

    fn config(dir: &Path, model: &str) -> TrainConfig {
        TrainConfig {
            catalog_path: dir.join("dados.csv").to_string_lossy().into_owned(),
            backup_dir: dir.join("backups").to_string_lossy().into_owned(),
            artifacts_dir: dir.join("modelos").to_string_lossy().into_owned(),
            model: model.into(),
            seed: Some(42),
            ..Default::default()
        }
    }

    fn seed_two_genre_catalog(dir: &Path) -> CatalogStore {
        let store = CatalogStore::open(dir.join("dados.csv"), dir.join("backups"), true).unwrap();
        store
            .create(&draft("O Início", "Drama", "25.0", "120", "2001"))
            .unwrap();
        store
            .create(&draft("Sombras", "Terror", "40.0", "200", "2015"))
            .unwrap();
        store
    }

    #[test]
    fn test_predict_before_any_train_is_model_not_trained() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = PredictUseCase::new(dir.path().join("modelos"));
        let err = use_case
            .execute(&PredictQuery {
                genero: "Drama".into(),
                paginas: 100,
                avaliacao: 3.0,
                ano_publicacao: 2010,
            })
            .unwrap_err();
        assert!(matches!(err, Error::ModelNotTrained));
    }

    #[test]
    fn test_predict_rejects_non_finite_and_blank_inputs() {
        let dir = tempfile::tempdir().unwrap();
        seed_two_genre_catalog(dir.path());
        TrainUseCase::new(config(dir.path(), "linear"))
            .execute()
            .unwrap();

        let use_case = PredictUseCase::new(dir.path().join("modelos"));
        let query = |genero: &str, paginas: u32, avaliacao: f64| PredictQuery {
            genero: genero.into(),
            paginas,
            avaliacao,
            ano_publicacao: 2010,
        };

        // Even with a trained model on disk, a garbage query must
        // never reach it
        for bad in [
            query("Drama", 100, f64::NAN),
            query("Drama", 100, f64::INFINITY),
            query("Drama", 0, 3.0),
            query("  ", 100, 3.0),
        ] {
            let err = use_case.execute(&bad).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{bad:?}");
        }

        // A well-formed query still works
        assert!(use_case
            .execute(&query("Drama", 100, 3.0))
            .unwrap()
            .is_finite());
    }

    #[test]
    fn test_two_genre_linear_train_then_predict() {
        let dir = tempfile::tempdir().unwrap();
        seed_two_genre_catalog(dir.path());

        let report = TrainUseCase::new(config(dir.path(), "linear"))
            .execute()
            .unwrap();
        assert!(report.r2 <= 1.0);
        assert_eq!(report.rows_total, 2);

        let use_case = PredictUseCase::new(dir.path().join("modelos"));
        let pred = use_case
            .execute(&PredictQuery {
                genero: "Terror".into(),
                paginas: 100,
                avaliacao: 3.0,
                ano_publicacao: 2010,
            })
            .unwrap();
        assert!(pred.is_finite());
        // Rounded to 2 decimal places
        assert!(((pred * 100.0).round() / 100.0 - pred).abs() < 1e-12);

        // A genero outside the fitted domain must fail loudly
        let err = use_case
            .execute(&PredictQuery {
                genero: "Fantasia".into(),
                paginas: 100,
                avaliacao: 3.0,
                ano_publicacao: 2010,
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(ref g) if g == "Fantasia"));
    }

    #[test]
    fn test_every_model_kind_trains_on_a_seeded_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            CatalogStore::open(dir.path().join("dados.csv"), dir.path().join("backups"), true)
                .unwrap();
        store
            .replace_all(&crate::data::generator::generate(120, Some(5)))
            .unwrap();

        for model in ["linear", "random-forest", "knn"] {
            let report = TrainUseCase::new(config(dir.path(), model))
                .execute()
                .unwrap();
            assert!(report.r2 <= 1.0);
            assert_eq!(report.rows_total, 120);
            assert_eq!(report.rows_train, 96);
            assert_eq!(report.rows_test, 24);
        }
    }

    #[test]
    fn test_unrecognised_model_kind_fails_before_touching_anything() {
        let dir = tempfile::tempdir().unwrap();
        seed_two_genre_catalog(dir.path());

        let err = TrainUseCase::new(config(dir.path(), "rnadom-forest"))
            .execute()
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(!dir.path().join("modelos").join("model.json").exists());
    }

    #[test]
    fn test_insufficient_data_leaves_prior_artifacts_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = seed_two_genre_catalog(dir.path());

        // First train succeeds and persists a pair
        TrainUseCase::new(config(dir.path(), "knn"))
            .execute()
            .unwrap();

        // Make the snapshot unusable: one record, blank genero
        let bad = Record {
            id: 99,
            titulo: "Sem Gênero".into(),
            autor: "X".into(),
            genero: "  ".into(),
            ano_publicacao: 2000,
            paginas: 100,
            avaliacao: 3.0,
            preco: 10.0,
            estoque: 1,
        };
        store.replace_all(&[bad]).unwrap();

        let err = TrainUseCase::new(config(dir.path(), "knn"))
            .execute()
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData));

        // The previously persisted pair still answers queries
        let pred = PredictUseCase::new(dir.path().join("modelos"))
            .execute(&PredictQuery {
                genero: "Drama".into(),
                paginas: 120,
                avaliacao: 4.2,
                ano_publicacao: 2001,
            })
            .unwrap();
        assert!(pred.is_finite());
    }

    #[test]
    fn test_train_on_missing_catalog_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(config(dir.path(), "linear"))
            .execute()
            .unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }
}
