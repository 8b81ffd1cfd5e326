// ============================================================
// Layer 5 — Categorical Encoder Registry
// ============================================================
// Maps genero labels to dense integer codes 0..k-1 and back.
//
// Two properties the pipeline depends on:
//   1. Determinism — labels are stored in sorted lexical order,
//      so refitting on the same label set reproduces the same
//      codes. Without this, a model trained against one fit
//      could silently disagree with a later identical fit.
//   2. Closed domain — encoding a label that was not seen at
//      fit time is an UnknownCategory error, never a guessed
//      default code. A wrong-but-plausible code would flow
//      straight into a wrong-but-plausible price.
//
// The encoder is rebuilt wholesale on every training run and
// persisted next to the model it was trained with; see the
// artifact store for the pairing rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::error::{Error, Result};

/// A fitted label ↔ code mapping over the genero domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneroEncoder {
    /// Sorted distinct labels; a label's index IS its code.
    labels: Vec<String>,
}

impl GeneroEncoder {
    /// Fit a fresh encoder over a set of labels.
    /// BTreeSet gives dedup + sorted order in one pass, which is
    /// what makes refits on identical label sets reproducible.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self {
            labels: set.into_iter().collect(),
        }
    }

    /// Look up the code for a label.
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.labels
            .binary_search_by(|l| l.as_str().cmp(label))
            .map_err(|_| Error::UnknownCategory(label.to_string()))
    }

    /// Inverse lookup: code → label.
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.labels
            .get(code)
            .map(String::as_str)
            .ok_or(Error::InvalidCode {
                code,
                domain_size: self.labels.len(),
            })
    }

    /// The labels this encoder can convert, in code order.
    pub fn domain(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct labels in the fitted domain.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
