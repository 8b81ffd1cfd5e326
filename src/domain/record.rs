// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One catalog entry. Field names match the fixed CSV header
//   id,titulo,autor,genero,ano_publicacao,paginas,avaliacao,preco,estoque
// exactly, so serde can (de)serialize rows without renames.
//
// The presentation layer hands us every field as an untyped
// string (form input). RecordDraft and RecordPatch model that
// boundary: conversion happens HERE, inside validation, so a
// malformed value becomes a Validation error instead of a
// half-written row.
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)

use serde::{Deserialize, Serialize};

use crate::domain::error::{Error, Result};

/// A fully typed catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique, monotonically assigned — never reused after deletion
    pub id: u64,

    pub titulo: String,
    pub autor: String,

    /// Category label — the encoder's input at training time
    pub genero: String,

    pub ano_publicacao: i32,
    pub paginas: u32,
    pub avaliacao: f64,

    /// The prediction target
    pub preco: f64,

    pub estoque: u32,
}

impl Record {
    /// Build a typed Record from a draft, assigning the given id.
    /// Fails with Validation on the first field that does not convert.
    pub fn from_draft(id: u64, draft: &RecordDraft) -> Result<Self> {
        Ok(Self {
            id,
            titulo: required_text("titulo", &draft.titulo)?,
            autor: required_text("autor", &draft.autor)?,
            genero: required_text("genero", &draft.genero)?,
            ano_publicacao: parse_int("ano_publicacao", &draft.ano_publicacao)?,
            paginas: parse_positive("paginas", &draft.paginas)?,
            avaliacao: parse_float("avaliacao", &draft.avaliacao)?,
            preco: parse_float("preco", &draft.preco)?,
            estoque: parse_unsigned("estoque", &draft.estoque)?,
        })
    }

    /// True when this record has everything the training pipeline
    /// needs: a non-blank genero and finite numeric features.
    /// Records failing this are dropped from training snapshots.
    pub fn is_trainable(&self) -> bool {
        !self.genero.trim().is_empty()
            && self.paginas > 0
            && self.avaliacao.is_finite()
            && self.preco.is_finite()
    }
}

/// A new record as entered by the user — all fields still strings.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub titulo: String,
    pub autor: String,
    pub genero: String,
    pub ano_publicacao: String,
    pub paginas: String,
    pub avaliacao: String,
    pub preco: String,
    pub estoque: String,
}

/// A partial edit: only the fields the user actually supplied.
/// Unset fields are left untouched on the stored record.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub titulo: Option<String>,
    pub autor: Option<String>,
    pub genero: Option<String>,
    pub ano_publicacao: Option<String>,
    pub paginas: Option<String>,
    pub avaliacao: Option<String>,
    pub preco: Option<String>,
    pub estoque: Option<String>,
}

impl RecordPatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.titulo.is_none()
            && self.autor.is_none()
            && self.genero.is_none()
            && self.ano_publicacao.is_none()
            && self.paginas.is_none()
            && self.avaliacao.is_none()
            && self.preco.is_none()
            && self.estoque.is_none()
    }

    /// Apply this patch to a record, converting each supplied field.
    /// Validation runs on every field BEFORE any is written, so a
    /// bad value never leaves the record half-updated.
    pub fn apply(&self, record: &mut Record) -> Result<()> {
        // Parse first, assign after — all or nothing.
        let titulo = match &self.titulo {
            Some(v) => Some(required_text("titulo", v)?),
            None => None,
        };
        let autor = match &self.autor {
            Some(v) => Some(required_text("autor", v)?),
            None => None,
        };
        let genero = match &self.genero {
            Some(v) => Some(required_text("genero", v)?),
            None => None,
        };
        let ano_publicacao = match &self.ano_publicacao {
            Some(v) => Some(parse_int("ano_publicacao", v)?),
            None => None,
        };
        let paginas = match &self.paginas {
            Some(v) => Some(parse_positive("paginas", v)?),
            None => None,
        };
        let avaliacao = match &self.avaliacao {
            Some(v) => Some(parse_float("avaliacao", v)?),
            None => None,
        };
        let preco = match &self.preco {
            Some(v) => Some(parse_float("preco", v)?),
            None => None,
        };
        let estoque = match &self.estoque {
            Some(v) => Some(parse_unsigned("estoque", v)?),
            None => None,
        };

        if let Some(v) = titulo {
            record.titulo = v;
        }
        if let Some(v) = autor {
            record.autor = v;
        }
        if let Some(v) = genero {
            record.genero = v;
        }
        if let Some(v) = ano_publicacao {
            record.ano_publicacao = v;
        }
        if let Some(v) = paginas {
            record.paginas = v;
        }
        if let Some(v) = avaliacao {
            record.avaliacao = v;
        }
        if let Some(v) = preco {
            record.preco = v;
        }
        if let Some(v) = estoque {
            record.estoque = v;
        }
        Ok(())
    }
}

// ─── Field Conversion Helpers ─────────────────────────────────────────────────
// Each helper names the offending field in its error so the CLI
// can show exactly which input to fix.

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn parse_int(field: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::validation(field, format!("'{}' is not an integer", value.trim())))
}

fn parse_unsigned(field: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        Error::validation(
            field,
            format!("'{}' is not a non-negative integer", value.trim()),
        )
    })
}

fn parse_positive(field: &str, value: &str) -> Result<u32> {
    let n = parse_unsigned(field, value)?;
    if n == 0 {
        return Err(Error::validation(field, "must be greater than zero"));
    }
    Ok(n)
}

fn parse_float(field: &str, value: &str) -> Result<f64> {
    let v = value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::validation(field, format!("'{}' is not a number", value.trim())))?;
    if !v.is_finite() {
        return Err(Error::validation(field, "must be a finite number"));
    }
    Ok(v)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecordDraft {
        RecordDraft {
            titulo: "O Início".into(),
            autor: "Jane Doe".into(),
            genero: "Drama".into(),
            ano_publicacao: "2001".into(),
            paginas: "120".into(),
            avaliacao: "4.2".into(),
            preco: "25.0".into(),
            estoque: "10".into(),
        }
    }

    #[test]
    fn test_draft_converts_cleanly() {
        let r = Record::from_draft(1, &draft()).unwrap();
        assert_eq!(r.id, 1);
        assert_eq!(r.genero, "Drama");
        assert_eq!(r.ano_publicacao, 2001);
        assert_eq!(r.paginas, 120);
        assert!((r.preco - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_draft_rejects_bad_number() {
        let mut d = draft();
        d.paginas = "many".into();
        let err = Record::from_draft(1, &d).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "paginas"));
    }

    #[test]
    fn test_draft_rejects_blank_genero() {
        let mut d = draft();
        d.genero = "   ".into();
        assert!(Record::from_draft(1, &d).is_err());
    }

    #[test]
    fn test_draft_rejects_zero_paginas() {
        let mut d = draft();
        d.paginas = "0".into();
        assert!(Record::from_draft(1, &d).is_err());
    }

    #[test]
    fn test_patch_updates_only_named_fields() {
        let mut r = Record::from_draft(1, &draft()).unwrap();
        let patch = RecordPatch {
            preco: Some("30.0".into()),
            ..Default::default()
        };
        patch.apply(&mut r).unwrap();
        assert!((r.preco - 30.0).abs() < 1e-12);
        assert_eq!(r.titulo, "O Início");
        assert_eq!(r.paginas, 120);
    }

    #[test]
    fn test_patch_is_all_or_nothing() {
        let mut r = Record::from_draft(1, &draft()).unwrap();
        let patch = RecordPatch {
            titulo: Some("Novo".into()),
            paginas: Some("not-a-number".into()),
            ..Default::default()
        };
        assert!(patch.apply(&mut r).is_err());
        // The valid titulo must NOT have been applied
        assert_eq!(r.titulo, "O Início");
    }

    #[test]
    fn test_trainable_filter() {
        let mut r = Record::from_draft(1, &draft()).unwrap();
        assert!(r.is_trainable());
        r.genero = "  ".into();
        assert!(!r.is_trainable());
    }
}
