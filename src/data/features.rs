// ============================================================
// Layer 4 — Feature Builder
// ============================================================
// Turns catalog records into model input rows.
//
// Feature order is fixed and shared by train and predict:
//   [genero_code, paginas, avaliacao, ano_publicacao] → preco
//
// Records without the required fields (blank genero, zero
// paginas, non-finite numbers) are dropped before training —
// they carry no usable signal and would poison the fit.

use crate::domain::error::Result;
use crate::domain::record::Record;
use crate::domain::traits::FeatureRow;
use crate::ml::encoder::GeneroEncoder;

/// The records a training snapshot can actually learn from.
pub fn usable_records(records: &[Record]) -> Vec<&Record> {
    let usable: Vec<&Record> = records.iter().filter(|r| r.is_trainable()).collect();
    let dropped = records.len() - usable.len();
    if dropped > 0 {
        tracing::warn!("Dropped {} record(s) with missing required fields", dropped);
    }
    usable
}

/// Assemble one feature row from already-validated values.
pub fn feature_row(genero_code: usize, paginas: u32, avaliacao: f64, ano: i32) -> FeatureRow {
    [genero_code as f64, paginas as f64, avaliacao, ano as f64]
}

/// Build the feature matrix and target vector for a snapshot.
/// The encoder must have been fitted over these records' generos;
/// an unknown label here is a bug upstream and surfaces as the
/// encoder's error rather than a silent skip.
pub fn build_samples(
    records: &[&Record],
    encoder: &GeneroEncoder,
) -> Result<(Vec<FeatureRow>, Vec<f64>)> {
    let mut xs = Vec::with_capacity(records.len());
    let mut ys = Vec::with_capacity(records.len());
    for record in records {
        let code = encoder.encode(&record.genero)?;
        xs.push(feature_row(
            code,
            record.paginas,
            record.avaliacao,
            record.ano_publicacao,
        ));
        ys.push(record.preco);
    }
    Ok((xs, ys))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, genero: &str, preco: f64) -> Record {
        Record {
            id,
            titulo: format!("Livro {id}"),
            autor: "Ana Costa".into(),
            genero: genero.into(),
            ano_publicacao: 2005,
            paginas: 150,
            avaliacao: 3.5,
            preco,
            estoque: 4,
        }
    }

    #[test]
    fn test_unusable_records_are_dropped() {
        let blank_genero = record(2, "  ", 10.0);
        let nan_preco = record(3, "Drama", f64::NAN);

        let records = vec![record(1, "Drama", 20.0), blank_genero, nan_preco];
        let usable = usable_records(&records);
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].id, 1);
    }

    #[test]
    fn test_feature_order_matches_training_contract() {
        let records = vec![record(1, "Drama", 25.0)];
        let refs: Vec<&Record> = records.iter().collect();
        let encoder = GeneroEncoder::fit(["Drama"]);

        let (xs, ys) = build_samples(&refs, &encoder).unwrap();
        assert_eq!(xs, vec![[0.0, 150.0, 3.5, 2005.0]]);
        assert_eq!(ys, vec![25.0]);
    }
}
