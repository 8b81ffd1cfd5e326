// ============================================================
// Layer 4 — Synthetic Catalog Generator
// ============================================================
// Seeds a catalog with pseudo-random records for demos and for
// exercising the training pipeline before real data exists.
//
// Values are drawn from fixed pools so generated catalogs look
// like the real thing: seven genres, six authors, ten base
// titles (suffixed with the id to keep titles unique).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::record::Record;

const GENEROS: [&str; 7] = [
    "Ação",
    "Comédia",
    "Drama",
    "Ficção Científica",
    "Fantasia",
    "Terror",
    "Romance",
];

const AUTORES: [&str; 6] = [
    "John Smith",
    "Jane Doe",
    "Carlos Silva",
    "Maria Oliveira",
    "Lucas Santos",
    "Ana Costa",
];

const TITULOS: [&str; 10] = [
    "O Início",
    "A Jornada",
    "Destino Final",
    "No Limite",
    "Segredos do Tempo",
    "O Retorno",
    "Além das Estrelas",
    "Sombras",
    "Luz da Esperança",
    "Última Chance",
];

fn pick<'a>(pool: &'a [&'a str], rng: &mut StdRng) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// Generate `count` records with ids 1..=count.
/// A seed makes the output reproducible.
pub fn generate(count: usize, seed: Option<u64>) -> Vec<Record> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (1..=count as u64)
        .map(|id| Record {
            id,
            // id suffix guarantees a unique titulo
            titulo: format!("{} {}", pick(&TITULOS, &mut rng), id),
            autor: pick(&AUTORES, &mut rng).to_string(),
            genero: pick(&GENEROS, &mut rng).to_string(),
            ano_publicacao: rng.gen_range(1980..=2025),
            paginas: rng.gen_range(80..=180),
            // one decimal place, like a review site rating
            avaliacao: (rng.gen_range(1.0..=5.0f64) * 10.0).round() / 10.0,
            preco: (rng.gen_range(10.0..=100.0f64) * 100.0).round() / 100.0,
            estoque: rng.gen_range(0..=50),
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generates_requested_count_with_dense_ids() {
        let records = generate(100, Some(1));
        assert_eq!(records.len(), 100);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=100).collect::<Vec<u64>>());
    }

    #[test]
    fn test_values_stay_in_their_pools_and_ranges() {
        for r in generate(200, Some(2)) {
            assert!(GENEROS.contains(&r.genero.as_str()));
            assert!(AUTORES.contains(&r.autor.as_str()));
            assert!((1980..=2025).contains(&r.ano_publicacao));
            assert!((80..=180).contains(&r.paginas));
            assert!((1.0..=5.0).contains(&r.avaliacao));
            assert!((10.0..=100.0).contains(&r.preco));
            assert!(r.estoque <= 50);
            assert!(r.is_trainable());
        }
    }

    #[test]
    fn test_titles_are_unique() {
        let records = generate(500, Some(3));
        let titles: HashSet<&str> = records.iter().map(|r| r.titulo.as_str()).collect();
        assert_eq!(titles.len(), records.len());
    }

    #[test]
    fn test_seed_makes_output_reproducible() {
        assert_eq!(generate(50, Some(9)), generate(50, Some(9)));
    }
}
