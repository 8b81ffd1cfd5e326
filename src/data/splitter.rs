// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set: what the model fits on
//   - Test set:     held out for the R² score
//
// Why shuffle before splitting?
//   Catalogs are often ordered (imports append by genre or by
//   date). Without shuffling, the test set would contain only
//   one slice of the data and the score would be meaningless.
//
// Partition membership is randomised per call; pass a seed to
// make a run reproducible (the seed also drives the forest
// bootstrap, so a seeded training run is deterministic end to
// end).
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `samples` and split into (train, test).
///
/// `train_fraction` is the proportion kept for training, e.g.
/// 0.8 = 80%. On tiny inputs the rounded split may leave the
/// test set empty; the caller decides what to score then.
pub fn split_train_test<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    seed: Option<u64>,
) -> (Vec<T>, Vec<T>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    samples.shuffle(&mut rng);

    let total = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} train, {} test",
        samples.len(),
        test.len()
    );

    (samples, test)
}
