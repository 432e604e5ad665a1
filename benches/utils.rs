#![allow(dead_code)]
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// data generating
// functions
pub(crate) fn prediction_triple(n_samples: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let label: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let score: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let sample_weight: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(0.0..2.0)).collect();

    (label, score, sample_weight)
}
