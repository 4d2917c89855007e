//! Deterministic RNG utilities for reproducible tests.

use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform sample from the axis-aligned box `[lo, hi]`.
pub fn sample_box(rng: &mut impl Rng, lo: &Vector3<f64>, hi: &Vector3<f64>) -> Vector3<f64> {
    Vector3::from_fn(|i, _| lo[i] + (hi[i] - lo[i]) * rng.r#gen::<f64>())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
