//! Seeded 2D coherent noise
//!
//! Thin wrapper over simplex noise so the rest of the simulation works in
//! `f32` and never sees the generator type.

use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

/// Deterministic 2D simplex noise, output roughly in [-1, 1].
/// Serialized as its seed alone; the generator is rebuilt on load.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct NoiseField {
    seed: u32,
    simplex: Simplex,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the field. Panics on non-finite coordinates.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        assert!(
            x.is_finite() && y.is_finite(),
            "noise sampled at non-finite coordinate ({x}, {y})"
        );
        self.simplex.get([x as f64, y as f64]) as f32
    }
}

impl From<u32> for NoiseField {
    fn from(seed: u32) -> Self {
        Self::new(seed)
    }
}

impl From<NoiseField> for u32 {
    fn from(field: NoiseField) -> Self {
        field.seed
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

/// Derive an independent noise seed from a session seed and a salt
pub fn derive_seed(seed: u64, salt: u64) -> u32 {
    let mixed = seed
        .wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_mul(2654435761);
    (mixed ^ (mixed >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_output() {
        let a = NoiseField::new(48);
        let b = NoiseField::new(48);
        for i in 0..100 {
            let x = i as f32 * 0.37;
            let y = i as f32 * -1.3;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..50).any(|i| {
            let x = i as f32 * 0.41 + 0.1;
            a.sample(x, 0.5) != b.sample(x, 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_bounded_and_continuous() {
        let field = NoiseField::new(7);
        let mut prev = field.sample(0.0, 3.0);
        for i in 1..2000 {
            let x = i as f32 * 0.001;
            let value = field.sample(x, 3.0);
            assert!((-1.05..=1.05).contains(&value), "out of range: {value}");
            assert!((value - prev).abs() < 0.05, "jump at x={x}");
            prev = value;
        }
    }

    #[test]
    fn test_derived_seeds_are_distinct() {
        assert_ne!(derive_seed(48, 1), derive_seed(48, 2));
        assert_eq!(derive_seed(48, 1), derive_seed(48, 1));
    }

    #[test]
    fn test_serializes_as_seed() {
        let field = NoiseField::new(31);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, "31");
        let restored: NoiseField = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed(), 31);
        assert_eq!(
            restored.sample(1.7, -0.4).to_bits(),
            field.sample(1.7, -0.4).to_bits()
        );
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_nan_panics() {
        NoiseField::new(0).sample(f32::NAN, 0.0);
    }
}
