//! Distance-driven difficulty ramp
//!
//! Quadratic near the origin, then an asymptotic approach to 1. Both halves
//! meet at 1/3 when `|x| == ramp_distance`, so the curve has no jump.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    /// Distance at which the quadratic ramp hands over to the plateau
    pub ramp_distance: f32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            ramp_distance: 5000.0,
        }
    }
}

impl DifficultyCurve {
    pub fn new(ramp_distance: f32) -> Self {
        assert!(
            ramp_distance > 0.0 && ramp_distance.is_finite(),
            "ramp distance must be positive, got {ramp_distance}"
        );
        Self { ramp_distance }
    }

    /// Difficulty in [0, 1] at horizontal position `x`
    #[inline]
    pub fn at(&self, x: f32) -> f32 {
        assert!(x.is_finite(), "difficulty sampled at non-finite x");
        let scaled = x.abs() / self.ramp_distance;
        let value = if scaled < 1.0 {
            scaled * scaled / 3.0
        } else {
            1.0 - 2.0 / (3.0 * scaled)
        };
        value.clamp(0.0, 1.0)
    }
}
