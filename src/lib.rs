//! Abyssal - a submarine descending an endless procedural cave
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, collisions, vehicle, session)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best score tracking

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::BestScore;
pub use tuning::{Tuning, TuningError};

/// Simulation timing constants
pub mod consts {
    /// Nominal frame step (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest step the integrator is tuned for; callers clamp long frames to this
    pub const MAX_DT: f32 = 0.12;
}

/// Clamp a raw frame delta into the range the simulation accepts
#[inline]
pub fn clamp_frame_dt(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(f32::EPSILON, consts::MAX_DT)
    } else {
        consts::MAX_DT
    }
}
