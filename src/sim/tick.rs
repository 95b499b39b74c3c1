//! Per-frame simulation step
//!
//! The caller owns the clock: it passes `dt` (already clamped to
//! [`MAX_DT`](crate::consts::MAX_DT) or below) and the input sampled this
//! frame, then reads state and drains events for presentation.

use super::state::{GamePhase, GameState};
use super::vehicle::VehicleInput;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Forward/reverse throttle in [-1, 1]
    pub throttle: f32,
    /// Ballast pump (+) / vent (-) in [-1, 1]
    pub ballast: f32,
    /// Hold to contemplate
    pub contemplate: bool,
    /// Try to end the run (only works at the surface)
    pub quit: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    fn vehicle(&self) -> VehicleInput {
        VehicleInput {
            throttle: self.throttle,
            ballast: self.ballast,
            contemplate: self.contemplate,
        }
    }
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    assert!(
        dt.is_finite() && dt > 0.0,
        "tick needs a positive finite dt, got {dt}"
    );

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                log::info!("Paused");
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                log::info!("Resumed");
                state.phase = GamePhase::Playing;
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    if input.quit {
        state.request_end();
        if state.phase == GamePhase::GameOver {
            return;
        }
    }

    state.refresh_view();
    state.vehicle.tick(
        &input.vehicle(),
        &state.terrain,
        &mut state.bubbles,
        &mut state.events,
        dt,
    );
    state.bubbles.tick(dt);
    state.sync_phase();
    state.follow_vehicle();
}
