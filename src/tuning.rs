//! Data-driven balance constants
//!
//! Every number that was tuned by feel (wavelengths, jaggedness caps, the
//! open-sky sentinel, hull size, drag, air budget...) lives here so a session
//! can be rebalanced from a JSON file without touching the simulation code.
//! Missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_DT;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Cave shape parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    /// Horizontal distance over which difficulty ramps (quadratic part ends here)
    pub ramp_distance: f32,
    /// Forward distance per unit of baseline depth
    pub distance_per_depth: f32,
    /// Narrowest ceiling-to-floor gap (at difficulty 1)
    pub min_gap: f32,
    /// Extra gap added at difficulty 0
    pub max_extra_gap: f32,
    /// Center line noise amplitude at difficulty 1
    pub max_center_jaggedness: f32,
    /// Exponent applied to difficulty for the center amplitude (> 1 = super-linear)
    pub center_jaggedness_exponent: f32,
    /// Center noise wavelength at difficulty 0
    pub center_wavelength: f32,
    /// Center wavelength added at difficulty 1
    pub center_wavelength_growth: f32,
    /// Upper bound on wall noise amplitude
    pub max_wall_jaggedness: f32,
    /// Wall noise wavelength at difficulty 0
    pub wall_wavelength: f32,
    /// Wall wavelength added at difficulty 1
    pub wall_wavelength_growth: f32,
    /// Ceiling value used when the cave roof would poke above the surface
    pub open_sky_sentinel: f32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            ramp_distance: 5000.0,
            distance_per_depth: 3.0,
            min_gap: 80.0,
            max_extra_gap: 500.0,
            max_center_jaggedness: 100.0,
            center_jaggedness_exponent: 1.5,
            center_wavelength: 50.0,
            center_wavelength_growth: 50.0,
            max_wall_jaggedness: 10.0,
            wall_wavelength: 50.0,
            wall_wavelength_growth: 50.0,
            open_sky_sentinel: -4000.0,
        }
    }
}

/// Submarine handling and survival parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Hull width in world units (one terrain sample per unit)
    pub width: u32,
    /// Hull height in world units
    pub height: f32,
    /// Starting air, in seconds of undamaged breathing
    pub initial_air: f32,
    /// Air lost per second while submerged
    pub air_loss_rate: f32,
    /// Extra air per second spent pumping ballast
    pub ballast_air_usage: f32,
    /// Buoyancy change per second at full ballast input
    pub ballast_fill_rate: f32,
    /// Horizontal acceleration at full throttle
    pub horizontal_acceleration: f32,
    /// Vertical acceleration at full buoyancy, fully submerged
    pub vertical_acceleration: f32,
    /// Downward acceleration when fully out of the water
    pub gravity_in_air: f32,
    /// Velocity drag coefficient (per second)
    pub drag: f32,
    /// Air loss multiplier added per 100 damage
    pub leak_at_max_damage: f32,
    /// Divisor turning impact magnitude into damage
    pub damage_scale: f32,
    /// Air level (negative) at which the drowned run ends
    pub drowned_air_floor: f32,
    /// World units per fathom (display depth unit)
    pub px_per_fathom: f32,
    /// Depth in fathoms where contemplation accrues at 1 per second
    pub contemplation_depth_scale: f32,
    /// Contemplation between two milestone events
    pub milestone_interval: f32,
    /// How long the "surface to exit" warning stays up
    pub quit_warning_duration: f32,
    /// Deepest y at which the run may be ended
    pub surface_band: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            width: 32,
            height: 16.0,
            initial_air: 480.0,
            air_loss_rate: 1.0,
            ballast_air_usage: 10.0,
            ballast_fill_rate: 2.0,
            horizontal_acceleration: 100.0,
            vertical_acceleration: 66.0,
            gravity_in_air: 132.0,
            drag: 0.5,
            leak_at_max_damage: 2.0,
            damage_scale: 100.0,
            drowned_air_floor: -5.0,
            px_per_fathom: 50.0,
            contemplation_depth_scale: 50.0,
            milestone_interval: 10.0,
            quit_warning_duration: 3.0,
            surface_band: 16.0,
        }
    }
}

/// Contact response parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Squared correction magnitude above which a contact counts as a crash
    pub crash_threshold: f32,
    /// Minimum gap between two crash events
    pub crash_cooldown: f32,
    /// Random extra gap between crash events (uniform in [0, jitter))
    pub crash_cooldown_jitter: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            crash_threshold: 2000.0,
            crash_cooldown: 0.1,
            crash_cooldown_jitter: 0.3,
        }
    }
}

/// Viewport the camera keeps centered on the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub terrain: TerrainTuning,
    pub vehicle: VehicleTuning,
    pub collision: CollisionTuning,
    pub session: SessionTuning,
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let t = &self.terrain;
        positive("terrain.ramp_distance", t.ramp_distance)?;
        positive("terrain.distance_per_depth", t.distance_per_depth)?;
        positive("terrain.center_wavelength", t.center_wavelength)?;
        positive("terrain.wall_wavelength", t.wall_wavelength)?;
        non_negative("terrain.center_wavelength_growth", t.center_wavelength_growth)?;
        non_negative("terrain.wall_wavelength_growth", t.wall_wavelength_growth)?;
        non_negative("terrain.max_extra_gap", t.max_extra_gap)?;
        non_negative("terrain.max_center_jaggedness", t.max_center_jaggedness)?;
        non_negative("terrain.max_wall_jaggedness", t.max_wall_jaggedness)?;
        if !(t.center_jaggedness_exponent >= 1.0) {
            return Err(invalid(
                "terrain.center_jaggedness_exponent",
                format!("must be at least 1, got {}", t.center_jaggedness_exponent),
            ));
        }
        // Each wall can wander by at most max_wall_jaggedness toward the other.
        if !(t.min_gap > 2.0 * t.max_wall_jaggedness) {
            return Err(invalid(
                "terrain.min_gap",
                format!(
                    "must exceed twice max_wall_jaggedness ({}), got {}",
                    2.0 * t.max_wall_jaggedness,
                    t.min_gap
                ),
            ));
        }
        if !(t.open_sky_sentinel < 0.0) {
            return Err(invalid(
                "terrain.open_sky_sentinel",
                format!("must be above the surface (negative), got {}", t.open_sky_sentinel),
            ));
        }

        let v = &self.vehicle;
        if v.width < 2 {
            return Err(invalid("vehicle.width", format!("must be at least 2, got {}", v.width)));
        }
        positive("vehicle.height", v.height)?;
        positive("vehicle.initial_air", v.initial_air)?;
        positive("vehicle.damage_scale", v.damage_scale)?;
        positive("vehicle.px_per_fathom", v.px_per_fathom)?;
        positive("vehicle.contemplation_depth_scale", v.contemplation_depth_scale)?;
        positive("vehicle.milestone_interval", v.milestone_interval)?;
        positive("vehicle.quit_warning_duration", v.quit_warning_duration)?;
        non_negative("vehicle.surface_band", v.surface_band)?;
        non_negative("vehicle.air_loss_rate", v.air_loss_rate)?;
        non_negative("vehicle.ballast_air_usage", v.ballast_air_usage)?;
        non_negative("vehicle.ballast_fill_rate", v.ballast_fill_rate)?;
        non_negative("vehicle.horizontal_acceleration", v.horizontal_acceleration)?;
        non_negative("vehicle.vertical_acceleration", v.vertical_acceleration)?;
        non_negative("vehicle.gravity_in_air", v.gravity_in_air)?;
        non_negative("vehicle.leak_at_max_damage", v.leak_at_max_damage)?;
        non_negative("vehicle.drag", v.drag)?;
        // Drag past 1/dt reverses the velocity every step and blows up
        if !(v.drag * MAX_DT < 1.0) {
            return Err(invalid(
                "vehicle.drag",
                format!(
                    "must stay below {} for the largest step, got {}",
                    1.0 / MAX_DT,
                    v.drag
                ),
            ));
        }
        if !(v.drowned_air_floor <= 0.0) || !v.drowned_air_floor.is_finite() {
            return Err(invalid(
                "vehicle.drowned_air_floor",
                format!("must not be positive, got {}", v.drowned_air_floor),
            ));
        }

        let c = &self.collision;
        non_negative("collision.crash_threshold", c.crash_threshold)?;
        non_negative("collision.crash_cooldown", c.crash_cooldown)?;
        non_negative("collision.crash_cooldown_jitter", c.crash_cooldown_jitter)?;

        if self.session.viewport_width == 0 || self.session.viewport_height == 0 {
            return Err(invalid("session.viewport", "must not be empty".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> TuningError {
    TuningError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    // Written as a negation so NaN is rejected too
    if !(value > 0.0) || !value.is_finite() {
        return Err(invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}
