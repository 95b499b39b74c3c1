//! Submarine motion, damage and air
//!
//! One tick is a semi-implicit Euler step: controls and forces update the
//! velocity, the velocity moves the hull, and the cave pushes back. Damage
//! from hard contacts makes the hull leak, so air drains faster the more the
//! player crashes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubbles::BubbleField;
use super::collision::{CollisionResolver, Footprint, PenetrationResult};
use super::state::GameEvent;
use super::terrain::TerrainSource;
use crate::tuning::{CollisionTuning, VehicleTuning};

/// Life-cycle of the submarine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehiclePhase {
    /// Air left, controls live
    Normal,
    /// Out of air, controls dead
    Drowning,
    /// Run over, score final
    Ended,
}

/// Control axes for one tick (each in [-1, 1])
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleInput {
    /// Forward (+) / reverse (-) throttle
    pub throttle: f32,
    /// Pump air into (+) or vent air out of (-) the ballast tanks
    pub ballast: f32,
    /// Hold still and contemplate the deep
    pub contemplate: bool,
}

/// Snapshot of everything the HUD needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Hull center; y grows downward and y = 0 is the surface
    pub position: Vec2,
    pub velocity: Vec2,
    /// Ballast level in [-1, 1]; positive floats up
    pub buoyancy: f32,
    /// Accumulated hull damage (0 = pristine)
    pub damage: f32,
    /// Seconds of air left at the undamaged rate; negative while drowning
    pub air: f32,
    /// Score resource earned while contemplating
    pub contemplation: f32,
    /// +1 facing right, -1 facing left
    pub orientation: f32,
    pub footprint: Footprint,
    pub contemplating: bool,
    /// Seconds left on the "surface to exit" warning
    pub quit_warning: f32,
}

/// Answer to an end-of-run request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndRequest {
    /// Run finished with this score
    Accepted { score: u64 },
    /// Too deep to exit; the warning is showing
    Refused,
    /// Controls are dead while drowning
    Ignored,
}

/// Audio ambience derived from the vehicle (low-pass cutoff and loudness)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ambience {
    pub filter_hz: f32,
    pub gain: f32,
}

/// Owns and advances a single submarine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSimulator {
    state: VehicleState,
    phase: VehiclePhase,
    tuning: VehicleTuning,
    collision: CollisionTuning,
    resolver: CollisionResolver,
    last_contact: PenetrationResult,
    rng: Pcg32,
    crash_cooldown: f32,
    chime_cooldown: f32,
    since_bubble: f32,
    final_score: Option<u64>,
}

impl VehicleSimulator {
    pub fn new(
        position: Vec2,
        tuning: VehicleTuning,
        collision: CollisionTuning,
        seed: u64,
    ) -> Self {
        let footprint = Footprint::new(tuning.width, tuning.height);
        Self {
            state: VehicleState {
                position,
                velocity: Vec2::ZERO,
                buoyancy: 0.0,
                damage: 0.0,
                air: tuning.initial_air,
                contemplation: 0.0,
                orientation: 1.0,
                footprint,
                contemplating: false,
                quit_warning: 0.0,
            },
            phase: VehiclePhase::Normal,
            resolver: CollisionResolver::new(footprint),
            last_contact: PenetrationResult::none(),
            rng: Pcg32::seed_from_u64(seed),
            crash_cooldown: 0.0,
            chime_cooldown: 2.0,
            since_bubble: 0.0,
            final_score: None,
            tuning,
            collision,
        }
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn phase(&self) -> VehiclePhase {
        self.phase
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Contact resolved during the last tick
    pub fn last_contact(&self) -> &PenetrationResult {
        &self.last_contact
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Share of the hull below the surface line, in [0, 1]
    pub fn submersion(&self) -> f32 {
        let height = self.tuning.height;
        ((self.state.position.y + height / 2.0) / height).clamp(0.0, 1.0)
    }

    pub fn depth_fathoms(&self) -> f32 {
        self.state.position.y.max(0.0) / self.tuning.px_per_fathom
    }

    /// Contemplation earned per second at the current depth (cubic in depth)
    pub fn contemplation_rate(&self) -> f32 {
        (self.depth_fathoms() / self.tuning.contemplation_depth_scale).powi(3)
    }

    /// Remaining air as a fraction of the starting supply
    pub fn air_fraction(&self) -> f32 {
        (self.state.air.max(0.0) / self.tuning.initial_air).min(1.0)
    }

    /// Remaining air as `m:ss`
    pub fn air_clock(&self) -> String {
        let seconds = self.state.air.max(0.0).floor() as u64;
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }

    /// Water muffles more the deeper the hull goes; rushing water gets louder with speed
    pub fn ambience(&self) -> Ambience {
        let brightness = (1.0 - self.state.position.y / 1000.0).clamp(0.0, 1.0);
        Ambience {
            filter_hz: 200.0 + 4000.0 * brightness,
            gain: 0.5 * (self.state.velocity.length() / 1000.0).min(1.0),
        }
    }

    /// Whether the hull is close enough to the surface to end the run
    pub fn is_surfaced(&self) -> bool {
        self.state.position.y <= self.tuning.surface_band
    }

    /// Advance one step of `dt` seconds against `terrain`
    pub fn tick(
        &mut self,
        input: &VehicleInput,
        terrain: &impl TerrainSource,
        bubbles: &mut BubbleField,
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) {
        if self.phase == VehiclePhase::Ended {
            return;
        }
        self.since_bubble += dt;

        if self.phase == VehiclePhase::Normal {
            self.handle_input(input, bubbles, events, dt);
        } else {
            self.state.contemplating = false;
        }

        let t = &self.tuning;
        let submersion = self.submersion();
        let state = &mut self.state;

        // Ballast only bites on the part of the hull that is under water
        state.velocity.y -= state.buoyancy * t.vertical_acceleration * submersion * dt;
        state.velocity.y += (1.0 - submersion) * t.gravity_in_air * dt;
        state.velocity -= state.velocity * t.drag * dt;
        state.position += state.velocity * dt;

        if state.position.y > t.height / 2.0 || state.air <= 0.0 {
            let leak = 1.0 + t.leak_at_max_damage * state.damage / 100.0;
            if self.since_bubble > 1.0 / leak {
                bubbles.emit(state.position);
                self.since_bubble = 0.0;
            }
            state.air -= dt * t.air_loss_rate * leak;
        }

        if self.phase == VehiclePhase::Normal && self.state.air <= 0.0 {
            self.phase = VehiclePhase::Drowning;
            self.state.contemplating = false;
            log::debug!("Out of air at depth {:.1}", self.state.position.y);
            events.push(GameEvent::DrowningOnset);
        }

        self.apply_collision(terrain, events, dt);

        if self.state.velocity.x > 0.0 {
            self.state.orientation = 1.0;
        } else if self.state.velocity.x < 0.0 {
            self.state.orientation = -1.0;
        }

        self.state.quit_warning = (self.state.quit_warning - dt).max(0.0);
        self.crash_cooldown = (self.crash_cooldown - dt).max(0.0);
        self.chime_cooldown = (self.chime_cooldown - dt).max(0.0);
        if !self.state.contemplating {
            self.chime_cooldown = self.chime_cooldown.max(1.0);
        }

        if self.phase == VehiclePhase::Drowning && self.state.air < self.tuning.drowned_air_floor {
            log::info!("Drowned with {:.0} contemplation", self.state.contemplation);
            self.finish(0, events);
        }
    }

    /// Try to end the run. Only allowed near the surface.
    pub fn request_end(&mut self, events: &mut Vec<GameEvent>) -> EndRequest {
        match self.phase {
            VehiclePhase::Ended => EndRequest::Accepted {
                score: self.final_score.unwrap_or(0),
            },
            VehiclePhase::Drowning => EndRequest::Ignored,
            VehiclePhase::Normal if !self.is_surfaced() => {
                log::warn!(
                    "Exit refused at depth {:.1}, surface first",
                    self.state.position.y
                );
                self.state.quit_warning = self.tuning.quit_warning_duration;
                events.push(GameEvent::QuitRefused);
                EndRequest::Refused
            }
            VehiclePhase::Normal => {
                let score = self.state.contemplation.max(0.0).floor() as u64;
                log::info!("Surfaced and ended the run with score {}", score);
                self.finish(score, events);
                EndRequest::Accepted { score }
            }
        }
    }

    fn finish(&mut self, score: u64, events: &mut Vec<GameEvent>) {
        self.phase = VehiclePhase::Ended;
        self.state.contemplating = false;
        self.final_score = Some(score);
        events.push(GameEvent::SessionEnded { score });
    }

    fn handle_input(
        &mut self,
        input: &VehicleInput,
        bubbles: &mut BubbleField,
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) {
        let throttle = input.throttle.clamp(-1.0, 1.0);
        let ballast = input.ballast.clamp(-1.0, 1.0);
        self.state.contemplating = input.contemplate;

        if self.state.contemplating {
            let rate = self.contemplation_rate();
            let interval = self.tuning.milestone_interval;
            let before = (self.state.contemplation / interval).floor();
            self.state.contemplation += dt * rate;
            let after = (self.state.contemplation / interval).floor();
            if after > before {
                events.push(GameEvent::ContemplationMilestone {
                    count: after as u32,
                });
            }
            if self.chime_cooldown == 0.0 {
                events.push(GameEvent::ContemplationChime);
                self.chime_cooldown = 7.0 - (2.0 * rate).min(6.0);
            }
            return;
        }

        let t = &self.tuning;
        self.state.velocity.x += t.horizontal_acceleration * throttle * dt;

        let old_buoyancy = self.state.buoyancy;
        self.state.buoyancy =
            (self.state.buoyancy + t.ballast_fill_rate * ballast * dt).clamp(-1.0, 1.0);
        if ballast > 0.0 && self.state.buoyancy > old_buoyancy {
            // Pumping the tanks burns breathing air
            self.state.air -= dt * t.ballast_air_usage;
        }
        if self.state.buoyancy < old_buoyancy && self.rng.random::<f32>() < -ballast * 0.9 {
            bubbles.emit(self.state.position);
        }
    }

    fn apply_collision(
        &mut self,
        terrain: &impl TerrainSource,
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) {
        let contact = self.resolver.resolve(self.state.position, terrain);
        self.state.position += contact.correction * dt;
        self.state.velocity += contact.correction * dt;

        if contact.is_crash(self.collision.crash_threshold) {
            self.state.damage += contact.impact_severity.sqrt() / self.tuning.damage_scale;
            if self.crash_cooldown == 0.0 {
                self.crash_cooldown = self.collision.crash_cooldown
                    + self.rng.random::<f32>() * self.collision.crash_cooldown_jitter;
                log::debug!(
                    "Crash severity {:.0}, damage now {:.2}",
                    contact.impact_severity,
                    self.state.damage
                );
                events.push(GameEvent::Crash {
                    severity: contact.impact_severity,
                });
            }
        }
        self.last_contact = contact;
    }
}
