//! Session state: the cave, the submarine, and everything the presentation
//! layer reads between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubbles::BubbleField;
use super::noise::derive_seed;
use super::terrain::{TerrainGenerator, TerrainWindow};
use super::vehicle::{EndRequest, VehiclePhase, VehicleSimulator, VehicleState};
use crate::tuning::{Tuning, TuningError};

/// Salt for the submarine's RNG stream
const VEHICLE_SALT: u64 = 3;
/// Salt for the bubble wander noise
const BUBBLE_SALT: u64 = 4;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running
    Playing,
    /// Frozen until unpaused
    Paused,
    /// Run ended, final score available
    GameOver,
}

/// Discrete things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Hard contact with the cave (cooldown gated)
    Crash { severity: f32 },
    /// Air just ran out
    DrowningOnset,
    /// Contemplation crossed another milestone
    ContemplationMilestone { count: u32 },
    /// Periodic cue while contemplating
    ContemplationChime,
    /// Exit requested too far below the surface
    QuitRefused,
    /// Run is over
    SessionEnded { score: u64 },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Top-left corner of the viewport in world space
    pub camera: Vec2,
    pub(crate) tuning: Tuning,
    pub(crate) terrain: TerrainGenerator,
    pub(crate) view: TerrainWindow,
    pub(crate) vehicle: VehicleSimulator,
    pub(crate) bubbles: BubbleField,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// New session with custom tuning, validated first
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let terrain = TerrainGenerator::new(seed, tuning.terrain.clone());

        // Start mid-screen on the cave's center line
        let spawn_x = tuning.session.viewport_width as f32 / 2.0;
        let spawn_y = terrain.sample(spawn_x as i32).center;
        let vehicle = VehicleSimulator::new(
            Vec2::new(spawn_x, spawn_y),
            tuning.vehicle.clone(),
            tuning.collision.clone(),
            derive_seed(seed, VEHICLE_SALT) as u64,
        );

        let view_width = tuning.session.viewport_width as usize;
        let mut state = Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            elapsed: 0.0,
            camera: Vec2::ZERO,
            terrain,
            view: TerrainWindow::with_capacity(view_width),
            vehicle,
            bubbles: BubbleField::new(derive_seed(seed, BUBBLE_SALT)),
            events: Vec::new(),
            tuning,
        };
        state.follow_vehicle();
        state.refresh_view();

        log::info!(
            "New session seed={} spawn=({:.0}, {:.0})",
            seed,
            spawn_x,
            spawn_y
        );
        state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Cave columns for an arbitrary range (renderer query)
    pub fn terrain_window(&self, x_start: i32, x_end: i32) -> TerrainWindow {
        self.terrain.window(x_start, x_end)
    }

    /// Cave columns under the viewport, refreshed every tick
    pub fn view(&self) -> &TerrainWindow {
        &self.view
    }

    pub fn vehicle(&self) -> &VehicleSimulator {
        &self.vehicle
    }

    /// HUD snapshot of the submarine
    pub fn vehicle_state(&self) -> VehicleState {
        self.vehicle.state().clone()
    }

    pub fn bubbles(&self) -> &BubbleField {
        &self.bubbles
    }

    /// Ask to end the run; refused unless the submarine is at the surface
    pub fn request_end(&mut self) -> EndRequest {
        let answer = self.vehicle.request_end(&mut self.events);
        self.sync_phase();
        answer
    }

    /// Take every event queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn final_score(&self) -> Option<u64> {
        self.vehicle.final_score()
    }

    /// Center the viewport on the submarine
    pub(crate) fn follow_vehicle(&mut self) {
        let viewport = Vec2::new(
            self.tuning.session.viewport_width as f32,
            self.tuning.session.viewport_height as f32,
        );
        self.camera = self.vehicle.state().position - viewport / 2.0;
    }

    /// Recompute the cave under the viewport in place
    pub(crate) fn refresh_view(&mut self) {
        let x_start = self.camera.x.floor() as i32;
        let x_end = x_start + self.tuning.session.viewport_width as i32;
        self.terrain.generate(&mut self.view, x_start, x_end);
    }

    /// Mirror the submarine's terminal phase onto the session
    pub(crate) fn sync_phase(&mut self) {
        if self.vehicle.phase() == VehiclePhase::Ended && self.phase != GamePhase::GameOver {
            log::info!(
                "Game over after {:.1}s, score {}",
                self.elapsed,
                self.final_score().unwrap_or(0)
            );
            self.phase = GamePhase::GameOver;
        }
    }
}
