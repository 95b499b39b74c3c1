//! Deterministic cave simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded noise and RNG only
//! - No rendering, audio or platform dependencies

pub mod bubbles;
pub mod collision;
pub mod difficulty;
pub mod noise;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod vehicle;

pub use bubbles::{Bubble, BubbleField, MAX_BUBBLES};
pub use collision::{CollisionResolver, Footprint, PenetrationResult, resolve_window};
pub use difficulty::DifficultyCurve;
pub use noise::NoiseField;
pub use state::{GameEvent, GamePhase, GameState};
pub use terrain::{TerrainColumn, TerrainGenerator, TerrainSource, TerrainWindow};
pub use tick::{TickInput, tick};
pub use vehicle::{
    Ambience, EndRequest, VehicleInput, VehiclePhase, VehicleSimulator, VehicleState,
};
