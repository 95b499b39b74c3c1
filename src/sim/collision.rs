//! Hull-versus-cave contact
//!
//! The hull is modeled as a lens: a half-sine profile that is flat at the bow
//! and stern and fattest amidships. Every terrain column under the hull is
//! checked against the hull top and bottom, and all the overlap is summed into
//! one push. There is no contact solver: a hull wedged between floor and
//! ceiling simply receives both pushes added together.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::{TerrainSource, TerrainWindow};

/// Immutable hull dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Width in world units, sampled once per unit
    pub width: u32,
    pub height: f32,
}

impl Footprint {
    pub fn new(width: u32, height: f32) -> Self {
        Self { width, height }
    }

    /// First terrain column under a hull centered at `x`
    #[inline]
    pub fn x_start(&self, x: f32) -> i32 {
        (x - self.width as f32 / 2.0).floor() as i32
    }

    /// Vertical half-extent of the hull at sample `i` (0 at the ends)
    #[inline]
    pub fn offset(&self, i: usize) -> f32 {
        (std::f32::consts::PI * (i as f32 / self.width as f32)).sin() * self.height / 2.0
    }
}

/// Result of resolving one hull position against the cave
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PenetrationResult {
    /// Push to apply (x along the wall incline, y out of the wall)
    pub correction: Vec2,
    /// Total overlap of the hull bottom with the floor
    pub floor_penetration: f32,
    /// Total overlap of the hull top with the ceiling
    pub ceiling_penetration: f32,
    /// Squared magnitude of the correction
    pub impact_severity: f32,
}

impl PenetrationResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_contact(&self) -> bool {
        self.floor_penetration > 0.0 || self.ceiling_penetration > 0.0
    }

    pub fn is_wedged(&self) -> bool {
        self.floor_penetration > 0.0 && self.ceiling_penetration > 0.0
    }

    pub fn is_crash(&self, threshold: f32) -> bool {
        self.impact_severity > threshold
    }
}

/// Samples the cave under the hull; owns its scratch window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionResolver {
    footprint: Footprint,
    #[serde(skip)]
    scratch: TerrainWindow,
}

impl CollisionResolver {
    pub fn new(footprint: Footprint) -> Self {
        Self {
            footprint,
            scratch: TerrainWindow::with_capacity(footprint.width as usize),
        }
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// The columns sampled by the last `resolve` call
    pub fn last_sample(&self) -> &TerrainWindow {
        &self.scratch
    }

    /// Sample `terrain` under a hull centered at `position` and resolve contact
    pub fn resolve(&mut self, position: Vec2, terrain: &impl TerrainSource) -> PenetrationResult {
        let x_start = self.footprint.x_start(position.x);
        terrain.fill_window(
            &mut self.scratch,
            x_start,
            x_start + self.footprint.width as i32,
        );
        resolve_window(&self.scratch, position, self.footprint)
    }

    /// Total floor and ceiling overlap of a hull centered at `position`
    pub fn penetration_at(&mut self, position: Vec2, terrain: &impl TerrainSource) -> f32 {
        let result = self.resolve(position, terrain);
        result.floor_penetration + result.ceiling_penetration
    }
}

/// Resolve a hull at `position` against an already sampled window.
///
/// The window must hold exactly one column per unit of hull width; anything
/// else is a windowing bug in the caller and panics.
pub fn resolve_window(
    window: &TerrainWindow,
    position: Vec2,
    footprint: Footprint,
) -> PenetrationResult {
    let width = footprint.width as usize;
    assert_eq!(
        window.len(),
        width,
        "collision window has {} columns, hull is {} wide",
        window.len(),
        width
    );
    assert!(position.is_finite(), "hull position is not finite: {position}");

    let mut floor_penetration = 0.0;
    let mut ceiling_penetration = 0.0;
    for i in 0..width {
        let offset = footprint.offset(i);
        // y grows downward: the hull bottom sits at y + offset
        floor_penetration += ((position.y + offset) - window.floor[i]).max(0.0);
        ceiling_penetration += (window.ceiling[i] - (position.y - offset)).max(0.0);
    }

    let mut correction = Vec2::ZERO;
    if floor_penetration > 0.0 {
        let slope = mean_slope(&window.floor);
        correction += Vec2::new(slope * floor_penetration, -floor_penetration);
    }
    if ceiling_penetration > 0.0 {
        let slope = mean_slope(&window.ceiling);
        correction += Vec2::new(-slope * ceiling_penetration, ceiling_penetration);
    }

    PenetrationResult {
        correction,
        floor_penetration,
        ceiling_penetration,
        impact_severity: correction.length_squared(),
    }
}

/// Total rise across a curve spread over every sampled column
fn mean_slope(curve: &[f32]) -> f32 {
    if curve.len() < 2 {
        return 0.0;
    }
    let rise: f32 = curve.windows(2).map(|pair| pair[1] - pair[0]).sum();
    rise / curve.len() as f32
}
