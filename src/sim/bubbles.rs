//! Air bubbles leaking from the hull
//!
//! A fixed ring of slots: emitting always overwrites the oldest slot, so the
//! field never allocates after construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;

/// Maximum bubbles alive at once
pub const MAX_BUBBLES: usize = 100;
/// Size of a freshly emitted bubble
pub const BUBBLE_START_SIZE: f32 = 2.0;
/// Bubbles pop once they grow past this size
pub const BUBBLE_MAX_SIZE: f32 = 5.0;
/// Rise speed and horizontal wander speed
const BUBBLE_SPEED: f32 = 100.0;
/// Spatial scale of the wander noise
const WANDER_SCALE: f32 = 10.0;

/// A single bubble; size 0 marks a free slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec2,
    pub size: f32,
}

impl Bubble {
    pub fn is_alive(&self) -> bool {
        self.size > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleField {
    bubbles: Vec<Bubble>,
    next: usize,
    wander: NoiseField,
}

impl BubbleField {
    pub fn new(seed: u32) -> Self {
        Self {
            bubbles: vec![Bubble::default(); MAX_BUBBLES],
            next: 0,
            wander: NoiseField::new(seed),
        }
    }

    /// Release a bubble at `pos`, recycling the oldest slot
    pub fn emit(&mut self, pos: Vec2) {
        self.bubbles[self.next] = Bubble {
            pos,
            size: BUBBLE_START_SIZE,
        };
        self.next = (self.next + 1) % MAX_BUBBLES;
    }

    /// Rise, wander and grow every live bubble
    pub fn tick(&mut self, dt: f32) {
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_alive()) {
            let wander = self
                .wander
                .sample(bubble.pos.x / WANDER_SCALE, bubble.pos.y / WANDER_SCALE);
            bubble.pos.x += dt * BUBBLE_SPEED * wander;
            bubble.pos.y -= dt * BUBBLE_SPEED;
            bubble.size += dt;
            // Popped by age, or by breaking the surface
            if bubble.size > BUBBLE_MAX_SIZE || bubble.pos.y < bubble.size {
                bubble.size = 0.0;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter().filter(|b| b.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.iter().count()
    }

    pub fn clear(&mut self) {
        self.bubbles.fill(Bubble::default());
        self.next = 0;
    }
}
