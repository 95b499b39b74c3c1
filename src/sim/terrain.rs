//! Procedural cave geometry
//!
//! The cave is a pair of height curves (ceiling above, floor below) wrapped
//! around a wandering center line that sinks as the player travels. Columns
//! are computed on demand for whatever horizontal window is needed, so the
//! cave is unbounded in both directions and never stored.

use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyCurve;
use super::noise::{NoiseField, derive_seed};
use crate::tuning::TerrainTuning;

/// Salt for the center line noise seed
const CENTER_SALT: u64 = 1;
/// Salt for the wall noise seed
const WALL_SALT: u64 = 2;

/// Ceiling/floor/center samples for `[x_start, x_start + len)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainWindow {
    pub x_start: i32,
    pub ceiling: Vec<f32>,
    pub floor: Vec<f32>,
    pub center: Vec<f32>,
}

impl TerrainWindow {
    /// Empty window with room for `capacity` columns
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x_start: 0,
            ceiling: Vec::with_capacity(capacity),
            floor: Vec::with_capacity(capacity),
            center: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.floor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_empty()
    }

    /// One past the last covered x coordinate
    pub fn x_end(&self) -> i32 {
        self.x_start + self.len() as i32
    }

    /// Column at absolute x, if covered
    pub fn column(&self, x: i32) -> Option<TerrainColumn> {
        let i = usize::try_from(x - self.x_start).ok()?;
        Some(TerrainColumn {
            ceiling: *self.ceiling.get(i)?,
            floor: *self.floor.get(i)?,
            center: *self.center.get(i)?,
        })
    }

    /// Resize all three curves, keeping the allocations
    fn reset(&mut self, x_start: i32, len: usize) {
        self.x_start = x_start;
        self.ceiling.resize(len, 0.0);
        self.floor.resize(len, 0.0);
        self.center.resize(len, 0.0);
    }

    fn set(&mut self, i: usize, column: TerrainColumn) {
        self.ceiling[i] = column.ceiling;
        self.floor[i] = column.floor;
        self.center[i] = column.center;
    }
}

/// A single vertical slice of the cave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainColumn {
    pub ceiling: f32,
    pub floor: f32,
    pub center: f32,
}

/// Anything that can fill a terrain window
pub trait TerrainSource {
    /// Overwrite `window` with columns `x_start..x_end`
    fn fill_window(&self, window: &mut TerrainWindow, x_start: i32, x_end: i32);
}

/// Noise-driven cave generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGenerator {
    center_noise: NoiseField,
    wall_noise: NoiseField,
    difficulty: DifficultyCurve,
    tuning: TerrainTuning,
}

impl TerrainGenerator {
    pub fn new(seed: u64, tuning: TerrainTuning) -> Self {
        Self {
            center_noise: NoiseField::new(derive_seed(seed, CENTER_SALT)),
            wall_noise: NoiseField::new(derive_seed(seed, WALL_SALT)),
            difficulty: DifficultyCurve::new(tuning.ramp_distance),
            tuning,
        }
    }

    pub fn tuning(&self) -> &TerrainTuning {
        &self.tuning
    }

    pub fn difficulty(&self) -> &DifficultyCurve {
        &self.difficulty
    }

    /// Whether a ceiling value is the open-water marker rather than rock
    #[inline]
    pub fn is_open_sky(&self, ceiling: f32) -> bool {
        ceiling == self.tuning.open_sky_sentinel
    }

    /// Fill `window` for `[x_start, x_end)`
    pub fn generate(&self, window: &mut TerrainWindow, x_start: i32, x_end: i32) {
        assert!(
            x_end >= x_start,
            "terrain window ends before it starts ({x_start}..{x_end})"
        );
        let len = (x_end - x_start) as usize;
        window.reset(x_start, len);
        for i in 0..len {
            window.set(i, self.sample(x_start + i as i32));
        }
    }

    /// Freshly allocated window for `[x_start, x_end)`
    pub fn window(&self, x_start: i32, x_end: i32) -> TerrainWindow {
        let capacity = x_end.saturating_sub(x_start).max(0) as usize;
        let mut window = TerrainWindow::with_capacity(capacity);
        self.generate(&mut window, x_start, x_end);
        window
    }

    /// Compute one column of cave at absolute x
    pub fn sample(&self, x: i32) -> TerrainColumn {
        let t = &self.tuning;
        let x = x as f32;
        let difficulty = self.difficulty.at(x);

        let baseline = x / t.distance_per_depth;
        let gap = t.min_gap + t.max_extra_gap * (1.0 - difficulty);

        let center_jaggedness =
            t.max_center_jaggedness * difficulty.powf(t.center_jaggedness_exponent);
        let center_wavelength = t.center_wavelength + difficulty * t.center_wavelength_growth;
        let center = baseline
            + center_jaggedness
                * self
                    .center_noise
                    .sample(x / center_wavelength, baseline / center_wavelength);

        // Capped so the walls wobble but never fold back over each other
        let wall_jaggedness = (gap * difficulty).min(t.max_wall_jaggedness);
        let wall_wavelength = t.wall_wavelength + difficulty * t.wall_wavelength_growth;

        let roof = center - gap / 2.0;
        let mut ceiling = roof
            + wall_jaggedness
                * self
                    .wall_noise
                    .sample(x / wall_wavelength, roof / wall_wavelength);
        if ceiling < 0.0 {
            ceiling = t.open_sky_sentinel;
        }

        let bed = center + gap / 2.0;
        let floor = bed
            + wall_jaggedness
                * self
                    .wall_noise
                    .sample(x / wall_wavelength, bed / wall_wavelength);

        TerrainColumn {
            ceiling,
            floor,
            center,
        }
    }
}

impl TerrainSource for TerrainGenerator {
    fn fill_window(&self, window: &mut TerrainWindow, x_start: i32, x_end: i32) {
        self.generate(window, x_start, x_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> TerrainGenerator {
        TerrainGenerator::new(seed, TerrainTuning::default())
    }

    #[test]
    fn test_generate_is_deterministic() {
        let gen_a = generator(48);
        let gen_b = generator(48);
        let a = gen_a.window(-200, 3000);
        let b = gen_b.window(-200, 3000);
        assert_eq!(a.len(), 3200);
        for i in 0..a.len() {
            assert_eq!(a.ceiling[i].to_bits(), b.ceiling[i].to_bits());
            assert_eq!(a.floor[i].to_bits(), b.floor[i].to_bits());
            assert_eq!(a.center[i].to_bits(), b.center[i].to_bits());
        }
    }

    #[test]
    fn test_regenerating_same_window_is_identical() {
        let generator = generator(3);
        let first = generator.window(10_000, 10_500);
        let mut reused = generator.window(0, 2000);
        generator.generate(&mut reused, 10_000, 10_500);
        assert_eq!(first, reused);
    }

    #[test]
    fn test_ceiling_above_floor_everywhere() {
        let generator = generator(12345);
        for start in [-50_000, -1000, 0, 4000, 20_000, 250_000] {
            let window = generator.window(start, start + 2000);
            for i in 0..window.len() {
                let ceiling = window.ceiling[i];
                assert!(
                    generator.is_open_sky(ceiling) || ceiling < window.floor[i],
                    "x={} ceiling={} floor={}",
                    start + i as i32,
                    ceiling,
                    window.floor[i]
                );
            }
        }
    }

    #[test]
    fn test_no_rock_above_surface() {
        let generator = generator(9);
        let window = generator.window(-500, 3000);
        for &ceiling in &window.ceiling {
            assert!(ceiling >= 0.0 || generator.is_open_sky(ceiling));
        }
        // The cave mouth near the origin is open to the sky
        assert!(generator.is_open_sky(window.column(0).unwrap().ceiling));
    }

    #[test]
    fn test_cave_sinks_and_narrows_with_distance() {
        let generator = generator(77);
        let near = generator.window(0, 200);
        let far = generator.window(60_000, 60_200);
        let avg = |v: &[f32]| v.iter().sum::<f32>() / v.len() as f32;
        assert!(avg(&far.center) > avg(&near.center) + 10_000.0);
        let gap = |w: &TerrainWindow| {
            let mut total = 0.0;
            for i in 0..w.len() {
                total += w.floor[i] - w.center[i];
            }
            total / w.len() as f32
        };
        assert!(gap(&far) < gap(&near));
    }

    #[test]
    fn test_window_column_lookup() {
        let generator = generator(5);
        let window = generator.window(100, 140);
        assert_eq!(window.x_end(), 140);
        assert_eq!(window.column(120), Some(generator.sample(120)));
        assert_eq!(window.column(99), None);
        assert_eq!(window.column(140), None);
    }

    #[test]
    fn test_empty_window() {
        let window = generator(1).window(10, 10);
        assert!(window.is_empty());
    }

    #[test]
    #[should_panic(expected = "ends before it starts")]
    fn test_reversed_window_panics() {
        generator(1).window(10, 0);
    }
}
