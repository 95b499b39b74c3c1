//! End-to-end behavior through the public API

use abyssal::sim::{
    BubbleField, EndRequest, Footprint, GameEvent, GamePhase, GameState, TerrainGenerator,
    TerrainSource, TerrainWindow, TickInput, VehicleInput, VehiclePhase, VehicleSimulator,
    resolve_window, tick,
};
use abyssal::tuning::{CollisionTuning, TerrainTuning, VehicleTuning};
use glam::Vec2;
use proptest::prelude::*;

/// Cave with constant ceiling and floor heights
struct FlatCave {
    ceiling: f32,
    floor: f32,
}

impl TerrainSource for FlatCave {
    fn fill_window(&self, window: &mut TerrainWindow, x_start: i32, x_end: i32) {
        let len = (x_end - x_start) as usize;
        window.x_start = x_start;
        window.ceiling = vec![self.ceiling; len];
        window.floor = vec![self.floor; len];
        window.center = vec![(self.ceiling + self.floor) / 2.0; len];
    }
}

const DEEP_CAVE: FlatCave = FlatCave {
    ceiling: -4000.0,
    floor: 50_000.0,
};

fn submarine(position: Vec2, tuning: VehicleTuning) -> VehicleSimulator {
    VehicleSimulator::new(position, tuning, CollisionTuning::default(), 48)
}

fn run(sim: &mut VehicleSimulator, input: VehicleInput, dt: f32) -> Vec<GameEvent> {
    let mut bubbles = BubbleField::new(1);
    let mut events = Vec::new();
    sim.tick(&input, &DEEP_CAVE, &mut bubbles, &mut events, dt);
    events
}

#[test]
fn surface_vehicle_sinks_under_gravity() {
    let mut sim = submarine(Vec2::ZERO, VehicleTuning::default());
    run(&mut sim, VehicleInput::default(), 1.0);
    assert!(sim.state().velocity.y > 0.0);
    assert!(sim.state().position.y > 0.0);
}

#[test]
fn floor_overlap_of_ten_yields_upward_correction_of_ten() {
    let hull = Footprint::new(32, 16.0);
    let y = 400.0;
    // Every column overlaps by 10/32, totalling 10
    let floor: Vec<f32> = (0..32).map(|i| y + hull.offset(i) - 10.0 / 32.0).collect();
    let window = TerrainWindow {
        x_start: 0,
        ceiling: vec![-4000.0; 32],
        center: floor.iter().map(|f| f - 200.0).collect(),
        floor,
    };
    let result = resolve_window(&window, Vec2::new(16.0, y), hull);
    assert!((result.correction.y + 10.0).abs() < 1e-3);
    let magnitude = result.correction.x.powi(2) + result.correction.y.powi(2);
    assert!((result.impact_severity - magnitude).abs() < 1e-3);
}

#[test]
fn drowning_onset_is_signalled_once() {
    let tuning = VehicleTuning {
        initial_air: 1.0,
        ..Default::default()
    };
    let mut sim = submarine(Vec2::new(0.0, 300.0), tuning);
    let mut onsets = 0;
    let mut drowned_at = None;
    for i in 0..20 {
        let events = run(&mut sim, VehicleInput::default(), 0.25);
        let count = events
            .iter()
            .filter(|e| matches!(e, GameEvent::DrowningOnset))
            .count();
        if count > 0 {
            drowned_at = Some(i);
        }
        onsets += count;
    }
    assert_eq!(onsets, 1);
    // 1.0 s of air at 0.25 s per tick reaches exactly zero on the fourth tick
    assert_eq!(drowned_at, Some(3));
    assert_eq!(sim.phase(), VehiclePhase::Drowning);
}

#[test]
fn refused_exit_warning_decays() {
    let mut state = GameState::new(48);
    assert!(state.vehicle_state().position.y > 16.0);

    assert_eq!(state.request_end(), EndRequest::Refused);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.vehicle().phase(), VehiclePhase::Normal);
    assert!(state.vehicle_state().quit_warning > 0.0);

    for _ in 0..6 {
        tick(&mut state, &TickInput::default(), 0.5);
    }
    assert_eq!(state.vehicle_state().quit_warning, 0.0);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn air_decays_by_leak_adjusted_rate() {
    let tuning = VehicleTuning::default();
    let mut sim = submarine(Vec2::new(0.0, 1000.0), tuning.clone());
    let dt = 0.05;
    for _ in 0..100 {
        let before = sim.state().air;
        let damage = sim.state().damage;
        run(&mut sim, VehicleInput::default(), dt);
        let leak = 1.0 + tuning.leak_at_max_damage * damage / 100.0;
        let expected = dt * tuning.air_loss_rate * leak;
        let drained = before - sim.state().air;
        assert!(drained > 0.0);
        assert!((drained - expected).abs() < 1e-3);
    }
}

#[test]
fn whole_run_is_reproducible() {
    let script = |t: u64| TickInput {
        throttle: 1.0,
        ballast: if t % 200 < 100 { -0.5 } else { 0.5 },
        contemplate: t % 500 > 450,
        ..Default::default()
    };
    let mut a = GameState::new(2024);
    let mut b = GameState::new(2024);
    for t in 0..2000 {
        tick(&mut a, &script(t), 1.0 / 60.0);
        tick(&mut b, &script(t), 1.0 / 60.0);
    }
    assert_eq!(a.vehicle_state(), b.vehicle_state());
    assert_eq!(a.drain_events(), b.drain_events());
    assert_eq!(a.view(), b.view());
}

#[test]
fn long_frames_stay_bounded() {
    let mut state = GameState::new(11);
    let input = TickInput {
        throttle: 1.0,
        ballast: 1.0,
        ..Default::default()
    };
    for _ in 0..2000 {
        tick(&mut state, &input, abyssal::consts::MAX_DT);
        let snapshot = state.vehicle_state();
        assert!(snapshot.position.is_finite());
        assert!(snapshot.velocity.is_finite());
        assert!((-1.0..=1.0).contains(&snapshot.buoyancy));
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
}

#[test]
fn sessions_refuse_unstable_handling() {
    let mut tuning = abyssal::Tuning::default();
    tuning.vehicle.drag = 20.0;
    assert!(GameState::with_tuning(1, tuning).is_err());

    let mut tuning = abyssal::Tuning::default();
    tuning.vehicle.quit_warning_duration = -3.0;
    assert!(GameState::with_tuning(1, tuning).is_err());
}

proptest! {
    #[test]
    fn windows_keep_ceiling_above_floor(seed in any::<u64>(), start in -200_000i32..200_000) {
        let generator = TerrainGenerator::new(seed, TerrainTuning::default());
        let window = generator.window(start, start + 256);
        prop_assert_eq!(window.len(), 256);
        for i in 0..window.len() {
            prop_assert!(
                generator.is_open_sky(window.ceiling[i]) || window.ceiling[i] < window.floor[i]
            );
        }
    }
}
