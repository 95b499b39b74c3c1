//! Abyssal headless runner
//!
//! Drives a session with a simple autopilot and logs what happens. Useful for
//! checking a tuning file without a renderer:
//!
//! ```text
//! RUST_LOG=debug abyssal [seed] [seconds] [tuning.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
use abyssal::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use abyssal::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use abyssal::{BestScore, Tuning};

#[cfg(not(target_arch = "wasm32"))]
const BEST_SCORE_FILE: &str = "abyssal-best.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(48);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    let mut state = match GameState::with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(2);
        }
    };

    let mut crashes = 0u32;
    let ticks = (seconds / SIM_DT) as u64;
    for _ in 0..ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::Crash { severity } => {
                    crashes += 1;
                    log::debug!("crash ({severity:.0})");
                }
                GameEvent::ContemplationMilestone { count } => {
                    log::info!("contemplation milestone {count}");
                }
                other => log::debug!("{other:?}"),
            }
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let vehicle = state.vehicle();
    let snapshot = vehicle.state();
    println!(
        "seed {seed}: {:.1}s, depth {:.1} fathoms, {} air, damage {:.2}, {crashes} crashes, \
         contemplation {:.1}",
        state.elapsed,
        vehicle.depth_fathoms(),
        vehicle.air_clock(),
        snapshot.damage,
        snapshot.contemplation,
    );

    if let Some(score) = state.final_score() {
        let mut best = BestScore::load(BEST_SCORE_FILE);
        if best.record(score) {
            if let Err(err) = best.save(BEST_SCORE_FILE) {
                log::warn!("Could not save best score: {err}");
            }
        }
        println!("final score {score} (best {})", best.score);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The headless runner is native only; embedders drive `sim::tick` themselves
}

/// Follow the cave's center line forward, stopping to contemplate now and then
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState) -> TickInput {
    let vehicle = state.vehicle();
    let snapshot = vehicle.state();
    let ahead = snapshot.position.x as i32 + 64;
    let target = state.terrain().sample(ahead).center;
    let error = snapshot.position.y - target;

    // Five seconds of contemplation every thirty
    let contemplate = state.elapsed % 30.0 > 25.0;
    // Head home when air runs low
    let surfacing = vehicle.air_fraction() < 0.15;

    let ballast = if surfacing {
        1.0
    } else {
        (error / 50.0).clamp(-1.0, 1.0) - snapshot.buoyancy * 0.5
    };

    TickInput {
        throttle: if surfacing { 0.0 } else { 1.0 },
        ballast,
        contemplate: contemplate && !surfacing,
        quit: surfacing && vehicle.is_surfaced(),
        pause: false,
    }
}
