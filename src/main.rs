//! Fruit Slicer entry point
//!
//! The browser build is driven from JS through `fruit_slicer::web`. The
//! native binary runs a headless demo: a scripted hand sweeps back and
//! forth across the screen while waves fly.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Slicer (native) starting...");
    log::info!("Native mode is a headless demo - run the web build for the full game");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Ignoring tuning file {path}: {e}");
                fruit_slicer::Tuning::default()
            }
        },
        None => fruit_slicer::Tuning::default(),
    };

    run_demo(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<fruit_slicer::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(fruit_slicer::Tuning::from_json(&json)?)
}

/// Simulated seconds the demo runs for
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f32 = 30.0;

#[cfg(not(target_arch = "wasm32"))]
fn run_demo(tuning: fruit_slicer::Tuning) {
    use fruit_slicer::gesture::{CaptureSession, Gesture, HandSample, ScriptedSource};
    use fruit_slicer::sim::{GameEvent, GameState, TickInput, tick};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;
    let frames = (DEMO_SECONDS / DT) as usize;

    // Figure-eight sweep over the apex band; the hand drops out every few seconds
    let script = (0..frames).map(|i| {
        let t = i as f32 * DT;
        if (t % 5.0) > 4.5 {
            return HandSample::absent();
        }
        let pos = Vec3::new((t * 1.3).sin() * 8.0, 2.0 + (t * 2.6).sin() * 3.0, 0.0);
        HandSample::new(pos, Gesture::Pointing)
    });
    let mut session = CaptureSession::open(ScriptedSource::new(script));

    let seed = 0x5eed_f00d;
    let mut state = match GameState::with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning, using defaults: {e}");
            GameState::new(seed)
        }
    };
    state.start();

    let mut sliced = 0usize;
    let mut missed = 0usize;
    for frame in 0..frames {
        let input = TickInput::from(session.sample());
        let report = tick(&mut state, &input, DT);

        for event in &report.events {
            match event {
                GameEvent::FruitSliced { kind, points, .. } => {
                    sliced += 1;
                    log::info!("Sliced {} (+{points}) -> {}", kind.as_str(), state.score());
                }
                GameEvent::FruitMissed { .. } => missed += 1,
                GameEvent::GameOver { score } => {
                    log::info!("Bomb! Final score {score} at frame {frame}");
                }
                _ => log::debug!("{:?}", event),
            }
        }
        if report.membership_changed {
            let membership = state.membership();
            log::debug!(
                "Membership gen {}: {} fruits, {} particles",
                membership.generation,
                membership.fruits.len(),
                membership.particles.len()
            );
        }
        if !state.session.is_playing() {
            break;
        }
    }

    if let Err(e) = session.close() {
        log::warn!("Gesture source teardown failed: {e}");
    }

    println!(
        "Demo finished: phase={} score={} sliced={} missed={}",
        state.phase().as_str(),
        state.score(),
        sliced,
        missed
    );
}
