//! Browser host bindings
//!
//! The page owns the camera, the hand tracker and the 3D scene. It feeds
//! hand samples in, calls `frame` once per animation frame, and re-reads
//! the id lists only when `frame` reports a membership change.

use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::consts::MAX_FRAME_DELTA;
use crate::gesture::{Gesture, HandSample, Landmark, SampleSlot, classify_landmarks};
use crate::sim::{EntityId, FruitSelection, GameState, TickInput, tick};
use crate::{Tuning, Viewport};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Fruit Slicer starting...");
}

/// Game instance held by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    hand: SampleSlot,
    /// Timestamp (ms) of the previous frame
    last_time: Option<f64>,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Self::from_state(GameState::new(seed))
    }

    /// Create with JSON tuning overrides
    pub fn with_tuning(json: &str) -> Result<WebGame, JsError> {
        let tuning = Tuning::from_json(json)?;
        let seed = js_sys::Date::now() as u64;
        Ok(Self::from_state(GameState::with_tuning(seed, tuning)?))
    }

    fn from_state(state: GameState) -> WebGame {
        WebGame {
            state,
            hand: SampleSlot::new(),
            last_time: None,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Visible world size at z = 0
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_viewport(Viewport::new(width, height));
    }

    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    /// "random" or a fruit name
    pub fn set_fruit(&mut self, name: &str) {
        let selection = FruitSelection::from_name(name);
        self.state.set_selection(selection);
    }

    /// Latest hand position in world units (gesture: 0 none, 1 palm, 2 fist, 3 point)
    pub fn set_hand(&mut self, x: f32, y: f32, z: f32, gesture: u8) {
        self.hand
            .publish(HandSample::new(Vec3::new(x, y, z), Gesture::from_code(gesture)));
    }

    /// Raw tracker landmarks as flat [x, y, z] triples
    pub fn set_landmarks(&mut self, flat: &[f32]) {
        let landmarks: Vec<Landmark> = flat
            .chunks_exact(3)
            .map(|c| Landmark { x: c[0], y: c[1], z: c[2] })
            .collect();
        match classify_landmarks(&landmarks) {
            Some(sample) => self.hand.publish(sample),
            None => self.hand.clear(),
        }
    }

    pub fn clear_hand(&mut self) {
        self.hand.clear();
    }

    /// Advance one animation frame. Returns true when fruit/particle ids changed.
    pub fn frame(&mut self, time: f64) -> bool {
        let dt = match self.last_time {
            Some(last) => ((time - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time);

        // Track frame times for FPS
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % 60;
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 && time > oldest_time {
            self.fps = (60000.0 / (time - oldest_time)).round() as u32;
        }

        let input = TickInput::from(self.hand.latest());
        let report = tick(&mut self.state, &input, dt.min(MAX_FRAME_DELTA));
        for event in &report.events {
            log::debug!("{:?}", event);
        }
        report.membership_changed
    }

    pub fn score(&self) -> f64 {
        self.state.score() as f64
    }

    pub fn phase(&self) -> String {
        self.state.phase().as_str().to_string()
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn fruit_ids(&self) -> Vec<u32> {
        self.state.store.all_fruit_ids().into_iter().map(|id| id.0).collect()
    }

    pub fn particle_ids(&self) -> Vec<u32> {
        self.state.store.all_particle_ids().into_iter().map(|id| id.0).collect()
    }

    /// [x, y, z, rx, ry, rz, radius, color, shape] or empty if gone
    pub fn fruit_data(&self, id: u32) -> Vec<f32> {
        match self.state.store.fruit(EntityId(id)) {
            Some(fruit) => {
                let config = fruit.kind().config();
                vec![
                    fruit.position.x,
                    fruit.position.y,
                    fruit.position.z,
                    fruit.rotation.x,
                    fruit.rotation.y,
                    fruit.rotation.z,
                    fruit.radius(),
                    config.color as f32,
                    config.shape as u8 as f32,
                ]
            }
            None => Vec::new(),
        }
    }

    /// [x, y, z, size, color, opacity] or empty if gone
    pub fn particle_data(&self, id: u32) -> Vec<f32> {
        match self.state.store.particle(EntityId(id)) {
            Some(p) => vec![
                p.position.x,
                p.position.y,
                p.position.z,
                p.size(),
                p.color() as f32,
                p.life.clamp(0.0, 1.0),
            ],
            None => Vec::new(),
        }
    }

    /// Flat [x, y, z] triples, oldest first
    pub fn trail_points(&self) -> Vec<f32> {
        self.state
            .trail_points()
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }

    pub fn blade_color(&self) -> u32 {
        crate::sim::blade_color(self.state.gesture)
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
