//! Fruit Slicer - a hand-tracked fruit slicing arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (spawning, physics, slicing, particles, trail)
//! - `gesture`: Hand sample types and the gesture source seam
//! - `tuning`: Data-driven game balance
//! - `web`: Browser host bindings (wasm32 only)

pub mod gesture;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use gesture::{CaptureError, CaptureSession, Gesture, GestureSource, HandSample};
pub use tuning::{Tuning, TuningError};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Gravitational acceleration (units/s², negative is down)
    pub const GRAVITY: f32 = -15.0;

    /// Delay before the very first wave
    pub const INITIAL_SPAWN_DELAY: f32 = 0.5;
    /// Randomized delay between waves (seconds)
    pub const SPAWN_INTERVAL_MIN: f32 = 1.5;
    pub const SPAWN_INTERVAL_MAX: f32 = 3.0;
    /// Fruits per wave
    pub const WAVE_MIN: u32 = 1;
    pub const WAVE_MAX: u32 = 3;
    /// Concurrent live fruit cap
    pub const MAX_FRUITS: usize = 10;
    /// Chance a random-mode fruit becomes a bomb
    pub const BOMB_PROBABILITY: f64 = 0.15;

    /// Horizontal keep-out at each side of the viewport for spawn positions
    pub const SPAWN_MARGIN_X: f32 = 2.0;
    /// Spawn height below the bottom edge
    pub const SPAWN_DEPTH: f32 = 2.0;
    /// Apex band as a fraction of viewport height above center
    pub const APEX_MIN_FRACTION: f32 = 0.1;
    pub const APEX_MAX_FRACTION: f32 = 0.4;
    /// Arrival-time squeeze applied to horizontal launch speed
    pub const FLIGHT_TIME_FACTOR: f32 = 0.7;
    /// Max spin per axis (rad/s)
    pub const MAX_SPIN: f32 = 2.0;
    /// Distance below the bottom edge at which a missed fruit is dropped
    pub const DESPAWN_MARGIN: f32 = 5.0;

    /// Extra hit-box reach added to a fruit's radius
    pub const SLICE_MARGIN: f32 = 1.0;

    /// Particles per explosion
    pub const EXPLOSION_PARTICLES: usize = 20;
    pub const PARTICLE_GRAVITY_SCALE: f32 = 0.5;
    /// Life lost per second
    pub const PARTICLE_FADE_RATE: f32 = 1.5;

    /// Hand trail length (blade)
    pub const TRAIL_MAX_LEN: usize = 12;

    /// Host-side clamp for a single frame delta
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Default visible area at z = 0
    pub const VIEWPORT_WIDTH: f32 = 20.0;
    pub const VIEWPORT_HEIGHT: f32 = 15.0;

    pub const WHITE: u32 = 0xffffff;
    pub const CYAN: u32 = 0x00ffff;
}

/// Visible world area at the gameplay plane (z = 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: consts::VIEWPORT_WIDTH,
            height: consts::VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// World y of the bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        -self.height / 2.0
    }

    /// Half of the width, the x extent on either side of center
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }
}
