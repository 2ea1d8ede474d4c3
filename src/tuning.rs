//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a host can
//! load overrides from JSON. Missing fields fall back to `consts`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("gravity must be negative (got {0})")]
    Gravity(f32),

    #[error("spawn interval range [{min}, {max}] is invalid")]
    SpawnInterval { min: f32, max: f32 },

    #[error("wave size range [{min}, {max}] is invalid")]
    WaveSize { min: u32, max: u32 },

    #[error("bomb probability {0} is outside [0, 1]")]
    BombProbability(f64),

    #[error("{0} must not be zero")]
    Zero(&'static str),

    #[error("{name} must be non-negative (got {value})")]
    Negative { name: &'static str, value: f32 },
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub initial_spawn_delay: f32,
    pub spawn_interval_min: f32,
    pub spawn_interval_max: f32,
    pub wave_min: u32,
    pub wave_max: u32,
    /// `None` leaves the live fruit count unbounded
    pub max_fruits: Option<usize>,
    pub bomb_probability: f64,
    pub slice_margin: f32,
    pub despawn_margin: f32,
    pub trail_max_len: usize,
    pub explosion_particles: usize,
    pub particle_gravity_scale: f32,
    pub particle_fade_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            initial_spawn_delay: INITIAL_SPAWN_DELAY,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            spawn_interval_max: SPAWN_INTERVAL_MAX,
            wave_min: WAVE_MIN,
            wave_max: WAVE_MAX,
            max_fruits: Some(MAX_FRUITS),
            bomb_probability: BOMB_PROBABILITY,
            slice_margin: SLICE_MARGIN,
            despawn_margin: DESPAWN_MARGIN,
            trail_max_len: TRAIL_MAX_LEN,
            explosion_particles: EXPLOSION_PARTICLES,
            particle_gravity_scale: PARTICLE_GRAVITY_SCALE,
            particle_fade_rate: PARTICLE_FADE_RATE,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (partial documents are fine)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.gravity < 0.0) {
            return Err(TuningError::Gravity(self.gravity));
        }
        if !(self.spawn_interval_min > 0.0) || self.spawn_interval_max < self.spawn_interval_min {
            return Err(TuningError::SpawnInterval {
                min: self.spawn_interval_min,
                max: self.spawn_interval_max,
            });
        }
        if self.wave_min == 0 || self.wave_max < self.wave_min {
            return Err(TuningError::WaveSize {
                min: self.wave_min,
                max: self.wave_max,
            });
        }
        if !(0.0..=1.0).contains(&self.bomb_probability) {
            return Err(TuningError::BombProbability(self.bomb_probability));
        }
        if self.trail_max_len == 0 {
            return Err(TuningError::Zero("trail_max_len"));
        }
        if self.max_fruits == Some(0) {
            return Err(TuningError::Zero("max_fruits"));
        }

        let non_negative = [
            ("initial_spawn_delay", self.initial_spawn_delay),
            ("slice_margin", self.slice_margin),
            ("despawn_margin", self.despawn_margin),
            ("particle_gravity_scale", self.particle_gravity_scale),
            ("particle_fade_rate", self.particle_fade_rate),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gravity, -15.0);
        assert_eq!(tuning.trail_max_len, 12);
        assert_eq!(tuning.max_fruits, Some(10));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": -9.8, "trail_max_len": 20 }"#).unwrap();
        assert_eq!(tuning.gravity, -9.8);
        assert_eq!(tuning.trail_max_len, 20);
        assert_eq!(tuning.spawn_interval_max, SPAWN_INTERVAL_MAX);
    }

    #[test]
    fn test_unbounded_fruits() {
        let tuning = Tuning::from_json(r#"{ "max_fruits": null }"#).unwrap();
        assert_eq!(tuning.max_fruits, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "gravity": 3.0 }"#),
            Err(TuningError::Gravity(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_interval_min": 4.0, "spawn_interval_max": 2.0 }"#),
            Err(TuningError::SpawnInterval { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "bomb_probability": 1.5 }"#),
            Err(TuningError::BombProbability(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "trail_max_len": 0 }"#),
            Err(TuningError::Zero("trail_max_len"))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "slice_margin": -1.0 }"#),
            Err(TuningError::Negative { name: "slice_margin", .. })
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
