//! Read-only snapshots for renderers
//!
//! Renderers never hold live entities. They get copies per frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::fruit::{FruitEntity, FruitKind, FruitShape};
use super::particle::ParticleEntity;
use super::store::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FruitView {
    pub id: EntityId,
    pub kind: FruitKind,
    pub shape: FruitShape,
    pub color: u32,
    pub radius: f32,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl From<&FruitEntity> for FruitView {
    fn from(fruit: &FruitEntity) -> Self {
        let config = fruit.kind().config();
        Self {
            id: fruit.id(),
            kind: fruit.kind(),
            shape: config.shape,
            color: config.color,
            radius: fruit.radius(),
            position: fruit.position,
            rotation: fruit.rotation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub id: EntityId,
    pub color: u32,
    pub size: f32,
    pub position: Vec3,
    /// Remaining life, clamped to [0, 1]
    pub opacity: f32,
}

impl From<&ParticleEntity> for ParticleView {
    fn from(particle: &ParticleEntity) -> Self {
        Self {
            id: particle.id(),
            color: particle.color(),
            size: particle.size(),
            position: particle.position,
            opacity: particle.life.clamp(0.0, 1.0),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub fruits: Vec<FruitView>,
    pub particles: Vec<ParticleView>,
    /// Oldest first; hide the blade below two points
    pub trail: Vec<Vec3>,
    pub blade_color: u32,
}

impl Frame {
    pub fn blade_visible(&self) -> bool {
        self.trail.len() >= 2
    }
}
