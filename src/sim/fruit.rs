//! Fruit kinds and the fruit entity

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::store::EntityId;

/// Fruit variants (bombs fly like fruit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Banana,
    Watermelon,
    Bomb,
}

/// Mesh family the renderer should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitShape {
    Sphere,
    Capsule,
    Icosahedron,
    Dodecahedron,
}

/// Static per-kind properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitConfig {
    pub radius: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub points: i64,
    pub shape: FruitShape,
}

const APPLE: FruitConfig = FruitConfig {
    radius: 0.8,
    color: 0xef4444,
    points: 10,
    shape: FruitShape::Sphere,
};

const BANANA: FruitConfig = FruitConfig {
    radius: 1.0,
    color: 0xeab308,
    points: 20,
    shape: FruitShape::Capsule,
};

const WATERMELON: FruitConfig = FruitConfig {
    radius: 1.2,
    color: 0x22c55e,
    points: 30,
    shape: FruitShape::Icosahedron,
};

// Bomb points are never awarded; a bomb slice ends the run instead
const BOMB: FruitConfig = FruitConfig {
    radius: 1.0,
    color: 0x1f2937,
    points: -50,
    shape: FruitShape::Dodecahedron,
};

impl FruitKind {
    /// Kinds eligible for random selection before the bomb re-roll
    pub const EDIBLE: [FruitKind; 3] = [FruitKind::Apple, FruitKind::Banana, FruitKind::Watermelon];

    pub fn config(self) -> &'static FruitConfig {
        match self {
            FruitKind::Apple => &APPLE,
            FruitKind::Banana => &BANANA,
            FruitKind::Watermelon => &WATERMELON,
            FruitKind::Bomb => &BOMB,
        }
    }

    pub fn is_bomb(self) -> bool {
        self == FruitKind::Bomb
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FruitKind::Apple => "Apple",
            FruitKind::Banana => "Banana",
            FruitKind::Watermelon => "Watermelon",
            FruitKind::Bomb => "Bomb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "apple" => Some(FruitKind::Apple),
            "banana" => Some(FruitKind::Banana),
            "watermelon" => Some(FruitKind::Watermelon),
            "bomb" => Some(FruitKind::Bomb),
            _ => None,
        }
    }
}

/// A flying fruit (or bomb)
///
/// `kind` and `radius` are fixed at creation; `sliced` only ever goes
/// from false to true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FruitEntity {
    id: EntityId,
    kind: FruitKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
    radius: f32,
    sliced: bool,
    /// Game clock (seconds) at spawn
    pub spawn_time: f32,
}

impl FruitEntity {
    pub fn new(id: EntityId, kind: FruitKind, position: Vec3, velocity: Vec3, spawn_time: f32) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            rotation: Vec3::ZERO,
            rotation_speed: Vec3::ZERO,
            radius: kind.config().radius,
            sliced: false,
            spawn_time,
        }
    }

    pub fn with_spin(mut self, rotation_speed: Vec3) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> FruitKind {
        self.kind
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn is_sliced(&self) -> bool {
        self.sliced
    }

    /// Mark as sliced. Returns false if it already was.
    pub fn slice(&mut self) -> bool {
        if self.sliced {
            return false;
        }
        self.sliced = true;
        true
    }

    /// Move with the current velocity, then apply gravity and spin
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.position += self.velocity * dt;
        self.velocity.y += gravity * dt;
        self.rotation += self.rotation_speed * dt;
    }

    /// Whether `point` is inside the hit-box (radius + margin)
    pub fn hit_by(&self, point: Vec3, margin: f32) -> bool {
        point.distance(self.position) < self.radius + margin
    }
}
