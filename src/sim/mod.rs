//! Simulation core
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (same seed + same inputs = same run)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod fruit;
pub mod particle;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;
pub mod trail;
pub mod view;

pub use fruit::{FruitConfig, FruitEntity, FruitKind, FruitShape};
pub use particle::{ParticleEntity, explosion};
pub use spawn::{FruitSelection, Spawner, apex_velocity, horizontal_velocity, spawn_wave};
pub use state::{GameEvent, GamePhase, GameState, Session};
pub use store::{EntityId, EntityRef, EntityStore, Membership};
pub use tick::{TickInput, TickReport, tick};
pub use trail::{TrailBuffer, blade_color};
pub use view::{Frame, FruitView, ParticleView};
