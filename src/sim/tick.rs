//! Per-frame simulation tick
//!
//! Core game loop: trail, spawning, fruit physics, slicing, particles.
//! Runs synchronously once per rendered frame with a variable delta.

use glam::Vec3;

use super::particle::explosion;
use super::spawn::spawn_wave;
use super::state::{GameEvent, GameState};
use super::store::EntityId;
use crate::consts::WHITE;
use crate::gesture::{Gesture, HandSample};

/// Latest hand reading for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// `None` when no hand is tracked
    pub hand: Option<Vec3>,
    pub gesture: Gesture,
}

impl TickInput {
    pub fn hand(position: Vec3, gesture: Gesture) -> Self {
        Self {
            hand: Some(position),
            gesture,
        }
    }

    /// Position that can slice this frame, if any
    fn blade(&self) -> Option<Vec3> {
        self.hand.filter(|_| self.gesture.slices())
    }
}

impl From<HandSample> for TickInput {
    fn from(sample: HandSample) -> Self {
        Self {
            hand: sample.position,
            gesture: sample.gesture,
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Entities were added or removed; re-read `GameState::membership`
    pub membership_changed: bool,
    pub events: Vec<GameEvent>,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut report = TickReport::default();

    // Trail runs in every phase so the blade follows the hand in menus too
    state.trail.update(input.hand);
    state.gesture = input.gesture;
    state.clock += dt;

    if !state.session.is_playing() {
        report.membership_changed = state.store.take_dirty();
        return report;
    }

    // Spawning
    if state.spawner.advance(&mut state.rng, &state.tuning, dt) {
        let spawned = spawn_wave(
            &mut state.store,
            &mut state.rng,
            &state.tuning,
            state.viewport,
            state.session.selection(),
            state.clock,
        );
        report.events.push(GameEvent::WaveSpawned {
            count: spawned.len(),
        });
    }

    // Fruit physics and slicing. One pass, no early exit on a bomb: other
    // fruits hit in the same pass still score.
    let gravity = state.tuning.gravity;
    let margin = state.tuning.slice_margin;
    let floor = state.viewport.bottom() - state.tuning.despawn_margin;
    let blade = input.blade();

    let mut doomed: Vec<EntityId> = Vec::new();
    let mut bursts: Vec<(Vec3, u32)> = Vec::new();
    let mut bomb_hit = false;

    for fruit in state.store.fruits_mut() {
        fruit.integrate(gravity, dt);

        let fell = fruit.position.y < floor;
        let hit = !fruit.is_sliced() && blade.is_some_and(|pos| fruit.hit_by(pos, margin));

        if hit {
            fruit.slice();
            let kind = fruit.kind();
            if kind.is_bomb() {
                bomb_hit = true;
                bursts.push((fruit.position, WHITE));
                report.events.push(GameEvent::BombDetonated { id: fruit.id() });
            } else {
                let config = kind.config();
                state.session.add_score(config.points);
                bursts.push((fruit.position, config.color));
                report.events.push(GameEvent::FruitSliced {
                    id: fruit.id(),
                    kind,
                    points: config.points,
                });
            }
        } else if fell {
            report.events.push(GameEvent::FruitMissed { id: fruit.id() });
        }

        if hit || fell {
            doomed.push(fruit.id());
        }
    }

    for id in doomed {
        state.store.remove_fruit(id);
    }

    let count = state.tuning.explosion_particles;
    for (position, color) in bursts {
        let store = &mut state.store;
        let particles = explosion(&mut state.rng, position, color, count, || {
            store.next_entity_id()
        });
        for particle in particles {
            store.insert_particle(particle);
        }
    }

    if bomb_hit && state.session.game_over() {
        log::info!("Bomb sliced - game over with score {}", state.session.score());
        report.events.push(GameEvent::GameOver {
            score: state.session.score(),
        });
    }

    // Particles
    let particle_gravity = gravity * state.tuning.particle_gravity_scale;
    let fade = state.tuning.particle_fade_rate;
    let expired: Vec<EntityId> = state
        .store
        .particles_mut()
        .filter_map(|p| (!p.update(particle_gravity, fade, dt)).then(|| p.id()))
        .collect();
    for id in expired {
        state.store.remove_particle(id);
    }

    report.membership_changed = state.store.take_dirty();
    report
}
