//! Wave spawning
//!
//! Fruits launch from below the bottom edge on ballistic arcs aimed so the
//! apex lands inside a band above screen center.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fruit::{FruitEntity, FruitKind};
use super::store::{EntityId, EntityStore};
use crate::Viewport;
use crate::consts::*;
use crate::tuning::Tuning;

/// Which fruit the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FruitSelection {
    /// Any edible kind, with a chance of bombs
    #[default]
    Random,
    /// Always this kind, never re-rolled to a bomb
    Only(FruitKind),
}

impl FruitSelection {
    /// "random" or a fruit name (case-insensitive). Anything else falls
    /// back to random with a warning.
    pub fn from_name(name: &str) -> Self {
        if let Some(kind) = FruitKind::from_str(name) {
            return FruitSelection::Only(kind);
        }
        if !name.eq_ignore_ascii_case("random") {
            log::warn!("Unknown fruit '{}', using random", name);
        }
        FruitSelection::Random
    }
}

/// Uniform sample in [lo, hi], collapsing to `lo` on an empty range
pub(crate) fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Wave timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Seconds since the last wave
    timer: f32,
    /// Seconds until the next wave is due
    interval: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(INITIAL_SPAWN_DELAY)
    }
}

impl Spawner {
    pub fn new(initial_delay: f32) -> Self {
        Self {
            timer: 0.0,
            interval: initial_delay,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Accumulate time. Returns true when a wave is due, after which the
    /// timer restarts with a freshly drawn interval.
    pub fn advance<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning, dt: f32) -> bool {
        self.timer += dt;
        if self.timer <= self.interval {
            return false;
        }
        self.timer = 0.0;
        self.interval = uniform(rng, tuning.spawn_interval_min, tuning.spawn_interval_max);
        true
    }
}

/// Initial vertical speed that peaks exactly at `apex_y` under `gravity`
///
/// From `0 = v² + 2·g·Δy`.
pub fn apex_velocity(gravity: f32, start_y: f32, apex_y: f32) -> f32 {
    let rise = (apex_y - start_y).max(0.0);
    (-2.0 * gravity * rise).sqrt()
}

/// Horizontal speed toward `target_x`, squeezed by `FLIGHT_TIME_FACTOR`
/// so arrivals overshoot a little
pub fn horizontal_velocity(gravity: f32, start_x: f32, target_x: f32, vy: f32) -> f32 {
    let flight_time = 2.0 * vy / gravity.abs();
    if flight_time <= f32::EPSILON {
        return 0.0;
    }
    (target_x - start_x) / (flight_time * FLIGHT_TIME_FACTOR)
}

/// Pick the kind for one fruit
pub fn choose_kind<R: Rng>(rng: &mut R, selection: FruitSelection, bomb_probability: f64) -> FruitKind {
    match selection {
        FruitSelection::Only(kind) => kind,
        FruitSelection::Random => {
            let kind = FruitKind::EDIBLE[rng.random_range(0..FruitKind::EDIBLE.len())];
            if rng.random_bool(bomb_probability) {
                FruitKind::Bomb
            } else {
                kind
            }
        }
    }
}

/// Build one fruit with a launch that reaches the apex band
pub fn launch_fruit<R: Rng>(
    rng: &mut R,
    id: EntityId,
    kind: FruitKind,
    viewport: Viewport,
    gravity: f32,
    now: f32,
) -> FruitEntity {
    let half_w = viewport.half_width();
    let x = uniform(rng, -half_w + SPAWN_MARGIN_X, half_w - SPAWN_MARGIN_X);
    let start = Vec3::new(x, viewport.bottom() - SPAWN_DEPTH, 0.0);

    let apex_y = uniform(
        rng,
        viewport.height * APEX_MIN_FRACTION,
        viewport.height * APEX_MAX_FRACTION,
    );
    let vy = apex_velocity(gravity, start.y, apex_y);

    let target_x = uniform(rng, -viewport.width / 4.0, viewport.width / 4.0);
    let vx = horizontal_velocity(gravity, x, target_x, vy);

    let spin = Vec3::new(
        uniform(rng, -MAX_SPIN, MAX_SPIN),
        uniform(rng, -MAX_SPIN, MAX_SPIN),
        uniform(rng, -MAX_SPIN, MAX_SPIN),
    );

    FruitEntity::new(id, kind, start, Vec3::new(vx, vy, 0.0), now).with_spin(spin)
}

/// Spawn one wave into the store, respecting the live fruit cap
///
/// Returns the ids of the new fruits. The store's dirty flag records the
/// membership change for the caller to publish.
pub fn spawn_wave<R: Rng>(
    store: &mut EntityStore,
    rng: &mut R,
    tuning: &Tuning,
    viewport: Viewport,
    selection: FruitSelection,
    now: f32,
) -> Vec<EntityId> {
    let rolled = rng.random_range(tuning.wave_min..=tuning.wave_max) as usize;
    let count = match tuning.max_fruits {
        Some(cap) => rolled.min(cap.saturating_sub(store.fruit_count())),
        None => rolled,
    };
    if count < rolled {
        log::debug!("Wave trimmed from {rolled} to {count} (fruit cap)");
    }

    let mut spawned = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = choose_kind(rng, selection, tuning.bomb_probability);
        let Some(id) = store.next_entity_id() else {
            break;
        };
        let fruit = launch_fruit(rng, id, kind, viewport, tuning.gravity, now);
        log::debug!(
            "Spawned {} {id} at x={:.2} v=({:.2}, {:.2})",
            kind.as_str(),
            fruit.position.x,
            fruit.velocity.x,
            fruit.velocity.y
        );
        if store.insert_fruit(fruit) {
            spawned.push(id);
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Highest point reached by stepping the same integrator the tick uses
    fn simulated_apex(start_y: f32, vy: f32, gravity: f32, dt: f64) -> f64 {
        let (mut y, mut v, mut peak) = (start_y as f64, vy as f64, start_y as f64);
        let gravity = gravity as f64;
        while v > 0.0 {
            y += v * dt;
            v += gravity * dt;
            peak = peak.max(y);
        }
        peak
    }

    #[test]
    fn test_apex_velocity_reaches_target() {
        let vy = apex_velocity(GRAVITY, -9.5, 3.0);
        // Closed form: y0 + v² / (2|g|)
        let peak = -9.5 + vy * vy / (2.0 * GRAVITY.abs());
        assert!((peak - 3.0).abs() < 1e-4);

        // Stepped integration converges on it
        let stepped = simulated_apex(-9.5, vy, GRAVITY, 1e-4);
        assert!((stepped - 3.0).abs() < 0.01, "stepped apex {stepped}");
    }

    #[test]
    fn test_horizontal_velocity() {
        let vy = 15.0;
        // flight time 2.0s, squeezed to 1.4s
        let vx = horizontal_velocity(GRAVITY, -5.0, 2.0, vy);
        assert!((vx - 5.0).abs() < 1e-5);
        assert_eq!(horizontal_velocity(GRAVITY, 0.0, 3.0, 0.0), 0.0);
    }

    #[test]
    fn test_spawner_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning::default();
        let mut spawner = Spawner::default();

        assert!(!spawner.advance(&mut rng, &tuning, 0.25));
        assert!(!spawner.advance(&mut rng, &tuning, 0.25)); // exactly 0.5 is not past due
        assert!(spawner.advance(&mut rng, &tuning, 0.01));
        assert_eq!(spawner.timer(), 0.0);
        assert!((1.5..=3.0).contains(&spawner.interval()));
    }

    #[test]
    fn test_choose_kind() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(
                choose_kind(&mut rng, FruitSelection::Only(FruitKind::Banana), 1.0),
                FruitKind::Banana
            );
            assert_eq!(choose_kind(&mut rng, FruitSelection::Random, 1.0), FruitKind::Bomb);
            assert!(!choose_kind(&mut rng, FruitSelection::Random, 0.0).is_bomb());
        }
    }

    #[test]
    fn test_selection_from_name() {
        assert_eq!(FruitSelection::from_name("Banana"), FruitSelection::Only(FruitKind::Banana));
        assert_eq!(FruitSelection::from_name("RANDOM"), FruitSelection::Random);
        assert_eq!(FruitSelection::from_name("kiwi"), FruitSelection::Random);
    }

    #[test]
    fn test_random_kind_distribution() {
        let mut rng = Pcg32::seed_from_u64(17);
        let draws = 12_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            let slot = match choose_kind(&mut rng, FruitSelection::Random, BOMB_PROBABILITY) {
                FruitKind::Apple => 0,
                FruitKind::Banana => 1,
                FruitKind::Watermelon => 2,
                FruitKind::Bomb => 3,
            };
            counts[slot] += 1;
        }

        let bomb_share = counts[3] as f64 / draws as f64;
        assert!((bomb_share - 0.15).abs() < 0.02, "bomb share {bomb_share}");

        let edible = (draws - counts[3]) as f64;
        for count in &counts[..3] {
            let share = *count as f64 / edible;
            assert!((share - 1.0 / 3.0).abs() < 0.03, "edible share {share} of {counts:?}");
        }
    }

    #[test]
    fn test_wave_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut store = EntityStore::new();
        let tuning = Tuning {
            max_fruits: Some(4),
            ..Tuning::default()
        };

        for _ in 0..10 {
            let ids = spawn_wave(&mut store, &mut rng, &tuning, Viewport::default(), FruitSelection::Random, 0.0);
            assert!(ids.len() <= 3);
        }
        assert_eq!(store.fruit_count(), 4);
        assert!(store.take_dirty());
    }

    #[test]
    fn test_launch_start_and_apex_band() {
        let mut rng = Pcg32::seed_from_u64(9);
        let viewport = Viewport::new(24.0, 16.0);
        let mut store = EntityStore::new();
        for _ in 0..50 {
            let id = store.next_entity_id().unwrap();
            let fruit = launch_fruit(&mut rng, id, FruitKind::Apple, viewport, GRAVITY, 1.0);
            assert!(fruit.position.x.abs() <= 10.0);
            assert_eq!(fruit.position.y, -10.0);
            assert_eq!(fruit.position.z, 0.0);
            assert_eq!(fruit.velocity.z, 0.0);
            assert!(fruit.rotation_speed.abs().max_element() <= MAX_SPIN);
            assert_eq!(fruit.spawn_time, 1.0);

            let apex = fruit.position.y + fruit.velocity.y.powi(2) / (2.0 * GRAVITY.abs());
            assert!(apex >= 1.6 - 1e-3 && apex <= 6.4 + 1e-3, "apex {apex}");

            // Undo the squeezed flight time to recover the aim point
            let flight_time = 2.0 * fruit.velocity.y / GRAVITY.abs();
            let target = fruit.position.x + fruit.velocity.x * flight_time * FLIGHT_TIME_FACTOR;
            assert!(target.abs() <= 6.0 + 1e-3, "target {target}");
        }
    }

    #[test]
    fn test_narrow_viewport_does_not_panic() {
        let mut rng = Pcg32::seed_from_u64(11);
        let fruit = launch_fruit(&mut rng, EntityId(1), FruitKind::Apple, Viewport::new(2.0, 3.0), GRAVITY, 0.0);
        assert!(fruit.velocity.y > 0.0);
    }

    proptest! {
        #[test]
        fn apex_matches_target(start_y in -30.0f32..-1.0, apex in 0.0f32..20.0, g in -40.0f32..-1.0) {
            let vy = apex_velocity(g, start_y, apex);
            let peak = start_y + vy * vy / (2.0 * g.abs());
            prop_assert!((peak - apex).abs() < 1e-3 * (1.0 + apex - start_y));
        }
    }
}
