//! Explosion particles

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::store::EntityId;

/// A short-lived debris particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleEntity {
    id: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// 0xRRGGBB
    color: u32,
    size: f32,
    /// 1.0 at birth, removed once it reaches 0
    pub life: f32,
}

impl ParticleEntity {
    pub fn new(id: EntityId, position: Vec3, velocity: Vec3, color: u32, size: f32) -> Self {
        Self {
            id,
            position,
            velocity,
            color,
            size,
            life: 1.0,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn color(&self) -> u32 {
        self.color
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Move, fall, and fade. Returns false once the particle has expired.
    pub fn update(&mut self, gravity: f32, fade_rate: f32, dt: f32) -> bool {
        self.position += self.velocity * dt;
        self.velocity.y += gravity * dt;
        self.life -= dt * fade_rate;
        !self.is_dead()
    }
}

/// Spread of explosion velocities per axis
const BURST_XY: f32 = 5.0;
const BURST_Z: f32 = 2.0;
const SIZE_MIN: f32 = 0.1;
const SIZE_MAX: f32 = 0.4;

/// Build `count` particles bursting out of `position`
///
/// `next_id` hands out a fresh id per particle. The burst stops short if
/// it runs out of ids.
pub fn explosion<R: Rng>(
    rng: &mut R,
    position: Vec3,
    color: u32,
    count: usize,
    mut next_id: impl FnMut() -> Option<EntityId>,
) -> Vec<ParticleEntity> {
    (0..count)
        .map_while(|_| {
            let id = next_id()?;
            let velocity = Vec3::new(
                rng.random_range(-BURST_XY..=BURST_XY),
                rng.random_range(-BURST_XY..=BURST_XY),
                rng.random_range(-BURST_Z..=BURST_Z),
            );
            let size = rng.random_range(SIZE_MIN..=SIZE_MAX);
            Some(ParticleEntity::new(id, position, velocity, color, size))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_explosion_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut next = 100;
        let origin = Vec3::new(1.0, 2.0, 0.0);
        let burst = explosion(&mut rng, origin, 0xef4444, 20, || {
            next += 1;
            Some(EntityId(next))
        });

        assert_eq!(burst.len(), 20);
        for p in &burst {
            assert_eq!(p.position, origin);
            assert_eq!(p.color(), 0xef4444);
            assert_eq!(p.life, 1.0);
            assert!((SIZE_MIN..=SIZE_MAX).contains(&p.size()));
            assert!(p.velocity.x.abs() <= BURST_XY);
            assert!(p.velocity.y.abs() <= BURST_XY);
            assert!(p.velocity.z.abs() <= BURST_Z);
        }

        let mut ids: Vec<_> = burst.iter().map(|p| p.id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_explosion_stops_without_ids() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut left = 5u32;
        let burst = explosion(&mut rng, Vec3::ZERO, 0xffffff, 20, || {
            left = left.checked_sub(1)?;
            Some(EntityId(100 + left))
        });
        assert_eq!(burst.len(), 5);
    }

    #[test]
    fn test_particle_fades_out() {
        let mut p = ParticleEntity::new(EntityId(1), Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), 0xffffff, 0.2);
        let mut last = p.life;
        let mut alive = true;
        for _ in 0..20 {
            alive = p.update(-7.5, 1.5, 0.05);
            assert!(p.life < last);
            last = p.life;
            if !alive {
                break;
            }
        }
        // 1.0 / (1.5 * 0.05) = 13.3 steps
        assert!(!alive);
        assert!(p.is_dead());
    }
}
