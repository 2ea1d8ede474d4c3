//! Entity store
//!
//! Owns every live fruit and particle. Structural changes (insert/remove)
//! bump a generation counter and raise a dirty flag; per-frame position
//! updates do not. Renderers re-enumerate ids only when membership changes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::fruit::FruitEntity;
use super::particle::ParticleEntity;

/// Unique entity id. Ids are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Borrowed view of any entity
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Fruit(&'a FruitEntity),
    Particle(&'a ParticleEntity),
}

/// Current id sets, handed to the renderer on a membership change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub generation: u64,
    pub fruits: Vec<EntityId>,
    pub particles: Vec<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    fruits: BTreeMap<EntityId, FruitEntity>,
    particles: BTreeMap<EntityId, ParticleEntity>,
    next_id: u32,
    generation: u64,
    dirty: bool,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            fruits: BTreeMap::new(),
            particles: BTreeMap::new(),
            next_id: 1,
            generation: 0,
            dirty: false,
        }
    }

    /// Allocate a new entity id, or `None` once the id space is used up
    pub fn next_entity_id(&mut self) -> Option<EntityId> {
        let Some(next) = self.next_id.checked_add(1) else {
            log::warn!("Entity ids exhausted, nothing more can spawn");
            return None;
        };
        let id = EntityId(self.next_id);
        self.next_id = next;
        Some(id)
    }

    fn touch(&mut self) {
        self.generation += 1;
        self.dirty = true;
    }

    /// Insert a fruit. Ignored if the id is already live or was handed out
    /// by someone else than this store.
    pub fn insert_fruit(&mut self, fruit: FruitEntity) -> bool {
        let id = fruit.id();
        if !self.is_allocated(id) || self.contains(id) {
            log::warn!("Rejected fruit with stale or duplicate id {id}");
            return false;
        }
        self.fruits.insert(id, fruit);
        self.touch();
        true
    }

    pub fn insert_particle(&mut self, particle: ParticleEntity) -> bool {
        let id = particle.id();
        if !self.is_allocated(id) || self.contains(id) {
            log::warn!("Rejected particle with stale or duplicate id {id}");
            return false;
        }
        self.particles.insert(id, particle);
        self.touch();
        true
    }

    pub fn remove_fruit(&mut self, id: EntityId) -> Option<FruitEntity> {
        let removed = self.fruits.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn remove_particle(&mut self, id: EntityId) -> Option<ParticleEntity> {
        let removed = self.particles.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Drop every entity (id allocation keeps counting up)
    pub fn clear(&mut self) {
        if self.fruits.is_empty() && self.particles.is_empty() {
            return;
        }
        self.fruits.clear();
        self.particles.clear();
        self.touch();
    }

    pub fn get(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.fruits
            .get(&id)
            .map(EntityRef::Fruit)
            .or_else(|| self.particles.get(&id).map(EntityRef::Particle))
    }

    pub fn fruit(&self, id: EntityId) -> Option<&FruitEntity> {
        self.fruits.get(&id)
    }

    pub fn particle(&self, id: EntityId) -> Option<&ParticleEntity> {
        self.particles.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.fruits.contains_key(&id) || self.particles.contains_key(&id)
    }

    fn is_allocated(&self, id: EntityId) -> bool {
        id.0 > 0 && id.0 < self.next_id
    }

    pub fn all_fruit_ids(&self) -> Vec<EntityId> {
        self.fruits.keys().copied().collect()
    }

    pub fn all_particle_ids(&self) -> Vec<EntityId> {
        self.particles.keys().copied().collect()
    }

    pub fn fruits(&self) -> impl Iterator<Item = &FruitEntity> {
        self.fruits.values()
    }

    pub fn particles(&self) -> impl Iterator<Item = &ParticleEntity> {
        self.particles.values()
    }

    pub(crate) fn fruits_mut(&mut self) -> impl Iterator<Item = &mut FruitEntity> {
        self.fruits.values_mut()
    }

    pub(crate) fn particles_mut(&mut self) -> impl Iterator<Item = &mut ParticleEntity> {
        self.particles.values_mut()
    }

    pub fn fruit_count(&self) -> usize {
        self.fruits.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether membership changed since the last `take_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the membership-changed flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn membership(&self) -> Membership {
        Membership {
            generation: self.generation,
            fruits: self.all_fruit_ids(),
            particles: self.all_particle_ids(),
        }
    }
}
