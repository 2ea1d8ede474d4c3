//! Hand trail for blade rendering
//!
//! Bounded FIFO of recent hand positions (oldest first). When the hand is
//! lost the trail shrinks one point per frame instead of freezing.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{CYAN, TRAIL_MAX_LEN, WHITE};
use crate::gesture::Gesture;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailBuffer {
    points: VecDeque<Vec3>,
    max_len: usize,
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(TRAIL_MAX_LEN)
    }
}

impl TrailBuffer {
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            points: VecDeque::with_capacity(max_len + 1),
            max_len,
        }
    }

    /// Append the newest position, evicting the oldest past capacity
    pub fn push(&mut self, pos: Vec3) {
        self.points.push_back(pos);
        while self.points.len() > self.max_len {
            self.points.pop_front();
        }
    }

    /// Evict the oldest position (no-op when empty)
    pub fn decay(&mut self) {
        self.points.pop_front();
    }

    /// Push when a hand is present, decay otherwise
    pub fn update(&mut self, hand: Option<Vec3>) {
        match hand {
            Some(pos) => self.push(pos),
            None => self.decay(),
        }
    }

    /// Ordered copy, oldest first
    pub fn snapshot(&self) -> Vec<Vec3> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// A ribbon needs at least two points
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Blade tint for the current gesture
pub fn blade_color(gesture: Gesture) -> u32 {
    if gesture == Gesture::Pointing { CYAN } else { WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fifo_order() {
        let mut trail = TrailBuffer::new(3);
        for i in 0..5 {
            trail.push(Vec3::splat(i as f32));
        }
        assert_eq!(
            trail.snapshot(),
            vec![Vec3::splat(2.0), Vec3::splat(3.0), Vec3::splat(4.0)]
        );
    }

    #[test]
    fn test_no_hand_decay() {
        let mut trail = TrailBuffer::default();
        for i in 0..5 {
            trail.push(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(trail.len(), 5);

        for _ in 0..5 {
            trail.update(None);
        }
        assert_eq!(trail.len(), 0);

        trail.update(None);
        assert!(trail.is_empty());
        assert!(!trail.is_drawable());
    }

    #[test]
    fn test_drawable_threshold() {
        let mut trail = TrailBuffer::default();
        trail.push(Vec3::ZERO);
        assert!(!trail.is_drawable());
        trail.push(Vec3::X);
        assert!(trail.is_drawable());
    }

    #[test]
    fn test_blade_color() {
        assert_eq!(blade_color(Gesture::Pointing), 0x00ffff);
        assert_eq!(blade_color(Gesture::OpenPalm), 0xffffff);
        assert_eq!(blade_color(Gesture::None), 0xffffff);
    }

    proptest! {
        #[test]
        fn trail_never_exceeds_bound(
            ops in prop::collection::vec(prop::option::of(-50.0f32..50.0), 0..200)
        ) {
            let mut trail = TrailBuffer::default();
            for op in ops {
                trail.update(op.map(|x| Vec3::new(x, -x, 0.0)));
                prop_assert!(trail.len() <= TRAIL_MAX_LEN);
            }
        }
    }
}
