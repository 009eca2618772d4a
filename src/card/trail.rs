//! Cursor trail buffer
//!
//! Pointer samples are appended in arrival order and the buffer is only ever
//! shortened from the front, so it always holds the most recent samples.

use glam::Vec2;

use crate::consts::{TRAIL_INSERT_CAP, TRAIL_PRUNE_CAP};

/// A single recorded pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParticle {
    /// Unique for the lifetime of the buffer
    pub id: u64,
    /// Viewport (client) coordinates
    pub pos: Vec2,
}

/// Bounded trail with a cap on insert and a shorter cap on prune
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    particles: Vec<TrailParticle>,
    next_id: u64,
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(TRAIL_INSERT_CAP + 1),
            next_id: 1,
        }
    }

    /// Record a pointer sample and return its id.
    ///
    /// Non-finite coordinates are dropped and return `None`.
    pub fn push(&mut self, pos: Vec2) -> Option<u64> {
        if !pos.is_finite() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.particles.push(TrailParticle { id, pos });
        keep_last(&mut self.particles, TRAIL_INSERT_CAP);
        Some(id)
    }

    /// Periodic decay. Returns how many particles were removed.
    pub fn prune(&mut self) -> usize {
        keep_last(&mut self.particles, TRAIL_PRUNE_CAP)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &TrailParticle> {
        self.particles.iter()
    }

    pub fn newest(&self) -> Option<&TrailParticle> {
        self.particles.last()
    }
}

/// Drop from the front until at most `cap` remain
fn keep_last(particles: &mut Vec<TrailParticle>, cap: usize) -> usize {
    let excess = particles.len().saturating_sub(cap);
    if excess > 0 {
        particles.drain(..excess);
    }
    excess
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(trail: &TrailBuffer) -> Vec<u64> {
        trail.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_push_caps_at_twenty() {
        let mut trail = TrailBuffer::new();
        for i in 0..25 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_INSERT_CAP);
        assert_eq!(ids(&trail), (6..=25).collect::<Vec<_>>());
        assert_eq!(trail.newest().map(|p| p.pos.x), Some(24.0));
    }

    #[test]
    fn test_prune_keeps_most_recent_fifteen() {
        let mut trail = TrailBuffer::new();
        for i in 0..20 {
            trail.push(Vec2::new(i as f32, i as f32));
        }
        assert_eq!(trail.prune(), 5);
        assert_eq!(trail.len(), TRAIL_PRUNE_CAP);
        assert_eq!(ids(&trail), (6..=20).collect::<Vec<_>>());

        // Already short enough
        assert_eq!(trail.prune(), 0);
        assert_eq!(trail.len(), TRAIL_PRUNE_CAP);
    }

    #[test]
    fn test_prune_short_trail_is_untouched() {
        let mut trail = TrailBuffer::new();
        trail.push(Vec2::new(1.0, 2.0));
        trail.push(Vec2::new(3.0, 4.0));
        assert_eq!(trail.prune(), 0);
        assert_eq!(ids(&trail), vec![1, 2]);
    }

    #[test]
    fn test_ids_stay_unique_across_truncation() {
        let mut trail = TrailBuffer::new();
        for _ in 0..40 {
            trail.push(Vec2::ZERO);
            trail.prune();
        }
        let mut seen = ids(&trail);
        seen.dedup();
        assert_eq!(seen.len(), trail.len());
        assert_eq!(trail.newest().map(|p| p.id), Some(40));
    }

    #[test]
    fn test_non_finite_sample_dropped() {
        let mut trail = TrailBuffer::new();
        assert_eq!(trail.push(Vec2::new(f32::NAN, 1.0)), None);
        assert_eq!(trail.push(Vec2::new(1.0, f32::INFINITY)), None);
        assert!(trail.is_empty());
        assert_eq!(trail.push(Vec2::new(1.0, 1.0)), Some(1));
    }

    proptest! {
        #[test]
        fn prop_trail_holds_latest_pushes(
            ops in proptest::collection::vec(any::<bool>(), 0..200)
        ) {
            // true = push, false = prune
            let mut trail = TrailBuffer::new();
            let mut model: Vec<u64> = Vec::new();
            for push in ops {
                if push {
                    let id = trail.push(Vec2::ZERO).unwrap();
                    model.push(id);
                    let start = model.len().saturating_sub(TRAIL_INSERT_CAP);
                    model.drain(..start);
                } else {
                    trail.prune();
                    let start = model.len().saturating_sub(TRAIL_PRUNE_CAP);
                    model.drain(..start);
                }
                prop_assert!(trail.len() <= TRAIL_INSERT_CAP);
                prop_assert_eq!(ids(&trail), model.clone());
            }
        }
    }
}
