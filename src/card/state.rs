//! Card state and input routing
//!
//! Everything the page needs to render lives here. Input handlers and the
//! frame loop call into `CardState`; the view drains `CardEvent`s to learn
//! what changed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::celebration::{Celebration, View};
use super::evasion::{Direction, Evader, Evasion};
use super::timer::{Interval, OneShot};
use super::trail::TrailBuffer;
use crate::consts::{SHAKE_DURATION_MS, TRAIL_PRUNE_INTERVAL_MS};

/// Notable state transitions, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardEvent {
    /// The No button moved
    Evaded { direction: Direction, offset: Vec2 },
    ShakeStarted,
    ShakeEnded,
    /// First "Yes"
    Confirmed,
    EffectStarted,
    EffectEnded,
    /// Periodic trail decay removed particles
    TrailPruned { removed: usize },
    TornDown,
}

/// Complete card state for one mounted view
#[derive(Debug, Clone)]
pub struct CardState {
    /// Seed the direction RNG was created from
    pub seed: u64,
    rng: Pcg32,
    trail: TrailBuffer,
    trail_prune: Interval,
    evader: Evader,
    shaking: bool,
    shake_clear: OneShot,
    celebration: Celebration,
    events: Vec<CardEvent>,
    torn_down: bool,
}

impl CardState {
    /// Create a fresh card with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            trail: TrailBuffer::new(),
            trail_prune: Interval::new(TRAIL_PRUNE_INTERVAL_MS),
            evader: Evader::new(),
            shaking: false,
            shake_clear: OneShot::new(),
            celebration: Celebration::new(),
            events: Vec::new(),
            torn_down: false,
        }
    }

    /// Record a pointer sample for the cursor trail
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Option<u64> {
        if self.torn_down {
            return None;
        }
        self.trail.push(Vec2::new(x, y))
    }

    /// Pointer entered (or a touch started on) the No button
    pub fn evade(&mut self, viewport_width: f32, now: f64) -> Option<Evasion> {
        if self.torn_down {
            return None;
        }
        let evasion = self.evader.evade(viewport_width, &mut self.rng);
        self.record_evasion(evasion, now);
        Some(evasion)
    }

    /// Like `evade`, with a chosen direction instead of a random draw
    #[cfg(test)]
    fn evade_toward(&mut self, viewport_width: f32, direction: Direction, now: f64) -> Evasion {
        let evasion = self.evader.evade_toward(viewport_width, direction);
        self.record_evasion(evasion, now);
        evasion
    }

    fn record_evasion(&mut self, evasion: Evasion, now: f64) {
        self.arm_shake(now);
        self.events.push(CardEvent::Evaded {
            direction: evasion.direction,
            offset: evasion.offset,
        });
    }

    fn arm_shake(&mut self, now: f64) {
        if !self.shaking {
            self.shaking = true;
            self.events.push(CardEvent::ShakeStarted);
        }
        self.shake_clear.arm(now, SHAKE_DURATION_MS);
    }

    /// The Yes button was pressed
    pub fn confirm(&mut self, now: f64) {
        if self.torn_down {
            return;
        }
        let outcome = self.celebration.confirm(now);
        if outcome.newly_confirmed {
            self.events.push(CardEvent::Confirmed);
        }
        if outcome.effect_started {
            self.events.push(CardEvent::EffectStarted);
        }
    }

    /// Run every timer that is due at `now`
    pub fn advance(&mut self, now: f64) {
        if self.torn_down {
            return;
        }

        if !self.trail_prune.is_running() {
            self.trail_prune.start(now);
        }
        if self.trail_prune.poll(now) > 0 {
            let removed = self.trail.prune();
            if removed > 0 {
                self.events.push(CardEvent::TrailPruned { removed });
            }
        }

        if self.shake_clear.poll(now) && self.shaking {
            self.shaking = false;
            self.events.push(CardEvent::ShakeEnded);
        }

        if self.celebration.poll(now) {
            self.events.push(CardEvent::EffectEnded);
        }
    }

    /// Cancel every timer and discard undrained events. Later calls become
    /// no-ops, and `TornDown` is the only event left to drain.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.trail_prune.stop();
        self.shake_clear.cancel();
        self.celebration.cancel();
        self.torn_down = true;
        self.events.clear();
        self.events.push(CardEvent::TornDown);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<CardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn offset(&self) -> Vec2 {
        self.evader.offset()
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn is_confirmed(&self) -> bool {
        self.celebration.is_confirmed()
    }

    pub fn effect_active(&self) -> bool {
        self.celebration.effect_active()
    }

    pub fn view(&self) -> View {
        self.celebration.view()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True while any one-shot is still waiting to fire
    #[cfg(test)]
    fn has_pending_timers(&self) -> bool {
        self.shake_clear.is_pending() || self.celebration.is_clear_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_card_is_idle() {
        let card = CardState::new(1);
        assert_eq!(card.view(), View::Prompt);
        assert_eq!(card.offset(), Vec2::ZERO);
        assert!(!card.is_shaking());
        assert!(!card.effect_active());
        assert!(card.trail().is_empty());
        assert!(!card.has_pending_timers());
    }

    #[test]
    fn test_evade_shakes_and_moves() {
        let mut card = CardState::new(12345);
        let evasion = card.evade(1280.0, 0.0).unwrap();
        assert!(card.is_shaking());
        assert_eq!(card.offset(), evasion.offset);
        assert_ne!(card.offset(), Vec2::ZERO);

        let events = card.drain_events();
        assert_eq!(events[0], CardEvent::ShakeStarted);
        assert!(matches!(events[1], CardEvent::Evaded { .. }));
        assert!(card.drain_events().is_empty());
    }

    #[test]
    fn test_shake_stays_while_triggers_keep_coming() {
        let mut card = CardState::new(3);
        card.evade(1280.0, 0.0);
        card.evade(1280.0, 400.0);
        card.evade(1280.0, 800.0);
        card.advance(1_000.0);
        assert!(card.is_shaking(), "last trigger at 800 keeps it up until 1300");
        card.advance(1_299.0);
        assert!(card.is_shaking());
        card.advance(1_300.0);
        assert!(!card.is_shaking());

        let events = card.drain_events();
        let starts = events.iter().filter(|e| **e == CardEvent::ShakeStarted).count();
        let ends = events.iter().filter(|e| **e == CardEvent::ShakeEnded).count();
        assert_eq!((starts, ends), (1, 1));
    }

    #[test]
    fn test_compact_same_direction_clamps() {
        let mut card = CardState::new(0);
        card.evade_toward(390.0, Direction::Up, 0.0);
        let second = card.evade_toward(390.0, Direction::Up, 10.0);
        assert_eq!(second.offset, Vec2::new(0.0, -COMPACT_MAX_OFFSET));
    }

    #[test]
    fn test_trail_prunes_on_interval() {
        let mut card = CardState::new(0);
        card.advance(0.0);
        for i in 0..30 {
            card.pointer_moved(i as f32, 0.0);
        }
        assert_eq!(card.trail().len(), TRAIL_INSERT_CAP);

        card.advance(TRAIL_PRUNE_INTERVAL_MS - 1.0);
        assert_eq!(card.trail().len(), TRAIL_INSERT_CAP);

        card.advance(TRAIL_PRUNE_INTERVAL_MS);
        assert_eq!(card.trail().len(), TRAIL_PRUNE_CAP);
        let first_kept = card.trail().iter().next().map(|p| p.pos.x);
        assert_eq!(first_kept, Some(15.0));
        assert!(card
            .drain_events()
            .contains(&CardEvent::TrailPruned { removed: 5 }));
    }

    #[test]
    fn test_confirm_effect_lifecycle() {
        let mut card = CardState::new(0);
        card.confirm(1_000.0);
        card.confirm(1_001.0);
        assert_eq!(
            card.drain_events(),
            vec![CardEvent::Confirmed, CardEvent::EffectStarted]
        );

        card.advance(5_999.0);
        assert!(card.effect_active());
        card.advance(6_001.0);
        assert!(!card.effect_active());
        assert_eq!(card.view(), View::Celebration);
        assert_eq!(card.drain_events(), vec![CardEvent::EffectEnded]);
    }

    #[test]
    fn test_confirm_does_not_reset_offset_or_shake() {
        let mut card = CardState::new(9);
        let evasion = card.evade(1280.0, 0.0).unwrap();
        card.confirm(10.0);
        assert_eq!(card.offset(), evasion.offset);
        assert!(card.is_shaking());
    }

    #[test]
    fn test_teardown_cancels_pending_transitions() {
        let mut card = CardState::new(0);
        card.evade(1280.0, 0.0);
        card.confirm(0.0);
        card.drain_events();

        card.teardown();
        assert!(!card.has_pending_timers());
        card.advance(60_000.0);
        assert!(card.effect_active(), "effect clear must not fire after teardown");
        assert!(card.is_shaking());
        assert_eq!(card.drain_events(), vec![CardEvent::TornDown]);

        assert!(card.evade(1280.0, 1.0).is_none());
        assert!(card.pointer_moved(1.0, 1.0).is_none());
        card.teardown();
        assert!(card.drain_events().is_empty());
    }

    #[test]
    fn test_teardown_drops_undrained_effect_start() {
        let mut card = CardState::new(0);
        card.evade(1280.0, 0.0);
        card.confirm(10.0);
        card.teardown();
        assert_eq!(card.drain_events(), vec![CardEvent::TornDown]);
        assert!(!card.has_pending_timers());
    }

    #[test]
    fn test_determinism() {
        let mut a = CardState::new(2024);
        let mut b = CardState::new(2024);
        for i in 0..20 {
            let now = i as f64 * 100.0;
            let width = if i % 3 == 0 { 500.0 } else { 1400.0 };
            a.evade(width, now);
            b.evade(width, now);
        }
        assert_eq!(a.offset(), b.offset());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    proptest! {
        #[test]
        fn prop_effect_never_clears_early(
            confirm_at in 0.0f64..1e5,
            samples in proptest::collection::vec(0.0f64..20_000.0, 1..20)
        ) {
            let mut card = CardState::new(0);
            card.confirm(confirm_at);
            let mut samples = samples;
            samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let mut ended = 0;
            for dt in samples {
                card.advance(confirm_at + dt);
                ended += card
                    .drain_events()
                    .iter()
                    .filter(|e| **e == CardEvent::EffectEnded)
                    .count();
                if dt + 1e-6 < CELEBRATION_EFFECT_MS {
                    prop_assert!(card.effect_active());
                }
            }
            prop_assert!(ended <= 1);
        }
    }
}
