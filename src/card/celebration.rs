//! "Yes" handling: the card latches into the celebration view and runs the
//! confetti effect for a fixed time.

use super::timer::OneShot;
use crate::consts::CELEBRATION_EFFECT_MS;

/// Which layout the card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Question with Yes/No buttons
    #[default]
    Prompt,
    /// Image and success message (terminal)
    Celebration,
}

/// What a confirm call changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmOutcome {
    /// This was the first confirm
    pub newly_confirmed: bool,
    /// The effect was off before this call
    pub effect_started: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Celebration {
    confirmed: bool,
    effect_active: bool,
    effect_clear: OneShot,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the celebration view and (re)start the effect window
    pub fn confirm(&mut self, now: f64) -> ConfirmOutcome {
        let outcome = ConfirmOutcome {
            newly_confirmed: !self.confirmed,
            effect_started: !self.effect_active,
        };
        self.confirmed = true;
        self.effect_active = true;
        self.effect_clear.arm(now, CELEBRATION_EFFECT_MS);
        outcome
    }

    /// Returns true when the effect was switched off by this poll
    pub fn poll(&mut self, now: f64) -> bool {
        if self.effect_clear.poll(now) && self.effect_active {
            self.effect_active = false;
            return true;
        }
        false
    }

    /// Drop the pending effect clear without firing it
    pub fn cancel(&mut self) {
        self.effect_clear.cancel();
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn effect_active(&self) -> bool {
        self.effect_active
    }

    #[cfg(test)]
    pub(crate) fn is_clear_pending(&self) -> bool {
        self.effect_clear.is_pending()
    }

    pub fn view(&self) -> View {
        if self.confirmed {
            View::Celebration
        } else {
            View::Prompt
        }
    }
}
