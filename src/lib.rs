//! Valentine Card - an interactive greeting card with a runaway "No" button
//!
//! Core modules:
//! - `card`: Deterministic card logic (trail, evasion, celebration, timers)
//! - `confetti`: Particle burst shown after the "Yes"
//! - `config`: Card text, image and effect configuration
//! - `platform`: Card ownership slot, plus browser clock, viewport and event
//!   listeners (wasm only)
//! - `view`: DOM construction and rendering (wasm only)

pub mod card;
pub mod config;
pub mod confetti;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod view;

pub use card::{CardEvent, CardState, View};
pub use config::CardConfig;
pub use confetti::{Confetti, ConfettiConfig};

/// Card tuning constants (all times in milliseconds, distances in CSS pixels)
pub mod consts {
    /// Trail length kept after each pointer sample
    pub const TRAIL_INSERT_CAP: usize = 20;
    /// Trail length kept after each periodic prune
    pub const TRAIL_PRUNE_CAP: usize = 15;
    /// Period of the trail prune
    pub const TRAIL_PRUNE_INTERVAL_MS: f64 = 50.0;

    /// Viewports this wide or narrower use the compact motion profile
    pub const COMPACT_MAX_VIEWPORT_WIDTH: f32 = 768.0;

    /// Compact step (horizontal, vertical) and offset bound
    pub const COMPACT_STEP_X: f32 = 40.0;
    pub const COMPACT_STEP_Y: f32 = 30.0;
    pub const COMPACT_MAX_OFFSET: f32 = 60.0;

    /// Full-size step (horizontal, vertical) and offset bound
    pub const FULL_STEP_X: f32 = 120.0;
    pub const FULL_STEP_Y: f32 = 100.0;
    pub const FULL_MAX_OFFSET: f32 = 200.0;

    /// Diagonal moves use this fraction of the base step on each axis
    pub const DIAGONAL_SCALE: f32 = 0.8;

    /// How long the card shakes after the last evasion
    pub const SHAKE_DURATION_MS: f64 = 500.0;
    /// How long the confetti runs after "Yes"
    pub const CELEBRATION_EFFECT_MS: f64 = 5000.0;
}
