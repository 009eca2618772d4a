//! Deterministic card logic
//!
//! Everything with an invariant lives here, free of DOM and platform code:
//! - Clock supplied by the caller (milliseconds)
//! - Seeded RNG only
//! - One cancellable handle per delayed flag

pub mod celebration;
pub mod evasion;
pub mod state;
pub mod timer;
pub mod trail;

pub use celebration::{Celebration, ConfirmOutcome, View};
pub use evasion::{
    DeviceClass, Direction, Evader, Evasion, MotionProfile, clamp_offset, select_direction,
};
pub use state::{CardEvent, CardState};
pub use timer::{Interval, OneShot};
pub use trail::{TrailBuffer, TrailParticle};
