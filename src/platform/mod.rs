//! Browser platform layer
//!
//! - Clock (`performance.now()`, same timebase as animation frames)
//! - Viewport queries
//! - Event listeners that unregister themselves when dropped
//! - Page-lifetime ownership of the running card

pub mod keepalive;
#[cfg(target_arch = "wasm32")]
mod web;

pub use keepalive::KeepAlive;
#[cfg(target_arch = "wasm32")]
pub use web::*;
