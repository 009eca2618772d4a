//! Confetti burst shown while the celebration effect is active
//!
//! Frame-based physics: velocities are in pixels per 60 Hz frame and gravity
//! is added to the vertical velocity once per frame, so `gravity = 0.3` reads
//! the same as in the usual JS confetti widgets.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Nominal frame length the physics constants are tuned for
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Longest frame we integrate in one step (avoids tunnelling after a stall)
const MAX_FRAMES_PER_STEP: f32 = 3.0;

const INITIAL_VX: f32 = 4.0;
const INITIAL_VY: f32 = 10.0;
const FRICTION: f32 = 0.99;
const MAX_SPIN: f32 = 0.2;

/// Hard cap on pieces, whatever the page config asks for
pub const MAX_CONFETTI: usize = 2000;

/// Confetti tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    /// Pieces on screen while running
    pub count: usize,
    /// Downward acceleration, pixels per frame²
    pub gravity: f32,
    /// Sideways acceleration, pixels per frame²
    pub wind: f32,
    /// CSS hex colors (`#rrggbb`)
    pub colors: Vec<String>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            count: 500,
            gravity: 0.3,
            wind: 0.0,
            colors: [
                "#ff6b9d", "#ff8fab", "#ffa6c9", "#ffb6d9", "#ffc6e9", "#ff69b4", "#ff1493",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl ConfettiConfig {
    /// Parse `#rrggbb` (or `rrggbb`) into RGB bytes
    pub fn parse_color(s: &str) -> Option<[u8; 3]> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }

    /// Valid palette entries; falls back to a single hot pink
    pub fn palette(&self) -> Vec<[u8; 3]> {
        let palette: Vec<[u8; 3]> = self
            .colors
            .iter()
            .filter_map(|c| {
                let parsed = Self::parse_color(c);
                if parsed.is_none() {
                    log::warn!("Ignoring invalid confetti color {:?}", c);
                }
                parsed
            })
            .collect();
        if palette.is_empty() {
            vec![[0xff, 0x14, 0x93]]
        } else {
            palette
        }
    }
}

/// One paper rectangle
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Rotation (radians)
    pub angle: f32,
    pub spin: f32,
    /// Index into the palette
    pub color: usize,
}

/// Confetti simulation, driven by the frame loop
#[derive(Debug, Clone)]
pub struct Confetti {
    config: ConfettiConfig,
    palette: Vec<[u8; 3]>,
    pieces: Vec<ConfettiPiece>,
    running: bool,
}

impl Confetti {
    pub fn new(mut config: ConfettiConfig) -> Self {
        if config.count > MAX_CONFETTI {
            log::warn!(
                "Confetti count {} exceeds {}, clamping",
                config.count,
                MAX_CONFETTI
            );
            config.count = MAX_CONFETTI;
        }
        let palette = config.palette();
        Self {
            config,
            palette,
            pieces: Vec::new(),
            running: false,
        }
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Spawn the full burst above the top edge of a `width` x `height` viewport
    pub fn start<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) {
        let width = sanitize_extent(width);
        let height = sanitize_extent(height);
        self.pieces.clear();
        self.pieces.reserve(self.config.count);
        for _ in 0..self.config.count {
            let mut piece = self.spawn(width, rng);
            // Stagger the first wave so it does not fall as one sheet
            piece.pos.y = -rng.random_range(0.0..=height.max(1.0));
            self.pieces.push(piece);
        }
        self.running = true;
        log::debug!("Confetti started with {} pieces", self.pieces.len());
    }

    /// Remove every piece
    pub fn stop(&mut self) {
        self.pieces.clear();
        self.running = false;
    }

    /// Advance by `dt_ms`. Pieces that leave the bottom re-enter at the top.
    pub fn step<R: Rng + ?Sized>(&mut self, dt_ms: f32, width: f32, height: f32, rng: &mut R) {
        if !self.running || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let width = sanitize_extent(width);
        let height = sanitize_extent(height);
        let frames = (dt_ms / FRAME_MS).min(MAX_FRAMES_PER_STEP);
        let friction = FRICTION.powf(frames);

        for i in 0..self.pieces.len() {
            let piece = &mut self.pieces[i];
            piece.pos += piece.vel * frames;
            piece.vel.y += self.config.gravity * frames;
            piece.vel.x += self.config.wind * frames;
            piece.vel *= friction;
            piece.angle = (piece.angle + piece.spin * frames) % std::f32::consts::TAU;

            if piece.pos.y > height + piece.size.y.max(piece.size.x) {
                let fresh = self.spawn(width, rng);
                self.pieces[i] = fresh;
            }
        }
    }

    fn spawn<R: Rng + ?Sized>(&self, width: f32, rng: &mut R) -> ConfettiPiece {
        ConfettiPiece {
            pos: Vec2::new(rng.random_range(0.0..=width), 0.0),
            vel: Vec2::new(
                rng.random_range(-INITIAL_VX..=INITIAL_VX),
                rng.random_range(-INITIAL_VY..=0.0),
            ),
            size: Vec2::new(rng.random_range(5.0..=20.0), rng.random_range(5.0..=10.0)),
            angle: rng.random_range(0.0..std::f32::consts::TAU),
            spin: rng.random_range(-MAX_SPIN..=MAX_SPIN),
            color: rng.random_range(0..self.palette.len()),
        }
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
