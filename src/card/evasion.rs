//! Runaway "No" button
//!
//! Each evasion adds one of eight fixed displacements to the button's offset
//! and clamps the result, so the button keeps fleeing in bursts but never
//! leaves a bounded box around its layout position.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Coarse viewport bucket used to scale motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Compact,
    Full,
}

impl DeviceClass {
    /// Classify a viewport width. Missing or garbage widths count as zero.
    pub fn from_viewport_width(width: f32) -> Self {
        let width = if width.is_finite() { width } else { 0.0 };
        if width <= COMPACT_MAX_VIEWPORT_WIDTH {
            DeviceClass::Compact
        } else {
            DeviceClass::Full
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Compact => "compact",
            DeviceClass::Full => "full",
        }
    }

    pub fn profile(&self) -> MotionProfile {
        match self {
            DeviceClass::Compact => MotionProfile {
                step: Vec2::new(COMPACT_STEP_X, COMPACT_STEP_Y),
                max_offset: COMPACT_MAX_OFFSET,
            },
            DeviceClass::Full => MotionProfile {
                step: Vec2::new(FULL_STEP_X, FULL_STEP_Y),
                max_offset: FULL_MAX_OFFSET,
            },
        }
    }
}

/// Step sizes and bound for one device class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// Base step (horizontal, vertical)
    pub step: Vec2,
    /// Offset bound on each axis
    pub max_offset: f32,
}

/// The eight escape directions (screen space, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
    DownRight,
    DownLeft,
    UpRight,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::UpRight,
        Direction::UpLeft,
    ];

    /// Unit signs per axis, before scaling
    fn signs(&self) -> Vec2 {
        match self {
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::DownRight => Vec2::new(1.0, 1.0),
            Direction::DownLeft => Vec2::new(-1.0, 1.0),
            Direction::UpRight => Vec2::new(1.0, -1.0),
            Direction::UpLeft => Vec2::new(-1.0, -1.0),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Direction::DownRight | Direction::DownLeft | Direction::UpRight | Direction::UpLeft
        )
    }

    /// Displacement for this direction under a motion profile
    pub fn displacement(&self, profile: &MotionProfile) -> Vec2 {
        let scale = if self.is_diagonal() { DIAGONAL_SCALE } else { 1.0 };
        self.signs() * profile.step * scale
    }
}

/// Pick a direction uniformly at random
pub fn select_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.random_range(0..Direction::ALL.len())]
}

/// Clamp each axis independently into `[-max_offset, max_offset]`
#[inline]
pub fn clamp_offset(offset: Vec2, max_offset: f32) -> Vec2 {
    let bound = if max_offset.is_finite() {
        max_offset.abs()
    } else {
        0.0
    };
    Vec2::new(
        offset.x.max(-bound).min(bound),
        offset.y.max(-bound).min(bound),
    )
}

/// Outcome of a single evasion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evasion {
    pub direction: Direction,
    pub device: DeviceClass,
    /// Committed offset after clamping
    pub offset: Vec2,
}

/// Tracks the button's accumulated offset from its layout position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evader {
    offset: Vec2,
}

impl Evader {
    pub fn new() -> Self {
        Self { offset: Vec2::ZERO }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Move with a randomly drawn direction
    pub fn evade<R: Rng + ?Sized>(&mut self, viewport_width: f32, rng: &mut R) -> Evasion {
        let direction = select_direction(rng);
        self.evade_toward(viewport_width, direction)
    }

    /// Move in a given direction. The viewport is classified on every call,
    /// and the existing offset is not rescaled when the class changes.
    pub fn evade_toward(&mut self, viewport_width: f32, direction: Direction) -> Evasion {
        let device = DeviceClass::from_viewport_width(viewport_width);
        let profile = device.profile();
        self.offset = clamp_offset(self.offset + direction.displacement(&profile), profile.max_offset);
        Evasion {
            direction,
            device,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DESKTOP: f32 = 1280.0;
    const PHONE: f32 = 390.0;

    #[test]
    fn test_device_class_threshold() {
        assert_eq!(DeviceClass::from_viewport_width(768.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_viewport_width(769.0), DeviceClass::Full);
        assert_eq!(DeviceClass::from_viewport_width(0.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_viewport_width(f32::NAN), DeviceClass::Compact);
    }

    #[test]
    fn test_full_single_evasion_outcomes() {
        let expected = [
            Vec2::new(120.0, 0.0),
            Vec2::new(-120.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(0.0, -100.0),
            Vec2::new(96.0, 80.0),
            Vec2::new(-96.0, 80.0),
            Vec2::new(96.0, -80.0),
            Vec2::new(-96.0, -80.0),
        ];
        for (dir, want) in Direction::ALL.iter().zip(expected) {
            let mut evader = Evader::new();
            let got = evader.evade_toward(DESKTOP, *dir).offset;
            assert!((got - want).length() < 1e-4, "{:?}: {} != {}", dir, got, want);
        }
    }

    #[test]
    fn test_random_evasion_is_one_of_eight() {
        let profile = DeviceClass::Compact.profile();
        let allowed: Vec<Vec2> = Direction::ALL.iter().map(|d| d.displacement(&profile)).collect();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..64 {
            let mut evader = Evader::new();
            let result = evader.evade(PHONE, &mut rng);
            assert_eq!(result.device, DeviceClass::Compact);
            assert!(allowed.iter().any(|a| (*a - result.offset).length() < 1e-4));
        }
    }

    #[test]
    fn test_compact_clamps_on_second_step() {
        let mut evader = Evader::new();
        assert_eq!(evader.evade_toward(PHONE, Direction::Right).offset, Vec2::new(40.0, 0.0));
        assert_eq!(evader.evade_toward(PHONE, Direction::Right).offset, Vec2::new(60.0, 0.0));

        let mut evader = Evader::new();
        evader.evade_toward(PHONE, Direction::Left);
        assert_eq!(evader.evade_toward(PHONE, Direction::Left).offset, Vec2::new(-60.0, 0.0));
    }

    #[test]
    fn test_resize_does_not_rescale_until_next_trigger() {
        let mut evader = Evader::new();
        for _ in 0..3 {
            evader.evade_toward(DESKTOP, Direction::Down);
        }
        assert_eq!(evader.offset(), Vec2::new(0.0, 200.0));

        // Rotate to a phone: offset is left alone until the next evasion
        let result = evader.evade_toward(PHONE, Direction::Right);
        assert_eq!(result.offset, Vec2::new(40.0, 60.0));
    }

    #[test]
    fn test_clamp_handles_degenerate_bounds() {
        assert_eq!(clamp_offset(Vec2::new(5.0, -5.0), 0.0), Vec2::ZERO);
        assert_eq!(clamp_offset(Vec2::new(5.0, -5.0), f32::NAN), Vec2::ZERO);
        assert_eq!(clamp_offset(Vec2::new(5.0, -5.0), -3.0), Vec2::new(3.0, -3.0));
    }

    #[test]
    fn test_selection_is_deterministic_per_seed() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        let da: Vec<_> = (0..32).map(|_| select_direction(&mut a)).collect();
        let db: Vec<_> = (0..32).map(|_| select_direction(&mut b)).collect();
        assert_eq!(da, db);
    }

    #[test]
    fn test_selection_reaches_every_direction() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 8];
        for _ in 0..512 {
            let d = select_direction(&mut rng);
            let idx = Direction::ALL.iter().position(|x| *x == d).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    proptest! {
        #[test]
        fn prop_offset_within_latest_bound(
            seed in any::<u64>(),
            widths in proptest::collection::vec(0.0f32..2000.0, 1..100)
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut evader = Evader::new();
            for width in widths {
                let result = evader.evade(width, &mut rng);
                let bound = result.device.profile().max_offset;
                prop_assert!(result.offset.x.abs() <= bound);
                prop_assert!(result.offset.y.abs() <= bound);
            }
        }
    }
}
