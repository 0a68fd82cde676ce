//! Rotation physics
//!
//! A smoothed random walk: every few seconds a new target direction (±1) is
//! rolled, and the actual direction eases toward it a little each frame, so
//! reversals are gradual. The angle is accumulated from measured frame deltas
//! and is not a function of elapsed time.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{
    DIRECTION_HOLD_JITTER_MS, DIRECTION_HOLD_MIN_MS, DIRECTION_SMOOTHING, ROTATION_DEG_PER_SEC,
};

/// Source of randomness for direction changes
pub trait DirectionSource {
    /// Either -1.0 or 1.0
    fn next_direction(&mut self) -> f64;
    /// Extra hold time in [0, DIRECTION_HOLD_JITTER_MS)
    fn next_jitter_ms(&mut self) -> f64;
}

/// Seeded PCG-backed direction source
#[derive(Debug, Clone)]
pub struct PcgDirections {
    rng: Pcg32,
}

impl PcgDirections {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl DirectionSource for PcgDirections {
    fn next_direction(&mut self) -> f64 {
        if self.rng.random_bool(0.5) { 1.0 } else { -1.0 }
    }

    fn next_jitter_ms(&mut self) -> f64 {
        self.rng.random_range(0.0..DIRECTION_HOLD_JITTER_MS)
    }
}

/// Accumulated rotation state, persists across pause/resume
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    /// Current angle in degrees, [0, 360)
    pub angle_deg: f64,
    /// Direction being approached (-1 or 1)
    pub target_direction: f64,
    /// Eased direction in [-1, 1]
    pub smoothed_direction: f64,
    /// Timestamp after which a new target is rolled (ms)
    pub next_change_at: f64,
    /// Timestamp of the last advanced frame (ms)
    pub last_frame_at: f64,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            target_direction: 1.0,
            smoothed_direction: 0.0,
            next_change_at: 0.0,
            last_frame_at: 0.0,
        }
    }
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule_next_change(&mut self, now: f64, source: &mut impl DirectionSource) {
        self.next_change_at = now + DIRECTION_HOLD_MIN_MS + source.next_jitter_ms();
    }

    /// Re-seed frame timing at resume so the paused gap is never applied
    pub fn resume(&mut self, now: f64, source: &mut impl DirectionSource) {
        self.last_frame_at = now;
        if self.next_change_at <= now {
            self.schedule_next_change(now, source);
        }
    }

    /// Advance by the wall-clock delta since the previous frame
    pub fn advance(&mut self, now: f64, rotation_speed: f64, source: &mut impl DirectionSource) {
        let delta_ms = (now - self.last_frame_at).max(0.0);
        self.last_frame_at = now;

        if rotation_speed <= 0.0 {
            return;
        }

        if now > self.next_change_at {
            self.target_direction = source.next_direction();
            self.schedule_next_change(now, source);
        }

        self.smoothed_direction +=
            (self.target_direction - self.smoothed_direction) * DIRECTION_SMOOTHING;

        let rate_deg_per_ms = rotation_speed * ROTATION_DEG_PER_SEC / 1000.0;
        let delta_angle = rate_deg_per_ms * self.smoothed_direction * delta_ms;
        let angle = (self.angle_deg + delta_angle).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.angle_deg = if angle >= 360.0 { 0.0 } else { angle };
    }
}
