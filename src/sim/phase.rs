//! Cycle and phase resolution
//!
//! Maps elapsed active time to a cycle index, a position within the cycle,
//! and the spatial-coupling mode for the current phase group.

use crate::consts::BASE_CYCLE_MS;

/// Spatial coupling between the two shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseMode {
    /// Shapes scale in place; center separation stays constant
    #[default]
    Parallel,
    /// Shapes and their separation scale together (whole-scene zoom)
    Global,
}

impl PhaseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseMode::Parallel => "Parallel",
            PhaseMode::Global => "Global",
        }
    }
}

/// Where elapsed time falls within the cycle structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePosition {
    /// Number of completed cycles
    pub cycle_count: u64,
    /// Index of the block of `phase_interval` cycles
    pub phase_group: u64,
    pub mode: PhaseMode,
    /// Fraction of the current cycle, in [0, 1)
    pub t: f64,
}

/// Duration of one full oscillation at the given speed (ms)
#[inline]
pub fn cycle_duration_ms(speed: f64) -> f64 {
    BASE_CYCLE_MS / speed
}

/// Resolve cycle index, phase group and mode for `elapsed` ms of active time.
///
/// `phase_interval` below 1 is treated as 1.
pub fn resolve_cycle(elapsed: f64, speed: f64, phase_interval: u32) -> CyclePosition {
    let duration = cycle_duration_ms(speed);
    let interval = u64::from(phase_interval.max(1));

    let cycle_count = (elapsed / duration).floor().max(0.0) as u64;
    let phase_group = cycle_count / interval;
    let mode = if phase_group % 2 != 0 {
        PhaseMode::Global
    } else {
        PhaseMode::Parallel
    };
    let t = elapsed.rem_euclid(duration) / duration;

    CyclePosition {
        cycle_count,
        phase_group,
        mode,
        t,
    }
}
