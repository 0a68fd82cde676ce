//! Scale and offset calculation
//!
//! Size oscillates once per cycle between `max_scale` (the pair just fills
//! the separation) and `max_scale * end_size_pct`. The horizontal offset of
//! each shape depends on the phase mode.

use std::f64::consts::TAU;

use super::engine::EngineParameters;
use super::phase::{PhaseMode, resolve_cycle};
use crate::consts::{OFFSET_PADDING_PX, R_OUT};

/// Cosine oscillation over one cycle: 1 at t=0, 0 at t=0.5, 1 at t=1
#[inline]
pub fn oscillation(t: f64) -> f64 {
    ((TAU * t).cos() + 1.0) / 2.0
}

/// Time-derived part of a frame (everything except rotation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOffset {
    pub scale: f64,
    pub offset_x: f64,
    pub mode: PhaseMode,
}

/// Scale bounds for a given separation and end size
#[inline]
pub fn scale_bounds(separation_px: f64, end_size_pct: f64) -> (f64, f64) {
    let max_scale = separation_px / (2.0 * R_OUT);
    (max_scale * end_size_pct, max_scale)
}

/// Distance from screen center to each shape center at full size
#[inline]
pub fn base_offset(separation_px: f64) -> f64 {
    separation_px / 2.0 + OFFSET_PADDING_PX
}

/// Scale and offset at cycle fraction `t` in the given mode
pub fn scale_offset(t: f64, mode: PhaseMode, separation_px: f64, end_size_pct: f64) -> ScaleOffset {
    let (min_scale, max_scale) = scale_bounds(separation_px, end_size_pct);
    let scale = min_scale + (max_scale - min_scale) * oscillation(t);

    let base = base_offset(separation_px);
    let offset_x = match mode {
        PhaseMode::Parallel => base,
        PhaseMode::Global => base * (scale / max_scale),
    };

    ScaleOffset {
        scale,
        offset_x,
        mode,
    }
}

/// Scale, offset and mode for `elapsed` ms of active time.
///
/// Both the running tick and the paused frame go through this function.
pub fn evaluate(elapsed: f64, params: &EngineParameters) -> ScaleOffset {
    let pos = resolve_cycle(elapsed, params.speed, params.phase_interval);
    scale_offset(pos.t, pos.mode, params.separation_px, params.end_size_pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_oscillation_key_points() {
        assert!((oscillation(0.0) - 1.0).abs() < EPS);
        assert!(oscillation(0.5).abs() < EPS);
        assert!((oscillation(1.0) - 1.0).abs() < EPS);
        assert!((oscillation(0.25) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_scale_scenario() {
        let (min_scale, max_scale) = scale_bounds(1000.0, 0.4);
        assert!((max_scale - 5.0).abs() < EPS);
        assert!((min_scale - 2.0).abs() < EPS);
        assert!((base_offset(1000.0) - 500.5).abs() < EPS);
    }

    #[test]
    fn test_parallel_offset_constant() {
        for &t in &[0.0, 0.2, 0.5, 0.8] {
            let so = scale_offset(t, PhaseMode::Parallel, 1000.0, 0.4);
            assert!((so.offset_x - 500.5).abs() < EPS);
        }
    }

    #[test]
    fn test_global_offset_follows_scale() {
        let full = scale_offset(0.0, PhaseMode::Global, 1000.0, 0.4);
        assert!((full.scale - 5.0).abs() < EPS);
        assert!((full.offset_x - 500.5).abs() < EPS);

        // Half way: scale 2.0 = 0.4 * max, so offset is 0.4 * base
        let min = scale_offset(0.5, PhaseMode::Global, 1000.0, 0.4);
        assert!((min.scale - 2.0).abs() < EPS);
        assert!((min.offset_x - 500.5 * 0.4).abs() < EPS);
    }

    #[test]
    fn test_evaluate_at_zero_is_full_size_parallel() {
        let params = EngineParameters {
            separation_px: 1000.0,
            end_size_pct: 0.4,
            ..Default::default()
        };
        let so = evaluate(0.0, &params);
        assert_eq!(so.mode, PhaseMode::Parallel);
        assert!((so.scale - 5.0).abs() < EPS);
        assert!((so.offset_x - 500.5).abs() < EPS);
    }

    proptest! {
        #[test]
        fn prop_oscillation_periodic_and_bounded(t in 0.0f64..1.0, k in 0u32..10) {
            let a = oscillation(t);
            let b = oscillation(t + k as f64);
            prop_assert!((0.0..=1.0).contains(&a));
            prop_assert!((a - b).abs() < 1e-9);
        }

        #[test]
        fn prop_scale_within_bounds(
            t in 0.0f64..1.0,
            separation in 150.0f64..1000.0,
            end in 0.1f64..1.0,
        ) {
            let (min_scale, max_scale) = scale_bounds(separation, end);
            let so = scale_offset(t, PhaseMode::Parallel, separation, end);
            prop_assert!(so.scale >= min_scale - 1e-9);
            prop_assert!(so.scale <= max_scale + 1e-9);
        }

        #[test]
        fn prop_global_offset_linear_in_scale(
            t in 0.0f64..1.0,
            separation in 150.0f64..1000.0,
            end in 0.1f64..1.0,
        ) {
            let (_, max_scale) = scale_bounds(separation, end);
            let so = scale_offset(t, PhaseMode::Global, separation, end);
            let expected = base_offset(separation) * so.scale / max_scale;
            prop_assert!((so.offset_x - expected).abs() < 1e-9);
        }
    }
}
