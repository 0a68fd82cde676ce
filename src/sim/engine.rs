//! Animation engine state machine
//!
//! Stopped <-> Running. Each running tick derives scale, offset and phase
//! mode from elapsed active time and advances the rotation physics by the
//! measured frame delta. Stopping emits one final frame evaluated at the
//! pause instant.

use super::clock::ActiveClock;
use super::phase::PhaseMode;
use super::rotation::{DirectionSource, PcgDirections, RotationState};
use super::scale::evaluate;

/// User-tunable inputs, treated as immutable within a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParameters {
    /// Cycle speed multiplier (cycle = 4000ms / speed)
    pub speed: f64,
    /// Smallest size as a fraction of the largest, (0, 1]
    pub end_size_pct: f64,
    /// Distance between shape centers at full size (px)
    pub separation_px: f64,
    /// Rotation speed multiplier (0 disables rotation)
    pub rotation_speed: f64,
    /// Cycles per phase group
    pub phase_interval: u32,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            speed: 0.5,
            end_size_pct: 0.4,
            separation_px: 400.0,
            rotation_speed: 0.5,
            phase_interval: 3,
        }
    }
}

impl EngineParameters {
    /// Cycles only advance for a positive, finite speed
    #[inline]
    pub fn has_valid_speed(&self) -> bool {
        self.speed > 0.0 && self.speed.is_finite()
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub scale: f64,
    /// Horizontal distance of each shape center from screen center (px)
    pub offset_x: f64,
    pub rotation_deg: f64,
    pub mode: PhaseMode,
}

impl FrameOutput {
    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.offset_x.is_finite() && self.rotation_deg.is_finite()
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

/// The animation engine
#[derive(Debug, Clone)]
pub struct Engine<D: DirectionSource = PcgDirections> {
    params: EngineParameters,
    clock: ActiveClock,
    rotation: RotationState,
    directions: D,
    state: EngineState,
    last_frame: FrameOutput,
}

impl Engine<PcgDirections> {
    /// Engine with a seeded PCG direction source
    pub fn with_seed(params: EngineParameters, seed: u64) -> Self {
        Self::new(params, PcgDirections::new(seed))
    }
}

impl<D: DirectionSource> Engine<D> {
    pub fn new(params: EngineParameters, directions: D) -> Self {
        let mut engine = Self {
            params,
            clock: ActiveClock::new(),
            rotation: RotationState::new(),
            directions,
            state: EngineState::Stopped,
            last_frame: FrameOutput {
                scale: 0.0,
                offset_x: 0.0,
                rotation_deg: 0.0,
                mode: PhaseMode::Parallel,
            },
        };
        engine.last_frame = engine.frame_at(0.0);
        engine
    }

    pub fn params(&self) -> &EngineParameters {
        &self.params
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Most recently produced frame
    pub fn last_frame(&self) -> FrameOutput {
        self.last_frame
    }

    /// Elapsed active time at `now` (ms)
    pub fn elapsed(&self, now: f64) -> f64 {
        self.clock.elapsed(now)
    }

    /// Replace parameters. Takes effect on the live clock without resetting it.
    /// While stopped, the held frame is re-evaluated so the paused image
    /// reflects the new values.
    pub fn set_params(&mut self, params: EngineParameters) {
        if params == self.params {
            return;
        }
        log::debug!("Engine parameters changed: {:?}", params);
        self.params = params;
        if !self.is_running() {
            self.last_frame = self.frame_at(self.clock.frozen_elapsed());
        }
    }

    /// Stopped -> Running. Returns false if already running.
    pub fn start(&mut self, now: f64) -> bool {
        if self.is_running() {
            return false;
        }
        self.clock.start(now);
        self.rotation.resume(now, &mut self.directions);
        self.state = EngineState::Running;
        log::info!("Engine started at {:.1}ms active", self.clock.elapsed(now));
        true
    }

    /// Running -> Stopped. Freezes the clock and returns the frame for the
    /// pause instant. When already stopped, returns the held frame.
    pub fn stop(&mut self, now: f64) -> FrameOutput {
        if !self.is_running() {
            return self.last_frame;
        }
        self.clock.stop(now);
        self.state = EngineState::Stopped;
        let elapsed = self.clock.elapsed(now);
        self.last_frame = self.frame_at(elapsed);
        log::info!("Engine stopped at {:.1}ms active", elapsed);
        self.last_frame
    }

    /// Advance one display refresh. Returns `None` while stopped.
    pub fn tick(&mut self, now: f64) -> Option<FrameOutput> {
        if !self.is_running() {
            return None;
        }
        self.rotation
            .advance(now, self.params.rotation_speed, &mut self.directions);
        let frame = self.frame_at(self.clock.elapsed(now));
        log::trace!("tick {:.1}: {:?}", now, frame);
        self.last_frame = frame;
        Some(frame)
    }

    /// Frame for a given elapsed active time, holding rotation at its
    /// current accumulated angle. Does not mutate engine state.
    pub fn frame_at(&self, elapsed: f64) -> FrameOutput {
        // speed 0 gives an infinite cycle: frames stay finite but frozen
        if !self.params.has_valid_speed() {
            log::warn!("Invalid engine speed {}", self.params.speed);
        }
        debug_assert!(
            self.params.has_valid_speed(),
            "invalid engine speed: {}",
            self.params.speed
        );

        let so = evaluate(elapsed, &self.params);
        let frame = FrameOutput {
            scale: so.scale,
            offset_x: so.offset_x,
            rotation_deg: self.rotation.angle_deg,
            mode: so.mode,
        };
        if !frame.is_finite() {
            log::warn!("Non-finite frame for parameters {:?}", self.params);
        }
        debug_assert!(frame.is_finite(), "non-finite frame output: {:?}", frame);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rotation::tests::ScriptedDirections;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn scenario_params() -> EngineParameters {
        EngineParameters {
            speed: 0.5,
            end_size_pct: 0.4,
            separation_px: 1000.0,
            rotation_speed: 1.0,
            phase_interval: 3,
        }
    }

    fn engine(params: EngineParameters) -> Engine<ScriptedDirections> {
        Engine::new(params, ScriptedDirections::new(&[1.0, -1.0], &[2000.0]))
    }

    #[test]
    fn test_engine_starts_stopped() {
        let mut e = engine(scenario_params());
        assert_eq!(e.state(), EngineState::Stopped);
        assert!(e.tick(100.0).is_none());
        let frame = e.last_frame();
        assert!((frame.scale - 5.0).abs() < 1e-9);
        assert!((frame.offset_x - 500.5).abs() < 1e-9);
        assert_eq!(frame.mode, PhaseMode::Parallel);
    }

    #[test]
    fn test_start_stop_transitions() {
        let mut e = engine(scenario_params());
        assert!(e.start(0.0));
        assert!(!e.start(10.0));
        assert!(e.is_running());
        assert!(e.tick(FRAME_MS).is_some());

        e.stop(1000.0);
        assert_eq!(e.state(), EngineState::Stopped);
        assert!(e.tick(1016.0).is_none());
    }

    #[test]
    fn test_phase_mode_over_time() {
        let mut e = engine(scenario_params());
        e.start(0.0);
        assert_eq!(e.tick(23_999.0).map(|f| f.mode), Some(PhaseMode::Parallel));
        assert_eq!(e.tick(24_001.0).map(|f| f.mode), Some(PhaseMode::Global));
    }

    #[test]
    fn test_stop_frame_matches_running_formula() {
        let mut e = engine(EngineParameters {
            rotation_speed: 0.0,
            ..scenario_params()
        });
        e.start(500.0);
        let mut now = 500.0;
        while now < 30_000.0 {
            now += FRAME_MS;
            e.tick(now);
        }
        let paused = e.stop(now);
        assert_eq!(paused, e.frame_at(now - 500.0));
        assert_eq!(paused, e.last_frame());
    }

    #[test]
    fn test_pause_resume_preserves_elapsed() {
        let mut e = engine(scenario_params());
        e.start(0.0);
        e.tick(5000.0);
        let at_pause = e.elapsed(5000.0);
        e.stop(5000.0);
        e.start(5000.0);
        assert_eq!(e.elapsed(5000.0), at_pause);

        // Long pause adds nothing
        e.stop(6000.0);
        e.start(100_000.0);
        assert!((e.elapsed(100_000.0) - 6000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_frozen_while_paused() {
        let mut e = engine(scenario_params());
        e.start(0.0);
        let mut now = 0.0;
        for _ in 0..120 {
            now += FRAME_MS;
            e.tick(now);
        }
        let frozen = e.stop(now).rotation_deg;
        assert_ne!(frozen, 0.0);

        // First frame after a long pause applies no delta
        let resume_at = now + 30_000.0;
        e.start(resume_at);
        let first = e.tick(resume_at).map(|f| f.rotation_deg);
        assert_eq!(first, Some(frozen));
    }

    #[test]
    fn test_zero_rotation_speed_keeps_angle() {
        let mut e = engine(EngineParameters {
            rotation_speed: 0.0,
            ..scenario_params()
        });
        e.start(0.0);
        let mut now = 0.0;
        for _ in 0..600 {
            now += FRAME_MS;
            let frame = e.tick(now).map(|f| f.rotation_deg);
            assert_eq!(frame, Some(0.0));
        }
    }

    #[test]
    fn test_param_change_keeps_clock() {
        let mut e = engine(scenario_params());
        e.start(0.0);
        e.tick(10_000.0);
        e.set_params(EngineParameters {
            speed: 1.0,
            ..scenario_params()
        });
        assert!((e.elapsed(10_000.0) - 10_000.0).abs() < 1e-9);
        // speed 1.0 -> 4000ms cycles, 10000ms is half way through cycle 2
        let frame = e.tick(10_000.0).map(|f| f.scale);
        assert!(frame.is_some_and(|s| (s - 2.0).abs() < 1e-9));
    }

    #[test]
    fn test_param_change_while_paused_updates_held_frame() {
        let mut e = engine(scenario_params());
        e.start(0.0);
        e.stop(4000.0);
        // 4000ms into an 8000ms cycle: minimum size
        assert!((e.last_frame().scale - 2.0).abs() < 1e-9);

        e.set_params(EngineParameters {
            end_size_pct: 0.5,
            ..scenario_params()
        });
        assert!((e.last_frame().scale - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_valid_speed_check() {
        assert!(EngineParameters::default().has_valid_speed());
        for speed in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let params = EngineParameters {
                speed,
                ..Default::default()
            };
            assert!(!params.has_valid_speed(), "speed {} accepted", speed);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid engine speed")]
    fn test_zero_speed_engine_panics_in_debug() {
        let _ = engine(EngineParameters {
            speed: 0.0,
            ..scenario_params()
        });
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid engine speed")]
    fn test_zero_speed_set_while_running_panics_in_debug() {
        let mut e = engine(scenario_params());
        e.start(0.0);
        e.tick(FRAME_MS);
        e.set_params(EngineParameters {
            speed: 0.0,
            ..scenario_params()
        });
        e.tick(10_000.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-finite frame output")]
    fn test_zero_separation_global_frame_panics_in_debug() {
        // Parallel at zero separation is still finite (offset 0.5)
        let mut e = engine(EngineParameters {
            separation_px: 0.0,
            ..scenario_params()
        });
        e.start(0.0);
        assert!(e.tick(FRAME_MS).is_some_and(|f| f.is_finite()));

        // Global mode divides 0 by a zero max scale
        e.tick(24_001.0);
    }

    #[test]
    fn test_seeded_engines_match() {
        let params = scenario_params();
        let mut a = Engine::with_seed(params, 7);
        let mut b = Engine::with_seed(params, 7);
        a.start(0.0);
        b.start(0.0);
        let mut now = 0.0;
        for _ in 0..1000 {
            now += FRAME_MS;
            assert_eq!(a.tick(now), b.tick(now));
        }
    }
}
