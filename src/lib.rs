//! Vergence Trainer - binocular optotype stimulus
//!
//! Core modules:
//! - `sim`: Animation engine (clock, phase, scale/offset, rotation)
//! - `renderer`: Optotype geometry and WebGPU pipeline
//! - `platform`: Browser/native platform abstraction
//! - `settings`: User-tunable parameters, persisted to LocalStorage
//! - `session`: Play/pause orchestration around the frame loop

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{FrameHandle, Session};
pub use settings::{ParamError, Settings};
pub use sim::{Engine, EngineParameters, FrameOutput, PhaseMode};

/// Stimulus configuration constants
pub mod consts {
    /// Outer radius of the optotype ring (shape units)
    pub const R_OUT: f64 = 100.0;
    /// Inner radius of the optotype ring (shape units)
    pub const R_IN: f64 = 60.0;
    /// Half the height of the gap opening (shape units)
    pub const GAP_HALF_HEIGHT: f64 = 20.0;

    /// Duration of one scale cycle at speed 1.0 (ms)
    pub const BASE_CYCLE_MS: f64 = 4000.0;
    /// Padding added to half the separation so the pair never touches
    pub const OFFSET_PADDING_PX: f64 = 0.5;

    /// Degrees per second of rotation at rotation speed 1.0
    pub const ROTATION_DEG_PER_SEC: f64 = 90.0;
    /// Fraction of the remaining distance to the target direction covered per frame
    pub const DIRECTION_SMOOTHING: f64 = 0.02;
    /// Minimum time between direction re-rolls (ms)
    pub const DIRECTION_HOLD_MIN_MS: f64 = 2000.0;
    /// Random extra hold time on top of the minimum (ms)
    pub const DIRECTION_HOLD_JITTER_MS: f64 = 4000.0;
}
