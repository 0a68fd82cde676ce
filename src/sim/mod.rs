//! Animation engine
//!
//! All stimulus timing lives here. This module must be pure:
//! - Timestamps are passed in by the caller (ms, monotonic)
//! - Randomness comes from an injected `DirectionSource`
//! - No rendering or platform dependencies

pub mod clock;
pub mod engine;
pub mod phase;
pub mod rotation;
pub mod scale;

pub use clock::ActiveClock;
pub use engine::{Engine, EngineParameters, EngineState, FrameOutput};
pub use phase::{CyclePosition, PhaseMode, resolve_cycle};
pub use rotation::{DirectionSource, PcgDirections, RotationState};
pub use scale::{ScaleOffset, evaluate, oscillation, scale_offset};
