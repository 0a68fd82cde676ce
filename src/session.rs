//! Play/pause orchestration around the frame loop
//!
//! Owns the engine and the handle of the pending display-refresh callback.
//! Pausing hands the handle back to the platform for cancellation, so no
//! tick fires after a logical stop.

use crate::settings::{ParamError, Settings};
use crate::sim::{DirectionSource, Engine, FrameOutput, PcgDirections};

/// Handle of a scheduled refresh callback (requestAnimationFrame id on web)
pub type FrameHandle = i32;

/// A playing or paused stimulus
pub struct Session<D: DirectionSource = PcgDirections> {
    engine: Engine<D>,
    settings: Settings,
    pending: Option<FrameHandle>,
}

impl Session<PcgDirections> {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_engine(Engine::with_seed(settings.params(), seed), settings)
    }
}

impl<D: DirectionSource> Session<D> {
    pub fn with_engine(engine: Engine<D>, settings: Settings) -> Self {
        Self {
            engine,
            settings,
            pending: None,
        }
    }

    pub fn engine(&self) -> &Engine<D> {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_running()
    }

    /// Handle of the callback currently scheduled, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Record the next scheduled callback
    pub fn set_pending(&mut self, handle: FrameHandle) {
        self.pending = Some(handle);
    }

    /// Start playback. Returns true if a frame loop should be scheduled.
    pub fn play(&mut self, now: f64) -> bool {
        self.engine.start(now)
    }

    /// Stop playback. Returns the static frame to draw and the callback
    /// handle the caller must cancel.
    pub fn pause(&mut self, now: f64) -> (FrameOutput, Option<FrameHandle>) {
        let frame = self.engine.stop(now);
        (frame, self.pending.take())
    }

    /// Toggle playback. Returns the frame to draw immediately when pausing.
    pub fn toggle(&mut self, now: f64) -> Toggle {
        if self.is_playing() {
            let (frame, cancel) = self.pause(now);
            Toggle::Paused { frame, cancel }
        } else {
            self.play(now);
            Toggle::Playing
        }
    }

    /// Handle a refresh callback. The consumed handle is cleared; returns
    /// `None` without touching state when paused.
    pub fn on_frame(&mut self, now: f64) -> Option<FrameOutput> {
        self.pending = None;
        self.engine.tick(now)
    }

    /// Apply new settings without resetting the clock. Invalid settings
    /// are rejected and the engine keeps its current parameters.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ParamError> {
        if let Err(e) = settings.validate() {
            log::warn!("Rejected settings: {}", e);
            return Err(e);
        }
        self.engine.set_params(settings.params());
        self.settings = settings;
        Ok(())
    }

    /// Frame to draw right now without advancing anything
    pub fn current_frame(&self) -> FrameOutput {
        self.engine.last_frame()
    }
}

/// Result of a play/pause toggle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Toggle {
    /// Now playing; the caller schedules the frame loop
    Playing,
    /// Now paused; draw `frame` and cancel `cancel` if set
    Paused {
        frame: FrameOutput,
        cancel: Option<FrameHandle>,
    },
}
