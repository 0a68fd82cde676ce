//! Active-time clock
//!
//! Tracks elapsed time across pause/resume cycles. Wall-clock time spent
//! paused is never counted.

/// Elapsed "active" time, independent of gaps while stopped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveClock {
    /// Virtual start timestamp while running (ms), `None` while stopped
    active_start: Option<f64>,
    /// Elapsed active time frozen at the last stop (ms)
    accumulated: f64,
}

impl ActiveClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active_start.is_some()
    }

    /// Resume counting from where the last stop left off.
    /// No-op if already running.
    pub fn start(&mut self, now: f64) {
        if self.active_start.is_none() {
            self.active_start = Some(now - self.accumulated);
        }
    }

    /// Freeze elapsed time at `now`. No-op if already stopped.
    pub fn stop(&mut self, now: f64) {
        if let Some(start) = self.active_start.take() {
            self.accumulated = now - start;
        }
    }

    /// Elapsed time held at the last stop (ms)
    pub fn frozen_elapsed(&self) -> f64 {
        self.accumulated
    }

    /// Elapsed active time in ms
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.active_start {
            Some(start) => now - start,
            None => self.accumulated,
        }
    }
}
