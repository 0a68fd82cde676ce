//! Stimulus settings and preferences
//!
//! Persisted in LocalStorage. Engine parameters are validated here; the
//! engine itself never clamps.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::EngineParameters;

/// Allowed cycle speed
pub const SPEED_RANGE: RangeInclusive<f64> = 0.1..=1.5;
/// Allowed smallest size as a fraction of the largest
pub const END_SIZE_RANGE: RangeInclusive<f64> = 0.1..=1.0;
/// Allowed center separation (px)
pub const SEPARATION_RANGE: RangeInclusive<f64> = 150.0..=1000.0;
/// Allowed rotation speed
pub const ROTATION_SPEED_RANGE: RangeInclusive<f64> = 0.0..=2.5;
/// Allowed cycles per phase group
pub const PHASE_INTERVAL_RANGE: RangeInclusive<u32> = 1..=8;

/// A parameter outside its allowed range
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("speed {0} outside {min}..={max}", min = SPEED_RANGE.start(), max = SPEED_RANGE.end())]
    Speed(f64),
    #[error("end size {0} outside {min}..={max}", min = END_SIZE_RANGE.start(), max = END_SIZE_RANGE.end())]
    EndSize(f64),
    #[error("separation {0}px outside {min}..={max}", min = SEPARATION_RANGE.start(), max = SEPARATION_RANGE.end())]
    Separation(f64),
    #[error("rotation speed {0} outside {min}..={max}", min = ROTATION_SPEED_RANGE.start(), max = ROTATION_SPEED_RANGE.end())]
    RotationSpeed(f64),
    #[error("phase interval {0} outside {min}..={max}", min = PHASE_INTERVAL_RANGE.start(), max = PHASE_INTERVAL_RANGE.end())]
    PhaseInterval(u32),
}

/// Stimulus settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Animation ===
    /// Cycle speed (one cycle = 4s / speed)
    pub speed: f64,
    /// Smallest size as a fraction of the largest
    pub end_size_pct: f64,
    /// Center separation at full size (px)
    pub separation_px: f64,
    /// Rotation speed (0 = no rotation)
    pub rotation_speed: f64,
    /// Cycles between Parallel/Global switches
    pub phase_interval: u32,

    // === Playback ===
    /// Start playing as soon as the page loads
    pub autoplay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let params = EngineParameters::default();
        Self {
            speed: params.speed,
            end_size_pct: params.end_size_pct,
            separation_px: params.separation_px,
            rotation_speed: params.rotation_speed,
            phase_interval: params.phase_interval,

            autoplay: false,
        }
    }
}

impl Settings {
    /// Engine parameters for these settings (unvalidated)
    pub fn params(&self) -> EngineParameters {
        EngineParameters {
            speed: self.speed,
            end_size_pct: self.end_size_pct,
            separation_px: self.separation_px,
            rotation_speed: self.rotation_speed,
            phase_interval: self.phase_interval,
        }
    }

    /// Check every parameter against its allowed range.
    /// NaN fails every check.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(ParamError::Speed(self.speed));
        }
        if !END_SIZE_RANGE.contains(&self.end_size_pct) {
            return Err(ParamError::EndSize(self.end_size_pct));
        }
        if !SEPARATION_RANGE.contains(&self.separation_px) {
            return Err(ParamError::Separation(self.separation_px));
        }
        if !ROTATION_SPEED_RANGE.contains(&self.rotation_speed) {
            return Err(ParamError::RotationSpeed(self.rotation_speed));
        }
        if !PHASE_INTERVAL_RANGE.contains(&self.phase_interval) {
            return Err(ParamError::PhaseInterval(self.phase_interval));
        }
        Ok(())
    }

    /// Copy with every parameter forced into range (for slider input).
    /// Non-finite values fall back to defaults.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let clamp = |v: f64, range: &RangeInclusive<f64>, fallback: f64| {
            if v.is_finite() {
                v.clamp(*range.start(), *range.end())
            } else {
                fallback
            }
        };
        Self {
            speed: clamp(self.speed, &SPEED_RANGE, defaults.speed),
            end_size_pct: clamp(self.end_size_pct, &END_SIZE_RANGE, defaults.end_size_pct),
            separation_px: clamp(self.separation_px, &SEPARATION_RANGE, defaults.separation_px),
            rotation_speed: clamp(
                self.rotation_speed,
                &ROTATION_SPEED_RANGE,
                defaults.rotation_speed,
            ),
            phase_interval: self
                .phase_interval
                .clamp(*PHASE_INTERVAL_RANGE.start(), *PHASE_INTERVAL_RANGE.end()),
            ..self.clone()
        }
    }

    /// Step speed by `delta`, staying in range
    pub fn step_speed(&mut self, delta: f64) {
        // Round to one decimal so repeated steps don't drift
        let stepped = ((self.speed + delta) * 10.0).round() / 10.0;
        self.speed = stepped.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end());
    }

    /// Step phase interval by `delta`, staying in range
    pub fn step_phase_interval(&mut self, delta: i32) {
        let stepped = self.phase_interval as i32 + delta;
        self.phase_interval = stepped.clamp(
            *PHASE_INTERVAL_RANGE.start() as i32,
            *PHASE_INTERVAL_RANGE.end() as i32,
        ) as u32;
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "vergence_trainer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Some(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    None => log::warn!("Stored settings unusable, using defaults"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    /// Parse stored JSON; out-of-range values are clamped
    pub fn from_json(json: &str) -> Option<Self> {
        let settings: Self = serde_json::from_str(json).ok()?;
        Some(settings.clamped())
    }
}
