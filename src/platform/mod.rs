//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Monotonic timestamps (ms)
//! - Run seeds
//! - Canvas backing-store sizing

/// Milliseconds since page load (`performance.now()`)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Milliseconds since first call in this process
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Seed for the rotation random walk, from wall-clock time
#[cfg(target_arch = "wasm32")]
pub fn run_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Backing-store size in device pixels for a canvas of the given CSS size
pub fn canvas_pixel_size(client_width: i32, client_height: i32, pixel_ratio: f64) -> (u32, u32) {
    let to_px = |css: i32| (css.max(0) as f64 * pixel_ratio).round() as u32;
    (to_px(client_width), to_px(client_height))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_pixel_size() {
        assert_eq!(canvas_pixel_size(800, 600, 1.0), (800, 600));
        assert_eq!(canvas_pixel_size(800, 600, 2.0), (1600, 1200));
        assert_eq!(canvas_pixel_size(333, 100, 1.5), (500, 150));
        assert_eq!(canvas_pixel_size(-1, 0, 2.0), (0, 0));
    }

    #[test]
    fn test_now_ms_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
