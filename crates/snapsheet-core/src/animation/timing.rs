//! L4 Atomic Layer: Time calculation utilities for frame-stepped animations
//!
//! Time is accumulated from per-frame deltas rather than read from a wall
//! clock, so a run is fully determined by the sequence of ticks it receives.

use std::time::Duration;

/// Largest frame delta a single step may integrate
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(64);

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
///
/// # Arguments
/// * `elapsed` - Time accumulated since the animation started
/// * `duration` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(elapsed: Duration, duration: Duration) -> bool {
    elapsed >= duration
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
///
/// # Returns
/// Interpolated value
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Clamp a frame delta so a stalled frame can't jump a spring across its target
#[inline]
pub fn clamp_frame_delta(dt: Duration) -> Duration {
    dt.min(MAX_FRAME_DELTA)
}
