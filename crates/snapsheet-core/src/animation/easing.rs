//! L4 Atomic Layer: Easing curves for timing animations
//!
//! Every curve maps progress in [0, 1] onto [0, 1], starts at 0 (except
//! `None`, which holds until the end) and lands exactly on 1 so a snap never
//! finishes short of its target.

pub use crate::config::EasingType;

impl EasingType {
    /// Eased progress for raw progress `t`; input outside [0, 1] is clamped
    #[inline]
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => step_end(t),
            EasingType::Linear => t,
            EasingType::Cubic => power_out(t, 3),
            EasingType::Quintic => power_out(t, 5),
            EasingType::EaseOut => exponential_out(t),
            EasingType::EaseInOut => cubic_in_out(t),
        }
    }
}

#[inline]
fn step_end(t: f64) -> f64 {
    if t < 1.0 {
        0.0
    } else {
        1.0
    }
}

/// 1 - (1 - t)^n
#[inline]
fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// 1 - 2^(-10t), rescaled so that t = 1 maps to exactly 1
#[inline]
fn exponential_out(t: f64) -> f64 {
    const FLOOR: f64 = 1.0 / 1024.0;
    (1.0 - 2.0_f64.powf(-10.0 * t)) / (1.0 - FLOOR)
}

#[inline]
fn cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t.powi(3)
    } else {
        1.0 - (2.0 - 2.0 * t).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [EasingType; 5] = [
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
        EasingType::EaseInOut,
    ];

    #[test]
    fn test_curves_start_and_land_exactly() {
        for easing in CURVES {
            assert!(easing.ease(0.0).abs() < 1e-12, "{:?} at t=0", easing);
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-12, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_curves_never_overshoot() {
        for easing in CURVES {
            let mut prev = 0.0;
            for i in 0..=50 {
                let v = easing.ease(i as f64 / 50.0);
                assert!(v >= prev, "{:?} reversed at step {}", easing, i);
                assert!(v <= 1.0 + 1e-12, "{:?} overshot at step {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_none_holds_until_end() {
        assert_eq!(EasingType::None.ease(0.99), 0.0);
        assert_eq!(EasingType::None.ease(1.0), 1.0);
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(EasingType::Cubic.ease(-0.5), 0.0);
        assert_eq!(EasingType::Quintic.ease(3.0), 1.0);
    }

    #[test]
    fn test_ease_out_front_loads_motion() {
        assert!(EasingType::Cubic.ease(0.25) > 0.5);
        assert!((EasingType::EaseInOut.ease(0.5) - 0.5).abs() < 1e-12);
    }
}
