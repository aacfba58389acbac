//! Settle reporting and content deceleration policy

use std::fmt;

use tracing::debug;

use crate::config::{Platform, SheetConfig};

/// Normal scroll deceleration rate on iOS
pub const IOS_NORMAL_DECELERATION_RATE: f64 = 0.998;
/// Normal scroll deceleration rate on Android
pub const ANDROID_NORMAL_DECELERATION_RATE: f64 = 0.985;
/// Rate that stops scroll momentum immediately
pub const STOP_DECELERATION_RATE: f64 = 0.0;

/// Decides how the inner content may glide after a scroll
///
/// Only the fully open position lets content keep its momentum; anywhere
/// else glide would fight the sheet's partial position.
pub trait DecelerationPolicy: fmt::Debug {
    /// The content's platform-normal deceleration rate
    fn normal_rate(&self) -> f64;

    /// Deceleration rate for content while the sheet rests at `resting_index`
    fn rate_for(&self, resting_index: usize) -> f64 {
        if resting_index == 0 {
            self.normal_rate()
        } else {
            STOP_DECELERATION_RATE
        }
    }
}

impl DecelerationPolicy for Platform {
    fn normal_rate(&self) -> f64 {
        match self {
            Platform::Ios => IOS_NORMAL_DECELERATION_RATE,
            Platform::Android => ANDROID_NORMAL_DECELERATION_RATE,
        }
    }
}

/// Policy with an explicitly configured normal rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDeceleration(pub f64);

impl DecelerationPolicy for FixedDeceleration {
    fn normal_rate(&self) -> f64 {
        self.0
    }
}

/// Policy described by a sheet configuration
pub fn policy_from_config(config: &SheetConfig) -> Box<dyn DecelerationPolicy> {
    match config.deceleration_rate {
        Some(rate) => Box::new(FixedDeceleration(rate)),
        None => Box::new(config.platform),
    }
}

/// Host callback receiving the index the sheet settled at
pub type SettleCallback = Box<dyn FnMut(usize)>;

/// Reports settles to the host, skipping repeats of the same index
#[derive(Default)]
pub struct SettleNotifier {
    last_reported: Option<usize>,
    callback: Option<SettleCallback>,
}

impl fmt::Debug for SettleNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettleNotifier")
            .field("last_reported", &self.last_reported)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl SettleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callback(&mut self, callback: SettleCallback) {
        self.callback = Some(callback);
    }

    /// Index most recently reported to the host
    pub fn last_reported(&self) -> Option<usize> {
        self.last_reported
    }

    /// Record a settle; returns true if the host was notified
    pub fn settle(&mut self, index: usize) -> bool {
        if self.last_reported == Some(index) {
            debug!(index, "Settled at same index, not reporting");
            return false;
        }

        self.last_reported = Some(index);
        debug!(index, "Settled");
        if let Some(callback) = self.callback.as_mut() {
            callback(index);
        }
        true
    }
}
