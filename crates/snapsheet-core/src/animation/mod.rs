//! Snap animation system
//!
//! Moves the sheet to its next snap point under either a fixed-duration eased
//! curve or a damped spring, one frame at a time, and can be frozen mid-flight
//! by a new gesture.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic, quintic, exponential, in-out)
//! - `timing` - Progress, interpolation and frame delta helpers
//! - `spring` - Closed-form damped spring stepping
//!
//! ## L3 Molecular Layer
//! - `animator` - Interruptible animation controller combining atoms
//!
//! # Usage
//!
//! ```ignore
//! use snapsheet_core::animation::{Animator, AnimationFrame};
//! use snapsheet_core::AnimationConfig;
//!
//! let mut animator = Animator::new(AnimationConfig::default(), 600.0)?;
//! animator.start(600.0, 100.0);
//!
//! // In the frame loop
//! match animator.update(frame_delta) {
//!     AnimationFrame::Running(offset) => render(offset),
//!     AnimationFrame::Finished(offset) => settle(offset),
//!     AnimationFrame::Idle => {}
//! }
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod spring;
pub mod timing;

// L3 Molecular Layer
pub mod animator;

// Re-exports for convenient access
pub use animator::{AnimationFrame, AnimationRun, Animator};
pub use easing::EasingType;
pub use spring::Spring;
