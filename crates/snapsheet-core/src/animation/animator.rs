//! L3 Molecular Layer: Interruptible snap animation controller
//!
//! Combines easing, timing and spring atoms to move the sheet from its
//! release offset to a snap point. Call `start()` to begin an animation, then
//! `update()` once per frame to publish the intermediate position.

use std::time::Duration;

use tracing::debug;

use super::easing::EasingType;
use super::spring::Spring;
use super::timing::{clamp_frame_delta, is_complete, lerp, progress};
use crate::config::AnimationConfig;
use crate::Result;

/// Bookkeeping for one animation from a release offset to a snap point
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRun {
    pub from: f64,
    pub to: f64,
    pub elapsed: Duration,
    pub finished: bool,
}

#[derive(Debug, Clone)]
enum Motion {
    Timing { duration: Duration, easing: EasingType },
    Spring(Spring),
}

/// Active animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    run: AnimationRun,
    motion: Motion,
}

/// Result of advancing the animator by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationFrame {
    /// Nothing is animating
    Idle,
    /// Intermediate position published this frame
    Running(f64),
    /// The animation reached its target this frame
    Finished(f64),
}

/// Snap animation controller
///
/// Holds at most one animation. Starting a new one replaces the current one
/// from the current intermediate position; `interrupt()` freezes it in place.
#[derive(Debug, Clone)]
pub struct Animator {
    policy: AnimationConfig,
    animation: Option<ActiveAnimation>,
    position: f64,
    last_run: Option<AnimationRun>,
}

impl Animator {
    /// Create an animator, rejecting parameters that can never settle
    pub fn new(policy: AnimationConfig, position: f64) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            animation: None,
            position,
            last_run: None,
        })
    }

    pub fn policy(&self) -> &AnimationConfig {
        &self.policy
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Last published position
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Target of the running animation, if any
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.run.to)
    }

    /// The running animation, or the most recent one once it has finished
    pub fn run(&self) -> Option<&AnimationRun> {
        self.animation
            .as_ref()
            .map(|a| &a.run)
            .or(self.last_run.as_ref())
    }

    /// Start animating from `from` to `to`, replacing any running animation
    pub fn start(&mut self, from: f64, to: f64) {
        self.start_with_velocity(from, to, 0.0);
    }

    /// Start animating with the gesture's release velocity (points/s)
    ///
    /// Only springs use the velocity; timing curves always start at rest.
    pub fn start_with_velocity(&mut self, from: f64, to: f64, velocity: f64) {
        let motion = match &self.policy {
            AnimationConfig::Timing(timing) => Motion::Timing {
                duration: Duration::from_millis(timing.duration_ms),
                easing: timing.easing,
            },
            AnimationConfig::Spring(spring) => Motion::Spring(Spring::new(spring, from, to, velocity)),
        };

        debug!(from, to, velocity, "Animation started");
        self.position = from;
        self.animation = Some(ActiveAnimation {
            run: AnimationRun {
                from,
                to,
                elapsed: Duration::ZERO,
                finished: false,
            },
            motion,
        });
    }

    /// Freeze a running animation at its current position
    ///
    /// Returns the frozen position, or `None` if nothing was running.
    pub fn interrupt(&mut self) -> Option<f64> {
        let mut animation = self.animation.take()?;
        animation.run.finished = true;
        debug!(
            position = self.position,
            target = animation.run.to,
            "Animation interrupted"
        );
        self.last_run = Some(animation.run);
        Some(self.position)
    }

    /// Advance the running animation by one frame
    pub fn update(&mut self, dt: Duration) -> AnimationFrame {
        let Some(animation) = self.animation.as_mut() else {
            return AnimationFrame::Idle;
        };

        animation.run.elapsed += dt;
        let run = &animation.run;

        let done = match &mut animation.motion {
            Motion::Timing { duration, easing } => {
                if is_complete(run.elapsed, *duration) {
                    true
                } else {
                    let t = progress(run.elapsed, *duration);
                    self.position = lerp(run.from, run.to, easing.ease(t));
                    false
                }
            }
            Motion::Spring(spring) => {
                let done = spring.step(clamp_frame_delta(dt));
                self.position = spring.position();
                done
            }
        };

        if !done {
            return AnimationFrame::Running(self.position);
        }

        let mut run = animation.run.clone();
        run.finished = true;
        self.position = run.to;
        self.animation = None;
        debug!(position = run.to, elapsed_ms = run.elapsed.as_millis() as u64, "Animation finished");
        self.last_run = Some(run);
        AnimationFrame::Finished(self.position)
    }

    /// Jump to a position without animating
    pub fn set_position(&mut self, position: f64) {
        self.animation = None;
        self.position = position;
    }
}
