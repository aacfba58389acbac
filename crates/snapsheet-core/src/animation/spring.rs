//! L4 Atomic Layer: Damped spring stepping
//!
//! Closed-form damped harmonic oscillator advanced one frame at a time. Each
//! step solves the oscillator from the current position and velocity, so
//! frame deltas of any size stay stable.

use std::time::Duration;

use crate::config::SpringConfig;

/// Spring animation state between two offsets
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    /// Create a spring at `from` heading for `to` with an initial velocity (points/s)
    pub fn new(config: &SpringConfig, from: f64, to: f64, velocity: f64) -> Self {
        Self {
            config: config.clone(),
            position: from,
            velocity,
            target: to,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Advance the spring by `dt`. Returns true once it has come to rest.
    pub fn step(&mut self, dt: Duration) -> bool {
        let t = dt.as_secs_f64();
        let previous = self.position;

        let c = self.config.damping;
        let m = self.config.mass;
        let k = self.config.stiffness;

        let v0 = -self.velocity;
        let x0 = self.target - self.position;

        let zeta = c / (2.0 * (k * m).sqrt());
        let omega0 = (k / m).sqrt();

        let (position, velocity) = if zeta < 1.0 {
            // Under-damped
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega0 * t).exp();
            let (sin, cos) = (omega1 * t).sin_cos();
            let a = (v0 + zeta * omega0 * x0) / omega1;

            let position = self.target - envelope * (a * sin + x0 * cos);
            let velocity = zeta * omega0 * envelope * (a * sin + x0 * cos)
                - envelope * (cos * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin);
            (position, velocity)
        } else {
            // Critically damped; over-damped springs settle the same way
            let envelope = (-omega0 * t).exp();
            let position = self.target - envelope * (x0 + (v0 + omega0 * x0) * t);
            let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
            (position, velocity)
        };

        self.position = position;
        self.velocity = velocity;

        let overshooting = self.config.overshoot_clamping
            && if previous < self.target {
                position > self.target
            } else {
                position < self.target
            };
        let slow = velocity.abs() <= self.config.rest_speed_threshold;
        let near = (self.target - position).abs() <= self.config.rest_displacement_threshold;

        if overshooting || (slow && near) {
            self.position = self.target;
            self.velocity = 0.0;
            return true;
        }
        false
    }
}
