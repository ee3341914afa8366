use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clock::sanitize_delta;
use crate::config::SequencerConfig;

/// How the accumulated move factor feeds the interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Use the accumulated factor as-is. The factor grows past 1.0, so a
    /// large step can jump beyond the target and never settle.
    #[default]
    Unclamped,
    /// Clamp the factor to [0, 1]; the move always settles once it reaches 1.
    Clamped,
}

/// An in-flight camera move toward a focus point.
///
/// Every step adds `dt * speed` to the factor and places the camera at
/// `start.lerp(target, factor)`. The move is settled as soon as the camera is
/// within the arrival threshold of the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    start: Vec3,
    target: Vec3,
    position: Vec3,
    factor: f32,
    speed: f32,
    threshold: f32,
    interpolation: Interpolation,
    elapsed: f32,
    timeout: Option<f32>,
}

impl CameraMove {
    pub fn new(start: Vec3, target: Vec3, config: &SequencerConfig) -> Self {
        Self {
            start,
            target,
            position: start,
            factor: 0.0,
            speed: config.camera_speed,
            threshold: config.arrival_threshold,
            interpolation: config.interpolation,
            elapsed: 0.0,
            timeout: config.camera_timeout,
        }
    }

    /// Advance by `dt` and return the new camera position.
    #[inline]
    pub fn step(&mut self, dt: f32) -> Vec3 {
        let dt = sanitize_delta(dt);
        self.elapsed += dt;
        self.factor += dt * self.speed;
        let s = match self.interpolation {
            Interpolation::Unclamped => self.factor,
            Interpolation::Clamped => self.factor.min(1.0),
        };
        self.position = self.start.lerp(self.target, s);
        self.position
    }

    /// Within the arrival threshold of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.position.distance(self.target) <= self.threshold
    }

    /// The configured escape time has passed without settling.
    #[inline]
    pub fn is_timed_out(&self) -> bool {
        self.timeout.is_some_and(|limit| self.elapsed >= limit)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Accumulated interpolation factor (unclamped).
    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
