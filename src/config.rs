use serde::{Deserialize, Serialize};

use crate::camera::Interpolation;
use crate::cast::SpeakerPolicy;
use crate::error::{DialogueError, DialogueResult};

/// Playback tuning for a [`crate::Sequencer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Interpolation factor gained per second of camera movement. Must be > 0.
    pub camera_speed: f32,
    /// Distance at which a camera move counts as arrived.
    pub arrival_threshold: f32,
    pub interpolation: Interpolation,
    /// Abandon a camera move after this many seconds. `None` waits forever.
    pub camera_timeout: Option<f32>,
    /// Seconds per revealed character.
    pub reveal_interval: f32,
    pub speaker_policy: SpeakerPolicy,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            camera_speed: 2.0,
            arrival_threshold: 0.1,
            interpolation: Interpolation::Unclamped,
            camera_timeout: None,
            reveal_interval: 0.05,
            speaker_policy: SpeakerPolicy::Lenient,
        }
    }
}

impl SequencerConfig {
    pub fn with_camera_speed(mut self, speed: f32) -> Self {
        self.camera_speed = speed;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_camera_timeout(mut self, seconds: f32) -> Self {
        self.camera_timeout = Some(seconds);
        self
    }

    pub fn with_reveal_interval(mut self, seconds: f32) -> Self {
        self.reveal_interval = seconds;
        self
    }

    pub fn with_speaker_policy(mut self, policy: SpeakerPolicy) -> Self {
        self.speaker_policy = policy;
        self
    }

    /// Reject values that would stall or corrupt playback. A zero camera
    /// speed or a zero arrival threshold would never arrive.
    pub fn validate(&self) -> DialogueResult<()> {
        if !(self.camera_speed.is_finite() && self.camera_speed > 0.0) {
            return Err(DialogueError::InvalidConfig(format!(
                "camera speed must be > 0, got {}",
                self.camera_speed
            )));
        }
        if !(self.arrival_threshold.is_finite() && self.arrival_threshold > 0.0) {
            return Err(DialogueError::InvalidConfig(format!(
                "arrival threshold must be > 0, got {}",
                self.arrival_threshold
            )));
        }
        if !(self.reveal_interval.is_finite() && self.reveal_interval > 0.0) {
            return Err(DialogueError::InvalidConfig(format!(
                "reveal interval must be > 0, got {}",
                self.reveal_interval
            )));
        }
        if let Some(timeout) = self.camera_timeout {
            if !(timeout.is_finite() && timeout > 0.0) {
                return Err(DialogueError::InvalidConfig(format!(
                    "camera timeout must be > 0, got {timeout}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SequencerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera_speed, 2.0);
        assert_eq!(config.reveal_interval, 0.05);
        assert_eq!(config.interpolation, Interpolation::Unclamped);
    }

    #[test]
    fn test_zero_speed_rejected() {
        let config = SequencerConfig::default().with_camera_speed(0.0);
        assert!(matches!(config.validate(), Err(DialogueError::InvalidConfig(_))));
        let config = SequencerConfig::default().with_camera_speed(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_arrival_threshold_rejected() {
        let mut config = SequencerConfig::default();
        config.arrival_threshold = 0.0;
        assert!(matches!(config.validate(), Err(DialogueError::InvalidConfig(_))));
        config.arrival_threshold = 0.01;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_reveal_and_timeout_rejected() {
        assert!(SequencerConfig::default()
            .with_reveal_interval(0.0)
            .validate()
            .is_err());
        assert!(SequencerConfig::default()
            .with_camera_timeout(-1.0)
            .validate()
            .is_err());
    }
}
