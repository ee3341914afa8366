//! Narrow capabilities the sequencer drives. Hosts implement these over their
//! engine's camera, UI, audio and animation systems.

use std::fmt;

use glam::Vec3;

use crate::cast::ActorKey;
use crate::error::{DialogueError, DialogueResult};
use crate::gate::ChoiceResolver;
use crate::graph::{AudioHandle, ChoiceTarget};

/// Camera the sequencer moves toward each node's focus point.
pub trait CameraPort {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

/// Speaker label and dialogue line display.
pub trait TextPort {
    fn set_speaker(&mut self, speaker: &str);
    fn set_text(&mut self, text: &str);
    /// Blank both speaker and text.
    fn clear(&mut self);
}

/// Fire-and-forget voice playback.
pub trait AudioPort {
    fn play(&mut self, clip: &AudioHandle);
}

pub trait AnimationPort {
    fn trigger(&mut self, actor: &ActorKey, trigger: &str);
}

/// Choice presentation. The port owns the resolver while options are shown and
/// reports the player's pick through it.
pub trait ChoicePort {
    fn present(&mut self, options: &[ChoiceOption], resolver: ChoiceResolver);
    /// Remove any shown options. Must be safe to call when nothing is shown.
    fn dismiss(&mut self);
}

/// One selectable option as published to the choice port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub target: ChoiceTarget,
}

/// Which capability a [`DialogueError::MissingPort`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    Camera,
    Text,
    Audio,
    Animation,
    Choice,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortKind::Camera => "camera",
            PortKind::Text => "text",
            PortKind::Audio => "audio",
            PortKind::Animation => "animation",
            PortKind::Choice => "choice",
        };
        f.write_str(name)
    }
}

/// The set of presentation ports attached to a sequencer. Every port is
/// optional; a missing one only skips its step.
#[derive(Default)]
pub struct Stage {
    camera: Option<Box<dyn CameraPort>>,
    text: Option<Box<dyn TextPort>>,
    audio: Option<Box<dyn AudioPort>>,
    animation: Option<Box<dyn AnimationPort>>,
    choices: Option<Box<dyn ChoicePort>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, port: impl CameraPort + 'static) -> Self {
        self.camera = Some(Box::new(port));
        self
    }

    pub fn with_text(mut self, port: impl TextPort + 'static) -> Self {
        self.text = Some(Box::new(port));
        self
    }

    pub fn with_audio(mut self, port: impl AudioPort + 'static) -> Self {
        self.audio = Some(Box::new(port));
        self
    }

    pub fn with_animation(mut self, port: impl AnimationPort + 'static) -> Self {
        self.animation = Some(Box::new(port));
        self
    }

    pub fn with_choices(mut self, port: impl ChoicePort + 'static) -> Self {
        self.choices = Some(Box::new(port));
        self
    }

    /// Ports that are not attached.
    pub fn missing(&self) -> Vec<PortKind> {
        let mut missing = Vec::new();
        if self.camera.is_none() {
            missing.push(PortKind::Camera);
        }
        if self.text.is_none() {
            missing.push(PortKind::Text);
        }
        if self.audio.is_none() {
            missing.push(PortKind::Audio);
        }
        if self.animation.is_none() {
            missing.push(PortKind::Animation);
        }
        if self.choices.is_none() {
            missing.push(PortKind::Choice);
        }
        missing
    }

    pub fn camera(&mut self) -> DialogueResult<&mut (dyn CameraPort + 'static)> {
        self.camera
            .as_deref_mut()
            .ok_or(DialogueError::MissingPort(PortKind::Camera))
    }

    pub fn text(&mut self) -> DialogueResult<&mut (dyn TextPort + 'static)> {
        self.text
            .as_deref_mut()
            .ok_or(DialogueError::MissingPort(PortKind::Text))
    }

    pub fn audio(&mut self) -> DialogueResult<&mut (dyn AudioPort + 'static)> {
        self.audio
            .as_deref_mut()
            .ok_or(DialogueError::MissingPort(PortKind::Audio))
    }

    pub fn animation(&mut self) -> DialogueResult<&mut (dyn AnimationPort + 'static)> {
        self.animation
            .as_deref_mut()
            .ok_or(DialogueError::MissingPort(PortKind::Animation))
    }

    pub fn choices(&mut self) -> DialogueResult<&mut (dyn ChoicePort + 'static)> {
        self.choices
            .as_deref_mut()
            .ok_or(DialogueError::MissingPort(PortKind::Choice))
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("missing", &self.missing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCamera(Vec3);

    impl CameraPort for FixedCamera {
        fn position(&self) -> Vec3 {
            self.0
        }

        fn set_position(&mut self, position: Vec3) {
            self.0 = position;
        }
    }

    #[test]
    fn test_missing_ports() {
        let mut stage = Stage::new().with_camera(FixedCamera(Vec3::ZERO));
        assert!(stage.camera().is_ok());
        assert!(matches!(
            stage.audio(),
            Err(DialogueError::MissingPort(PortKind::Audio))
        ));
        assert_eq!(
            stage.missing(),
            vec![PortKind::Text, PortKind::Audio, PortKind::Animation, PortKind::Choice]
        );
    }

    #[test]
    fn test_camera_port_roundtrip() {
        let mut stage = Stage::new().with_camera(FixedCamera(Vec3::ONE));
        let camera = stage.camera().unwrap();
        camera.set_position(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(camera.position(), Vec3::new(4.0, 0.0, 0.0));
    }
}
