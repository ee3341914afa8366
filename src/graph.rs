use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{DialogueError, DialogueResult};

/// Authoring default for how long a choice-free line stays up.
pub const DEFAULT_AUTO_ADVANCE_DELAY: f32 = 2.0;

/// Opaque reference to a sound asset, interpreted by the audio port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle(pub String);

impl AudioHandle {
    pub fn new(asset: impl Into<String>) -> Self {
        Self(asset.into())
    }
}

/// Where a choice sends the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceTarget {
    /// Jump to a node index. Indices past the end terminate the sequence.
    Node(usize),
    /// Explicit end of the dialogue.
    End,
}

impl ChoiceTarget {
    /// Raw integer used by hosts for [`ChoiceTarget::End`].
    pub const END_SENTINEL: i64 = -1;

    /// Decode a raw integer payload delivered by a host UI.
    pub fn from_raw(raw: i64) -> DialogueResult<Self> {
        if raw == Self::END_SENTINEL {
            return Ok(ChoiceTarget::End);
        }
        usize::try_from(raw)
            .map(ChoiceTarget::Node)
            .map_err(|_| DialogueError::InvalidChoicePayload(raw))
    }
}

impl From<usize> for ChoiceTarget {
    fn from(index: usize) -> Self {
        ChoiceTarget::Node(index)
    }
}

/// A player-selectable branch on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub label: String,
    pub target: ChoiceTarget,
}

impl DialogueChoice {
    pub fn new(label: impl Into<String>, target: impl Into<ChoiceTarget>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    /// Choice that ends the dialogue.
    pub fn end(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ChoiceTarget::End,
        }
    }
}

/// One authored dialogue beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub speaker: String,
    pub text: String,
    pub audio: Option<AudioHandle>,
    pub camera_focus: Option<Vec3>,
    pub animation_trigger: Option<String>,
    /// Empty means the node auto-advances.
    pub choices: Vec<DialogueChoice>,
    /// Seconds to hold before auto-advancing. Ignored when `choices` is non-empty.
    pub auto_advance_delay: f32,
}

impl DialogueNode {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            audio: None,
            camera_focus: None,
            animation_trigger: None,
            choices: Vec::new(),
            auto_advance_delay: DEFAULT_AUTO_ADVANCE_DELAY,
        }
    }

    /// Set the voice clip.
    pub fn with_audio(mut self, audio: AudioHandle) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Set the camera focus point.
    pub fn with_camera_focus(mut self, focus: Vec3) -> Self {
        self.camera_focus = Some(focus);
        self
    }

    /// Set the animation trigger fired on the speaking actor.
    pub fn with_animation(mut self, trigger: impl Into<String>) -> Self {
        self.animation_trigger = Some(trigger.into());
        self
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: DialogueChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set the auto-advance delay.
    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.auto_advance_delay = seconds;
        self
    }

    #[inline]
    pub fn is_branching(&self) -> bool {
        !self.choices.is_empty()
    }
}

/// Immutable authored node sequence. Edges are either the implicit `index + 1`
/// fallthrough or an explicit [`ChoiceTarget`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueGraph {
    nodes: Vec<DialogueNode>,
    start_index: usize,
}

impl DialogueGraph {
    pub fn new(nodes: Vec<DialogueNode>) -> Self {
        Self {
            nodes,
            start_index: 0,
        }
    }

    /// Set the entry node. An index past the end yields an empty run.
    pub fn with_start(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    #[inline]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    /// Bounds-checked lookup. `None` is the normal end-of-dialogue signal.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&DialogueNode> {
        self.nodes.get(index)
    }

    /// Lookup that reports out-of-range indices as an error.
    pub fn node_at(&self, index: usize) -> DialogueResult<&DialogueNode> {
        self.nodes.get(index).ok_or(DialogueError::OutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    /// Check authored values. Choice targets are not checked: out-of-range
    /// targets end the dialogue.
    pub fn validate(&self) -> DialogueResult<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            let delay = node.auto_advance_delay;
            if !delay.is_finite() || delay < 0.0 {
                return Err(DialogueError::InvalidGraph(format!(
                    "node {index} has auto-advance delay {delay}"
                )));
            }
            if node.camera_focus.is_some_and(|focus| !focus.is_finite()) {
                return Err(DialogueError::InvalidGraph(format!(
                    "node {index} has a non-finite camera focus"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DialogueGraph {
        DialogueGraph::new(vec![
            DialogueNode::new("Character 1", "Hi")
                .with_choice(DialogueChoice::new("A", 1))
                .with_choice(DialogueChoice::end("Leave")),
            DialogueNode::new("Character 2", "Path A").with_delay(0.0),
        ])
    }

    #[test]
    fn test_node_builder() {
        let node = DialogueNode::new("Character 1", "Marhaba")
            .with_audio(AudioHandle::new("vo/marhaba.ogg"))
            .with_camera_focus(Vec3::new(1.0, 2.0, 3.0))
            .with_animation("Wave");
        assert_eq!(node.auto_advance_delay, DEFAULT_AUTO_ADVANCE_DELAY);
        assert_eq!(node.animation_trigger.as_deref(), Some("Wave"));
        assert!(!node.is_branching());
    }

    #[test]
    fn test_node_at_out_of_range() {
        let graph = sample();
        assert!(graph.node_at(1).is_ok());
        match graph.node_at(2) {
            Err(DialogueError::OutOfRange { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("Expected OutOfRange, got {other:?}"),
        }
        assert!(graph.get(2).is_none());
    }

    #[test]
    fn test_choice_target_from_raw() {
        assert_eq!(ChoiceTarget::from_raw(3).unwrap(), ChoiceTarget::Node(3));
        assert_eq!(ChoiceTarget::from_raw(-1).unwrap(), ChoiceTarget::End);
        assert!(matches!(
            ChoiceTarget::from_raw(-7),
            Err(DialogueError::InvalidChoicePayload(-7))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_delay() {
        let graph = DialogueGraph::new(vec![DialogueNode::new("a", "b").with_delay(-1.0)]);
        assert!(matches!(graph.validate(), Err(DialogueError::InvalidGraph(_))));

        let graph = DialogueGraph::new(vec![DialogueNode::new("a", "b").with_delay(f32::NAN)]);
        assert!(graph.validate().is_err());

        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_targets_are_valid() {
        let graph = DialogueGraph::new(vec![
            DialogueNode::new("a", "b").with_choice(DialogueChoice::new("far", 99)),
        ])
        .with_start(5);
        assert!(graph.validate().is_ok());
        assert_eq!(graph.start_index(), 5);
    }
}
