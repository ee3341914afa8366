use serde::{Deserialize, Serialize};

use crate::error::{DialogueError, DialogueResult};
use crate::graph::DialogueGraph;

/// Identifier of an animatable actor, as understood by the animation port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorKey(pub String);

impl ActorKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How unmatched speakers are handled when binding a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerPolicy {
    /// Unmatched speakers simply never fire animation triggers.
    #[default]
    Lenient,
    /// A node with an animation trigger whose speaker matches nobody fails the bind.
    Strict,
}

/// A single actor and the speaker labels that route to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub key: ActorKey,
    pub aliases: Vec<String>,
}

impl CastMember {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: ActorKey::new(key),
            aliases: Vec::new(),
        }
    }

    /// Add a speaker label that routes to this actor.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Registry of actors that can receive animation triggers.
/// Registration order is lookup priority.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cast {
    members: Vec<CastMember>,
}

impl Cast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor.
    pub fn with_member(mut self, member: CastMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn add_member(&mut self, member: CastMember) {
        self.members.push(member);
    }

    #[inline]
    pub fn members(&self) -> &[CastMember] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Resolve a speaker label to an actor.
    ///
    /// Exact key matches win over aliases, which win over a key contained in
    /// the label (so "Character 1 (whispering)" still routes to "Character 1").
    pub fn resolve(&self, speaker: &str) -> Option<&ActorKey> {
        if speaker.is_empty() {
            return None;
        }
        self.members
            .iter()
            .find(|m| m.key.0 == speaker)
            .or_else(|| {
                self.members
                    .iter()
                    .find(|m| m.aliases.iter().any(|a| a == speaker))
            })
            .or_else(|| {
                self.members
                    .iter()
                    .find(|m| !m.key.0.is_empty() && speaker.contains(m.key.as_str()))
            })
            .map(|m| &m.key)
    }

    /// Resolve every node's speaker once, ahead of playback.
    pub fn bind(&self, graph: &DialogueGraph, policy: SpeakerPolicy) -> DialogueResult<SpeakerBindings> {
        let mut actors = Vec::with_capacity(graph.len());
        for (index, node) in graph.nodes().iter().enumerate() {
            let actor = self.resolve(&node.speaker).cloned();
            if actor.is_none() && node.animation_trigger.is_some() {
                if policy == SpeakerPolicy::Strict {
                    return Err(DialogueError::UnknownSpeaker {
                        index,
                        speaker: node.speaker.clone(),
                    });
                }
                tracing::debug!(
                    index,
                    speaker = %node.speaker,
                    "speaker matches no cast member; animation trigger will be skipped"
                );
            }
            actors.push(actor);
        }
        Ok(SpeakerBindings { actors })
    }
}

/// Per-node actor routing computed by [`Cast::bind`].
#[derive(Debug, Clone, Default)]
pub struct SpeakerBindings {
    actors: Vec<Option<ActorKey>>,
}

impl SpeakerBindings {
    /// Actor bound to the node at `index`, if any.
    #[inline]
    pub fn actor_for(&self, index: usize) -> Option<&ActorKey> {
        self.actors.get(index).and_then(|a| a.as_ref())
    }
}
