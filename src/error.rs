use crate::ports::PortKind;

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors raised by the dialogue runtime.
///
/// Only construction and package decoding return these to the caller. While a
/// sequence runs, every error is absorbed locally: the affected effect is
/// skipped and the dialogue keeps progressing.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// Node lookup past the end of the graph.
    #[error("node index {index} out of range (graph has {len} nodes)")]
    OutOfRange { index: usize, len: usize },

    /// A presentation capability is not attached to the stage.
    #[error("no {0} port attached")]
    MissingPort(PortKind),

    /// A raw choice payload that maps to neither a node index nor the end sentinel.
    #[error("invalid choice payload: {0}")]
    InvalidChoicePayload(i64),

    /// The choice gate was resolved, cancelled or dropped.
    #[error("choice gate is closed")]
    GateClosed,

    /// Strict speaker policy: a node's speaker matches no cast member.
    #[error("speaker '{speaker}' at node {index} does not match any cast member")]
    UnknownSpeaker { index: usize, speaker: String },

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid package: {0}")]
    InvalidPackage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}
