pub mod graph;
pub mod cast;
pub mod ports;
pub mod clock;
pub mod camera;
pub mod reveal;
pub mod gate;
pub mod sequencer;
pub mod config;
pub mod error;
pub mod package;

// Re-exports
pub use graph::{AudioHandle, ChoiceTarget, DialogueChoice, DialogueGraph, DialogueNode};
pub use cast::{ActorKey, Cast, CastMember, SpeakerBindings, SpeakerPolicy};
pub use ports::{AnimationPort, AudioPort, CameraPort, ChoiceOption, ChoicePort, PortKind, Stage, TextPort};
pub use clock::Delay;
pub use camera::{CameraMove, Interpolation};
pub use reveal::{TextReveal, Typewriter};
pub use gate::{ChoiceGate, ChoiceResolver};
pub use sequencer::{Phase, Sequencer};
pub use config::SequencerConfig;
pub use error::{DialogueError, DialogueResult};
pub use package::{DialoguePackage, PackageMetadata};
