//! Dialogue state machine.
//!
//! `Idle → Presenting → (AwaitingChoice | AutoAdvancing) → Presenting → … → Terminated`
//!
//! The host drives playback with [`Sequencer::tick`], the single resumption
//! point. Each node runs its effects in a fixed order: camera move (blocking),
//! speaker label, animation trigger, audio (fire-and-forget), typewriter
//! reveal (blocking). Then the node either opens a choice gate or waits its
//! auto-advance delay. A cursor outside the graph is the normal way a
//! dialogue ends.

use crate::camera::CameraMove;
use crate::cast::{Cast, SpeakerBindings};
use crate::clock::{sanitize_delta, Delay};
use crate::config::SequencerConfig;
use crate::error::DialogueResult;
use crate::gate::{ChoiceGate, ChoiceResolver};
use crate::graph::{ChoiceTarget, DialogueGraph};
use crate::ports::Stage;
use crate::reveal::Typewriter;

/// Observable sequencer state. Indices are node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Presenting(usize),
    AwaitingChoice(usize),
    AutoAdvancing(usize),
    Terminated,
    Cancelled,
}

impl Phase {
    /// No further events will be processed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Terminated | Phase::Cancelled)
    }
}

#[derive(Debug)]
enum Presentation {
    Camera(CameraMove),
    Reveal(Typewriter),
}

#[derive(Debug)]
enum State {
    Idle,
    Presenting { index: usize, step: Presentation },
    AwaitingChoice { index: usize, gate: ChoiceGate },
    AutoAdvancing { index: usize, delay: Delay },
    Terminated,
    Cancelled,
}

/// Drives one playthrough of a [`DialogueGraph`] through a [`Stage`].
#[derive(Debug)]
pub struct Sequencer {
    graph: DialogueGraph,
    stage: Stage,
    config: SequencerConfig,
    bindings: SpeakerBindings,
    current_index: usize,
    state: State,
    /// Resolver for an open gate when no choice port is attached.
    parked_resolver: Option<ChoiceResolver>,
    elapsed: f32,
}

impl Sequencer {
    /// Validate the graph and config and bind speakers to the cast.
    pub fn new(
        graph: DialogueGraph,
        cast: &Cast,
        stage: Stage,
        config: SequencerConfig,
    ) -> DialogueResult<Self> {
        config.validate()?;
        graph.validate()?;
        let bindings = cast.bind(&graph, config.speaker_policy)?;
        let current_index = graph.start_index();
        Ok(Self {
            graph,
            stage,
            config,
            bindings,
            current_index,
            state: State::Idle,
            parked_resolver: None,
            elapsed: 0.0,
        })
    }

    /// Enter the start node and run until the first suspension point.
    /// Only valid from `Idle`; a sequence cannot be restarted.
    pub fn start(&mut self) -> Phase {
        if matches!(self.state, State::Idle) {
            tracing::info!(
                nodes = self.graph.len(),
                start = self.graph.start_index(),
                "dialogue started"
            );
            self.advance_to(ChoiceTarget::Node(self.graph.start_index()));
        }
        self.phase()
    }

    /// Let `dt` seconds pass and resume from the current suspension point.
    pub fn tick(&mut self, dt: f32) -> Phase {
        let dt = sanitize_delta(dt);
        let state = std::mem::replace(&mut self.state, State::Idle);
        match state {
            idle_or_done @ (State::Idle | State::Terminated | State::Cancelled) => {
                self.state = idle_or_done;
                return self.phase();
            }
            State::Presenting {
                index,
                step: Presentation::Camera(mut camera_move),
            } => {
                self.elapsed += dt;
                let position = camera_move.step(dt);
                if let Ok(camera) = self.stage.camera() {
                    camera.set_position(position);
                }
                tracing::trace!(index, ?position, "camera step");
                if camera_move.is_settled() {
                    self.present_line(index);
                } else if camera_move.is_timed_out() {
                    tracing::warn!(
                        index,
                        elapsed = camera_move.elapsed(),
                        "camera move timed out before arriving"
                    );
                    self.present_line(index);
                } else {
                    self.state = State::Presenting {
                        index,
                        step: Presentation::Camera(camera_move),
                    };
                }
            }
            State::Presenting {
                index,
                step: Presentation::Reveal(mut typewriter),
            } => {
                self.elapsed += dt;
                if let Some(prefix) = typewriter.tick(dt) {
                    show_text(&mut self.stage, &prefix);
                }
                if typewriter.is_complete() {
                    self.finish_line(index);
                } else {
                    self.state = State::Presenting {
                        index,
                        step: Presentation::Reveal(typewriter),
                    };
                }
            }
            State::AwaitingChoice { index, mut gate } => {
                self.elapsed += dt;
                match gate.poll() {
                    Some(target) => {
                        tracing::debug!(index, ?target, "choice resolved");
                        drop(gate);
                        self.parked_resolver = None;
                        if let Ok(choices) = self.stage.choices() {
                            choices.dismiss();
                        }
                        self.advance_to(target);
                    }
                    None => self.state = State::AwaitingChoice { index, gate },
                }
            }
            State::AutoAdvancing { index, mut delay } => {
                self.elapsed += dt;
                if delay.tick(dt) {
                    self.advance_to(ChoiceTarget::Node(index.saturating_add(1)));
                } else {
                    self.state = State::AutoAdvancing { index, delay };
                }
            }
        }
        self.phase()
    }

    /// Tear the sequence down at its current suspension point. Open gates and
    /// timers are dropped and no further port calls are made.
    pub fn cancel(&mut self) {
        if self.phase().is_finished() {
            return;
        }
        self.state = State::Cancelled;
        self.parked_resolver = None;
        tracing::info!(index = self.current_index, "dialogue cancelled");
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Idle => Phase::Idle,
            State::Presenting { index, .. } => Phase::Presenting(*index),
            State::AwaitingChoice { index, .. } => Phase::AwaitingChoice(*index),
            State::AutoAdvancing { index, .. } => Phase::AutoAdvancing(*index),
            State::Terminated => Phase::Terminated,
            State::Cancelled => Phase::Cancelled,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase().is_finished()
    }

    /// Cursor into the graph. Past the end once a dialogue has run out.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The open choice gate, if the sequence is waiting on the player.
    pub fn pending_choice(&self) -> Option<&ChoiceGate> {
        match &self.state {
            State::AwaitingChoice { gate, .. } => Some(gate),
            _ => None,
        }
    }

    /// Take the resolver of an open gate when no choice port received it.
    pub fn take_choice_resolver(&mut self) -> Option<ChoiceResolver> {
        self.parked_resolver.take()
    }

    /// Simulated seconds spent running.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    #[inline]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    #[inline]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[inline]
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Move the cursor and run the bounds check.
    fn advance_to(&mut self, target: ChoiceTarget) {
        match target {
            ChoiceTarget::Node(index) => {
                self.current_index = index;
                self.enter_node(index);
            }
            ChoiceTarget::End => {
                self.current_index = self.graph.len();
                self.terminate();
            }
        }
    }

    fn enter_node(&mut self, index: usize) {
        let Some(node) = self.graph.get(index) else {
            self.terminate();
            return;
        };
        tracing::debug!(index, speaker = %node.speaker, "presenting node");

        if let Some(focus) = node.camera_focus {
            match self.stage.camera() {
                Ok(camera) => {
                    let camera_move = CameraMove::new(camera.position(), focus, &self.config);
                    if !camera_move.is_settled() {
                        self.state = State::Presenting {
                            index,
                            step: Presentation::Camera(camera_move),
                        };
                        return;
                    }
                }
                Err(err) => tracing::debug!(index, "{err}; skipping camera move"),
            }
        }
        self.present_line(index);
    }

    /// Speaker, animation, audio, then start the reveal.
    fn present_line(&mut self, index: usize) {
        let Some(node) = self.graph.get(index) else {
            self.terminate();
            return;
        };

        match self.stage.text() {
            Ok(text) => text.set_speaker(&node.speaker),
            Err(err) => tracing::debug!(index, "{err}; skipping speaker label"),
        }

        if let Some(trigger) = node.animation_trigger.as_deref() {
            match self.bindings.actor_for(index) {
                Some(actor) => match self.stage.animation() {
                    Ok(animation) => animation.trigger(actor, trigger),
                    Err(err) => tracing::debug!(index, "{err}; skipping animation trigger"),
                },
                None => tracing::trace!(index, trigger, "no actor bound to speaker"),
            }
        }

        if let Some(clip) = &node.audio {
            match self.stage.audio() {
                Ok(audio) => audio.play(clip),
                Err(err) => tracing::debug!(index, "{err}; skipping audio"),
            }
        }

        let mut typewriter = Typewriter::new(node.text.as_str(), self.config.reveal_interval);
        for prefix in typewriter.start() {
            show_text(&mut self.stage, &prefix);
        }
        if typewriter.is_complete() {
            self.finish_line(index);
        } else {
            self.state = State::Presenting {
                index,
                step: Presentation::Reveal(typewriter),
            };
        }
    }

    /// Open the choice gate or start the auto-advance wait.
    fn finish_line(&mut self, index: usize) {
        let Some(node) = self.graph.get(index) else {
            self.terminate();
            return;
        };

        if !node.is_branching() {
            self.state = State::AutoAdvancing {
                index,
                delay: Delay::new(node.auto_advance_delay),
            };
            return;
        }

        let (gate, resolver) = ChoiceGate::for_choices(&node.choices);
        match self.stage.choices() {
            Ok(choices) => {
                choices.dismiss();
                choices.present(gate.options(), resolver);
            }
            Err(err) => {
                tracing::warn!(index, "{err}; choice resolver parked for the host");
                self.parked_resolver = Some(resolver);
            }
        }
        tracing::debug!(index, options = gate.options().len(), "awaiting choice");
        self.state = State::AwaitingChoice { index, gate };
    }

    fn terminate(&mut self) {
        if let Ok(text) = self.stage.text() {
            text.clear();
        }
        self.parked_resolver = None;
        self.state = State::Terminated;
        tracing::info!(
            index = self.current_index,
            elapsed = self.elapsed,
            "dialogue terminated"
        );
    }
}

fn show_text(stage: &mut Stage, prefix: &str) {
    if let Ok(text) = stage.text() {
        tracing::trace!(prefix, "reveal");
        text.set_text(prefix);
    }
}
