//! One-shot choice suspension.
//!
//! The sequencer holds the [`ChoiceGate`]; the player-facing side holds the
//! single [`ChoiceResolver`]. Events travel over a channel, so the resolver may
//! live on another thread while the gate is only touched by the sequencer.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::error::{DialogueError, DialogueResult};
use crate::graph::{ChoiceTarget, DialogueChoice};
use crate::ports::ChoiceOption;

#[derive(Debug, Clone, Copy)]
enum ChoiceEvent {
    Select(ChoiceTarget),
    Raw(i64),
}

/// Sending half of a [`ChoiceGate`]. Not cloneable: there is exactly one writer.
#[derive(Debug)]
pub struct ChoiceResolver {
    sender: Sender<ChoiceEvent>,
}

impl ChoiceResolver {
    /// Report the player's pick. Only the first pick the gate sees counts.
    ///
    /// A later pick sent before the gate is polled returns `Ok` and is
    /// discarded. Once the gate has resolved and been released, picks return
    /// [`DialogueError::GateClosed`]. Neither case changes the outcome, so
    /// `GateClosed` here means "too late", not a failure.
    pub fn select(&self, target: ChoiceTarget) -> DialogueResult<()> {
        self.send(ChoiceEvent::Select(target))
    }

    /// Report a raw integer payload from a host UI. `-1` ends the dialogue;
    /// other negative values are rejected by the gate, which stays open.
    pub fn submit_raw(&self, raw: i64) -> DialogueResult<()> {
        self.send(ChoiceEvent::Raw(raw))
    }

    fn send(&self, event: ChoiceEvent) -> DialogueResult<()> {
        self.sender.send(event).map_err(|_| DialogueError::GateClosed)
    }
}

/// Suspension point waiting for exactly one choice. No timeout.
#[derive(Debug)]
pub struct ChoiceGate {
    options: Vec<ChoiceOption>,
    receiver: Receiver<ChoiceEvent>,
    resolution: Option<ChoiceTarget>,
    disconnected: bool,
}

impl ChoiceGate {
    /// Open a gate over `options`, returning it with its resolver.
    pub fn open(options: Vec<ChoiceOption>) -> (Self, ChoiceResolver) {
        let (sender, receiver) = mpsc::channel();
        let gate = Self {
            options,
            receiver,
            resolution: None,
            disconnected: false,
        };
        (gate, ChoiceResolver { sender })
    }

    /// Open a gate over a node's choices, one option per choice in order.
    pub fn for_choices(choices: &[DialogueChoice]) -> (Self, ChoiceResolver) {
        let options = choices
            .iter()
            .map(|c| ChoiceOption {
                label: c.label.clone(),
                target: c.target,
            })
            .collect();
        Self::open(options)
    }

    #[inline]
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Drain pending events. The first valid one resolves the gate; everything
    /// after it is discarded. Returns the resolution once there is one.
    pub fn poll(&mut self) -> Option<ChoiceTarget> {
        if self.resolution.is_some() {
            self.discard_pending();
            return self.resolution;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(ChoiceEvent::Select(target)) => {
                    self.resolution = Some(target);
                    break;
                }
                Ok(ChoiceEvent::Raw(raw)) => match ChoiceTarget::from_raw(raw) {
                    Ok(target) => {
                        self.resolution = Some(target);
                        break;
                    }
                    Err(err) => tracing::warn!("{err}; choice gate stays open"),
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        self.disconnected = true;
                        tracing::warn!(
                            options = self.options.len(),
                            "choice resolver dropped; gate can no longer resolve"
                        );
                    }
                    break;
                }
            }
        }
        if self.resolution.is_some() {
            self.discard_pending();
        }
        self.resolution
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    #[inline]
    pub fn resolution(&self) -> Option<ChoiceTarget> {
        self.resolution
    }

    /// The resolver was dropped before the gate resolved.
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Discard the gate without resolving it. The resolver reports
    /// [`DialogueError::GateClosed`] from then on.
    pub fn cancel(self) {
        drop(self);
    }

    fn discard_pending(&mut self) {
        while self.receiver.try_recv().is_ok() {}
    }
}
