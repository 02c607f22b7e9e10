//! Single-slot exchange between the simulation thread and input handlers.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender},
    Arc,
};

use labyrinth_core::InputEvent;
use thiserror::Error;
use tracing::{trace, warn};

use crate::PresentationPort;

/// Reasons the gate may stop waiting without an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    /// Shutdown was requested while the simulation waited for input.
    #[error("input wait cancelled by shutdown request")]
    Cancelled,
}

#[derive(Debug)]
enum Message {
    Input { generation: u64, event: InputEvent },
    Shutdown,
}

/// One-shot slot an input handler signs with the player's action.
///
/// Cloning yields another handle to the same slot; only the first signature
/// across all clones counts.
#[derive(Clone, Debug)]
pub struct InputSlot {
    generation: u64,
    signed: Arc<AtomicBool>,
    sender: Sender<Message>,
}

impl InputSlot {
    /// Delivers `event`, reporting whether this was the first signature.
    pub fn sign(&self, event: InputEvent) -> bool {
        if self.signed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.sender
            .send(Message::Input {
                generation: self.generation,
                event,
            })
            .is_ok()
    }

    /// Whether the slot has already been signed.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signed.load(Ordering::Acquire)
    }
}

/// Cloneable handle that cancels the simulation's input wait.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    sender: Sender<Message>,
}

impl ShutdownHandle {
    /// Asks the waiting simulation to unwind. Safe to call from any thread and
    /// more than once.
    pub fn request(&self) {
        let _ = self.sender.send(Message::Shutdown);
    }
}

/// Simulation side of the exchange. At most one slot is outstanding.
#[derive(Debug)]
pub struct InputGate {
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    generation: u64,
    pending: Option<InputSlot>,
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InputGate {
    /// Creates a gate with no outstanding slot.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            generation: 0,
            pending: None,
        }
    }

    /// Handle that cancels any current or future wait on this gate.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            sender: self.sender.clone(),
        }
    }

    /// Subscribes a fresh slot on `port` and blocks until it is signed.
    ///
    /// A slot left unsigned by an earlier, interrupted wait is signed with
    /// [`InputEvent::Orphaned`] first so its holder stops waiting on it.
    /// Signatures for superseded slots are discarded.
    pub fn next_event<P>(&mut self, port: &mut P) -> Result<InputEvent, GateError>
    where
        P: PresentationPort + ?Sized,
    {
        if let Some(stale) = self.pending.take() {
            if stale.sign(InputEvent::Orphaned) {
                trace!(generation = stale.generation, "stale input slot orphaned");
            }
        }

        self.generation = self.generation.wrapping_add(1);
        let slot = InputSlot {
            generation: self.generation,
            signed: Arc::new(AtomicBool::new(false)),
            sender: self.sender.clone(),
        };
        self.pending = Some(slot.clone());
        port.subscribe_input(slot);

        loop {
            match self.receiver.recv() {
                Ok(Message::Input { generation, event }) if generation == self.generation => {
                    self.pending = None;
                    return Ok(event);
                }
                Ok(Message::Input { generation, event }) => {
                    trace!(generation, ?event, "input for superseded slot dropped");
                }
                Ok(Message::Shutdown) | Err(_) => {
                    warn!(generation = self.generation, "input wait cancelled");
                    return Err(GateError::Cancelled);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::{ActorSnapshot, BoardSnapshot, Position, SoundKind};

    #[derive(Default)]
    struct CapturePort {
        slots: Vec<InputSlot>,
        answer: Option<InputEvent>,
    }

    impl PresentationPort for CapturePort {
        fn notify(&mut self, _message: &str) {}
        fn play_sound(&mut self, _sound: SoundKind) {}
        fn subscribe_input(&mut self, slot: InputSlot) {
            if let Some(event) = self.answer {
                assert!(slot.sign(event));
            }
            self.slots.push(slot);
        }
        fn actor_changed(&mut self, _actor: ActorSnapshot) {}
        fn board_changed(&mut self, _board: BoardSnapshot) {}
        fn clear(&mut self) {}
    }

    #[test]
    fn slot_accepts_only_the_first_signature() {
        let mut gate = InputGate::new();
        let mut port = CapturePort {
            answer: Some(InputEvent::Next),
            ..CapturePort::default()
        };

        assert_eq!(gate.next_event(&mut port), Ok(InputEvent::Next));
        let slot = port.slots.pop().expect("slot subscribed");
        assert!(slot.is_signed());
        assert!(!slot.sign(InputEvent::Reset));
    }

    #[test]
    fn shutdown_cancels_a_pending_wait() {
        let mut gate = InputGate::new();
        gate.shutdown_handle().request();

        let mut port = CapturePort::default();
        assert_eq!(gate.next_event(&mut port), Err(GateError::Cancelled));
    }

    #[test]
    fn interrupted_slot_is_orphaned_and_its_late_answer_dropped() {
        let mut gate = InputGate::new();
        let shutdown = gate.shutdown_handle();

        let mut port = CapturePort::default();
        shutdown.request();
        assert_eq!(gate.next_event(&mut port), Err(GateError::Cancelled));
        let stale = port.slots.pop().expect("first slot");

        port.answer = Some(InputEvent::Cell(Position::new(1, 1)));
        assert_eq!(
            gate.next_event(&mut port),
            Ok(InputEvent::Cell(Position::new(1, 1)))
        );
        assert!(stale.is_signed(), "stale slot is signed as orphaned");
        assert!(!stale.sign(InputEvent::Next));
    }
}
