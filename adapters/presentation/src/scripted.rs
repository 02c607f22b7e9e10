//! Headless port that plays back a fixed list of input events.

use std::collections::VecDeque;

use labyrinth_core::{ActorId, ActorSnapshot, BoardSnapshot, InputEvent, SoundKind};
use tracing::trace;

use crate::{InputSlot, PresentationPort, ShutdownHandle};

/// Port that answers every subscription from a queue and records what the
/// simulation reported. Once the queue runs dry it requests shutdown.
#[derive(Debug, Default)]
pub struct ScriptedPresentation {
    script: VecDeque<InputEvent>,
    shutdown: Option<ShutdownHandle>,
    notifications: Vec<String>,
    sounds: Vec<SoundKind>,
    actor_updates: Vec<ActorSnapshot>,
    board: Option<BoardSnapshot>,
    clears: usize,
}

impl ScriptedPresentation {
    /// Creates a port that will deliver `script` in order.
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = InputEvent>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Events not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Every announcement in the order it was made.
    #[must_use]
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Whether any announcement contains `needle`.
    #[must_use]
    pub fn was_notified(&self, needle: &str) -> bool {
        self.notifications
            .iter()
            .any(|message| message.contains(needle))
    }

    /// Every sound in the order it was played.
    #[must_use]
    pub fn sounds(&self) -> &[SoundKind] {
        &self.sounds
    }

    /// Most recent update for `id`, if any.
    #[must_use]
    pub fn latest_actor(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.actor_updates
            .iter()
            .rev()
            .find(|snapshot| snapshot.id == id)
    }

    /// Most recent board update.
    #[must_use]
    pub fn board(&self) -> Option<&BoardSnapshot> {
        self.board.as_ref()
    }

    /// Number of times the presentation was cleared.
    #[must_use]
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl PresentationPort for ScriptedPresentation {
    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_owned());
    }

    fn play_sound(&mut self, sound: SoundKind) {
        self.sounds.push(sound);
    }

    fn subscribe_input(&mut self, slot: InputSlot) {
        match self.script.pop_front() {
            Some(event) => {
                trace!(?event, "scripted input");
                let _ = slot.sign(event);
            }
            None => {
                trace!("script exhausted, requesting shutdown");
                if let Some(shutdown) = &self.shutdown {
                    shutdown.request();
                }
            }
        }
    }

    fn actor_changed(&mut self, actor: ActorSnapshot) {
        self.actor_updates.push(actor);
    }

    fn board_changed(&mut self, board: BoardSnapshot) {
        self.board = Some(board);
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn attach_shutdown(&mut self, shutdown: ShutdownHandle) {
        self.shutdown = Some(shutdown);
    }
}
