#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for Labyrinth adapters.
//!
//! The session talks to the outside world only through [`PresentationPort`].
//! Player input travels the other way through the [`InputGate`]: the session
//! hands the port a one-shot [`InputSlot`] and blocks until some thread signs
//! it or a [`ShutdownHandle`] cancels the wait.

mod gate;
mod scripted;

use labyrinth_core::{ActorSnapshot, BoardSnapshot, SoundKind};

pub use gate::{GateError, InputGate, InputSlot, ShutdownHandle};
pub use scripted::ScriptedPresentation;

/// Sink for everything the simulation wants shown, played, or asked.
///
/// Implementations may forward to a UI thread. Snapshots are owned copies, so
/// holding on to them never aliases simulation state.
pub trait PresentationPort {
    /// Displays a user-facing announcement.
    fn notify(&mut self, message: &str);

    /// Plays a sound cue.
    fn play_sound(&mut self, sound: SoundKind);

    /// Offers a fresh input slot. Whoever handles physical input signs it
    /// exactly once; later signatures are ignored.
    fn subscribe_input(&mut self, slot: InputSlot);

    /// Reports the new state of an actor.
    fn actor_changed(&mut self, actor: ActorSnapshot);

    /// Reports the new state of the board.
    fn board_changed(&mut self, board: BoardSnapshot);

    /// Drops all presentation state ahead of a new game.
    fn clear(&mut self);

    /// Receives the handle that stops the session, for example when a window
    /// closes. Called once when the session is created.
    fn attach_shutdown(&mut self, _shutdown: ShutdownHandle) {}
}
