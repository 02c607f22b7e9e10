use labyrinth_core::{Position, RulesError};
use labyrinth_presentation::GateError;
use labyrinth_world::BoardError;
use thiserror::Error;

/// Reasons a session may stop.
///
/// Only [`SessionError::Gate`] is expected during normal operation: it means
/// shutdown was requested while waiting for input. Everything else points at
/// rules that do not fit the board.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The rules failed validation.
    #[error(transparent)]
    Rules(#[from] RulesError),
    /// The board could not host the treasure room.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The input wait was cancelled.
    #[error(transparent)]
    Gate(#[from] GateError),
    /// No cell satisfies the teleport ring around a contest winner.
    #[error("no cell at distance {near}..={far} from {around:?} is free of the foe")]
    NoTeleportCandidate {
        /// Cell of the contest winner.
        around: Position,
        /// Inner Chebyshev radius of the ring.
        near: u32,
        /// Outer Chebyshev radius of the ring.
        far: u32,
    },
}

impl SessionError {
    /// Whether the error is a clean shutdown rather than a fault.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Gate(GateError::Cancelled))
    }
}
