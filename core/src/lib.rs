#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth engine.
//!
//! This crate defines the value types that connect the authoritative world,
//! the pure systems, and the presentation adapters. The world owns a
//! [`WallGrid`] and a roster of actors, the session orchestrator mutates them
//! in response to [`InputEvent`] values, and every change is reported to the
//! presentation layer as an owned [`BoardSnapshot`] or [`ActorSnapshot`] so
//! that no adapter can observe or mutate simulation-owned data.

mod rules;
mod walls;

use serde::{Deserialize, Serialize};

pub use rules::{PlayerLimits, Rules, RulesError};
pub use walls::{WallGrid, WallOrientation, WallRef};

/// Maximum number of players that may join a single session.
pub const MAX_PLAYERS: u32 = 2;

/// Location of a single board cell expressed as column (`x`) and row (`y`).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the position lies on a board with `size` cells per edge.
    #[must_use]
    pub const fn is_within(&self, size: u32) -> bool {
        self.x < size && self.y < size
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x.abs_diff(other.x));
        let dy = f64::from(self.y.abs_diff(other.y));
        dx.hypot(dy)
    }

    /// Chebyshev distance: the larger of the two axis-wise differences.
    #[must_use]
    pub fn square_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Reports whether `other` lies exactly one orthogonal step away.
    #[must_use]
    pub fn is_orthogonal_neighbor(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Returns the adjacent position in `direction`, if it lies on the board.
    #[must_use]
    pub fn neighbor(self, direction: Direction, size: u32) -> Option<Position> {
        let candidate = match direction {
            Direction::North => Position::new(self.x, self.y.checked_sub(1)?),
            Direction::East => Position::new(self.x.checked_add(1)?, self.y),
            Direction::South => Position::new(self.x, self.y.checked_add(1)?),
            Direction::West => Position::new(self.x.checked_sub(1)?, self.y),
        };
        candidate.is_within(size).then_some(candidate)
    }

    /// Iterates over the orthogonal neighbours that lie on the board.
    pub fn neighbors(self, size: u32) -> impl Iterator<Item = Position> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.neighbor(direction, size))
    }
}

/// Cardinal movement directions on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Stable identifier assigned to an actor for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Identifier reserved for the antagonist.
    pub const FOE: ActorId = ActorId(0);

    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier names the antagonist.
    #[must_use]
    pub const fn is_foe(&self) -> bool {
        self.0 == Self::FOE.0
    }
}

/// Cue the presentation layer should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// A player completed a legal step.
    PlayerMove,
    /// Player one is up.
    PlayerOne,
    /// Player two is up.
    PlayerTwo,
    /// A player asked for a destination that is not one orthogonal step away.
    IllegalMove,
    /// The foe woke up.
    FoeAwake,
    /// The foe took a step.
    FoeMove,
    /// The foe attacked and the victim survived.
    FoeAttack,
    /// A player walked into a wall.
    Wall,
    /// A player won the game.
    Win,
    /// A player perished, or the foe won.
    Defeat,
    /// A player picked up the treasure.
    Goal,
}

impl SoundKind {
    /// Turn cue associated with the provided player, if one exists.
    #[must_use]
    pub const fn player_cue(player: ActorId) -> Option<SoundKind> {
        match player.get() {
            1 => Some(SoundKind::PlayerOne),
            2 => Some(SoundKind::PlayerTwo),
            _ => None,
        }
    }
}

/// Discrete, externally sourced input delivered to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// A board cell was selected.
    Cell(Position),
    /// The player asked to advance (end a turn, stop adding players, confirm).
    Next,
    /// The player asked to abandon the current game.
    Reset,
    /// A stale subscription was superseded before anyone answered it.
    Orphaned,
}

/// Home cell owned by a single player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretRoom {
    owner: ActorId,
    position: Position,
}

impl SecretRoom {
    /// Creates a new secret room for `owner` at `position`.
    #[must_use]
    pub const fn new(owner: ActorId, position: Position) -> Self {
        Self { owner, position }
    }

    /// Player that owns the room.
    #[must_use]
    pub const fn owner(&self) -> ActorId {
        self.owner
    }

    /// Cell occupied by the room.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}

/// Owned copy of the board handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Wall existence and reveal state.
    pub walls: WallGrid,
    /// Cell of the treasure room once it has been selected.
    pub treasure_room: Option<Position>,
    /// Whether the treasure currently rests in its room.
    pub treasure_present: bool,
    /// Whether the treasure has ever been carried back into its room.
    pub treasure_returned: bool,
    /// Homes registered so far, in registration order.
    pub secret_rooms: Vec<SecretRoom>,
}

/// Owned copy of a single actor handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Cell currently occupied by the actor.
    pub position: Position,
    /// Whether the presentation layer should draw the actor.
    pub visible: bool,
    /// Variant-specific state.
    pub role: RoleSnapshot,
}

/// Variant-specific portion of an [`ActorSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleSnapshot {
    /// The antagonist.
    Foe {
        /// Whether the foe has been woken.
        awake: bool,
    },
    /// A human-controlled explorer.
    Player {
        /// Number of wounds suffered and not yet healed.
        injury_level: u32,
        /// Remaining stamina; higher wins contested encounters.
        fatigue: u32,
        /// Whether the player holds the treasure.
        carrying_treasure: bool,
        /// Whether the player stands on their own secret room.
        safe: bool,
    },
}

/// Side that ended a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// The antagonist outlasted every player.
    Foe,
    /// The identified player brought the treasure home.
    Player(ActorId),
}
