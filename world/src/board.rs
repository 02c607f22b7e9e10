//! Board state: walls, reveal flags, treasure room, and secret rooms.

use labyrinth_core::{ActorId, BoardSnapshot, Position, SecretRoom, WallGrid, WallRef};
use rand::{seq::IteratorRandom, Rng};
use thiserror::Error;
use tracing::{debug, trace};

/// Reasons a board operation may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Every cell lies within the clearance of some secret room.
    #[error("no cell lies further than {clearance} from every secret room")]
    NoTreasureRoomCandidate {
        /// Clearance that could not be satisfied.
        clearance: u32,
    },
}

/// Cell holding the treasure when nobody carries it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreasureRoom {
    position: Option<Position>,
    present: bool,
    returned: bool,
}

impl TreasureRoom {
    /// Cell of the room, once selected.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// Whether the treasure rests in the room.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.present
    }

    /// Whether the treasure has ever been carried back into the room.
    #[must_use]
    pub const fn is_returned(&self) -> bool {
        self.returned
    }
}

/// Authoritative board for a single game.
#[derive(Clone, Debug)]
pub struct Board {
    walls: WallGrid,
    treasure: TreasureRoom,
    secret_rooms: Vec<SecretRoom>,
}

impl Board {
    /// Creates a board around an existing wall layout.
    #[must_use]
    pub fn from_walls(mut walls: WallGrid) -> Self {
        walls.seal_boundary();
        Self {
            walls,
            treasure: TreasureRoom::default(),
            secret_rooms: Vec::new(),
        }
    }

    /// Number of cells along each board edge.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.walls.size()
    }

    /// Read-only access to the wall layout.
    #[must_use]
    pub fn walls(&self) -> &WallGrid {
        &self.walls
    }

    /// Owned copy of the wall layout for the presentation layer.
    #[must_use]
    pub fn wall_snapshot(&self) -> WallGrid {
        self.walls.clone()
    }

    /// Whether a single step from `from` to `to` is open.
    ///
    /// Anything other than one orthogonal step is blocked. When `reveal` is
    /// set the probed wall is disclosed whether or not it exists.
    pub fn is_move_legal(&mut self, from: Position, to: Position, reveal: bool) -> bool {
        let Some(wall) = WallRef::between(from, to) else {
            trace!(?from, ?to, "non-adjacent step treated as blocked");
            return false;
        };

        if reveal && self.walls.reveal(wall) {
            debug!(?wall, present = self.walls.is_present(wall), "wall revealed");
        }

        !self.walls.is_present(wall)
    }

    /// Picks the treasure room uniformly among cells whose Chebyshev distance
    /// to every secret room exceeds `clearance`, and places the treasure in it.
    pub fn select_treasure_room<R>(
        &mut self,
        clearance: u32,
        rng: &mut R,
    ) -> Result<Position, BoardError>
    where
        R: Rng + ?Sized,
    {
        let size = self.size();
        let rooms = &self.secret_rooms;
        let candidate = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|cell| {
                rooms
                    .iter()
                    .all(|room| room.position().square_distance(*cell) > clearance)
            })
            .choose(rng)
            .ok_or(BoardError::NoTreasureRoomCandidate { clearance })?;

        self.treasure = TreasureRoom {
            position: Some(candidate),
            present: true,
            returned: false,
        };
        debug!(?candidate, "treasure room selected");
        Ok(candidate)
    }

    /// Records `owner`'s home. Uniqueness is the caller's concern.
    pub fn register_secret_room(&mut self, position: Position, owner: ActorId) {
        self.secret_rooms.push(SecretRoom::new(owner, position));
    }

    /// Home of the provided player, if registered.
    #[must_use]
    pub fn secret_room(&self, owner: ActorId) -> Option<Position> {
        self.secret_rooms
            .iter()
            .find(|room| room.owner() == owner)
            .map(SecretRoom::position)
    }

    /// Whether some player already lives at `position`.
    #[must_use]
    pub fn is_home(&self, position: Position) -> bool {
        self.secret_rooms
            .iter()
            .any(|room| room.position() == position)
    }

    /// Treasure room state.
    #[must_use]
    pub const fn treasure(&self) -> TreasureRoom {
        self.treasure
    }

    /// Removes the treasure from its room, reporting whether it was there.
    pub fn take_treasure(&mut self) -> bool {
        let taken = self.treasure.present;
        self.treasure.present = false;
        taken
    }

    /// Puts a carried treasure back into its room.
    pub fn restore_treasure(&mut self) {
        if !self.treasure.present {
            self.treasure.returned = true;
        }
        self.treasure.present = true;
    }

    /// Owned copy of the whole board for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            walls: self.wall_snapshot(),
            treasure_room: self.treasure.position,
            treasure_present: self.treasure.present,
            treasure_returned: self.treasure.returned,
            secret_rooms: self.secret_rooms.clone(),
        }
    }
}
