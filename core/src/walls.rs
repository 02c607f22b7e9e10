//! Dense wall and reveal matrices shared by the board and its snapshots.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Orientation of a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Wall on the west edge of a cell; blocks east/west movement.
    Vertical,
    /// Wall on the north edge of a cell; blocks north/south movement.
    Horizontal,
}

/// Address of a single wall segment inside a [`WallGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallRef {
    /// Which matrix the segment lives in.
    pub orientation: WallOrientation,
    /// Row index in `0..=size`.
    pub row: u32,
    /// Column index in `0..=size`.
    pub column: u32,
}

impl WallRef {
    /// Creates a new wall address.
    #[must_use]
    pub const fn new(orientation: WallOrientation, row: u32, column: u32) -> Self {
        Self {
            orientation,
            row,
            column,
        }
    }

    /// Segment separating two orthogonally adjacent cells.
    ///
    /// A vertical segment at `(row, column)` separates `(column - 1, row)`
    /// from `(column, row)`; a horizontal segment at `(row, column)` separates
    /// `(column, row - 1)` from `(column, row)`. Returns `None` for any pair
    /// that is not exactly one orthogonal step apart.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Option<Self> {
        if !from.is_orthogonal_neighbor(to) {
            return None;
        }

        let wall = if to.x() < from.x() {
            Self::new(WallOrientation::Vertical, from.y(), from.x())
        } else if to.x() > from.x() {
            Self::new(WallOrientation::Vertical, from.y(), to.x())
        } else if to.y() < from.y() {
            Self::new(WallOrientation::Horizontal, from.y(), from.x())
        } else {
            Self::new(WallOrientation::Horizontal, to.y(), from.x())
        };
        Some(wall)
    }
}

/// Four `(size + 1) x (size + 1)` boolean matrices stored in row-major order:
/// wall presence and reveal state for both orientations.
///
/// Indices outside the matrices read as "wall present, not revealed" so a
/// stray coordinate can never open a hole in the outer boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallGrid {
    size: u32,
    vertical: Vec<bool>,
    horizontal: Vec<bool>,
    revealed_vertical: Vec<bool>,
    revealed_horizontal: Vec<bool>,
}

impl WallGrid {
    /// Creates a grid for a `size x size` board with every wall present and
    /// only the outer boundary revealed.
    #[must_use]
    pub fn closed(size: u32) -> Self {
        let edge = usize::try_from(size).unwrap_or(0).saturating_add(1);
        let cells = edge.saturating_mul(edge);
        let mut grid = Self {
            size,
            vertical: vec![true; cells],
            horizontal: vec![true; cells],
            revealed_vertical: vec![false; cells],
            revealed_horizontal: vec![false; cells],
        };
        grid.seal_boundary();
        grid
    }

    /// Number of cells along each board edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Whether the addressed segment is present.
    #[must_use]
    pub fn is_present(&self, wall: WallRef) -> bool {
        self.index(wall)
            .and_then(|index| self.layer(wall.orientation).get(index).copied())
            .unwrap_or(true)
    }

    /// Whether the addressed segment has been revealed to the players.
    #[must_use]
    pub fn is_revealed(&self, wall: WallRef) -> bool {
        self.index(wall)
            .and_then(|index| self.revealed_layer(wall.orientation).get(index).copied())
            .unwrap_or(false)
    }

    /// Sets the presence of the addressed segment. Boundary segments ignore
    /// removal requests.
    pub fn set_present(&mut self, wall: WallRef, present: bool) {
        if !present && self.is_boundary(wall) {
            return;
        }
        if let Some(index) = self.index(wall) {
            if let Some(slot) = self.layer_mut(wall.orientation).get_mut(index) {
                *slot = present;
            }
        }
    }

    /// Marks the addressed segment as revealed, reporting whether it was hidden.
    pub fn reveal(&mut self, wall: WallRef) -> bool {
        let Some(index) = self.index(wall) else {
            return false;
        };
        match self.revealed_layer_mut(wall.orientation).get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        }
    }

    /// Whether a step between two cells is blocked. Pairs that are not one
    /// orthogonal step apart are always blocked.
    #[must_use]
    pub fn blocks(&self, from: Position, to: Position) -> bool {
        WallRef::between(from, to).map_or(true, |wall| self.is_present(wall))
    }

    /// Whether the addressed segment lies on the outer edge of the board.
    #[must_use]
    pub fn is_boundary(&self, wall: WallRef) -> bool {
        match wall.orientation {
            WallOrientation::Vertical => {
                wall.row < self.size && (wall.column == 0 || wall.column == self.size)
            }
            WallOrientation::Horizontal => {
                wall.column < self.size && (wall.row == 0 || wall.row == self.size)
            }
        }
    }

    /// Re-asserts every outer boundary segment as present and revealed.
    pub fn seal_boundary(&mut self) {
        for offset in 0..self.size {
            for edge in [0, self.size] {
                let segments = [
                    WallRef::new(WallOrientation::Vertical, offset, edge),
                    WallRef::new(WallOrientation::Horizontal, edge, offset),
                ];
                for wall in segments {
                    if let Some(index) = self.index(wall) {
                        self.layer_mut(wall.orientation)[index] = true;
                        self.revealed_layer_mut(wall.orientation)[index] = true;
                    }
                }
            }
        }
    }

    /// Number of interior segments whose presence has been revealed.
    #[must_use]
    pub fn revealed_interior_count(&self) -> usize {
        let edge = self.size.saturating_add(1);
        let mut count = 0;
        for orientation in [WallOrientation::Vertical, WallOrientation::Horizontal] {
            for row in 0..edge {
                for column in 0..edge {
                    let wall = WallRef::new(orientation, row, column);
                    if !self.is_boundary(wall) && self.is_revealed(wall) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    fn index(&self, wall: WallRef) -> Option<usize> {
        if wall.row > self.size || wall.column > self.size {
            return None;
        }
        let edge = usize::try_from(self.size).ok()?.checked_add(1)?;
        let row = usize::try_from(wall.row).ok()?;
        let column = usize::try_from(wall.column).ok()?;
        row.checked_mul(edge)?.checked_add(column)
    }

    fn layer(&self, orientation: WallOrientation) -> &[bool] {
        match orientation {
            WallOrientation::Vertical => &self.vertical,
            WallOrientation::Horizontal => &self.horizontal,
        }
    }

    fn layer_mut(&mut self, orientation: WallOrientation) -> &mut [bool] {
        match orientation {
            WallOrientation::Vertical => &mut self.vertical,
            WallOrientation::Horizontal => &mut self.horizontal,
        }
    }

    fn revealed_layer(&self, orientation: WallOrientation) -> &[bool] {
        match orientation {
            WallOrientation::Vertical => &self.revealed_vertical,
            WallOrientation::Horizontal => &self.revealed_horizontal,
        }
    }

    fn revealed_layer_mut(&mut self, orientation: WallOrientation) -> &mut [bool] {
        match orientation {
            WallOrientation::Vertical => &mut self.revealed_vertical,
            WallOrientation::Horizontal => &mut self.revealed_horizontal,
        }
    }
}
