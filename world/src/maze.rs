//! Recursive-backtracking maze carver used by the world crate.

use labyrinth_core::{Position, WallGrid, WallOrientation, WallRef};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

/// Generates a connected wall layout for a `size x size` board.
///
/// A depth-first carve from a random start cell removes exactly one wall per
/// newly visited cell, producing a spanning tree. `size * loop_factor`
/// additional interior walls are then knocked out at random to introduce
/// cycles; removals can only add reachability, so the layout stays connected.
/// The outer boundary is re-sealed and revealed before returning.
pub fn generate<R>(size: u32, loop_factor: u32, rng: &mut R) -> WallGrid
where
    R: Rng + ?Sized,
{
    let mut grid = WallGrid::closed(size);
    if size == 0 {
        return grid;
    }

    let start = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
    carve(&mut grid, start, rng);

    let extra = size.saturating_mul(loop_factor);
    inject_loops(&mut grid, extra, rng);

    grid.seal_boundary();
    debug!(size, ?start, extra, "maze generated");
    grid
}

fn carve<R>(grid: &mut WallGrid, start: Position, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let size = grid.size();
    let mut visited = Visited::new(size);
    let mut stack = vec![start];
    let mut options: Vec<Position> = Vec::with_capacity(4);
    visited.mark(start);

    while let Some(&current) = stack.last() {
        options.clear();
        options.extend(
            current
                .neighbors(size)
                .filter(|neighbor| !visited.contains(*neighbor)),
        );

        let Some(&next) = options.choose(rng) else {
            let _ = stack.pop();
            continue;
        };

        if let Some(wall) = WallRef::between(current, next) {
            grid.set_present(wall, false);
        }
        visited.mark(next);
        stack.push(next);
    }
}

fn inject_loops<R>(grid: &mut WallGrid, count: u32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let size = grid.size();
    if size < 2 {
        return;
    }

    for _ in 0..count {
        let row = rng.gen_range(1..size);
        let column = rng.gen_range(1..size);
        let orientation = if rng.gen::<bool>() {
            WallOrientation::Vertical
        } else {
            WallOrientation::Horizontal
        };
        grid.set_present(WallRef::new(orientation, row, column), false);
    }
}

#[derive(Debug)]
struct Visited {
    size: u32,
    cells: Vec<bool>,
}

impl Visited {
    fn new(size: u32) -> Self {
        let edge = usize::try_from(size).unwrap_or(0);
        Self {
            size,
            cells: vec![false; edge.saturating_mul(edge)],
        }
    }

    fn mark(&mut self, cell: Position) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = true;
        }
    }

    fn contains(&self, cell: Position) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(true)
    }

    fn index(&self, cell: Position) -> Option<usize> {
        if !cell.is_within(self.size) {
            return None;
        }
        let width = usize::try_from(self.size).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let column = usize::try_from(cell.x()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
