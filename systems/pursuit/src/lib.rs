#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides where the awake foe steps next.
//!
//! The foe ignores walls. Each turn it picks a quarry from the actor
//! snapshots and approaches it by one cell, clamping each axis separately.

use labyrinth_core::{ActorId, ActorSnapshot, Position, RoleSnapshot};

/// What the foe is heading for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quarry {
    /// An alive player holding the treasure.
    Carrier(ActorId),
    /// The nearest alive player away from home.
    Nearest(ActorId),
    /// The treasure room, when no player qualifies.
    TreasureRoom,
}

/// Outcome of a single pursuit decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuitStep {
    /// Chosen quarry.
    pub quarry: Quarry,
    /// Cell the quarry occupies.
    pub target: Position,
    /// Cell the foe should move to.
    pub next: Position,
}

/// Pursuit heuristic that reuses a scratch buffer between turns.
#[derive(Debug)]
pub struct Pursuit {
    fatal_injury: u32,
    candidates: Vec<Candidate>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: ActorId,
    position: Position,
    carrying_treasure: bool,
    safe: bool,
}

impl Pursuit {
    /// Creates the system. Players whose injury level reaches `fatal_injury`
    /// are ignored.
    #[must_use]
    pub fn new(fatal_injury: u32) -> Self {
        Self {
            fatal_injury,
            candidates: Vec::new(),
        }
    }

    /// Chooses a quarry and the foe's next cell.
    ///
    /// Priority runs: first alive carrier in snapshot order, then the alive
    /// player off their home with the smallest Euclidean distance (ties keep
    /// the earlier player), then the treasure room. Returns `None` when there
    /// is nothing to chase.
    pub fn handle(
        &mut self,
        foe: Position,
        actors: &[ActorSnapshot],
        treasure_room: Option<Position>,
    ) -> Option<PursuitStep> {
        self.prepare_candidates(actors);

        let (quarry, target) = self
            .carrier()
            .or_else(|| self.nearest_exposed(foe))
            .or_else(|| treasure_room.map(|room| (Quarry::TreasureRoom, room)))?;

        Some(PursuitStep {
            quarry,
            target,
            next: step_toward(foe, target),
        })
    }

    fn prepare_candidates(&mut self, actors: &[ActorSnapshot]) {
        self.candidates.clear();
        for snapshot in actors {
            let RoleSnapshot::Player {
                injury_level,
                carrying_treasure,
                safe,
                ..
            } = snapshot.role
            else {
                continue;
            };
            if injury_level >= self.fatal_injury {
                continue;
            }
            self.candidates.push(Candidate {
                id: snapshot.id,
                position: snapshot.position,
                carrying_treasure,
                safe,
            });
        }
    }

    fn carrier(&self) -> Option<(Quarry, Position)> {
        self.candidates
            .iter()
            .find(|candidate| candidate.carrying_treasure)
            .map(|candidate| (Quarry::Carrier(candidate.id), candidate.position))
    }

    fn nearest_exposed(&self, foe: Position) -> Option<(Quarry, Position)> {
        let mut best: Option<(f64, &Candidate)> = None;
        for candidate in self.candidates.iter().filter(|candidate| !candidate.safe) {
            let distance = foe.distance(candidate.position);
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, candidate)),
            }
        }
        best.map(|(_, candidate)| (Quarry::Nearest(candidate.id), candidate.position))
    }
}

/// Moves one cell from `from` toward `to`, clamping each axis to a single step.
#[must_use]
pub fn step_toward(from: Position, to: Position) -> Position {
    Position::new(approach(from.x(), to.x()), approach(from.y(), to.y()))
}

fn approach(from: u32, to: u32) -> u32 {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => from + 1,
        std::cmp::Ordering::Less => from - 1,
        std::cmp::Ordering::Equal => from,
    }
}
