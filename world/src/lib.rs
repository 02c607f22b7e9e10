#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Labyrinth.
//!
//! The world owns the board and every actor. It exposes mutators for the
//! session orchestrator and a [`query`] module of read-only views that hand
//! owned snapshots to anything outside the simulation.

mod actors;
mod board;
pub mod maze;

use labyrinth_core::{ActorId, Position, Rules, WallGrid, MAX_PLAYERS};
use rand::Rng;
use tracing::debug;

pub use actors::{Actor, Foe, Player, Role};
pub use board::{Board, BoardError, TreasureRoom};

/// Board plus actors for a single game.
#[derive(Clone, Debug)]
pub struct World {
    rules: Rules,
    board: Board,
    foe: Actor,
    players: Vec<Actor>,
}

impl World {
    /// Creates a world with a freshly generated maze and a dormant foe.
    pub fn new<R>(rules: Rules, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let walls = maze::generate(rules.board_size, rules.loop_factor, rng);
        Self::with_walls(rules, walls)
    }

    /// Creates a world around a prepared wall layout.
    #[must_use]
    pub fn with_walls(rules: Rules, walls: WallGrid) -> Self {
        Self {
            rules,
            board: Board::from_walls(walls),
            foe: Actor::foe(),
            players: Vec::new(),
        }
    }

    /// Read-only board access.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The antagonist.
    #[must_use]
    pub const fn foe(&self) -> &Actor {
        &self.foe
    }

    /// Mutable access to the antagonist.
    pub fn foe_mut(&mut self) -> &mut Actor {
        &mut self.foe
    }

    /// Looks up any actor, foe included.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        if id.is_foe() {
            return Some(&self.foe);
        }
        self.players.iter().find(|actor| actor.id() == id)
    }

    /// Mutable lookup of any actor, foe included.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        if id.is_foe() {
            return Some(&mut self.foe);
        }
        self.players.iter_mut().find(|actor| actor.id() == id)
    }

    /// Players in turn order.
    pub fn players(&self) -> impl Iterator<Item = &Actor> {
        self.players.iter()
    }

    /// Identifiers of the players in turn order.
    #[must_use]
    pub fn player_ids(&self) -> Vec<ActorId> {
        self.players.iter().map(Actor::id).collect()
    }

    /// Number of players that joined.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Registers a home at `home` and spawns the next player on it.
    ///
    /// Returns `None` when the roster is full, the cell lies off the board, or
    /// another player already lives there.
    pub fn spawn_player(&mut self, home: Position) -> Option<ActorId> {
        let next = u32::try_from(self.players.len()).ok()?.checked_add(1)?;
        if next > MAX_PLAYERS || !home.is_within(self.board.size()) || self.board.is_home(home) {
            return None;
        }

        let id = ActorId::new(next);
        self.board.register_secret_room(home, id);
        let mut player = Actor::player(id, home, self.rules.player_limits());
        if let Some(state) = player.as_player_mut() {
            state.set_safe(true);
        }
        self.players.push(player);
        debug!(player = id.get(), ?home, "player spawned");
        Some(id)
    }

    /// Moves an actor and refreshes a player's `safe` flag.
    pub fn relocate(&mut self, id: ActorId, position: Position) {
        let home = self.board.secret_room(id);
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        actor.move_to(position);
        if let Some(player) = actor.as_player_mut() {
            player.set_safe(home == Some(position));
        }
    }

    /// Whether no player is alive, syncing every player's visibility.
    pub fn all_players_dead(&mut self) -> bool {
        let mut any_alive = false;
        for player in &mut self.players {
            any_alive |= player.is_alive();
        }
        !any_alive
    }
}

/// Read-only views over a [`World`].
pub mod query {
    use super::{Player, World};
    use labyrinth_core::{ActorId, ActorSnapshot, BoardSnapshot, Position};

    /// Owned copy of the board.
    #[must_use]
    pub fn board_snapshot(world: &World) -> BoardSnapshot {
        world.board.snapshot()
    }

    /// Owned copies of every actor, foe first then players in turn order.
    #[must_use]
    pub fn actor_snapshots(world: &World) -> Vec<ActorSnapshot> {
        std::iter::once(&world.foe)
            .chain(world.players.iter())
            .map(super::Actor::snapshot)
            .collect()
    }

    /// Owned copy of a single actor.
    #[must_use]
    pub fn actor_snapshot(world: &World, id: ActorId) -> Option<ActorSnapshot> {
        world.actor(id).map(super::Actor::snapshot)
    }

    /// Whether the identified player is alive.
    #[must_use]
    pub fn is_player_alive(world: &World, id: ActorId) -> bool {
        world
            .actor(id)
            .and_then(super::Actor::as_player)
            .is_some_and(Player::is_alive)
    }

    /// Alive players other than `id` standing on `cell`, in turn order.
    #[must_use]
    pub fn alive_players_at(world: &World, cell: Position, except: ActorId) -> Vec<ActorId> {
        world
            .players
            .iter()
            .filter(|actor| actor.id() != except && actor.position() == cell)
            .filter(|actor| actor.as_player().is_some_and(Player::is_alive))
            .map(super::Actor::id)
            .collect()
    }

    /// The alive player currently holding the treasure, if any.
    #[must_use]
    pub fn treasure_carrier(world: &World) -> Option<ActorId> {
        world
            .players
            .iter()
            .find(|actor| {
                actor
                    .as_player()
                    .is_some_and(|player| player.is_alive() && player.is_carrying_treasure())
            })
            .map(super::Actor::id)
    }
}
