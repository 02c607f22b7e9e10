//! Interaction rules applied after foe steps and player moves.

use labyrinth_core::{ActorId, Position, SoundKind, Winner};
use labyrinth_presentation::PresentationPort;
use labyrinth_world::{query, Actor};
use rand::{
    seq::{IteratorRandom, SliceRandom},
    Rng,
};
use tracing::{debug, info};

use crate::{Flow, Session, SessionError};

impl<P, R> Session<P, R>
where
    P: PresentationPort,
    R: Rng,
{
    /// Wakes the foe, lets it strike anyone sharing its cell, and reports a
    /// foe victory once nobody is left alive.
    pub(crate) fn resolve_interactions(&mut self) -> Flow {
        if self.world.all_players_dead() {
            return Flow::Over(Winner::Foe);
        }

        self.wake_foe_if_near();

        let foe = self.world.foe().position();
        for id in self.world.player_ids() {
            let home = self.world.board().secret_room(id);
            let Some(actor) = self.world.actor_mut(id) else {
                continue;
            };
            if !actor.is_alive() {
                continue;
            }
            let position = actor.position();
            if let Some(player) = actor.as_player_mut() {
                player.set_safe(home == Some(position));
            }
            if position == foe {
                self.attack(id);
            }
        }

        if self.world.all_players_dead() {
            return Flow::Over(Winner::Foe);
        }
        Flow::Continue
    }

    fn wake_foe_if_near(&mut self) {
        let asleep = self
            .world
            .foe()
            .as_foe()
            .is_some_and(|foe| !foe.is_awake());
        if !asleep {
            return;
        }

        let foe = self.world.foe().position();
        let nearest = self
            .world
            .players()
            .filter(|actor| query::is_player_alive(&self.world, actor.id()))
            .map(|actor| actor.position().square_distance(foe))
            .min();
        if !nearest.is_some_and(|distance| distance <= self.rules.awaken_range) {
            return;
        }

        if let Some(state) = self.world.foe_mut().as_foe_mut() {
            let _ = state.wake();
        }
        info!(?foe, "foe awoke");
        self.port.notify("The foe has awoken!");
        self.port.play_sound(SoundKind::FoeAwake);
        self.publish_actor(ActorId::FOE);
    }

    fn attack(&mut self, id: ActorId) {
        let Some(player) = self.world.actor_mut(id).and_then(Actor::as_player_mut) else {
            return;
        };
        player.wound();
        let dropped = player.is_carrying_treasure();
        player.set_carrying_treasure(false);

        if let Some(home) = self.world.board().secret_room(id) {
            self.world.relocate(id, home);
        }
        self.world.foe_mut().show();
        if dropped {
            self.world.board_mut().restore_treasure();
            self.publish_board();
        }

        self.port.notify("You were attacked!");
        let alive = self.world.actor_mut(id).is_some_and(Actor::is_alive);
        if alive {
            info!(player = id.get(), dropped, "player attacked");
            self.port.play_sound(SoundKind::FoeAttack);
        } else {
            info!(player = id.get(), "player perished");
            self.port
                .notify(&format!("PLAYER {} has perished.", id.get()));
            self.port.play_sound(SoundKind::Defeat);
        }
        self.publish_actor(id);
        self.publish_actor(ActorId::FOE);
    }

    /// Settles two alive players sharing a cell when either holds the
    /// treasure. Returns whether a fight took place.
    ///
    /// The mover wins only with strictly more fatigue left. The winner ends up
    /// holding the treasure and the loser is thrown into the ring of cells
    /// `teleport_distance..=teleport_distance + 1` away from the winner.
    pub(crate) fn resolve_contest(&mut self, mover: ActorId) -> Result<bool, SessionError> {
        let Some(position) = self.world.actor(mover).map(Actor::position) else {
            return Ok(false);
        };
        let Some(&other) = query::alive_players_at(&self.world, position, mover).first() else {
            return Ok(false);
        };
        let (Some(mover_state), Some(other_state)) = (self.player(mover), self.player(other))
        else {
            return Ok(false);
        };
        if !mover_state.is_carrying_treasure() && !other_state.is_carrying_treasure() {
            return Ok(false);
        }

        let (winner, loser) = if mover_state.fatigue() > other_state.fatigue() {
            (mover, other)
        } else {
            (other, mover)
        };
        let landing = self.teleport_target(position)?;
        for (id, carrying) in [(winner, true), (loser, false)] {
            if let Some(player) = self.world.actor_mut(id).and_then(Actor::as_player_mut) {
                player.set_carrying_treasure(carrying);
            }
        }
        self.world.relocate(loser, landing);

        let message = if winner == mover && mover_state.is_carrying_treasure() {
            format!(
                "PLAYER {} defended the treasure\nfrom PLAYER {}!",
                winner.get(),
                loser.get()
            )
        } else {
            format!(
                "PLAYER {} stole the\ntreasure from PLAYER {}!",
                winner.get(),
                loser.get()
            )
        };
        info!(winner = winner.get(), loser = loser.get(), ?landing, "treasure contested");
        self.port.notify(&message);
        self.publish_actor(winner);
        self.publish_actor(loser);
        Ok(true)
    }

    fn teleport_target(&mut self, around: Position) -> Result<Position, SessionError> {
        let size = self.world.board().size();
        let foe = self.world.foe().position();
        let near = self.rules.teleport_distance;
        let far = near.saturating_add(1);

        (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|cell| {
                let distance = around.square_distance(*cell);
                (near..=far).contains(&distance) && *cell != foe
            })
            .choose(&mut self.rng)
            .ok_or(SessionError::NoTeleportCandidate { around, near, far })
    }

    /// Nudges one of two players left sharing a cell at the end of the mover's
    /// turn. The player standing on their own home stays put; otherwise the
    /// mover yields. The nudge follows an open wall and reveals nothing.
    ///
    /// Only the other player has to be alive: a mover killed and sent home
    /// still pushes a visitor off their home.
    pub(crate) fn resolve_amicable(&mut self, mover: ActorId) {
        let Some(position) = self.world.actor(mover).map(Actor::position) else {
            return;
        };
        let Some(&other) = query::alive_players_at(&self.world, position, mover).first() else {
            return;
        };

        let nudged = if self.world.board().secret_room(mover) == Some(position) {
            other
        } else {
            mover
        };
        let board = self.world.board();
        let options: Vec<Position> = position
            .neighbors(board.size())
            .filter(|neighbor| !board.walls().blocks(position, *neighbor))
            .collect();
        let Some(&destination) = options.choose(&mut self.rng) else {
            return;
        };

        debug!(player = nudged.get(), from = ?position, to = ?destination, "player nudged");
        self.world.relocate(nudged, destination);
        self.publish_actor(nudged);
    }

    /// With the configured chance, heals one injury of a random player and
    /// restores their stamina.
    pub(crate) fn renew(&mut self) {
        if self.rng.gen_range(0..100) >= self.rules.renewal_chance_percent {
            return;
        }
        let players = self.world.player_ids();
        let Some(&id) = players.choose(&mut self.rng) else {
            return;
        };
        let Some(actor) = self.world.actor_mut(id) else {
            return;
        };
        if !actor.is_alive() {
            return;
        }
        if let Some(player) = actor.as_player_mut() {
            let _ = player.heal();
            player.reset_fatigue();
        }

        info!(player = id.get(), "player rejuvenated");
        self.port
            .notify(&format!("PLAYER {} has been\nrejuvenated!", id.get()));
        self.publish_actor(id);
    }
}
