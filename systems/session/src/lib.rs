#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based state machine that drives a Labyrinth game.
//!
//! A [`Session`] owns the world and is its only mutator. It pulls player input
//! through an [`InputGate`], applies the rules, and reports every change to its
//! [`PresentationPort`]. One game runs setup, confirmation, the round loop and
//! the game-over screen; [`Session::run`] plays games back to back until the
//! port requests shutdown.

mod error;
mod resolution;

use labyrinth_core::{ActorId, InputEvent, Position, Rules, SoundKind, Winner, MAX_PLAYERS};
use labyrinth_presentation::{InputGate, PresentationPort, ShutdownHandle};
use labyrinth_system_pursuit::Pursuit;
use labyrinth_world::{query, Actor, Player, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

pub use error::SessionError;

/// Where the state machine currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the given player (1-based) to pick a home.
    Setup {
        /// Player choosing a home.
        player: u32,
    },
    /// Treasure placed; waiting for NEXT to begin.
    Confirm,
    /// Round loop in progress.
    Round {
        /// 1-based round counter.
        number: u32,
    },
    /// The game ended; waiting for NEXT or RESET.
    GameOver {
        /// Side that won.
        winner: Winner,
    },
}

/// How a single game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    /// A player asked to abandon the game.
    Reset,
    /// Someone won and the result was acknowledged.
    Won(Winner),
}

/// Whether the current game carries on after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Reset,
    Over(Winner),
}

/// Orchestrates games for up to [`MAX_PLAYERS`] players and one foe.
#[derive(Debug)]
pub struct Session<P, R = ChaCha8Rng> {
    rules: Rules,
    port: P,
    gate: InputGate,
    rng: R,
    world: World,
    phase: Phase,
    pursuit: Pursuit,
    fresh: bool,
}

impl<P> Session<P, ChaCha8Rng>
where
    P: PresentationPort,
{
    /// Creates a session seeded from `rules.seed`, or from OS entropy when no
    /// seed is configured.
    pub fn new(rules: Rules, port: P) -> Result<Self, SessionError> {
        let rng = rules
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self::with_rng(rules, port, rng)
    }
}

impl<P, R> Session<P, R>
where
    P: PresentationPort,
    R: Rng,
{
    /// Creates a session drawing randomness from `rng`.
    pub fn with_rng(rules: Rules, mut port: P, mut rng: R) -> Result<Self, SessionError> {
        rules.validate()?;
        let gate = InputGate::new();
        port.attach_shutdown(gate.shutdown_handle());
        let world = World::new(rules.clone(), &mut rng);
        let pursuit = Pursuit::new(rules.fatal_injury);

        Ok(Self {
            rules,
            port,
            gate,
            rng,
            world,
            phase: Phase::Setup { player: 1 },
            pursuit,
            fresh: true,
        })
    }

    /// Current state of the machine.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only view of the current game.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The presentation port.
    #[must_use]
    pub const fn port(&self) -> &P {
        &self.port
    }

    /// Handle that stops [`Session::run`] from any thread.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.gate.shutdown_handle()
    }

    /// Plays games back to back until shutdown is requested.
    ///
    /// Cancellation is a clean exit. Any other error means the rules cannot be
    /// played on the configured board.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            match self.play_game() {
                Ok(end) => info!(?end, "game finished"),
                Err(error) if error.is_cancelled() => return Ok(()),
                Err(error) => return Err(error),
            }
        }
    }

    /// Plays exactly one game, from home selection until it is reset or its
    /// result is acknowledged. The previous game, if any, is discarded first.
    pub fn play_game(&mut self) -> Result<GameEnd, SessionError> {
        if !self.fresh {
            self.restart();
        }
        self.fresh = false;
        self.publish_all();

        if self.setup()? == Flow::Reset {
            info!("game reset during setup");
            return Ok(GameEnd::Reset);
        }
        if self.confirm()? == Flow::Reset {
            info!("game reset before the first round");
            return Ok(GameEnd::Reset);
        }

        self.port.notify("Find the treasure!");
        let mut number = 1;
        loop {
            self.phase = Phase::Round { number };
            debug!(round = number, "round started");
            match self.play_round()? {
                Flow::Continue => number += 1,
                Flow::Reset => {
                    info!(round = number, "game reset");
                    return Ok(GameEnd::Reset);
                }
                Flow::Over(winner) => return self.game_over(winner),
            }
        }
    }

    fn restart(&mut self) {
        self.world = World::new(self.rules.clone(), &mut self.rng);
        self.phase = Phase::Setup { player: 1 };
        self.port.clear();
        info!("board rebuilt");
    }

    fn setup(&mut self) -> Result<Flow, SessionError> {
        for player in 1..=MAX_PLAYERS {
            self.phase = Phase::Setup { player };
            info!(player, "choosing home");
            if let Some(cue) = SoundKind::player_cue(ActorId::new(player)) {
                self.port.play_sound(cue);
            }
            self.port.notify(&format!("PLAYER {player}:\n-> Choose your home."));

            loop {
                match self.gate.next_event(&mut self.port)? {
                    InputEvent::Reset => return Ok(Flow::Reset),
                    InputEvent::Next if player > 1 => {
                        debug!(players = self.world.player_count(), "no more players");
                        return Ok(Flow::Continue);
                    }
                    InputEvent::Cell(cell) => {
                        if let Some(id) = self.world.spawn_player(cell) {
                            self.publish_actor(id);
                            self.publish_board();
                            break;
                        }
                        debug!(player, ?cell, "home rejected");
                        self.port.notify("Not a valid home.");
                    }
                    other => trace!(player, ?other, "input ignored during setup"),
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn confirm(&mut self) -> Result<Flow, SessionError> {
        self.phase = Phase::Confirm;
        let room = self
            .world
            .board_mut()
            .select_treasure_room(self.rules.treasure_clearance, &mut self.rng)?;
        self.world.relocate(ActorId::FOE, room);
        self.publish_board();
        self.publish_actor(ActorId::FOE);
        info!(?room, "treasure hidden");

        self.port.notify("Press NEXT.");
        loop {
            match self.gate.next_event(&mut self.port)? {
                InputEvent::Next => return Ok(Flow::Continue),
                InputEvent::Reset => return Ok(Flow::Reset),
                other => trace!(?other, "input ignored while confirming"),
            }
        }
    }

    fn play_round(&mut self) -> Result<Flow, SessionError> {
        let flow = self.foe_turn();
        if flow != Flow::Continue {
            return Ok(flow);
        }

        for id in self.world.player_ids() {
            let flow = self.player_turn(id)?;
            if flow != Flow::Continue {
                return Ok(flow);
            }
        }

        self.renew();
        Ok(Flow::Continue)
    }

    fn foe_turn(&mut self) -> Flow {
        let awake = self.world.foe().as_foe().is_some_and(|foe| foe.is_awake());
        if !awake {
            return Flow::Continue;
        }

        self.port.notify("The Foe moves...");
        let from = self.world.foe().position();
        let actors = query::actor_snapshots(&self.world);
        let treasure_room = self.world.board().treasure().position();
        if let Some(step) = self.pursuit.handle(from, &actors, treasure_room) {
            debug!(?from, to = ?step.next, quarry = ?step.quarry, "foe step");
            self.world.relocate(ActorId::FOE, step.next);
            self.publish_actor(ActorId::FOE);
        }

        let flow = self.resolve_interactions();
        if flow == Flow::Continue {
            self.port.play_sound(SoundKind::FoeMove);
        }
        flow
    }

    fn player_turn(&mut self, id: ActorId) -> Result<Flow, SessionError> {
        let alive = self.world.actor_mut(id).is_some_and(Actor::is_alive);
        let Some(mut remaining) = self.player(id).map(|player| player.max_moves_this_turn())
        else {
            return Ok(Flow::Continue);
        };
        if !alive {
            trace!(player = id.get(), "dead player skipped");
            return Ok(Flow::Continue);
        }

        self.port.notify(&format!("PLAYER {}'s turn!", id.get()));
        if let Some(cue) = SoundKind::player_cue(id) {
            self.port.play_sound(cue);
        }

        let mut contested = false;
        while remaining > 0 {
            let destination = match self.gate.next_event(&mut self.port)? {
                InputEvent::Reset => return Ok(Flow::Reset),
                InputEvent::Next => break,
                InputEvent::Orphaned => {
                    trace!(player = id.get(), "orphaned input ignored");
                    continue;
                }
                InputEvent::Cell(destination) => destination,
            };

            let Some(from) = self.world.actor(id).map(Actor::position) else {
                break;
            };
            if !destination.is_within(self.world.board().size())
                || !from.is_orthogonal_neighbor(destination)
            {
                self.port.notify("You cannot move there.");
                self.port.play_sound(SoundKind::IllegalMove);
                continue;
            }

            let legal = self
                .world
                .board_mut()
                .is_move_legal(from, destination, true);
            self.publish_board();
            if !legal {
                debug!(player = id.get(), ?from, ?destination, "wall hit");
                self.port.notify("You hit a wall!\nYour turn is over.");
                self.port.play_sound(SoundKind::Wall);
                break;
            }

            self.step(id, destination);
            remaining -= 1;
            debug!(player = id.get(), cell = ?destination, remaining, "player moved");

            if self.pick_up_treasure(id, destination) {
                break;
            }
            if let Some(winner) = self.homecoming() {
                return Ok(Flow::Over(Winner::Player(winner)));
            }

            let flow = self.resolve_interactions();
            if flow != Flow::Continue {
                return Ok(flow);
            }
            if self.resolve_contest(id)? {
                contested = true;
                break;
            }
            if !query::is_player_alive(&self.world, id) {
                break;
            }
        }

        if !contested {
            self.resolve_amicable(id);
        }

        Ok(self
            .homecoming()
            .map_or(Flow::Continue, |winner| Flow::Over(Winner::Player(winner))))
    }

    fn step(&mut self, id: ActorId, destination: Position) {
        self.world.relocate(id, destination);
        if let Some(player) = self.world.actor_mut(id).and_then(Actor::as_player_mut) {
            player.tire();
        }
        self.port.play_sound(SoundKind::PlayerMove);
        self.publish_actor(id);
    }

    fn pick_up_treasure(&mut self, id: ActorId, cell: Position) -> bool {
        let treasure = self.world.board().treasure();
        if !treasure.is_present() || treasure.position() != Some(cell) {
            return false;
        }

        let _ = self.world.board_mut().take_treasure();
        if let Some(player) = self.world.actor_mut(id).and_then(Actor::as_player_mut) {
            player.set_carrying_treasure(true);
        }
        info!(player = id.get(), ?cell, "treasure taken");
        self.port.notify("You got the treasure!\nThe Foe senses this...");
        self.port.play_sound(SoundKind::Goal);
        self.publish_board();
        self.publish_actor(id);
        true
    }

    /// Alive player standing on their own home with the treasure.
    fn homecoming(&self) -> Option<ActorId> {
        query::treasure_carrier(&self.world)
            .filter(|&id| self.player(id).is_some_and(|player| player.is_safe()))
    }

    fn game_over(&mut self, winner: Winner) -> Result<GameEnd, SessionError> {
        self.phase = Phase::GameOver { winner };
        info!(?winner, "game over");

        let message = match winner {
            Winner::Foe => {
                self.port.play_sound(SoundKind::Defeat);
                "No one left alive...\nThe Foe slumbers.".to_owned()
            }
            Winner::Player(id) => {
                self.port.play_sound(SoundKind::Win);
                format!("PLAYER {} WINS!\nCongratulations!", id.get())
            }
        };
        self.port.notify(&format!("{message}\n(RESET or NEXT)"));

        loop {
            match self.gate.next_event(&mut self.port)? {
                InputEvent::Next | InputEvent::Reset => return Ok(GameEnd::Won(winner)),
                other => trace!(?other, "input ignored after game over"),
            }
        }
    }

    fn player(&self, id: ActorId) -> Option<Player> {
        self.world.actor(id).and_then(Actor::as_player).copied()
    }

    fn publish_actor(&mut self, id: ActorId) {
        if let Some(snapshot) = query::actor_snapshot(&self.world, id) {
            self.port.actor_changed(snapshot);
        }
    }

    fn publish_board(&mut self) {
        self.port.board_changed(query::board_snapshot(&self.world));
    }

    fn publish_all(&mut self) {
        self.publish_board();
        for snapshot in query::actor_snapshots(&self.world) {
            self.port.actor_changed(snapshot);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use labyrinth_core::{RoleSnapshot, RulesError, WallGrid};
    use labyrinth_presentation::ScriptedPresentation;

    const P1: ActorId = ActorId::new(1);
    const P2: ActorId = ActorId::new(2);

    fn cell(x: u32, y: u32) -> InputEvent {
        InputEvent::Cell(Position::new(x, y))
    }

    #[test]
    fn setup_rejects_duplicate_homes_and_ignores_early_next() {
        let script = vec![
            InputEvent::Next,
            cell(0, 0),
            cell(0, 0),
            InputEvent::Orphaned,
            cell(7, 7),
        ];
        let mut session = Session::with_rng(
            Rules::default(),
            ScriptedPresentation::new(script),
            ChaCha8Rng::seed_from_u64(11),
        )
        .expect("session");

        assert_eq!(session.setup().expect("setup"), Flow::Continue);
        assert_eq!(session.world().player_ids(), vec![P1, P2]);
        assert_eq!(session.world().board().secret_room(P2), Some(Position::new(7, 7)));
        assert!(session.port().was_notified("Not a valid home."));
        assert!(session.port().was_notified("PLAYER 2:\n-> Choose your home."));
    }

    #[test]
    fn next_after_first_player_stops_setup() {
        let mut session = Session::with_rng(
            Rules::default(),
            ScriptedPresentation::new(vec![cell(1, 1), InputEvent::Next]),
            ChaCha8Rng::seed_from_u64(11),
        )
        .expect("session");

        assert_eq!(session.setup().expect("setup"), Flow::Continue);
        assert_eq!(session.world().player_count(), 1);
        assert_eq!(session.phase(), Phase::Setup { player: 2 });
    }

    #[test]
    fn off_board_home_is_rejected() {
        let mut session = Session::with_rng(
            Rules::default(),
            ScriptedPresentation::new(vec![cell(8, 3), InputEvent::Reset]),
            ChaCha8Rng::seed_from_u64(11),
        )
        .expect("session");

        assert_eq!(session.setup().expect("setup"), Flow::Reset);
        assert_eq!(session.world().player_count(), 0);
        assert!(session.port().was_notified("Not a valid home."));
    }

    #[test]
    fn confirm_moves_foe_onto_treasure_room() {
        let mut session = Session::with_rng(
            Rules::default(),
            ScriptedPresentation::new(vec![cell(0, 0), InputEvent::Next, InputEvent::Next]),
            ChaCha8Rng::seed_from_u64(3),
        )
        .expect("session");

        assert_eq!(session.setup().expect("setup"), Flow::Continue);
        assert_eq!(session.confirm().expect("confirm"), Flow::Continue);
        let room = session
            .world()
            .board()
            .treasure()
            .position()
            .expect("room selected");
        assert!(room.square_distance(Position::new(0, 0)) > 3);
        assert_eq!(session.world().foe().position(), room);
        assert!(!session.world().foe().is_visible());
    }

    #[test]
    fn illegal_requests_do_not_spend_moves() {
        let script = vec![
            cell(3, 3),
            cell(5, 5),
            cell(0, 1),
            InputEvent::Next,
        ];
        let mut session =
            session_on_open_board(&[Position::new(0, 0)], Position::new(7, 7), script);

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);
        let player = session.player(P1).expect("player");
        assert_eq!(session.world().actor(P1).map(Actor::position), Some(Position::new(0, 1)));
        assert_eq!(player.fatigue(), 49);
        assert!(!player.is_safe());
        let illegal = session
            .port()
            .sounds()
            .iter()
            .filter(|sound| **sound == SoundKind::IllegalMove)
            .count();
        assert_eq!(illegal, 2);
    }

    #[test]
    fn moves_run_out_at_the_allowance() {
        let mut script: Vec<InputEvent> = (1..=4).map(|y| cell(0, y)).collect();
        script.extend((1..=4).map(|x| cell(x, 4)));
        script.push(cell(4, 5));
        let mut session =
            session_on_open_board(&[Position::new(0, 0)], Position::new(7, 0), script);

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);
        assert_eq!(session.world().actor(P1).map(Actor::position), Some(Position::new(4, 4)));
        assert_eq!(session.port().remaining(), 1);
    }

    #[test]
    fn wall_hit_ends_turn_and_reveals_wall() {
        let rules = Rules::default();
        let mut session = Session::with_rng(
            rules.clone(),
            ScriptedPresentation::new(vec![cell(2, 1), cell(2, 2)]),
            ChaCha8Rng::seed_from_u64(1),
        )
        .expect("session");
        let mut world = World::with_walls(rules, WallGrid::closed(8));
        let _ = world.spawn_player(Position::new(2, 2)).expect("home");
        session.world = world;

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);
        assert!(session.port().was_notified("You hit a wall!"));
        assert_eq!(session.port().sounds().last(), Some(&SoundKind::Wall));
        assert_eq!(session.world().board().walls().revealed_interior_count(), 1);
        assert_eq!(session.port().remaining(), 1);
    }

    #[test]
    fn picking_up_the_treasure_ends_the_turn() {
        let script = vec![cell(3, 4), cell(3, 5)];
        let mut session =
            session_on_open_board(&[Position::new(3, 3)], Position::new(3, 4), script);
        session.world.relocate(ActorId::FOE, Position::new(7, 7));

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);
        assert!(session.player(P1).is_some_and(|p| p.is_carrying_treasure()));
        assert!(!session.world().board().treasure().is_present());
        assert!(session.port().sounds().contains(&SoundKind::Goal));
        assert_eq!(session.port().remaining(), 1);
    }

    #[test]
    fn carrying_the_treasure_home_wins() {
        let script = vec![cell(3, 3)];
        let mut session =
            session_on_open_board(&[Position::new(3, 3)], Position::new(7, 7), script);
        session.world.relocate(P1, Position::new(3, 4));
        let _ = session.world.board_mut().take_treasure();
        player_mut(&mut session, P1).set_carrying_treasure(true);

        assert_eq!(
            session.player_turn(P1).expect("turn"),
            Flow::Over(Winner::Player(P1))
        );
    }

    #[test]
    fn reset_aborts_mid_turn() {
        let script = vec![cell(0, 1), InputEvent::Reset, cell(0, 2)];
        let mut session =
            session_on_open_board(&[Position::new(0, 0)], Position::new(7, 7), script);

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Reset);
        assert_eq!(session.port().remaining(), 1);
    }

    #[test]
    fn dead_players_are_skipped_without_input() {
        let mut session = session_on_open_board(
            &[Position::new(0, 0), Position::new(7, 0)],
            Position::new(4, 7),
            vec![InputEvent::Next],
        );
        for _ in 0..3 {
            player_mut(&mut session, P1).wound();
        }

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);
        assert_eq!(session.port().remaining(), 1);
        assert!(!session.world().actor(P1).is_some_and(Actor::is_visible));
    }

    #[test]
    fn dormant_foe_stays_put() {
        let mut session =
            session_on_open_board(&[Position::new(0, 0)], Position::new(7, 7), vec![]);
        assert_eq!(session.foe_turn(), Flow::Continue);
        assert_eq!(session.world().foe().position(), Position::new(7, 7));
        assert!(session.port().notifications().is_empty());
    }

    #[test]
    fn awake_foe_steps_toward_exposed_player() {
        let mut session =
            session_on_open_board(&[Position::new(0, 0)], Position::new(7, 7), vec![]);
        session.world.relocate(P1, Position::new(2, 7));
        wake_foe(&mut session);

        assert_eq!(session.foe_turn(), Flow::Continue);
        assert_eq!(session.world().foe().position(), Position::new(6, 7));
        assert_eq!(session.port().sounds().last(), Some(&SoundKind::FoeMove));
    }

    #[test]
    fn foe_killing_the_last_player_wins_the_round() {
        let mut session = session_on_open_board(
            &[Position::new(0, 0)],
            Position::new(7, 7),
            vec![cell(1, 1), InputEvent::Next],
        );
        session.world.relocate(P1, Position::new(6, 6));
        player_mut(&mut session, P1).wound();
        player_mut(&mut session, P1).wound();
        wake_foe(&mut session);

        assert_eq!(session.play_round().expect("round"), Flow::Over(Winner::Foe));
        assert_eq!(session.game_over(Winner::Foe).expect("ack"), GameEnd::Won(Winner::Foe));
        assert_eq!(session.phase(), Phase::GameOver { winner: Winner::Foe });
        assert!(session
            .port()
            .was_notified("No one left alive...\nThe Foe slumbers.\n(RESET or NEXT)"));
        assert_eq!(
            session.port().latest_actor(P1).map(|snapshot| snapshot.role),
            Some(RoleSnapshot::Player {
                injury_level: 3,
                fatigue: 50,
                carrying_treasure: false,
                safe: true,
            })
        );
    }

    #[test]
    fn play_game_reports_reset_from_setup() {
        let mut session = Session::with_rng(
            Rules::default(),
            ScriptedPresentation::new(vec![InputEvent::Reset]),
            ChaCha8Rng::seed_from_u64(2),
        )
        .expect("session");
        assert_eq!(session.play_game().expect("game"), GameEnd::Reset);
    }

    #[test]
    fn run_returns_cleanly_when_script_runs_dry() {
        let mut session = Session::with_rng(
            Rules::default(),
            ScriptedPresentation::new(vec![InputEvent::Reset, cell(0, 0)]),
            ChaCha8Rng::seed_from_u64(2),
        )
        .expect("session");

        assert!(session.run().is_ok());
        assert_eq!(session.port().clears(), 1);
        assert_eq!(session.world().player_count(), 1);
    }

    #[test]
    fn winning_a_contest_ends_the_turn_without_a_nudge() {
        let script = vec![cell(4, 4), cell(4, 5)];
        let mut session = session_on_open_board(
            &[Position::new(0, 0), Position::new(7, 0)],
            Position::new(0, 7),
            script,
        );
        let _ = session.world.board_mut().take_treasure();
        player_mut(&mut session, P2).set_carrying_treasure(true);
        player_mut(&mut session, P2).set_fatigue(10);
        session.world.relocate(P1, Position::new(4, 3));
        session.world.relocate(P2, Position::new(4, 4));

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);

        assert_eq!(session.port().remaining(), 1);
        assert_eq!(session.world().actor(P1).map(Actor::position), Some(Position::new(4, 4)));
        assert!(session.player(P1).is_some_and(|p| p.is_carrying_treasure()));
        assert!(session.player(P2).is_some_and(|p| !p.is_carrying_treasure()));
        let loser = session.world().actor(P2).map(Actor::position).expect("loser");
        assert!((3..=4).contains(&loser.square_distance(Position::new(4, 4))));
        assert!(session.port().was_notified("PLAYER 1 stole the\ntreasure from PLAYER 2!"));
    }

    #[test]
    fn sharing_a_cell_at_the_end_of_a_turn_nudges_the_mover() {
        let script = vec![cell(2, 0), InputEvent::Next];
        let mut session = session_on_open_board(
            &[Position::new(0, 0), Position::new(7, 0)],
            Position::new(7, 7),
            script,
        );
        session.world.relocate(P1, Position::new(1, 0));
        session.world.relocate(P2, Position::new(2, 0));

        assert_eq!(session.player_turn(P1).expect("turn"), Flow::Continue);

        assert_eq!(session.port().remaining(), 0);
        assert_eq!(session.world().actor(P2).map(Actor::position), Some(Position::new(2, 0)));
        let mover = session.world().actor(P1).map(Actor::position).expect("mover");
        assert!(mover.is_orthogonal_neighbor(Position::new(2, 0)));
        assert_eq!(session.port().latest_actor(P1).map(|a| a.position), Some(mover));
    }

    #[test]
    fn shutdown_mid_turn_unwinds_and_keeps_the_world() {
        let script = vec![cell(1, 0)];
        let mut session =
            session_on_open_board(&[Position::new(0, 0)], Position::new(7, 7), script);

        let error = session.play_round().expect_err("script runs dry mid-turn");
        assert!(error.is_cancelled());

        assert_eq!(session.phase(), Phase::Round { number: 1 });
        assert_eq!(session.world().actor(P1).map(Actor::position), Some(Position::new(1, 0)));
        assert_eq!(session.player(P1).map(|p| p.fatigue()), Some(49));
        assert!(session.world().board().treasure().is_present());
        assert_eq!(session.world().foe().position(), Position::new(7, 7));
    }

    #[test]
    fn boards_too_small_for_the_spacing_rules_are_rejected() {
        let rules = Rules {
            board_size: 5,
            ..Rules::default()
        };
        assert!(matches!(
            Session::new(rules, ScriptedPresentation::default()),
            Err(SessionError::Rules(RulesError::SpacingDoesNotFit {
                board_size: 5,
                minimum: 8
            }))
        ));
    }

    #[test]
    fn invalid_rules_are_rejected_up_front() {
        let rules = Rules {
            board_size: 1,
            ..Rules::default()
        };
        assert!(matches!(
            Session::with_rng(rules, ScriptedPresentation::default(), ChaCha8Rng::seed_from_u64(0)),
            Err(SessionError::Rules(_))
        ));
    }
}
