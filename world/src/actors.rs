//! Foe and player entities sharing a common header.

use labyrinth_core::{ActorId, ActorSnapshot, PlayerLimits, Position, RoleSnapshot};

/// Actor on the board: common header plus variant-specific state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    id: ActorId,
    position: Position,
    visible: bool,
    role: Role,
}

/// Variant-specific actor state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// The antagonist.
    Foe(Foe),
    /// A human-controlled explorer.
    Player(Player),
}

impl Actor {
    /// Creates the dormant, hidden foe. It stays parked at the origin until
    /// the session places it on the treasure room.
    #[must_use]
    pub fn foe() -> Self {
        Self {
            id: ActorId::FOE,
            position: Position::default(),
            visible: false,
            role: Role::Foe(Foe::default()),
        }
    }

    /// Creates a visible, healthy player standing at `position`.
    #[must_use]
    pub fn player(id: ActorId, position: Position, limits: PlayerLimits) -> Self {
        Self {
            id,
            position,
            visible: true,
            role: Role::Player(Player::new(limits)),
        }
    }

    /// Identifier of the actor.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Cell currently occupied by the actor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether the presentation layer should draw the actor.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Moves the actor to `position`.
    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    /// Makes the actor visible.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Whether the actor is alive, syncing visibility to the answer.
    ///
    /// The foe never dies. A player is alive while its injury level stays
    /// below the fatal threshold; dead players disappear from the board.
    pub fn is_alive(&mut self) -> bool {
        match &self.role {
            Role::Foe(_) => true,
            Role::Player(player) => {
                let alive = player.is_alive();
                self.visible = alive;
                alive
            }
        }
    }

    /// Foe state, if this actor is the foe.
    #[must_use]
    pub fn as_foe(&self) -> Option<&Foe> {
        match &self.role {
            Role::Foe(foe) => Some(foe),
            Role::Player(_) => None,
        }
    }

    /// Mutable foe state, if this actor is the foe.
    pub fn as_foe_mut(&mut self) -> Option<&mut Foe> {
        match &mut self.role {
            Role::Foe(foe) => Some(foe),
            Role::Player(_) => None,
        }
    }

    /// Player state, if this actor is a player.
    #[must_use]
    pub fn as_player(&self) -> Option<&Player> {
        match &self.role {
            Role::Player(player) => Some(player),
            Role::Foe(_) => None,
        }
    }

    /// Mutable player state, if this actor is a player.
    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.role {
            Role::Player(player) => Some(player),
            Role::Foe(_) => None,
        }
    }

    /// Owned copy of the actor for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> ActorSnapshot {
        let role = match &self.role {
            Role::Foe(foe) => RoleSnapshot::Foe { awake: foe.awake },
            Role::Player(player) => RoleSnapshot::Player {
                injury_level: player.injury_level,
                fatigue: player.fatigue,
                carrying_treasure: player.carrying_treasure,
                safe: player.safe,
            },
        };
        ActorSnapshot {
            id: self.id,
            position: self.position,
            visible: self.visible,
            role,
        }
    }
}

/// Antagonist state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Foe {
    awake: bool,
}

impl Foe {
    /// Whether the foe has been woken.
    #[must_use]
    pub const fn is_awake(&self) -> bool {
        self.awake
    }

    /// Wakes the foe, reporting whether it was dormant. Never reverts.
    pub fn wake(&mut self) -> bool {
        let was_dormant = !self.awake;
        self.awake = true;
        was_dormant
    }
}

/// Explorer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    limits: PlayerLimits,
    injury_level: u32,
    fatigue: u32,
    carrying_treasure: bool,
    safe: bool,
}

impl Player {
    fn new(limits: PlayerLimits) -> Self {
        Self {
            limits,
            injury_level: 0,
            fatigue: limits.fatigue_max,
            carrying_treasure: false,
            safe: false,
        }
    }

    /// Moves granted for the coming turn.
    ///
    /// Carrying the treasure pins the allowance to the minimum; otherwise
    /// every injury costs two moves, floored at the minimum.
    #[must_use]
    pub fn max_moves_this_turn(&self) -> u32 {
        if self.carrying_treasure {
            return self.limits.minimum_moves;
        }
        self.limits
            .maximum_moves
            .saturating_sub(self.injury_level.saturating_mul(2))
            .max(self.limits.minimum_moves)
    }

    /// Adds one injury level.
    pub fn wound(&mut self) {
        self.injury_level = self.injury_level.saturating_add(1);
    }

    /// Removes one injury level, reporting whether there was one to remove.
    pub fn heal(&mut self) -> bool {
        if self.injury_level == 0 {
            return false;
        }
        self.injury_level -= 1;
        true
    }

    /// Spends stamina for one step; injuries make each step costlier.
    pub fn tire(&mut self) {
        let cost = self.injury_level.saturating_add(1);
        self.fatigue = self.fatigue.saturating_sub(cost);
    }

    /// Restores stamina to the maximum.
    pub fn reset_fatigue(&mut self) {
        self.fatigue = self.limits.fatigue_max;
    }

    /// Overrides stamina, clamped to the maximum.
    pub fn set_fatigue(&mut self, fatigue: u32) {
        self.fatigue = fatigue.min(self.limits.fatigue_max);
    }

    /// Whether the injury level is still below the fatal threshold.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.injury_level < self.limits.fatal_injury
    }

    /// Number of unhealed wounds.
    #[must_use]
    pub const fn injury_level(&self) -> u32 {
        self.injury_level
    }

    /// Remaining stamina.
    #[must_use]
    pub const fn fatigue(&self) -> u32 {
        self.fatigue
    }

    /// Whether the player holds the treasure.
    #[must_use]
    pub const fn is_carrying_treasure(&self) -> bool {
        self.carrying_treasure
    }

    /// Hands the treasure to, or takes it from, the player.
    pub fn set_carrying_treasure(&mut self, carrying: bool) {
        self.carrying_treasure = carrying;
    }

    /// Whether the player stands on their own secret room.
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        self.safe
    }

    /// Records whether the player stands on their own secret room.
    pub fn set_safe(&mut self, safe: bool) {
        self.safe = safe;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_player() -> Actor {
        Actor::player(ActorId::new(1), Position::new(2, 2), PlayerLimits::default())
    }

    fn player_state(actor: &mut Actor) -> &mut Player {
        actor.as_player_mut().expect("player actor")
    }

    #[test]
    fn move_allowance_shrinks_with_injuries() {
        let mut actor = fresh_player();
        let player = player_state(&mut actor);
        assert_eq!(player.max_moves_this_turn(), 8);

        player.wound();
        assert_eq!(player.max_moves_this_turn(), 6);

        player.wound();
        assert_eq!(player.max_moves_this_turn(), 4);

        player.wound();
        assert_eq!(player.max_moves_this_turn(), 4);
    }

    #[test]
    fn carrying_treasure_pins_allowance_to_minimum() {
        let mut actor = fresh_player();
        let player = player_state(&mut actor);
        player.set_carrying_treasure(true);
        assert_eq!(player.max_moves_this_turn(), 4);
        player.wound();
        player.wound();
        assert_eq!(player.max_moves_this_turn(), 4);
    }

    #[test]
    fn heal_reports_whether_it_helped() {
        let mut actor = fresh_player();
        let player = player_state(&mut actor);
        assert!(!player.heal());
        player.wound();
        assert!(player.heal());
        assert_eq!(player.injury_level(), 0);
    }

    #[test]
    fn tire_scales_with_injuries() {
        let mut actor = fresh_player();
        let player = player_state(&mut actor);
        player.tire();
        assert_eq!(player.fatigue(), 49);
        player.wound();
        player.tire();
        assert_eq!(player.fatigue(), 47);
        player.reset_fatigue();
        assert_eq!(player.fatigue(), 50);
    }

    #[test]
    fn is_alive_syncs_visibility() {
        let mut actor = fresh_player();
        assert!(actor.is_alive());
        assert!(actor.is_visible());

        for _ in 0..3 {
            player_state(&mut actor).wound();
        }
        assert!(!actor.is_alive());
        assert!(!actor.is_visible());

        assert!(player_state(&mut actor).heal());
        assert!(actor.is_alive());
        assert!(actor.is_visible());
    }

    #[test]
    fn foe_starts_hidden_and_wakes_once() {
        let mut foe = Actor::foe();
        assert_eq!(foe.id(), ActorId::FOE);
        assert!(!foe.is_visible());
        assert!(foe.is_alive());
        assert!(!foe.is_visible(), "liveness check leaves the foe hidden");

        let state = foe.as_foe_mut().expect("foe actor");
        assert!(state.wake());
        assert!(!state.wake());
        assert!(foe.as_foe().is_some_and(Foe::is_awake));
    }

    #[test]
    fn snapshot_mirrors_player_state() {
        let mut actor = fresh_player();
        player_state(&mut actor).set_carrying_treasure(true);
        player_state(&mut actor).set_safe(true);

        let snapshot = actor.snapshot();
        assert_eq!(snapshot.id, ActorId::new(1));
        assert_eq!(snapshot.position, Position::new(2, 2));
        assert!(snapshot.visible);
        assert_eq!(
            snapshot.role,
            RoleSnapshot::Player {
                injury_level: 0,
                fatigue: 50,
                carrying_treasure: true,
                safe: true,
            }
        );
    }
}
