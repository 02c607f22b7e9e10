//! Tunable game rules and their TOML loader.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every tunable constant of a session.
///
/// `Rules::default()` yields the classic two-player game on an 8x8 board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Number of cells along each board edge.
    pub board_size: u32,
    /// Percent chance that a random player is rejuvenated after a round.
    pub renewal_chance_percent: u32,
    /// Minimum Chebyshev distance between a contest winner and the teleported loser.
    /// The loser lands at this distance or one further.
    pub teleport_distance: u32,
    /// Chebyshev distance at which an alive player wakes the foe.
    pub awaken_range: u32,
    /// The treasure room must lie strictly further than this from every home.
    pub treasure_clearance: u32,
    /// Extra interior wall removals per board edge cell, injected after carving.
    pub loop_factor: u32,
    /// Fatigue a player starts with and is restored to on rejuvenation.
    pub fatigue_max: u32,
    /// Moves granted to an uninjured player without the treasure.
    pub maximum_moves: u32,
    /// Floor on moves per turn, and the exact allowance while carrying the treasure.
    pub minimum_moves: u32,
    /// Injury level at which a player dies.
    pub fatal_injury: u32,
    /// Seed for the session's random source; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            board_size: 8,
            renewal_chance_percent: 15,
            teleport_distance: 3,
            awaken_range: 3,
            treasure_clearance: 3,
            loop_factor: 2,
            fatigue_max: 50,
            maximum_moves: 8,
            minimum_moves: 4,
            fatal_injury: 3,
            seed: None,
        }
    }
}

impl Rules {
    /// Parses and validates rules from a TOML document. Missing keys fall back
    /// to their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, RulesError> {
        let rules: Rules = toml::from_str(contents)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks the rules for values that would make the game unplayable.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.board_size < 2 {
            return Err(RulesError::BoardTooSmall {
                board_size: self.board_size,
            });
        }
        let minimum = self.minimum_board_size();
        if self.board_size < minimum {
            return Err(RulesError::SpacingDoesNotFit {
                board_size: self.board_size,
                minimum,
            });
        }
        if self.minimum_moves == 0 || self.minimum_moves > self.maximum_moves {
            return Err(RulesError::MoveAllowance {
                minimum: self.minimum_moves,
                maximum: self.maximum_moves,
            });
        }
        if self.fatal_injury == 0 {
            return Err(RulesError::ZeroFatalInjury);
        }
        if self.renewal_chance_percent > 100 {
            return Err(RulesError::RenewalChance {
                percent: self.renewal_chance_percent,
            });
        }
        Ok(())
    }

    /// Smallest board on which every spacing rule can always be met.
    ///
    /// Each home rules out a `2 * clearance + 1` square around it; while that
    /// square is narrower than the board it covers at most one corner, so two
    /// homes always leave a corner for the treasure room. The teleport ring
    /// needs a cell `teleport_distance` away even from the middle of the board.
    #[must_use]
    pub fn minimum_board_size(&self) -> u32 {
        let clearance = self.treasure_clearance.saturating_mul(2).saturating_add(2);
        let teleport = self.teleport_distance.saturating_mul(2);
        clearance.max(teleport).max(2)
    }

    /// Per-player limits derived from these rules.
    #[must_use]
    pub const fn player_limits(&self) -> PlayerLimits {
        PlayerLimits {
            fatigue_max: self.fatigue_max,
            maximum_moves: self.maximum_moves,
            minimum_moves: self.minimum_moves,
            fatal_injury: self.fatal_injury,
        }
    }
}

/// Subset of [`Rules`] every player carries with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerLimits {
    /// Fatigue on spawn and after rejuvenation.
    pub fatigue_max: u32,
    /// Moves granted to an uninjured player without the treasure.
    pub maximum_moves: u32,
    /// Floor on moves per turn.
    pub minimum_moves: u32,
    /// Injury level at which a player dies.
    pub fatal_injury: u32,
}

impl Default for PlayerLimits {
    fn default() -> Self {
        Rules::default().player_limits()
    }
}

/// Reasons a rules document may be rejected.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The TOML document could not be parsed.
    #[error("failed to parse rules: {0}")]
    Parse(#[from] toml::de::Error),
    /// The board must be at least two cells wide.
    #[error("board_size must be at least 2 (received {board_size})")]
    BoardTooSmall {
        /// Rejected board size.
        board_size: u32,
    },
    /// The board cannot always host the treasure room clearance or the
    /// teleport ring.
    #[error(
        "board_size {board_size} is too small for treasure_clearance and teleport_distance \
         (needs at least {minimum})"
    )]
    SpacingDoesNotFit {
        /// Rejected board size.
        board_size: u32,
        /// Smallest board that fits the spacing rules.
        minimum: u32,
    },
    /// The move allowance range is empty or zero.
    #[error("move allowance must satisfy 0 < minimum <= maximum (received {minimum}..={maximum})")]
    MoveAllowance {
        /// Rejected minimum.
        minimum: u32,
        /// Rejected maximum.
        maximum: u32,
    },
    /// A fatal injury level of zero would kill every player on spawn.
    #[error("fatal_injury must be positive")]
    ZeroFatalInjury,
    /// The renewal chance is a percentage.
    #[error("renewal_chance_percent must not exceed 100 (received {percent})")]
    RenewalChance {
        /// Rejected percentage.
        percent: u32,
    },
}
