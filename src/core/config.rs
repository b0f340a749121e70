//! Duel configuration types.
//!
//! Duels are configured at startup by providing:
//! - `ZoneLimits`: Slot counts for the on-field zones
//! - `DuelConfig`: Life points, deck constraints, pacing, shuffle seed
//!
//! `Phase` lives here too since phase ordering is part of the duel's
//! fixed structure rather than of any card.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::EngineError;

/// Turn phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Draw,
    Standby,
    #[default]
    Main1,
    Battle,
    Main2,
    End,
}

impl Phase {
    /// Check if this is one of the two main phases.
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }

    /// The phase that follows this one on the given turn.
    ///
    /// The first turn has no battle phase, so Main 1 goes straight to End.
    /// `End` returns `None`: leaving it starts a new turn.
    #[must_use]
    pub const fn next(self, turn: u32) -> Option<Phase> {
        match self {
            Phase::Draw => Some(Phase::Standby),
            Phase::Standby => Some(Phase::Main1),
            Phase::Main1 if turn <= 1 => Some(Phase::End),
            Phase::Main1 => Some(Phase::Battle),
            Phase::Battle => Some(Phase::Main2),
            Phase::Main2 => Some(Phase::End),
            Phase::End => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Draw => "Draw Phase",
            Phase::Standby => "Standby Phase",
            Phase::Main1 => "Main Phase 1",
            Phase::Battle => "Battle Phase",
            Phase::Main2 => "Main Phase 2",
            Phase::End => "End Phase",
        };
        f.write_str(name)
    }
}

/// Slot counts for the zones that have a hard limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ZoneLimits {
    /// Main monster zone slots.
    pub main_monster_zone: usize,
    /// Spell & trap zone slots.
    pub spell_trap_zone: usize,
    /// Field zone slots.
    pub field_zone: usize,
    /// Maximum extra deck size.
    pub extra_deck: usize,
}

impl Default for ZoneLimits {
    fn default() -> Self {
        Self {
            main_monster_zone: 5,
            spell_trap_zone: 5,
            field_zone: 1,
            extra_deck: 15,
        }
    }
}

/// Complete duel configuration.
///
/// ## Example
///
/// ```
/// use rust_duel::core::DuelConfig;
///
/// let config = DuelConfig::default()
///     .with_initial_life_points(4000)
///     .with_seed(7)
///     .without_shuffle();
///
/// assert_eq!(config.initial_life_points, 4000);
/// assert!(!config.shuffle_deck);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DuelConfig {
    /// Starting life points for both sides.
    pub initial_life_points: i32,

    /// Zone slot limits.
    pub zone_limits: ZoneLimits,

    /// Minimum main deck size.
    pub min_deck_size: usize,

    /// Maximum main deck size.
    pub max_deck_size: usize,

    /// Cards drawn at duel start.
    pub starting_hand_size: usize,

    /// Normal summons allowed per turn.
    pub normal_summon_limit: u32,

    /// Pause after `info` steps so the notification is perceivable.
    pub info_delay_ms: u64,

    /// Shuffle the main deck at duel start.
    pub shuffle_deck: bool,

    /// Seed for the deck shuffle.
    pub seed: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            initial_life_points: 8000,
            zone_limits: ZoneLimits::default(),
            min_deck_size: 40,
            max_deck_size: 60,
            starting_hand_size: 5,
            normal_summon_limit: 1,
            info_delay_ms: 300,
            shuffle_deck: true,
            seed: 0,
        }
    }
}

impl DuelConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|source| EngineError::Parse {
            origin: "duel config".to_string(),
            source,
        })
    }

    /// The pause after `info` steps.
    #[must_use]
    pub fn info_delay(&self) -> Duration {
        Duration::from_millis(self.info_delay_ms)
    }

    /// Set starting life points.
    #[must_use]
    pub fn with_initial_life_points(mut self, life_points: i32) -> Self {
        self.initial_life_points = life_points;
        self
    }

    /// Set zone limits.
    #[must_use]
    pub fn with_zone_limits(mut self, limits: ZoneLimits) -> Self {
        self.zone_limits = limits;
        self
    }

    /// Set the accepted main deck size range.
    #[must_use]
    pub fn with_deck_size(mut self, min: usize, max: usize) -> Self {
        self.min_deck_size = min;
        self.max_deck_size = max;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Set the pause after `info` steps, in milliseconds.
    #[must_use]
    pub fn with_info_delay_ms(mut self, millis: u64) -> Self {
        self.info_delay_ms = millis;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep the main deck in the given order.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle_deck = false;
        self
    }
}
