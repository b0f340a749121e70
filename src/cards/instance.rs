//! Card instances - runtime card state.
//!
//! `CardInstance` represents one physical copy of a card at one moment of
//! the duel. Its identity (instance ID, card ID, static data) never changes;
//! its on-field state is changed by replacement: every transform returns a
//! new instance and the snapshot stores the copy.

use std::sync::Arc;

use im::{HashMap as ImHashMap, HashSet as ImHashSet};
use serde::{Deserialize, Serialize};

use super::definition::{CardData, CardId};
use crate::core::InstanceId;
use crate::state::ZoneName;

/// Face orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Face {
    FaceUp,
    FaceDown,
}

/// Battle position of a monster on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BattlePosition {
    Attack,
    Defense,
}

/// A card instance in a duel.
///
/// ## On-field state
///
/// - `face`, `battle_position`: orientation on the field
/// - `placed_this_turn`: set or summoned during the current turn
/// - `counters`: named counters (e.g. spell counters)
/// - `activated_effects`: effect IDs used this turn (once-per-turn effects)
///
/// All on-field state resets when the card leaves the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this copy.
    pub instance_id: InstanceId,

    /// Card passcode.
    pub card_id: CardId,

    /// Static card data.
    pub data: Arc<CardData>,

    /// Zone the instance is stored in.
    pub zone: ZoneName,

    /// Face orientation.
    pub face: Face,

    /// Battle position (monsters on the field only).
    pub battle_position: Option<BattlePosition>,

    /// Placed on the field this turn.
    pub placed_this_turn: bool,

    /// Named counters.
    #[serde(default)]
    pub counters: ImHashMap<String, u32>,

    /// Effect IDs activated this turn.
    #[serde(default)]
    pub activated_effects: ImHashSet<String>,
}

impl CardInstance {
    /// Create a face-down instance in the given zone.
    #[must_use]
    pub fn new(instance_id: InstanceId, data: Arc<CardData>, zone: ZoneName) -> Self {
        Self {
            instance_id,
            card_id: data.id,
            data,
            zone,
            face: Face::FaceDown,
            battle_position: None,
            placed_this_turn: false,
            counters: ImHashMap::new(),
            activated_effects: ImHashSet::new(),
        }
    }

    /// Card name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Check if the card is face-up.
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face == Face::FaceUp
    }

    /// Check if the card is on the field.
    #[must_use]
    pub fn is_on_field(&self) -> bool {
        self.zone.is_field()
    }

    /// Get a counter value.
    #[must_use]
    pub fn counter(&self, name: &str) -> u32 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Check if an effect was activated this turn.
    #[must_use]
    pub fn has_activated(&self, effect_id: &str) -> bool {
        self.activated_effects.contains(effect_id)
    }

    // === Replacement transforms ===

    /// Copy with a new zone.
    #[must_use]
    pub fn in_zone(&self, zone: ZoneName) -> Self {
        Self {
            zone,
            ..self.clone()
        }
    }

    /// Copy with a new face orientation.
    #[must_use]
    pub fn with_face(&self, face: Face) -> Self {
        Self {
            face,
            ..self.clone()
        }
    }

    /// Copy with a new battle position.
    #[must_use]
    pub fn with_battle_position(&self, position: Option<BattlePosition>) -> Self {
        Self {
            battle_position: position,
            ..self.clone()
        }
    }

    /// Copy with the placed-this-turn flag set.
    #[must_use]
    pub fn with_placed_this_turn(&self, placed: bool) -> Self {
        Self {
            placed_this_turn: placed,
            ..self.clone()
        }
    }

    /// Copy with `delta` added to a counter, capped at `max` when given.
    ///
    /// Counters never go below zero; a counter that reaches zero is removed.
    #[must_use]
    pub fn with_counter_delta(&self, name: &str, delta: i64, max: Option<u32>) -> Self {
        let current = i64::from(self.counter(name));
        let mut next = (current + delta).max(0);
        if let Some(max) = max {
            next = next.min(i64::from(max));
        }

        let mut counters = self.counters.clone();
        if next == 0 {
            counters.remove(name);
        } else {
            counters.insert(name.to_string(), next as u32);
        }

        Self {
            counters,
            ..self.clone()
        }
    }

    /// Copy with an effect recorded as activated this turn.
    #[must_use]
    pub fn with_activated_effect(&self, effect_id: &str) -> Self {
        let mut activated = self.activated_effects.clone();
        activated.insert(effect_id.to_string());
        Self {
            activated_effects: activated,
            ..self.clone()
        }
    }

    /// Copy with the per-turn flags cleared.
    #[must_use]
    pub fn with_turn_reset(&self) -> Self {
        Self {
            placed_this_turn: false,
            activated_effects: ImHashSet::new(),
            ..self.clone()
        }
    }

    /// Copy with all on-field state cleared, as when leaving the field.
    ///
    /// Cards in public zones off the field (graveyard, banished) are face-up;
    /// everything else is face-down.
    #[must_use]
    pub fn reset_for(&self, zone: ZoneName) -> Self {
        let face = if zone.is_public_off_field() {
            Face::FaceUp
        } else {
            Face::FaceDown
        };

        Self {
            zone,
            face,
            battle_position: None,
            placed_this_turn: false,
            counters: ImHashMap::new(),
            activated_effects: ImHashSet::new(),
            ..self.clone()
        }
    }
}
