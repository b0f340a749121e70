//! The chainable action capability.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance, SpellType};
use crate::core::ValidationResult;
use crate::effects::AtomicStep;
use crate::state::GameSnapshot;

/// Priority tier governing what may be chained onto what.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpellSpeed {
    One = 1,
    Two = 2,
    Three = 3,
}

impl SpellSpeed {
    /// Numeric tier (1 to 3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for SpellSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spell Speed {}", self.value())
    }
}

/// Shape of an activatable effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectCategory {
    NormalSpell,
    QuickPlaySpell,
    ContinuousSpell,
    Ignition,
}

impl EffectCategory {
    /// Category activated by a spell of the given subtype, if any.
    #[must_use]
    pub const fn for_spell(spell_type: SpellType) -> Option<Self> {
        match spell_type {
            SpellType::Normal => Some(EffectCategory::NormalSpell),
            SpellType::QuickPlay => Some(EffectCategory::QuickPlaySpell),
            SpellType::Continuous => Some(EffectCategory::ContinuousSpell),
            _ => None,
        }
    }

    /// Spell speed of effects in this category.
    #[must_use]
    pub const fn spell_speed(self) -> SpellSpeed {
        match self {
            EffectCategory::QuickPlaySpell => SpellSpeed::Two,
            _ => SpellSpeed::One,
        }
    }

    /// Check if this is a spell card activation.
    #[must_use]
    pub const fn is_spell(self) -> bool {
        !matches!(self, EffectCategory::Ignition)
    }

    /// Check if the source card is sent to the graveyard after resolving.
    #[must_use]
    pub const fn leaves_field_on_resolution(self) -> bool {
        matches!(
            self,
            EffectCategory::NormalSpell | EffectCategory::QuickPlaySpell
        )
    }
}

/// Something a card can activate.
///
/// Implementations are registered once and shared across duels; they hold
/// no duel state. Every method receives the snapshot it should reason about.
///
/// ## Activation Flow
///
/// 1. `can_activate` validates the activation against the snapshot
/// 2. The command performs the structural move (hand to field, or flip)
/// 3. `create_activation_steps` produces costs and the activation marker
/// 4. `create_resolution_steps` produces the effect itself, run when the
///    chain block resolves
pub trait ChainableAction: Send + Sync {
    /// Card this action belongs to.
    fn card_id(&self) -> CardId;

    /// Effect identifier, unique per card.
    fn effect_id(&self) -> &str;

    /// Effect category.
    fn category(&self) -> EffectCategory;

    /// Spell speed used for chaining.
    fn spell_speed(&self) -> SpellSpeed {
        self.category().spell_speed()
    }

    /// Check whether `source` may activate this action now.
    fn can_activate(&self, snapshot: &GameSnapshot, source: &CardInstance) -> ValidationResult;

    /// Steps run at activation time.
    fn create_activation_steps(&self, snapshot: &GameSnapshot, source: &CardInstance) -> Vec<AtomicStep>;

    /// Steps run when the chain block resolves.
    fn create_resolution_steps(&self, snapshot: &GameSnapshot, source: &CardInstance) -> Vec<AtomicStep>;

    // === Convenience Methods ===

    /// Activation steps followed by resolution steps.
    fn create_all_steps(&self, snapshot: &GameSnapshot, source: &CardInstance) -> Vec<AtomicStep> {
        let mut steps = self.create_activation_steps(snapshot, source);
        steps.extend(self.create_resolution_steps(snapshot, source));
        steps
    }
}

impl std::fmt::Debug for dyn ChainableAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainableAction")
            .field("card_id", &self.card_id())
            .field("effect_id", &self.effect_id())
            .field("category", &self.category())
            .finish()
    }
}
