//! The additional rule capability.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance};
use crate::effects::AtomicStep;
use crate::state::GameSnapshot;
use crate::triggers::EventType;

/// What kind of passive effect a rule is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    NameOverride,
    StatusModifier,
    SummonPermission,
    ActionPermission,
    VictoryCondition,
    ActionReplacement,
    SelfDestruction,
    TriggerRule,
}

impl RuleCategory {
    /// All categories.
    pub const ALL: [RuleCategory; 8] = [
        RuleCategory::NameOverride,
        RuleCategory::StatusModifier,
        RuleCategory::SummonPermission,
        RuleCategory::ActionPermission,
        RuleCategory::VictoryCondition,
        RuleCategory::ActionReplacement,
        RuleCategory::SelfDestruction,
        RuleCategory::TriggerRule,
    ];
}

/// A passive effect of a card: applied automatically, never activated.
///
/// Like chainable actions, rules are registered once and hold no duel
/// state. The source instance is whichever copy of the card the engine is
/// currently asking about.
///
/// ## Implementation Notes
///
/// - `can_apply`: field presence, face orientation and any extra conditions
/// - `trigger_events` / `create_trigger_steps`: only meaningful for
///   [`RuleCategory::TriggerRule`]
/// - `victory_reason`: only meaningful for [`RuleCategory::VictoryCondition`]
pub trait AdditionalRule: Send + Sync {
    /// Card this rule belongs to.
    fn card_id(&self) -> CardId;

    /// Effect identifier, unique per card.
    fn effect_id(&self) -> &str;

    /// Rule category.
    fn category(&self) -> RuleCategory;

    /// Check whether the rule currently applies for `source`.
    fn can_apply(&self, snapshot: &GameSnapshot, source: &CardInstance) -> bool;

    /// Event types the rule reacts to.
    fn trigger_events(&self) -> &[EventType] {
        &[]
    }

    /// Steps run when a matching event fires.
    fn create_trigger_steps(&self, _snapshot: &GameSnapshot, _source: &CardInstance) -> Vec<AtomicStep> {
        Vec::new()
    }

    /// Why the snapshot is a win, if it is one.
    fn victory_reason(&self, _snapshot: &GameSnapshot) -> Option<String> {
        None
    }
}
