//! Trigger rules bound from declared step lists.

use super::rule::{AdditionalRule, RuleCategory};
use crate::cards::{CardId, CardInstance};
use crate::effects::{AtomicStep, Condition, StepBuilder, StepContext};
use crate::state::{GameSnapshot, ZoneName};
use crate::triggers::EventType;

/// A trigger rule that replays declared conditions and resolution steps.
///
/// The rule applies only while its source is face-up in one of its legal
/// zones (the field by default) and every condition holds.
#[derive(Clone)]
pub struct DeclaredTriggerRule {
    card_id: CardId,
    effect_id: String,
    triggers: Vec<EventType>,
    legal_zones: Vec<ZoneName>,
    conditions: Vec<Condition>,
    resolutions: Vec<StepBuilder>,
}

impl DeclaredTriggerRule {
    /// Create a rule reacting to `triggers`.
    pub fn new(card_id: CardId, effect_id: impl Into<String>, triggers: Vec<EventType>) -> Self {
        Self {
            card_id,
            effect_id: effect_id.into(),
            triggers,
            legal_zones: ZoneName::FIELD.to_vec(),
            conditions: Vec::new(),
            resolutions: Vec::new(),
        }
    }

    /// Set the zones the source must be in (builder pattern).
    #[must_use]
    pub fn with_legal_zones(mut self, zones: Vec<ZoneName>) -> Self {
        self.legal_zones = zones;
        self
    }

    /// Add a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a resolution step (builder pattern).
    #[must_use]
    pub fn with_resolution(mut self, step: StepBuilder) -> Self {
        self.resolutions.push(step);
        self
    }
}

impl AdditionalRule for DeclaredTriggerRule {
    fn card_id(&self) -> CardId {
        self.card_id
    }

    fn effect_id(&self) -> &str {
        &self.effect_id
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::TriggerRule
    }

    fn can_apply(&self, snapshot: &GameSnapshot, source: &CardInstance) -> bool {
        source.is_face_up()
            && self.legal_zones.contains(&source.zone)
            && snapshot.find_card(source.instance_id).is_some()
            && self
                .conditions
                .iter()
                .all(|condition| condition(snapshot, source).is_valid())
    }

    fn trigger_events(&self) -> &[EventType] {
        &self.triggers
    }

    fn create_trigger_steps(&self, _snapshot: &GameSnapshot, source: &CardInstance) -> Vec<AtomicStep> {
        let ctx = StepContext::new(self.card_id, source.instance_id, self.effect_id.clone(), source.name());
        self.resolutions.iter().map(|build| build(&ctx)).collect()
    }
}
