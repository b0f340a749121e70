//! Additional rule registry.
//!
//! Stores rules per card and indexes trigger rules by the event types they
//! listen for, so matching an emitted event only visits interested rules.

use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;

use super::rule::{AdditionalRule, RuleCategory};
use crate::cards::CardId;
use crate::core::EngineError;
use crate::effects::AtomicStep;
use crate::state::GameSnapshot;
use crate::triggers::{EventType, GameEvent};

/// Registry for additional rules.
#[derive(Default)]
pub struct AdditionalRuleRegistry {
    /// All registered rules, in registration order.
    rules: Vec<Arc<dyn AdditionalRule>>,

    /// Index by card.
    by_card: FxHashMap<CardId, Vec<usize>>,

    /// Index by event type for fast lookup.
    by_event_type: FxHashMap<EventType, Vec<usize>>,
}

impl AdditionalRuleRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Fails on a duplicate `(card, effect)` pair.
    pub fn register(&mut self, rule: impl AdditionalRule + 'static) -> Result<(), EngineError> {
        self.register_shared(Arc::new(rule))
    }

    /// Register an already shared rule.
    pub fn register_shared(&mut self, rule: Arc<dyn AdditionalRule>) -> Result<(), EngineError> {
        let card_id = rule.card_id();
        if self
            .rules_for(card_id)
            .any(|existing| existing.effect_id() == rule.effect_id())
        {
            return Err(EngineError::DuplicateKey {
                registry: "additional rule",
                key: format!("{}:{}", card_id, rule.effect_id()),
            });
        }

        let index = self.rules.len();
        self.by_card.entry(card_id).or_default().push(index);
        for event_type in rule.trigger_events() {
            let listeners = self.by_event_type.entry(*event_type).or_default();
            if !listeners.contains(&index) {
                listeners.push(index);
            }
        }

        debug!("registered {:?} rule {}:{}", rule.category(), card_id, rule.effect_id());
        self.rules.push(rule);
        Ok(())
    }

    /// Rules belonging to a card.
    pub fn rules_for(&self, card_id: CardId) -> impl Iterator<Item = &Arc<dyn AdditionalRule>> {
        self.by_card
            .get(&card_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.rules[index])
    }

    /// Rules of one category, in registration order.
    #[must_use]
    pub fn rules_of_category(&self, category: RuleCategory) -> Vec<Arc<dyn AdditionalRule>> {
        self.rules
            .iter()
            .filter(|rule| rule.category() == category)
            .cloned()
            .collect()
    }

    /// Trigger steps spawned by one event.
    ///
    /// Every rule listening for the event's type is asked about every copy
    /// of its card in the snapshot. Steps come out in registration order,
    /// then zone order.
    #[must_use]
    pub fn collect_triggered_steps(&self, snapshot: &GameSnapshot, event: &GameEvent) -> Vec<AtomicStep> {
        let Some(listeners) = self.by_event_type.get(&event.event_type) else {
            return Vec::new();
        };

        let mut steps = Vec::new();
        for &index in listeners {
            let rule = &self.rules[index];
            if rule.category() != RuleCategory::TriggerRule {
                continue;
            }
            for (_, card) in snapshot.zones.iter() {
                if card.card_id == rule.card_id() && rule.can_apply(snapshot, card) {
                    debug!("{} fires {}:{}", event.event_type, rule.card_id(), rule.effect_id());
                    steps.extend(rule.create_trigger_steps(snapshot, card));
                }
            }
        }
        steps
    }

    /// First victory condition met by the snapshot, as a reason.
    #[must_use]
    pub fn check_victory(&self, snapshot: &GameSnapshot) -> Option<String> {
        self.rules
            .iter()
            .filter(|rule| rule.category() == RuleCategory::VictoryCondition)
            .find_map(|rule| rule.victory_reason(snapshot))
    }

    /// Get total rule count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
        self.by_card.clear();
        self.by_event_type.clear();
    }
}
