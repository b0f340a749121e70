//! Turns validated card definitions into registered runtime objects.
//!
//! Every step and condition a definition names is resolved against the
//! registries before anything is registered, so a definition either loads
//! completely or not at all.

use log::info;

use super::schema::{ActionBlockDef, AdditionalRulesDef, CardDefinition, ChainableActionsDef, StepRef};
use crate::actions::{CardAction, DeclaredBody, EffectCategory};
use crate::cards::{CardData, CardId};
use crate::core::EngineError;
use crate::effects::{Args, Condition, StepBuilder};
use crate::engine::Registries;
use crate::rules::{DeclaredTriggerRule, RuleCategory};

/// Step whose arguments name another step, built later.
const DELAYED_STEP: &str = "queue_end_phase_effect";

/// Compile and register one card definition.
pub fn compile(definition: &CardDefinition, registries: &mut Registries) -> Result<CardId, EngineError> {
    let card_id = CardId::new(definition.id);
    if registries.cards.contains(card_id) {
        return Err(EngineError::DuplicateKey {
            registry: "card data",
            key: card_id.to_string(),
        });
    }
    let data = definition.data.to_card_data(card_id);

    let resolver = Resolver {
        registries,
        card_id,
    };
    let actions = match &definition.effect_chainable_actions {
        Some(section) => resolver.actions(&data, section)?,
        None => Vec::new(),
    };
    let rules = match &definition.effect_additional_rules {
        Some(section) => resolver.rules(section)?,
        None => Vec::new(),
    };

    if !actions.is_empty() && registries.actions.contains(card_id) {
        return Err(EngineError::DuplicateKey {
            registry: "chainable action",
            key: card_id.to_string(),
        });
    }
    if !rules.is_empty() && registries.rules.rules_for(card_id).next().is_some() {
        return Err(EngineError::DuplicateKey {
            registry: "additional rule",
            key: card_id.to_string(),
        });
    }

    info!(
        "registered {} ({}): {} action(s), {} rule(s)",
        data.name,
        card_id,
        actions.len(),
        rules.len()
    );
    registries.cards.register(data)?;
    for action in actions {
        registries.actions.register(action)?;
    }
    for rule in rules {
        registries.rules.register(rule)?;
    }
    Ok(card_id)
}

/// Resolves registry names for one card.
struct Resolver<'a> {
    registries: &'a Registries,
    card_id: CardId,
}

impl Resolver<'_> {
    fn schema(&self, path: String, message: &str) -> EngineError {
        EngineError::Schema {
            card_id: Some(self.card_id),
            path,
            message: message.to_string(),
        }
    }

    fn args(&self, entry: &StepRef) -> Result<Args, EngineError> {
        Args::from_json(&entry.args).map_err(|source| EngineError::InvalidArgs {
            card_id: self.card_id,
            key: entry.step.clone(),
            source,
        })
    }

    fn condition(&self, entry: &StepRef) -> Result<Condition, EngineError> {
        if !self.registries.conditions.contains(&entry.step) {
            return Err(EngineError::UnresolvedName {
                card_id: self.card_id,
                kind: "condition",
                name: entry.step.clone(),
            });
        }
        self.registries
            .conditions
            .build(self.card_id, &entry.step, &self.args(entry)?)
    }

    fn step(&self, entry: &StepRef) -> Result<StepBuilder, EngineError> {
        self.resolve_step(&entry.step, &self.args(entry)?)
    }

    fn resolve_step(&self, name: &str, args: &Args) -> Result<StepBuilder, EngineError> {
        if !self.registries.steps.contains(name) {
            return Err(EngineError::UnresolvedName {
                card_id: self.card_id,
                kind: "step",
                name: name.to_string(),
            });
        }

        if name == DELAYED_STEP {
            let invalid = |source| EngineError::InvalidArgs {
                card_id: self.card_id,
                key: name.to_string(),
                source,
            };
            let delayed = args.text("step").map_err(invalid)?;
            let delayed_args = args.nested("args").map_err(invalid)?;
            self.resolve_step(delayed, &delayed_args)?;
        }

        self.registries.steps.build(self.card_id, name, args)
    }

    fn conditions(&self, entries: &[StepRef]) -> Result<Vec<Condition>, EngineError> {
        entries.iter().map(|e| self.condition(e)).collect()
    }

    fn steps(&self, entries: &[StepRef]) -> Result<Vec<StepBuilder>, EngineError> {
        entries.iter().map(|e| self.step(e)).collect()
    }

    fn body(&self, block: &ActionBlockDef) -> Result<DeclaredBody, EngineError> {
        Ok(DeclaredBody {
            conditions: self.conditions(&block.conditions)?,
            activations: self.steps(&block.activations)?,
            resolutions: self.steps(&block.resolutions)?,
        })
    }

    fn actions(&self, data: &CardData, section: &ChainableActionsDef) -> Result<Vec<CardAction>, EngineError> {
        let mut actions = Vec::new();

        if let Some(block) = &section.activation {
            let category = data
                .spell_type
                .and_then(EffectCategory::for_spell)
                .ok_or_else(|| {
                    self.schema(
                        "effect-chainable-actions.activation".to_string(),
                        "an activation block requires a normal, quick-play or continuous spell",
                    )
                })?;
            let effect_id = block.effect_id.clone().unwrap_or_else(|| "activation".to_string());
            actions.push(
                CardAction::new(self.card_id, effect_id, category, self.body(block)?)
                    .with_once_per_turn(block.once_per_turn),
            );
        }

        if !section.ignitions.is_empty() && !data.is_monster() {
            return Err(self.schema(
                "effect-chainable-actions.ignitions".to_string(),
                "ignition effects require a monster",
            ));
        }
        for (i, block) in section.ignitions.iter().enumerate() {
            let effect_id = block.effect_id.clone().unwrap_or_else(|| format!("ignition-{i}"));
            actions.push(
                CardAction::new(self.card_id, effect_id, EffectCategory::Ignition, self.body(block)?)
                    .with_once_per_turn(block.once_per_turn),
            );
        }

        Ok(actions)
    }

    fn rules(&self, section: &AdditionalRulesDef) -> Result<Vec<DeclaredTriggerRule>, EngineError> {
        section
            .continuous
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if entry.category != RuleCategory::TriggerRule {
                    return Err(self.schema(
                        format!("effect-additional-rules.continuous[{i}].category"),
                        "only trigger-rule entries can be declared",
                    ));
                }

                let effect_id = entry.effect_id.clone().unwrap_or_else(|| format!("rule-{i}"));
                let mut rule = DeclaredTriggerRule::new(self.card_id, effect_id, entry.triggers.clone());
                if let Some(zones) = &entry.legal_zones {
                    rule = rule.with_legal_zones(zones.clone());
                }
                for condition in self.conditions(&entry.conditions)? {
                    rule = rule.with_condition(condition);
                }
                for step in self.steps(&entry.resolutions)? {
                    rule = rule.with_resolution(step);
                }
                Ok(rule)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ChainableAction;
    use serde_json::json;

    fn definition(value: serde_json::Value) -> CardDefinition {
        serde_json::from_value(value).unwrap()
    }

    fn upstart(resolutions: serde_json::Value) -> CardDefinition {
        definition(json!({
            "id": 70368879,
            "data": {"name": "Upstart Goblin", "type": "spell", "frame-type": "spell", "spell-type": "normal"},
            "effect-chainable-actions": {
                "activation": {
                    "conditions": [{"step": "deck_has_at_least", "args": {"count": 1}}],
                    "resolutions": resolutions
                }
            }
        }))
    }

    #[test]
    fn test_compile_registers_everything() {
        let mut registries = Registries::new().unwrap();
        let def = upstart(json!([{"step": "draw", "args": {"count": 1}}]));

        let card_id = compile(&def, &mut registries).unwrap();

        assert!(registries.cards.contains(card_id));
        let action = registries.actions.activation(card_id).unwrap();
        assert_eq!(action.category(), EffectCategory::NormalSpell);
        assert_eq!(action.effect_id(), "activation");
    }

    #[test]
    fn test_unknown_step_is_unresolved() {
        let mut registries = Registries::new().unwrap();
        let def = upstart(json!([{"step": "draw_cards", "args": {"count": 1}}]));

        let err = compile(&def, &mut registries).unwrap_err();

        assert!(matches!(
            err,
            EngineError::UnresolvedName { kind: "step", ref name, .. } if name == "draw_cards"
        ));
        assert!(registries.cards.is_empty());
    }

    #[test]
    fn test_unknown_delayed_step_is_unresolved() {
        let mut registries = Registries::new().unwrap();
        let def = upstart(json!([
            {"step": "queue_end_phase_effect", "args": {"step": "discard_everything"}}
        ]));

        let err = compile(&def, &mut registries).unwrap_err();

        assert!(matches!(
            err,
            EngineError::UnresolvedName { ref name, .. } if name == "discard_everything"
        ));
    }

    #[test]
    fn test_bad_args_are_rejected_at_load() {
        let mut registries = Registries::new().unwrap();
        let def = upstart(json!([{"step": "draw", "args": {"count": "two"}}]));

        let err = compile(&def, &mut registries).unwrap_err();

        assert!(matches!(err, EngineError::InvalidArgs { ref key, .. } if key == "draw"));
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let mut registries = Registries::new().unwrap();
        let def = upstart(json!([]));

        compile(&def, &mut registries).unwrap();
        let err = compile(&def, &mut registries).unwrap_err();

        assert!(matches!(err, EngineError::DuplicateKey { registry: "card data", .. }));
    }

    #[test]
    fn test_ignitions_get_default_ids() {
        let mut registries = Registries::new().unwrap();
        let def = definition(json!({
            "id": 70791313,
            "data": {"name": "Royal Magical Library", "type": "monster", "frame-type": "effect", "level": 4},
            "effect-chainable-actions": {
                "ignitions": [
                    {"resolutions": [{"step": "draw", "args": {"count": 1}}]},
                    {"effect-id": "heal", "resolutions": [{"step": "gain_life_points", "args": {"amount": 500}}]}
                ]
            },
            "effect-additional-rules": {
                "continuous": [{
                    "category": "trigger-rule",
                    "triggers": ["spell-activated"],
                    "resolutions": [{"step": "add_counter", "args": {"counter": "spell", "count": 1, "max": 3}}]
                }]
            }
        }));

        let card_id = compile(&def, &mut registries).unwrap();

        let ids: Vec<_> = registries
            .actions
            .ignitions(card_id)
            .iter()
            .map(|a| a.effect_id().to_string())
            .collect();
        assert_eq!(ids, vec!["ignition-0", "heal"]);
        assert_eq!(registries.rules.rules_for(card_id).count(), 1);
    }
}
