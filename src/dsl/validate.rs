//! Structural validation of card definition documents.
//!
//! Walks the raw JSON value and reports the first failing field path, such
//! as `effect-chainable-actions.ignitions[0].resolutions[1].step`. Unknown
//! fields are rejected so that a misspelled key never silently drops part
//! of a card.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::actions::EffectCategory;
use crate::cards::{CardId, CardType, FrameType, SpellType, TrapType};
use crate::core::EngineError;
use crate::rules::RuleCategory;
use crate::state::ZoneName;
use crate::triggers::EventType;

const ROOT_KEYS: &[&str] = &["id", "data", "effect-chainable-actions", "effect-additional-rules"];
const DATA_KEYS: &[&str] = &[
    "name",
    "type",
    "frame-type",
    "spell-type",
    "trap-type",
    "atk",
    "def",
    "level",
    "attribute",
    "race",
];
const ACTIONS_KEYS: &[&str] = &["activation", "ignitions"];
const BLOCK_KEYS: &[&str] = &["effect-id", "conditions", "activations", "resolutions", "once-per-turn"];
const RULES_KEYS: &[&str] = &["continuous"];
const RULE_KEYS: &[&str] = &[
    "category",
    "effect-id",
    "triggers",
    "legal-zones",
    "conditions",
    "resolutions",
];
const LEAF_KEYS: &[&str] = &["step", "args"];

/// Check a card definition document against the schema.
pub fn validate_definition(document: &Value) -> Result<(), EngineError> {
    let mut validator = Validator { card_id: None };
    let root = validator.object(document, "", ROOT_KEYS)?;

    let id = validator.required(root, "", "id")?;
    let id = id
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n > 0)
        .ok_or_else(|| validator.fail("id", "expected a positive integer"))?;
    validator.card_id = Some(CardId::new(id));

    let (card_type, spell_type) = validator.data(validator.required(root, "", "data")?)?;
    if let Some(actions) = root.get("effect-chainable-actions") {
        validator.chainable_actions(actions, card_type, spell_type)?;
    }
    if let Some(rules) = root.get("effect-additional-rules") {
        validator.additional_rules(rules)?;
    }
    Ok(())
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

struct Validator {
    card_id: Option<CardId>,
}

impl Validator {
    fn fail(&self, path: &str, message: impl Into<String>) -> EngineError {
        EngineError::Schema {
            card_id: self.card_id,
            path: path.to_string(),
            message: message.into(),
        }
    }

    // === Primitives ===

    fn object<'v>(
        &self,
        value: &'v Value,
        path: &str,
        known: &[&str],
    ) -> Result<&'v Map<String, Value>, EngineError> {
        let map = value
            .as_object()
            .ok_or_else(|| self.fail(path, "expected an object"))?;
        if let Some(key) = map.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(self.fail(&join(path, key), "unknown field"));
        }
        Ok(map)
    }

    fn required<'v>(
        &self,
        map: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Result<&'v Value, EngineError> {
        map.get(key)
            .ok_or_else(|| self.fail(&join(path, key), "missing required field"))
    }

    fn array<'v>(&self, value: &'v Value, path: &str) -> Result<&'v [Value], EngineError> {
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.fail(path, "expected an array"))
    }

    fn string<'v>(&self, value: &'v Value, path: &str) -> Result<&'v str, EngineError> {
        match value.as_str() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(self.fail(path, "must not be empty")),
            None => Err(self.fail(path, "expected a string")),
        }
    }

    fn non_negative(&self, value: &Value, path: &str) -> Result<u32, EngineError> {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.fail(path, "expected a non-negative integer"))
    }

    fn boolean(&self, value: &Value, path: &str) -> Result<bool, EngineError> {
        value
            .as_bool()
            .ok_or_else(|| self.fail(path, "expected a boolean"))
    }

    /// A string naming one variant of a kebab-case enum.
    fn one_of<T: DeserializeOwned>(&self, value: &Value, path: &str) -> Result<T, EngineError> {
        let text = self.string(value, path)?;
        serde_json::from_value(Value::String(text.to_string()))
            .map_err(|_| self.fail(path, format!("unknown value '{text}'")))
    }

    // === Sections ===

    fn data(&self, value: &Value) -> Result<(CardType, Option<SpellType>), EngineError> {
        let path = "data";
        let map = self.object(value, path, DATA_KEYS)?;

        self.string(self.required(map, path, "name")?, "data.name")?;
        let card_type: CardType = self.one_of(self.required(map, path, "type")?, "data.type")?;
        let _: FrameType = self.one_of(self.required(map, path, "frame-type")?, "data.frame-type")?;

        let spell_type = match map.get("spell-type") {
            Some(v) => Some(self.one_of::<SpellType>(v, "data.spell-type")?),
            None => None,
        };
        if let Some(v) = map.get("trap-type") {
            self.one_of::<TrapType>(v, "data.trap-type")?;
        }
        for key in ["atk", "def", "level"] {
            if let Some(v) = map.get(key) {
                self.non_negative(v, &join(path, key))?;
            }
        }
        for key in ["attribute", "race"] {
            if let Some(v) = map.get(key) {
                self.string(v, &join(path, key))?;
            }
        }

        match (card_type, spell_type) {
            (CardType::Spell, None) => Err(self.fail("data.spell-type", "required for spells")),
            (CardType::Monster | CardType::Trap, Some(_)) => {
                Err(self.fail("data.spell-type", "only spells have a spell type"))
            }
            _ => Ok((card_type, spell_type)),
        }
    }

    fn chainable_actions(
        &self,
        value: &Value,
        card_type: CardType,
        spell_type: Option<SpellType>,
    ) -> Result<(), EngineError> {
        let path = "effect-chainable-actions";
        let map = self.object(value, path, ACTIONS_KEYS)?;

        if let Some(block) = map.get("activation") {
            let block_path = join(path, "activation");
            if spell_type.and_then(EffectCategory::for_spell).is_none() {
                return Err(self.fail(
                    &block_path,
                    "an activation block requires a normal, quick-play or continuous spell",
                ));
            }
            self.action_block(block, &block_path)?;
        }

        if let Some(ignitions) = map.get("ignitions") {
            let list_path = join(path, "ignitions");
            let blocks = self.array(ignitions, &list_path)?;
            if !blocks.is_empty() && card_type != CardType::Monster {
                return Err(self.fail(&list_path, "ignition effects require a monster"));
            }
            for (i, block) in blocks.iter().enumerate() {
                self.action_block(block, &index(&list_path, i))?;
            }
        }
        Ok(())
    }

    fn action_block(&self, value: &Value, path: &str) -> Result<(), EngineError> {
        let map = self.object(value, path, BLOCK_KEYS)?;

        if let Some(id) = map.get("effect-id") {
            self.string(id, &join(path, "effect-id"))?;
        }
        for key in ["conditions", "activations", "resolutions"] {
            if let Some(list) = map.get(key) {
                self.leaves(list, &join(path, key))?;
            }
        }
        if let Some(flag) = map.get("once-per-turn") {
            self.boolean(flag, &join(path, "once-per-turn"))?;
        }
        Ok(())
    }

    fn additional_rules(&self, value: &Value) -> Result<(), EngineError> {
        let path = "effect-additional-rules";
        let map = self.object(value, path, RULES_KEYS)?;

        if let Some(list) = map.get("continuous") {
            let list_path = join(path, "continuous");
            for (i, rule) in self.array(list, &list_path)?.iter().enumerate() {
                self.continuous_rule(rule, &index(&list_path, i))?;
            }
        }
        Ok(())
    }

    fn continuous_rule(&self, value: &Value, path: &str) -> Result<(), EngineError> {
        let map = self.object(value, path, RULE_KEYS)?;

        let category_path = join(path, "category");
        let category: RuleCategory = self.one_of(self.required(map, path, "category")?, &category_path)?;
        if category != RuleCategory::TriggerRule {
            return Err(self.fail(&category_path, "only trigger-rule entries can be declared"));
        }

        if let Some(id) = map.get("effect-id") {
            self.string(id, &join(path, "effect-id"))?;
        }

        let triggers_path = join(path, "triggers");
        let triggers: &[Value] = match map.get("triggers") {
            Some(list) => self.array(list, &triggers_path)?,
            None => &[],
        };
        if triggers.is_empty() {
            return Err(self.fail(&triggers_path, "a trigger rule needs at least one event"));
        }
        for (i, trigger) in triggers.iter().enumerate() {
            self.one_of::<EventType>(trigger, &index(&triggers_path, i))?;
        }

        if let Some(zones) = map.get("legal-zones") {
            let zones_path = join(path, "legal-zones");
            for (i, zone) in self.array(zones, &zones_path)?.iter().enumerate() {
                self.one_of::<ZoneName>(zone, &index(&zones_path, i))?;
            }
        }

        for key in ["conditions", "resolutions"] {
            if let Some(list) = map.get(key) {
                self.leaves(list, &join(path, key))?;
            }
        }
        Ok(())
    }

    fn leaves(&self, value: &Value, path: &str) -> Result<(), EngineError> {
        for (i, leaf) in self.array(value, path)?.iter().enumerate() {
            let leaf_path = index(path, i);
            let map = self.object(leaf, &leaf_path, LEAF_KEYS)?;
            self.string(self.required(map, &leaf_path, "step")?, &join(&leaf_path, "step"))?;
            if let Some(args) = map.get("args") {
                if !args.is_object() {
                    return Err(self.fail(&join(&leaf_path, "args"), "expected an object"));
                }
            }
        }
        Ok(())
    }
}
