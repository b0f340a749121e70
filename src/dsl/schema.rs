//! Typed form of a card definition document.
//!
//! Documents are checked by [`validate_definition`](super::validate_definition)
//! before they are decoded into these types, so decoding only fails on
//! documents the validator would already have rejected.

use serde::{Deserialize, Serialize};

use crate::cards::{CardData, CardId, CardType, FrameType, MonsterStats, SpellType, TrapType};
use crate::rules::RuleCategory;
use crate::state::ZoneName;
use crate::triggers::EventType;

/// One card definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardDefinition {
    pub id: u32,
    pub data: CardDataDef,
    #[serde(default)]
    pub effect_chainable_actions: Option<ChainableActionsDef>,
    #[serde(default)]
    pub effect_additional_rules: Option<AdditionalRulesDef>,
}

/// Static card data as written in a definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardDataDef {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub frame_type: FrameType,
    #[serde(default)]
    pub spell_type: Option<SpellType>,
    #[serde(default)]
    pub trap_type: Option<TrapType>,
    #[serde(default)]
    pub atk: Option<u32>,
    #[serde(default)]
    pub def: Option<u32>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
}

impl CardDataDef {
    /// Convert to registry card data.
    #[must_use]
    pub fn to_card_data(&self, id: CardId) -> CardData {
        let monster = (self.card_type == CardType::Monster).then(|| MonsterStats {
            atk: self.atk.unwrap_or(0),
            def: self.def.unwrap_or(0),
            level: self.level.unwrap_or(0),
            attribute: self.attribute.clone(),
            race: self.race.clone(),
        });

        CardData {
            id,
            name: self.name.clone(),
            card_type: self.card_type,
            frame_type: self.frame_type,
            spell_type: self.spell_type,
            trap_type: self.trap_type,
            monster,
        }
    }
}

/// The `effect-chainable-actions` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainableActionsDef {
    #[serde(default)]
    pub activation: Option<ActionBlockDef>,
    #[serde(default)]
    pub ignitions: Vec<ActionBlockDef>,
}

/// One activation or ignition block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActionBlockDef {
    #[serde(default)]
    pub effect_id: Option<String>,
    #[serde(default)]
    pub conditions: Vec<StepRef>,
    #[serde(default)]
    pub activations: Vec<StepRef>,
    #[serde(default)]
    pub resolutions: Vec<StepRef>,
    #[serde(default)]
    pub once_per_turn: bool,
}

/// The `effect-additional-rules` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdditionalRulesDef {
    #[serde(default)]
    pub continuous: Vec<ContinuousRuleDef>,
}

/// One continuous rule entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContinuousRuleDef {
    pub category: RuleCategory,
    #[serde(default)]
    pub effect_id: Option<String>,
    #[serde(default)]
    pub triggers: Vec<EventType>,
    #[serde(default)]
    pub legal_zones: Option<Vec<ZoneName>>,
    #[serde(default)]
    pub conditions: Vec<StepRef>,
    #[serde(default)]
    pub resolutions: Vec<StepRef>,
}

/// Leaf entry naming a registry key and its arguments.
///
/// Used for both conditions and steps; `step` holds the registry key either
/// way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRef {
    pub step: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_minimal_monster() {
        let def: CardDefinition = serde_json::from_value(json!({
            "id": 91152256,
            "data": {
                "name": "Celtic Guardian",
                "type": "monster",
                "frame-type": "normal",
                "atk": 1400, "def": 1200, "level": 4,
                "attribute": "EARTH", "race": "Warrior"
            }
        }))
        .unwrap();

        let data = def.data.to_card_data(CardId::new(def.id));
        assert_eq!(data.level(), 4);
        assert_eq!(data.race(), Some("Warrior"));
        assert!(def.effect_chainable_actions.is_none());
    }

    #[test]
    fn test_decode_step_ref_without_args() {
        let step: StepRef = serde_json::from_value(json!({"step": "discard_hand"})).unwrap();
        assert_eq!(step.step, "discard_hand");
        assert!(step.args.is_null());
    }

    #[test]
    fn test_spell_has_no_monster_stats() {
        let def: CardDataDef = serde_json::from_value(json!({
            "name": "Pot of Greed",
            "type": "spell",
            "frame-type": "spell",
            "spell-type": "normal"
        }))
        .unwrap();

        let data = def.to_card_data(CardId::new(55144522));
        assert!(data.monster.is_none());
        assert_eq!(data.spell_type, Some(SpellType::Normal));
    }
}
