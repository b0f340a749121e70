//! Card filters.
//!
//! A `CardFilter` is a declarative predicate over card instances. Filters
//! appear in step arguments (`search_deck {filter}`), in lazy selection
//! candidates, and in conditions that count matching cards.
//!
//! ## JSON form
//!
//! ```json
//! {"all": [{"type": "monster"}, {"max-level": 4}, {"race": "warrior"}]}
//! ```
//!
//! The bare string `"any-card"` matches everything.

use serde::{Deserialize, Serialize};

use super::definition::{CardType, SpellType};
use super::instance::CardInstance;

/// Predicate over card instances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardFilter {
    /// Matches every card.
    #[default]
    AnyCard,
    /// Card has the given top-level type.
    Type(CardType),
    /// Spell with the given subtype.
    SpellType(SpellType),
    /// Card has exactly this name.
    Name(String),
    /// Monster with level at most `n`.
    MaxLevel(u32),
    /// Monster of the given race (case-insensitive).
    Race(String),
    /// All inner filters match.
    All(Vec<CardFilter>),
    /// At least one inner filter matches.
    Any(Vec<CardFilter>),
    /// Inner filter does not match.
    Not(Box<CardFilter>),
}

impl CardFilter {
    /// Check a card instance against this filter.
    #[must_use]
    pub fn matches(&self, card: &CardInstance) -> bool {
        let data = &card.data;
        match self {
            CardFilter::AnyCard => true,
            CardFilter::Type(card_type) => data.card_type == *card_type,
            CardFilter::SpellType(spell_type) => data.spell_type == Some(*spell_type),
            CardFilter::Name(name) => data.name == *name,
            CardFilter::MaxLevel(max) => data.is_monster() && data.level() <= *max,
            CardFilter::Race(race) => data
                .race()
                .is_some_and(|r| r.eq_ignore_ascii_case(race)),
            CardFilter::All(filters) => filters.iter().all(|f| f.matches(card)),
            CardFilter::Any(filters) => filters.iter().any(|f| f.matches(card)),
            CardFilter::Not(inner) => !inner.matches(card),
        }
    }

    /// Combine with another filter (builder pattern).
    #[must_use]
    pub fn and(self, other: CardFilter) -> Self {
        match self {
            CardFilter::AnyCard => other,
            CardFilter::All(mut filters) => {
                filters.push(other);
                CardFilter::All(filters)
            }
            filter => CardFilter::All(vec![filter, other]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, CardId, FrameType, MonsterStats};
    use crate::core::InstanceId;
    use crate::state::ZoneName;
    use std::sync::Arc;

    fn warrior(level: u32) -> CardInstance {
        let stats = MonsterStats {
            atk: 1000,
            def: 1000,
            level,
            attribute: Some("earth".to_string()),
            race: Some("Warrior".to_string()),
        };
        let data = CardData::monster(CardId::new(10), "Soldier", FrameType::Normal, stats);
        CardInstance::new(InstanceId(1), Arc::new(data), ZoneName::MainDeck)
    }

    fn quick_play() -> CardInstance {
        let data = CardData::spell(CardId::new(20), "Quick", SpellType::QuickPlay);
        CardInstance::new(InstanceId(2), Arc::new(data), ZoneName::MainDeck)
    }

    #[test]
    fn test_simple_filters() {
        assert!(CardFilter::AnyCard.matches(&quick_play()));
        assert!(CardFilter::Type(CardType::Monster).matches(&warrior(4)));
        assert!(!CardFilter::Type(CardType::Monster).matches(&quick_play()));
        assert!(CardFilter::SpellType(SpellType::QuickPlay).matches(&quick_play()));
        assert!(CardFilter::Name("Soldier".to_string()).matches(&warrior(4)));
        assert!(CardFilter::Race("warrior".to_string()).matches(&warrior(4)));
    }

    #[test]
    fn test_max_level_excludes_spells() {
        assert!(CardFilter::MaxLevel(4).matches(&warrior(4)));
        assert!(!CardFilter::MaxLevel(4).matches(&warrior(5)));
        assert!(!CardFilter::MaxLevel(4).matches(&quick_play()));
    }

    #[test]
    fn test_combinators() {
        let filter = CardFilter::Type(CardType::Monster)
            .and(CardFilter::MaxLevel(4))
            .and(CardFilter::Race("Warrior".to_string()));

        assert!(filter.matches(&warrior(3)));
        assert!(!filter.matches(&warrior(7)));

        let not_monster = CardFilter::Not(Box::new(CardFilter::Type(CardType::Monster)));
        assert!(not_monster.matches(&quick_play()));

        let any = CardFilter::Any(vec![CardFilter::MaxLevel(1), CardFilter::Type(CardType::Spell)]);
        assert!(any.matches(&quick_play()));
        assert!(!any.matches(&warrior(4)));
    }

    #[test]
    fn test_json_form() {
        let filter: CardFilter = serde_json::from_str(
            r#"{"all": [{"type": "monster"}, {"max-level": 4}, {"race": "warrior"}]}"#,
        )
        .unwrap();
        assert!(filter.matches(&warrior(4)));

        let any: CardFilter = serde_json::from_str(r#""any-card""#).unwrap();
        assert_eq!(any, CardFilter::AnyCard);
    }
}
