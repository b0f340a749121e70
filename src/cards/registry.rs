//! Card data registry.
//!
//! The `CardDataRegistry` is the in-process card metadata service: it maps a
//! passcode to its static `CardData`. The engine only reads it through the
//! [`CardDataSource`] trait, so a cached external lookup can stand in for it.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardData, CardId};
use crate::core::EngineError;

/// Read-only card metadata lookup.
pub trait CardDataSource {
    /// Get the static data for a card.
    fn card_data(&self, id: CardId) -> Option<Arc<CardData>>;
}

/// Registry of card data.
///
/// ## Example
///
/// ```
/// use rust_duel::cards::{CardData, CardDataRegistry, CardDataSource, CardId, SpellType};
///
/// let mut registry = CardDataRegistry::new();
/// registry
///     .register(CardData::spell(CardId::new(55144522), "Pot of Greed", SpellType::Normal))
///     .unwrap();
///
/// let found = registry.card_data(CardId::new(55144522)).unwrap();
/// assert_eq!(found.name, "Pot of Greed");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardDataRegistry {
    cards: FxHashMap<CardId, Arc<CardData>>,
}

impl CardDataRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register card data.
    ///
    /// Fails if a card with the same ID already exists.
    pub fn register(&mut self, card: CardData) -> Result<Arc<CardData>, EngineError> {
        if self.cards.contains_key(&card.id) {
            return Err(EngineError::DuplicateKey {
                registry: "card data",
                key: card.id.to_string(),
            });
        }
        let card = Arc::new(card);
        self.cards.insert(card.id, Arc::clone(&card));
        Ok(card)
    }

    /// Get card data by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardData>> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card data.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardData>> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Arc<CardData>>
    where
        F: Fn(&CardData) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl CardDataSource for CardDataRegistry {
    fn card_data(&self, id: CardId) -> Option<Arc<CardData>> {
        self.cards.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SpellType;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardDataRegistry::new();
        registry
            .register(CardData::spell(CardId::new(1), "Test Card", SpellType::Normal))
            .unwrap();

        assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Test Card");
        assert!(registry.get(CardId::new(99)).is_none());
        assert!(registry.card_data(CardId::new(1)).is_some());
    }

    #[test]
    fn test_duplicate_id_fails() {
        let mut registry = CardDataRegistry::new();
        registry
            .register(CardData::spell(CardId::new(1), "Card A", SpellType::Normal))
            .unwrap();

        let err = registry
            .register(CardData::spell(CardId::new(1), "Card B", SpellType::Normal))
            .unwrap_err();

        assert!(matches!(err, EngineError::DuplicateKey { .. }));
        assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Card A");
    }

    #[test]
    fn test_find_with_predicate() {
        let mut registry = CardDataRegistry::new();
        registry
            .register(CardData::spell(CardId::new(1), "Quick", SpellType::QuickPlay))
            .unwrap();
        registry
            .register(CardData::spell(CardId::new(2), "Slow", SpellType::Normal))
            .unwrap();

        let quick: Vec<_> = registry
            .find(|c| c.spell_type == Some(SpellType::QuickPlay))
            .collect();
        assert_eq!(quick.len(), 1);
        assert_eq!(quick[0].name, "Quick");
    }

    #[test]
    fn test_clear() {
        let mut registry = CardDataRegistry::new();
        registry
            .register(CardData::spell(CardId::new(1), "A", SpellType::Normal))
            .unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.contains(CardId::new(1)));
    }
}
