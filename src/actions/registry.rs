//! Lookup from card identity to its chainable actions.

use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;

use super::action::{ChainableAction, EffectCategory};
use crate::cards::{CardId, CardInstance};
use crate::core::EngineError;

/// Registry of chainable actions.
///
/// Each card has at most one spell activation and any number of ignition
/// effects, distinguished by effect ID.
#[derive(Default)]
pub struct ChainableActionRegistry {
    activations: FxHashMap<CardId, Arc<dyn ChainableAction>>,
    ignitions: FxHashMap<CardId, Vec<Arc<dyn ChainableAction>>>,
}

impl ChainableActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Ignition effects are kept per effect ID; anything
    /// else is the card's activation.
    ///
    /// Fails if the card already has an activation, or an ignition effect
    /// with the same effect ID.
    pub fn register(&mut self, action: impl ChainableAction + 'static) -> Result<(), EngineError> {
        self.register_shared(Arc::new(action))
    }

    /// Register an already shared action.
    pub fn register_shared(&mut self, action: Arc<dyn ChainableAction>) -> Result<(), EngineError> {
        let card_id = action.card_id();
        let duplicate = || EngineError::DuplicateKey {
            registry: "chainable action",
            key: format!("{}:{}", card_id, action.effect_id()),
        };

        if action.category() == EffectCategory::Ignition {
            let list = self.ignitions.entry(card_id).or_default();
            if list.iter().any(|a| a.effect_id() == action.effect_id()) {
                return Err(duplicate());
            }
            debug!("registered ignition {}:{}", card_id, action.effect_id());
            list.push(action);
        } else {
            if self.activations.contains_key(&card_id) {
                return Err(duplicate());
            }
            debug!("registered activation {}:{}", card_id, action.effect_id());
            self.activations.insert(card_id, action);
        }
        Ok(())
    }

    /// The card's spell activation.
    #[must_use]
    pub fn activation(&self, card_id: CardId) -> Option<Arc<dyn ChainableAction>> {
        self.activations.get(&card_id).cloned()
    }

    /// The card's ignition effects, in registration order.
    #[must_use]
    pub fn ignitions(&self, card_id: CardId) -> &[Arc<dyn ChainableAction>] {
        self.ignitions.get(&card_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One ignition effect by ID.
    #[must_use]
    pub fn ignition(&self, card_id: CardId, effect_id: &str) -> Option<Arc<dyn ChainableAction>> {
        self.ignitions(card_id)
            .iter()
            .find(|a| a.effect_id() == effect_id)
            .cloned()
    }

    /// The action a card would use by default: a monster's first ignition
    /// effect, or anything else's activation.
    #[must_use]
    pub fn lookup(&self, card: &CardInstance) -> Option<Arc<dyn ChainableAction>> {
        if card.data.is_monster() {
            self.ignitions(card.card_id).first().cloned()
        } else {
            self.activation(card.card_id)
        }
    }

    /// Check if the card has any registered action.
    #[must_use]
    pub fn contains(&self, card_id: CardId) -> bool {
        self.activations.contains_key(&card_id) || self.ignitions.contains_key(&card_id)
    }

    /// Total number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.activations.len() + self.ignitions.values().map(Vec::len).sum::<usize>()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every action.
    pub fn clear(&mut self) {
        self.activations.clear();
        self.ignitions.clear();
    }
}
