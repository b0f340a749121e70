//! LIFO chain of activated-but-unresolved actions.
//!
//! Each activation pushes a block recording its spell speed; a response
//! may never be slower than the block it responds to. Resolution pops
//! blocks newest first.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::actions::{ChainableAction, SpellSpeed};
use crate::cards::CardId;
use crate::core::{InstanceId, InvalidReason};

/// Whether a chain is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainState {
    /// No chain is open.
    #[default]
    Idle,
    /// At least one block is waiting to resolve.
    Building,
}

/// One link of the chain.
#[derive(Clone, Debug)]
pub struct ChainBlock {
    /// Position in the chain, starting at 1.
    pub chain_number: u32,

    /// Spell speed of the action that created this block.
    pub spell_speed: SpellSpeed,

    /// The activated card instance.
    pub source_instance_id: InstanceId,

    /// The activated card.
    pub card_id: CardId,

    /// The action whose resolution steps run when this block resolves.
    pub action: Arc<dyn ChainableAction>,
}

/// The chain stack.
#[derive(Clone, Debug)]
pub struct ChainStack {
    /// The stack (index 0 = bottom, last = top).
    blocks: Vec<ChainBlock>,

    /// Next chain number to assign.
    next_chain_number: u32,
}

impl ChainStack {
    /// Create an empty chain stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            next_chain_number: 1,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ChainState {
        if self.blocks.is_empty() {
            ChainState::Idle
        } else {
            ChainState::Building
        }
    }

    /// Spell speed of the most recent block, if a chain is open.
    #[must_use]
    pub fn speed_floor(&self) -> Option<SpellSpeed> {
        self.blocks.last().map(|b| b.spell_speed)
    }

    /// Check if an action of `spell_speed` may be added now.
    ///
    /// Any speed may open a chain; a response must be at least as fast as
    /// the block on top.
    #[must_use]
    pub fn can_chain(&self, spell_speed: SpellSpeed) -> bool {
        self.speed_floor().map_or(true, |floor| spell_speed >= floor)
    }

    /// Push a block for `action`, returning its chain number.
    pub fn push_chain_block(
        &mut self,
        action: Arc<dyn ChainableAction>,
        source_instance_id: InstanceId,
    ) -> Result<u32, InvalidReason> {
        let spell_speed = action.spell_speed();
        if !self.can_chain(spell_speed) {
            return Err(InvalidReason::ChainSpeedTooLow);
        }
        if self.blocks.is_empty() {
            self.next_chain_number = 1;
        }

        let chain_number = self.next_chain_number;
        self.next_chain_number += 1;
        debug!(
            "chain link {}: {}:{} ({})",
            chain_number,
            action.card_id(),
            action.effect_id(),
            spell_speed
        );

        self.blocks.push(ChainBlock {
            chain_number,
            spell_speed,
            source_instance_id,
            card_id: action.card_id(),
            action,
        });
        Ok(chain_number)
    }

    /// Remove and return the newest block.
    pub fn pop_chain_block(&mut self) -> Option<ChainBlock> {
        let block = self.blocks.pop()?;
        debug!("resolving chain link {}", block.chain_number);
        Some(block)
    }

    /// Peek at the top of the chain without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ChainBlock> {
        self.blocks.last()
    }

    /// All blocks (bottom to top).
    #[must_use]
    pub fn blocks(&self) -> &[ChainBlock] {
        &self.blocks
    }

    /// Number of unresolved blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no chain is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Discard every block.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.next_chain_number = 1;
    }
}

impl Default for ChainStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{CardAction, DeclaredBody, EffectCategory};

    fn action(card: u32, category: EffectCategory) -> Arc<dyn ChainableAction> {
        Arc::new(CardAction::new(CardId::new(card), "activation", category, DeclaredBody::default()))
    }

    #[test]
    fn test_new_chain_is_idle() {
        let chain = ChainStack::new();
        assert_eq!(chain.state(), ChainState::Idle);
        assert!(chain.can_chain(SpellSpeed::One));
        assert!(chain.peek().is_none());
    }

    #[test]
    fn test_lifo_order() {
        let mut chain = ChainStack::new();
        chain.push_chain_block(action(1, EffectCategory::NormalSpell), InstanceId(1)).unwrap();
        chain.push_chain_block(action(2, EffectCategory::QuickPlaySpell), InstanceId(2)).unwrap();
        chain.push_chain_block(action(3, EffectCategory::QuickPlaySpell), InstanceId(3)).unwrap();

        assert_eq!(chain.state(), ChainState::Building);
        let order: Vec<_> = std::iter::from_fn(|| chain.pop_chain_block())
            .map(|b| b.card_id.raw())
            .collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(chain.state(), ChainState::Idle);
    }

    #[test]
    fn test_slower_response_rejected() {
        let mut chain = ChainStack::new();
        chain.push_chain_block(action(1, EffectCategory::QuickPlaySpell), InstanceId(1)).unwrap();

        assert!(!chain.can_chain(SpellSpeed::One));
        assert_eq!(
            chain.push_chain_block(action(2, EffectCategory::NormalSpell), InstanceId(2)),
            Err(InvalidReason::ChainSpeedTooLow)
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_chain_numbers_restart() {
        let mut chain = ChainStack::new();
        assert_eq!(chain.push_chain_block(action(1, EffectCategory::NormalSpell), InstanceId(1)), Ok(1));
        assert_eq!(chain.push_chain_block(action(2, EffectCategory::QuickPlaySpell), InstanceId(2)), Ok(2));

        chain.pop_chain_block();
        chain.pop_chain_block();
        assert_eq!(chain.push_chain_block(action(3, EffectCategory::NormalSpell), InstanceId(3)), Ok(1));

        chain.reset();
        assert!(chain.is_empty());
    }
}
