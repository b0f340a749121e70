//! Hand-written effect bodies.
//!
//! Most cards are declared as data and compiled by the DSL. The cards here
//! are written in Rust, either because they predate the DSL or to serve as
//! a reference the declared versions are checked against.

use super::action::EffectCategory;
use super::card_action::{CardAction, EffectBody};
use super::registry::ChainableActionRegistry;
use crate::cards::{CardId, CardInstance};
use crate::core::{EngineError, ValidationResult};
use crate::effects::conditions::deck_has_at_least;
use crate::effects::{steps, AtomicStep, StepContext};
use crate::state::GameSnapshot;

/// Pot of Greed: draw 2 cards.
pub const POT_OF_GREED: CardId = CardId::new(55144522);

/// Graceful Charity: draw 3 cards, then discard 2 cards.
pub const GRACEFUL_CHARITY: CardId = CardId::new(79571449);

/// Body of a spell that draws `draw` cards, then discards `discard`.
#[derive(Clone, Copy, Debug)]
pub struct DrawThenDiscard {
    pub draw: usize,
    pub discard: usize,
}

impl EffectBody for DrawThenDiscard {
    fn conditions(&self, snapshot: &GameSnapshot, source: &CardInstance) -> ValidationResult {
        deck_has_at_least(self.draw)(snapshot, source)
    }

    fn resolution_steps(&self, ctx: &StepContext) -> Vec<AtomicStep> {
        let mut steps = vec![steps::draw_step(ctx, self.draw)];
        if self.discard > 0 {
            steps.push(steps::discard_from_hand_step(ctx, self.discard));
        }
        steps
    }
}

/// Pot of Greed's activation.
#[must_use]
pub fn pot_of_greed() -> CardAction {
    CardAction::new(
        POT_OF_GREED,
        "activation",
        EffectCategory::NormalSpell,
        DrawThenDiscard { draw: 2, discard: 0 },
    )
}

/// Graceful Charity's activation.
#[must_use]
pub fn graceful_charity() -> CardAction {
    CardAction::new(
        GRACEFUL_CHARITY,
        "activation",
        EffectCategory::NormalSpell,
        DrawThenDiscard { draw: 3, discard: 2 },
    )
}

/// Register every hand-written action.
pub fn register_builtins(registry: &mut ChainableActionRegistry) -> Result<(), EngineError> {
    registry.register(pot_of_greed())?;
    registry.register(graceful_charity())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ChainableAction;
    use crate::cards::{CardData, SpellType};
    use crate::core::{DuelConfig, InvalidReason};
    use crate::state::ZoneName;
    use std::sync::Arc;

    fn snapshot_with_deck(deck: usize) -> (GameSnapshot, CardInstance) {
        let filler = Arc::new(CardData::spell(CardId::new(2), "Filler", SpellType::Normal));
        let mut snapshot = GameSnapshot::empty(&DuelConfig::default());
        for _ in 0..deck {
            snapshot = snapshot.place_new_card(Arc::clone(&filler), ZoneName::MainDeck).unwrap().0;
        }
        let pot = Arc::new(CardData::spell(POT_OF_GREED, "Pot of Greed", SpellType::Normal));
        let (snapshot, id) = snapshot.place_new_card(pot, ZoneName::Hand).unwrap();
        let source = snapshot.find_card(id).unwrap().clone();
        (snapshot, source)
    }

    #[test]
    fn test_pot_of_greed_needs_two_cards() {
        let action = pot_of_greed();

        let (snapshot, source) = snapshot_with_deck(1);
        assert_eq!(
            action.can_activate(&snapshot, &source).reason(),
            Some(&InvalidReason::ConditionsNotMet)
        );

        let (snapshot, source) = snapshot_with_deck(2);
        assert!(action.can_activate(&snapshot, &source).is_valid());
    }

    #[test]
    fn test_graceful_charity_steps() {
        let (snapshot, source) = snapshot_with_deck(3);
        let steps = graceful_charity().create_resolution_steps(&snapshot, &source);

        let ids: Vec<_> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "79571449:activation:draw",
                "79571449:activation:discard_from_hand",
                "79571449:activation:send_source_to_graveyard",
            ]
        );
        assert!(steps[1].is_interactive());
    }

    #[test]
    fn test_register_builtins() {
        let mut registry = ChainableActionRegistry::new();
        register_builtins(&mut registry).unwrap();

        assert!(registry.activation(POT_OF_GREED).is_some());
        assert!(registry.activation(GRACEFUL_CHARITY).is_some());
        assert!(register_builtins(&mut registry).is_err());
    }
}
