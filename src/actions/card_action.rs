//! The shared activation template.
//!
//! Every activatable effect, hand-written or declared, is a [`CardAction`]:
//! the category-specific structural checks and bookkeeping live here, and
//! only the card-specific part is delegated to an [`EffectBody`].
//!
//! ## Activation Checks
//!
//! In order, the first failing check wins:
//!
//! 1. The duel is not over
//! 2. Main phase (quick-play spells may be activated in any phase)
//! 3. A spell activated from the hand needs a free spell & trap zone
//! 4. A quick-play spell cannot be activated the turn it was set
//! 5. Ignition effects need their monster face-up in the monster zone
//! 6. Once-per-turn limits
//! 7. The body's own conditions

use std::sync::Arc;

use log::debug;

use super::action::{ChainableAction, EffectCategory};
use crate::cards::{CardId, CardInstance, Face};
use crate::core::{InvalidReason, ValidationResult};
use crate::effects::{
    steps, AtomicStep, Condition, NotificationLevel, StepBuilder, StepContext, StepOutcome,
};
use crate::state::{GameSnapshot, ZoneName};
use crate::triggers::{EventType, GameEvent};

/// Card-specific part of an activatable effect.
pub trait EffectBody: Send + Sync {
    /// Extra conditions beyond the structural checks.
    fn conditions(&self, _snapshot: &GameSnapshot, _source: &CardInstance) -> ValidationResult {
        ValidationResult::Valid
    }

    /// Costs paid at activation.
    fn activation_steps(&self, _ctx: &StepContext) -> Vec<AtomicStep> {
        Vec::new()
    }

    /// The effect itself.
    fn resolution_steps(&self, ctx: &StepContext) -> Vec<AtomicStep>;
}

/// Body that replays declared conditions and step lists.
#[derive(Clone, Default)]
pub struct DeclaredBody {
    pub conditions: Vec<Condition>,
    pub activations: Vec<StepBuilder>,
    pub resolutions: Vec<StepBuilder>,
}

impl EffectBody for DeclaredBody {
    fn conditions(&self, snapshot: &GameSnapshot, source: &CardInstance) -> ValidationResult {
        self.conditions
            .iter()
            .map(|condition| condition(snapshot, source))
            .find(|result| !result.is_valid())
            .unwrap_or(ValidationResult::Valid)
    }

    fn activation_steps(&self, ctx: &StepContext) -> Vec<AtomicStep> {
        self.activations.iter().map(|build| build(ctx)).collect()
    }

    fn resolution_steps(&self, ctx: &StepContext) -> Vec<AtomicStep> {
        self.resolutions.iter().map(|build| build(ctx)).collect()
    }
}

/// An activatable effect of one card.
#[derive(Clone)]
pub struct CardAction {
    card_id: CardId,
    effect_id: String,
    category: EffectCategory,
    once_per_turn: bool,
    body: Arc<dyn EffectBody>,
}

impl CardAction {
    /// Create an action.
    pub fn new(
        card_id: CardId,
        effect_id: impl Into<String>,
        category: EffectCategory,
        body: impl EffectBody + 'static,
    ) -> Self {
        Self {
            card_id,
            effect_id: effect_id.into(),
            category,
            once_per_turn: false,
            body: Arc::new(body),
        }
    }

    /// Limit to once per turn (builder pattern).
    #[must_use]
    pub fn with_once_per_turn(mut self, once_per_turn: bool) -> Self {
        self.once_per_turn = once_per_turn;
        self
    }

    /// Check if the action is limited to once per turn.
    #[must_use]
    pub fn is_once_per_turn(&self) -> bool {
        self.once_per_turn
    }

    fn context(&self, source: &CardInstance) -> StepContext {
        StepContext::new(self.card_id, source.instance_id, self.effect_id.clone(), source.name())
    }

    fn structural_checks(&self, snapshot: &GameSnapshot, source: &CardInstance) -> ValidationResult {
        if snapshot.is_game_over() {
            return ValidationResult::invalid(InvalidReason::GameOver);
        }
        if self.category != EffectCategory::QuickPlaySpell && !snapshot.phase.is_main() {
            return ValidationResult::invalid(InvalidReason::NotMainPhase);
        }

        if self.category.is_spell() {
            match (source.zone, source.face) {
                (ZoneName::Hand, _) => {
                    if !snapshot.has_space(ZoneName::SpellTrapZone, 1) {
                        return ValidationResult::invalid(InvalidReason::ZoneFull(
                            ZoneName::SpellTrapZone,
                        ));
                    }
                }
                (ZoneName::SpellTrapZone, Face::FaceDown) => {
                    if self.category == EffectCategory::QuickPlaySpell && source.placed_this_turn {
                        return ValidationResult::invalid(InvalidReason::SetThisTurn);
                    }
                }
                _ => return ValidationResult::invalid(InvalidReason::WrongZone),
            }
            if self.once_per_turn && snapshot.was_card_activated(self.card_id) {
                return ValidationResult::invalid(InvalidReason::OncePerTurn);
            }
        } else {
            if source.zone != ZoneName::MainMonsterZone {
                return ValidationResult::invalid(InvalidReason::WrongZone);
            }
            if !source.is_face_up() {
                return ValidationResult::invalid(InvalidReason::NotFaceUp);
            }
            if self.once_per_turn && source.has_activated(&self.effect_id) {
                return ValidationResult::invalid(InvalidReason::OncePerTurn);
            }
        }

        ValidationResult::Valid
    }

    /// Step that announces the activation and records it.
    fn activation_marker(&self, ctx: &StepContext) -> AtomicStep {
        let card_id = self.card_id;
        let source = ctx.source;
        let effect_id = self.effect_id.clone();
        let event_type = if self.category.is_spell() {
            EventType::SpellActivated
        } else {
            EventType::EffectActivated
        };

        AtomicStep::new(
            ctx.step_id("activate"),
            format!("Activate {}", ctx.card_name),
            NotificationLevel::Silent,
            move |snapshot, _| {
                let marked = snapshot.mark_card_activated(card_id);
                let marked = marked
                    .record_effect_activation(source, &effect_id)
                    .unwrap_or(marked);
                StepOutcome::success(marked)
                    .with_event(GameEvent::for_card(event_type, source, card_id))
            },
        )
    }
}

impl ChainableAction for CardAction {
    fn card_id(&self) -> CardId {
        self.card_id
    }

    fn effect_id(&self) -> &str {
        &self.effect_id
    }

    fn category(&self) -> EffectCategory {
        self.category
    }

    fn can_activate(&self, snapshot: &GameSnapshot, source: &CardInstance) -> ValidationResult {
        let result = self
            .structural_checks(snapshot, source)
            .and_then(|| self.body.conditions(snapshot, source));
        if let Some(reason) = result.reason() {
            debug!("{} ({}) cannot activate: {}", source.name(), self.effect_id, reason);
        }
        result
    }

    fn create_activation_steps(&self, _snapshot: &GameSnapshot, source: &CardInstance) -> Vec<AtomicStep> {
        let ctx = self.context(source);
        let mut steps = vec![self.activation_marker(&ctx)];
        steps.extend(self.body.activation_steps(&ctx));
        steps
    }

    fn create_resolution_steps(&self, _snapshot: &GameSnapshot, source: &CardInstance) -> Vec<AtomicStep> {
        let ctx = self.context(source);
        let mut steps = self.body.resolution_steps(&ctx);
        if self.category.leaves_field_on_resolution() {
            steps.push(steps::send_source_to_graveyard_step(&ctx));
        }
        steps
    }
}
