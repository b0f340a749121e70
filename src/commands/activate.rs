//! Activation commands.

use std::sync::Arc;

use super::{find_card, ready, Command};
use crate::actions::ChainableAction;
use crate::cards::Face;
use crate::core::{InstanceId, InvalidReason, ValidationResult};
use crate::engine::{DuelSession, QueueStatus, SessionError};
use crate::state::ZoneName;

/// Activate a spell card from hand, or flip a set spell face-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivateSpellCommand {
    pub instance_id: InstanceId,
    /// Leave the chain open for a response instead of resolving.
    pub open_chain: bool,
}

impl ActivateSpellCommand {
    #[must_use]
    pub fn new(instance_id: InstanceId) -> Self {
        Self {
            instance_id,
            open_chain: false,
        }
    }

    /// Leave the chain open after activation (builder pattern).
    #[must_use]
    pub fn in_open_chain(mut self) -> Self {
        self.open_chain = true;
        self
    }

    fn action(&self, session: &DuelSession) -> Result<Arc<dyn ChainableAction>, InvalidReason> {
        let card = find_card(session, self.instance_id)?;
        if !card.data.is_spell() {
            return Err(InvalidReason::NoEffect);
        }
        session
            .registries()
            .actions
            .activation(card.card_id)
            .ok_or(InvalidReason::NoEffect)
    }
}

impl Command for ActivateSpellCommand {
    fn name(&self) -> &'static str {
        "activate spell"
    }

    fn validate(&self, session: &DuelSession) -> ValidationResult {
        ready(session).and_then(|| {
            let (card, action) = match find_card(session, self.instance_id)
                .and_then(|card| self.action(session).map(|action| (card, action)))
            {
                Ok(found) => found,
                Err(reason) => return ValidationResult::invalid(reason),
            };
            ValidationResult::check(
                session.chain().can_chain(action.spell_speed()),
                InvalidReason::ChainSpeedTooLow,
            )
            .and_then(|| action.can_activate(session.snapshot(), card))
        })
    }

    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError> {
        let action = self.action(session).map_err(SessionError::Rejected)?;
        let from_hand = find_card(session, self.instance_id)
            .map_err(SessionError::Rejected)?
            .zone
            == ZoneName::Hand;
        let id = self.instance_id;

        if from_hand {
            session.activate_with(action, id, self.open_chain, move |s| {
                s.move_card_with(id, ZoneName::SpellTrapZone, |c| c.with_face(Face::FaceUp))
            })
        } else {
            session.activate_with(action, id, self.open_chain, move |s| {
                s.update_card(id, |c| c.with_face(Face::FaceUp))
            })
        }
    }
}

/// Activate an ignition effect of a face-up monster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivateIgnitionCommand {
    pub instance_id: InstanceId,
    /// Which effect; the card's first ignition effect when `None`.
    pub effect_id: Option<String>,
}

impl ActivateIgnitionCommand {
    #[must_use]
    pub fn new(instance_id: InstanceId) -> Self {
        Self {
            instance_id,
            effect_id: None,
        }
    }

    /// Choose a specific effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect_id: impl Into<String>) -> Self {
        self.effect_id = Some(effect_id.into());
        self
    }

    fn action(&self, session: &DuelSession) -> Result<Arc<dyn ChainableAction>, InvalidReason> {
        let card = find_card(session, self.instance_id)?;
        let actions = &session.registries().actions;
        match &self.effect_id {
            Some(effect_id) => actions.ignition(card.card_id, effect_id),
            None => actions.ignitions(card.card_id).first().cloned(),
        }
        .ok_or(InvalidReason::NoEffect)
    }
}

impl Command for ActivateIgnitionCommand {
    fn name(&self) -> &'static str {
        "activate ignition effect"
    }

    fn validate(&self, session: &DuelSession) -> ValidationResult {
        ready(session).and_then(|| {
            let (card, action) = match find_card(session, self.instance_id)
                .and_then(|card| self.action(session).map(|action| (card, action)))
            {
                Ok(found) => found,
                Err(reason) => return ValidationResult::invalid(reason),
            };
            ValidationResult::check(
                session.chain().can_chain(action.spell_speed()),
                InvalidReason::ChainSpeedTooLow,
            )
            .and_then(|| action.can_activate(session.snapshot(), card))
        })
    }

    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError> {
        let action = self.action(session).map_err(SessionError::Rejected)?;
        session.activate(action, self.instance_id, false)
    }
}
