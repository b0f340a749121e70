//! Commands that put cards from hand onto the field.

use super::{find_card, ready, Command};
use crate::cards::{BattlePosition, CardInstance, Face};
use crate::core::{InstanceId, InvalidReason, ValidationResult};
use crate::effects::{AtomicStep, NotificationLevel, StepContext, StepOutcome};
use crate::engine::{DuelSession, QueueStatus, SessionError};
use crate::state::{GameSnapshot, ZoneName};
use crate::triggers::{EventType, GameEvent};

/// Highest level that can be normal summoned without tributes.
const MAX_NORMAL_SUMMON_LEVEL: u32 = 4;

/// One silent step that moves a card and emits an event.
fn placement_step(
    card: &CardInstance,
    effect_id: &str,
    zone: ZoneName,
    event_type: EventType,
    update: fn(CardInstance) -> CardInstance,
    bookkeeping: fn(&GameSnapshot) -> GameSnapshot,
) -> AtomicStep {
    let ctx = StepContext::new(card.card_id, card.instance_id, effect_id, card.name());
    let id = card.instance_id;
    let card_id = card.card_id;
    AtomicStep::new(
        ctx.step_id("place"),
        format!("{} {}", effect_id, card.name()),
        NotificationLevel::Silent,
        move |snapshot, _| match snapshot.move_card_with(id, zone, update) {
            Ok(next) => StepOutcome::success(bookkeeping(&next))
                .with_event(GameEvent::for_card(event_type, id, card_id)),
            Err(e) => StepOutcome::failure(snapshot, e.to_string()),
        },
    )
}

fn in_hand(session: &DuelSession, id: InstanceId) -> Result<&CardInstance, InvalidReason> {
    let card = find_card(session, id)?;
    if card.zone == ZoneName::Hand {
        Ok(card)
    } else {
        Err(InvalidReason::WrongZone)
    }
}

/// Normal summon a monster from hand in face-up attack position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalSummonCommand {
    pub instance_id: InstanceId,
}

impl NormalSummonCommand {
    #[must_use]
    pub fn new(instance_id: InstanceId) -> Self {
        Self { instance_id }
    }
}

impl Command for NormalSummonCommand {
    fn name(&self) -> &'static str {
        "normal summon"
    }

    fn validate(&self, session: &DuelSession) -> ValidationResult {
        ready(session).and_then(|| {
            let card = match in_hand(session, self.instance_id) {
                Ok(card) => card,
                Err(reason) => return ValidationResult::invalid(reason),
            };
            let snapshot = session.snapshot();
            ValidationResult::check(
                card.data.is_monster()
                    && !card.data.is_extra_deck()
                    && card.data.level() <= MAX_NORMAL_SUMMON_LEVEL,
                InvalidReason::NotSummonable,
            )
            .and_then(|| ValidationResult::check(snapshot.phase.is_main(), InvalidReason::NotMainPhase))
            .and_then(|| ValidationResult::check(snapshot.can_normal_summon(), InvalidReason::NoNormalSummonLeft))
            .and_then(|| {
                ValidationResult::check(
                    snapshot.has_space(ZoneName::MainMonsterZone, 1),
                    InvalidReason::ZoneFull(ZoneName::MainMonsterZone),
                )
            })
        })
    }

    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError> {
        let card = in_hand(session, self.instance_id).map_err(SessionError::Rejected)?;
        let step = placement_step(
            card,
            "normal-summon",
            ZoneName::MainMonsterZone,
            EventType::NormalSummoned,
            |c| {
                c.with_face(Face::FaceUp)
                    .with_battle_position(Some(BattlePosition::Attack))
                    .with_placed_this_turn(true)
            },
            GameSnapshot::consume_normal_summon,
        );
        session.run_steps(vec![step])
    }
}

/// Set a spell or trap from hand face-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetSpellCommand {
    pub instance_id: InstanceId,
}

impl SetSpellCommand {
    #[must_use]
    pub fn new(instance_id: InstanceId) -> Self {
        Self { instance_id }
    }
}

impl Command for SetSpellCommand {
    fn name(&self) -> &'static str {
        "set"
    }

    fn validate(&self, session: &DuelSession) -> ValidationResult {
        ready(session).and_then(|| {
            let card = match in_hand(session, self.instance_id) {
                Ok(card) => card,
                Err(reason) => return ValidationResult::invalid(reason),
            };
            let snapshot = session.snapshot();
            ValidationResult::check(card.data.is_spell() || card.data.is_trap(), InvalidReason::NoEffect)
                .and_then(|| ValidationResult::check(snapshot.phase.is_main(), InvalidReason::NotMainPhase))
                .and_then(|| {
                    ValidationResult::check(
                        snapshot.has_space(ZoneName::SpellTrapZone, 1),
                        InvalidReason::ZoneFull(ZoneName::SpellTrapZone),
                    )
                })
        })
    }

    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError> {
        let card = in_hand(session, self.instance_id).map_err(SessionError::Rejected)?;
        let step = placement_step(
            card,
            "set",
            ZoneName::SpellTrapZone,
            EventType::CardSet,
            |c| c.with_face(Face::FaceDown).with_placed_this_turn(true),
            GameSnapshot::clone,
        );
        session.run_steps(vec![step])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{CardData, CardId, FrameType, MonsterStats, SpellType};
    use crate::commands::{ActivateSpellCommand, CommandOutcome};
    use crate::core::DuelConfig;
    use crate::engine::{NullObserver, Registries};

    fn monster(level: u32, frame: FrameType) -> Arc<CardData> {
        Arc::new(CardData::monster(
            CardId::new(100 + level),
            "Test Monster",
            frame,
            MonsterStats {
                level,
                ..MonsterStats::default()
            },
        ))
    }

    fn session_with_hand(cards: Vec<Arc<CardData>>) -> (DuelSession, Vec<InstanceId>) {
        let config = DuelConfig::default().with_info_delay_ms(0);
        let mut snapshot = GameSnapshot::empty(&config);
        let mut ids = Vec::new();
        for card in cards {
            let (next, id) = snapshot.place_new_card(card, ZoneName::Hand).unwrap();
            snapshot = next;
            ids.push(id);
        }
        let registries = Arc::new(Registries::with_builtin_cards().unwrap());
        let session = DuelSession::from_snapshot(registries, config, snapshot).with_observer(Box::new(NullObserver));
        (session, ids)
    }

    #[test]
    fn test_normal_summon_places_attack_position() {
        let (mut session, ids) = session_with_hand(vec![monster(4, FrameType::Normal)]);

        let outcome = NormalSummonCommand::new(ids[0]).execute(&mut session).unwrap();

        assert_eq!(outcome, CommandOutcome::Accepted(QueueStatus::Completed));
        let card = session.snapshot().find_card(ids[0]).unwrap();
        assert_eq!(card.zone, ZoneName::MainMonsterZone);
        assert_eq!(card.face, Face::FaceUp);
        assert_eq!(card.battle_position, Some(BattlePosition::Attack));
        assert!(!session.snapshot().can_normal_summon());
    }

    #[test]
    fn test_second_normal_summon_rejected() {
        let (mut session, ids) =
            session_with_hand(vec![monster(3, FrameType::Normal), monster(4, FrameType::Effect)]);

        NormalSummonCommand::new(ids[0]).execute(&mut session).unwrap();
        let outcome = NormalSummonCommand::new(ids[1]).execute(&mut session).unwrap();

        assert_eq!(outcome.rejection(), Some(&InvalidReason::NoNormalSummonLeft));
        assert_eq!(session.snapshot().find_card(ids[1]).unwrap().zone, ZoneName::Hand);
    }

    #[test]
    fn test_high_level_and_extra_deck_not_summonable() {
        let (mut session, ids) =
            session_with_hand(vec![monster(7, FrameType::Normal), monster(2, FrameType::Fusion)]);

        for id in ids {
            let outcome = NormalSummonCommand::new(id).execute(&mut session).unwrap();
            assert_eq!(outcome.rejection(), Some(&InvalidReason::NotSummonable));
        }
    }

    #[test]
    fn test_set_quick_play_cannot_activate_same_turn() {
        let quick = Arc::new(CardData::spell(CardId::new(74519184), "Hand Destruction", SpellType::QuickPlay));
        let (mut session, ids) = session_with_hand(vec![quick]);

        let outcome = SetSpellCommand::new(ids[0]).execute(&mut session).unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(session.snapshot().find_card(ids[0]).unwrap().face, Face::FaceDown);

        let outcome = ActivateSpellCommand::new(ids[0]).execute(&mut session).unwrap();
        assert_eq!(outcome.rejection(), Some(&InvalidReason::SetThisTurn));
    }

    #[test]
    fn test_set_requires_spell_or_trap() {
        let (mut session, ids) = session_with_hand(vec![monster(4, FrameType::Normal)]);

        let outcome = SetSpellCommand::new(ids[0]).execute(&mut session).unwrap();

        assert_eq!(outcome.rejection(), Some(&InvalidReason::NoEffect));
    }
}
