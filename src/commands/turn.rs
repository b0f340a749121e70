//! Turn structure commands.

use super::{ready, Command};
use crate::core::{InvalidReason, Phase, ValidationResult};
use crate::effects::{AtomicStep, NotificationLevel, StepOutcome};
use crate::engine::{DuelSession, QueueStatus, SessionError};
use crate::triggers::{EventType, GameEvent};

fn draw_step(count: usize) -> AtomicStep {
    AtomicStep::new(
        "turn:draw",
        format!("Draw {count}"),
        NotificationLevel::Silent,
        move |snapshot, _| {
            let (next, drawn) = snapshot.draw(count);
            StepOutcome::success(next).with_event(GameEvent::new(EventType::CardsDrawn).with_value(drawn.len() as i64))
        },
    )
}

fn phase_step(to: Phase) -> AtomicStep {
    AtomicStep::new(
        "turn:phase",
        to.to_string(),
        NotificationLevel::Info,
        move |snapshot, _| {
            StepOutcome::success(snapshot.with_phase(to))
                .with_event(GameEvent::new(EventType::PhaseChanged).with_value(to as i64))
        },
    )
}

fn new_turn_step() -> AtomicStep {
    AtomicStep::new("turn:start", "New turn", NotificationLevel::Info, |snapshot, _| {
        StepOutcome::success(snapshot.start_next_turn())
            .with_event(GameEvent::new(EventType::PhaseChanged).with_value(Phase::Draw as i64))
    })
}

/// Draw cards outside of any card effect.
///
/// Drawing from an empty deck loses the duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub count: usize,
}

impl DrawCommand {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl Command for DrawCommand {
    fn name(&self) -> &'static str {
        "draw"
    }

    fn validate(&self, session: &DuelSession) -> ValidationResult {
        ready(session)
    }

    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError> {
        session.run_steps(vec![draw_step(self.count)])
    }
}

/// Move to the next phase.
///
/// Entering the End Phase runs the delayed effects queued this turn; leaving
/// it starts the next turn with its normal draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvancePhaseCommand;

impl Command for AdvancePhaseCommand {
    fn name(&self) -> &'static str {
        "advance phase"
    }

    fn validate(&self, session: &DuelSession) -> ValidationResult {
        ready(session).and_then(|| {
            ValidationResult::check(
                session.chain().is_empty(),
                InvalidReason::Custom("a chain is still open".to_string()),
            )
        })
    }

    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError> {
        let snapshot = session.snapshot();
        match snapshot.phase.next(snapshot.turn) {
            Some(to) => {
                let status = session.run_steps(vec![phase_step(to)])?;
                if to == Phase::End && status == QueueStatus::Completed {
                    session.run_delayed_effects()
                } else {
                    Ok(status)
                }
            }
            None => session.run_steps(vec![new_turn_step(), draw_step(1)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{CardData, CardId, FrameType, MonsterStats};
    use crate::commands::CommandOutcome;
    use crate::core::{DuelConfig, InstanceId};
    use crate::effects::Args;
    use crate::engine::{NullObserver, Registries};
    use crate::state::{GameResult, GameSnapshot, ZoneName};

    fn session(deck: usize) -> DuelSession {
        let config = DuelConfig::default().with_info_delay_ms(0);
        let mut snapshot = GameSnapshot::empty(&config);
        let filler = Arc::new(CardData::monster(
            CardId::new(900),
            "Filler",
            FrameType::Normal,
            MonsterStats::default(),
        ));
        for _ in 0..deck {
            snapshot = snapshot.place_new_card(Arc::clone(&filler), ZoneName::MainDeck).unwrap().0;
        }
        let registries = Arc::new(Registries::new().unwrap());
        DuelSession::from_snapshot(registries, config, snapshot).with_observer(Box::new(NullObserver))
    }

    #[test]
    fn test_first_turn_skips_battle() {
        let mut session = session(5);

        AdvancePhaseCommand.execute(&mut session).unwrap();

        assert_eq!(session.snapshot().phase, Phase::End);
    }

    #[test]
    fn test_end_phase_starts_next_turn_with_draw() {
        let mut session = session(5);

        AdvancePhaseCommand.execute(&mut session).unwrap();
        let outcome = AdvancePhaseCommand.execute(&mut session).unwrap();

        assert_eq!(outcome, CommandOutcome::Accepted(QueueStatus::Completed));
        assert_eq!(session.snapshot().turn, 2);
        assert_eq!(session.snapshot().phase, Phase::Draw);
        assert_eq!(session.snapshot().hand_size(), 1);
        assert!(session.snapshot().can_normal_summon());
    }

    #[test]
    fn test_end_phase_runs_delayed_effects() {
        let mut session = session(3);
        DrawCommand::new(2).execute(&mut session).unwrap();
        let queued = session
            .snapshot()
            .queue_delayed_effect(CardId::new(93946239), InstanceId::PLACEHOLDER, "discard_hand", Args::new());
        session.replace_snapshot(queued).unwrap();

        AdvancePhaseCommand.execute(&mut session).unwrap();

        assert_eq!(session.snapshot().hand_size(), 0);
        assert_eq!(session.snapshot().cards_in(ZoneName::Graveyard).len(), 2);
        assert!(session.snapshot().pending_end_phase_effects.is_empty());
    }

    #[test]
    fn test_drawing_from_empty_deck_loses() {
        let mut session = session(1);

        let outcome = DrawCommand::new(2).execute(&mut session).unwrap();

        assert!(matches!(
            outcome,
            CommandOutcome::Accepted(QueueStatus::GameOver(GameResult::Lose(_)))
        ));
        let outcome = DrawCommand::new(1).execute(&mut session).unwrap();
        assert_eq!(outcome.rejection(), Some(&InvalidReason::GameOver));
    }
}
