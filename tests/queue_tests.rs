//! Step queue integration tests.
//!
//! These tests drive a `StepQueue` directly with hand-built steps and
//! trigger rules, checking suspension, resumption, trigger splicing and
//! observer callbacks.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use rust_duel::cards::{CardData, CardId, Face, FrameType, MonsterStats};
use rust_duel::core::{DuelConfig, Player};
use rust_duel::effects::{step_builder, AtomicStep, NotificationLevel, StepOutcome};
use rust_duel::engine::{PendingInteraction, QueueError, QueueObserver, QueueState, QueueStatus, Resume, StepQueue};
use rust_duel::rules::{AdditionalRuleRegistry, DeclaredTriggerRule};
use rust_duel::state::{GameSnapshot, ZoneName};
use rust_duel::triggers::{EventType, GameEvent};

const WATCHER: CardId = CardId::new(500);

// =============================================================================
// Helpers
// =============================================================================

/// Snapshot with one face-up monster on the field.
fn snapshot_with_watcher() -> GameSnapshot {
    let data = Arc::new(CardData::monster(WATCHER, "Watcher", FrameType::Effect, MonsterStats::default()));
    let (snapshot, id) = GameSnapshot::empty(&DuelConfig::default())
        .place_new_card(data, ZoneName::Hand)
        .unwrap();
    snapshot
        .move_card_with(id, ZoneName::MainMonsterZone, |c| c.with_face(Face::FaceUp))
        .unwrap()
}

fn lose_life(id: &str, notification: NotificationLevel, amount: i32) -> AtomicStep {
    AtomicStep::new(id, format!("Lose {amount}"), notification, move |s, _| {
        StepOutcome::success(s.change_life_points(Player::Player, -amount))
    })
}

fn emit(id: &str, event_type: EventType) -> AtomicStep {
    AtomicStep::new(id, "Emit", NotificationLevel::Silent, move |s, _| {
        StepOutcome::success(s.clone()).with_event(GameEvent::new(event_type))
    })
}

/// Rules with one trigger that asks for confirmation when counters are added.
fn confirming_trigger() -> AdditionalRuleRegistry {
    let mut rules = AdditionalRuleRegistry::new();
    rules
        .register(
            DeclaredTriggerRule::new(WATCHER, "watch", vec![EventType::CounterAdded]).with_resolution(step_builder(
                |ctx| {
                    AtomicStep::new(ctx.step_id("confirm"), "Watcher reacts", NotificationLevel::Interactive, |s, _| {
                        StepOutcome::success(s.change_life_points(Player::Player, -1))
                    })
                },
            )),
        )
        .unwrap();
    rules
}

#[derive(Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<String>>>,
}

impl QueueObserver for Recorder {
    fn notify(&mut self, step: &AtomicStep, _message: Option<&str>) {
        self.calls.borrow_mut().push(format!("notify {}", step.id));
    }

    fn pause(&mut self, delay: Duration) {
        self.calls.borrow_mut().push(format!("pause {}", delay.as_millis()));
    }

    fn awaiting(&mut self, pending: &PendingInteraction) {
        self.calls.borrow_mut().push(format!("await {}", pending.step_id()));
    }

    fn finalized(&mut self, status: &QueueStatus) {
        self.calls.borrow_mut().push(format!("done {status:?}"));
    }
}

// =============================================================================
// Trigger Splicing
// =============================================================================

/// Trigger steps run right after the step that caused them, before the rest.
#[test]
fn test_trigger_runs_before_remaining_steps() {
    let rules = confirming_trigger();
    let mut snapshot = snapshot_with_watcher();
    let mut queue = StepQueue::default();

    let status = queue
        .start_processing(
            &mut snapshot,
            &rules,
            vec![emit("first", EventType::CounterAdded), lose_life("second", NotificationLevel::Silent, 100)],
        )
        .unwrap();

    assert!(status.is_suspended());
    assert_eq!(queue.state(), QueueState::AwaitingConfirmation);
    assert_eq!(queue.queued_step_ids(), vec!["500:watch:confirm", "second"]);
    assert_eq!(snapshot.life_points[Player::Player], 8000);

    let status = queue.confirm_current_step(&mut snapshot, &rules).unwrap();

    assert_eq!(status, QueueStatus::Completed);
    assert_eq!(snapshot.life_points[Player::Player], 7899);
    assert!(!queue.is_active());
    assert_eq!(queue.state(), QueueState::Idle);
}

/// Events with no listening rule add nothing to the queue.
#[test]
fn test_unwatched_event_adds_no_steps() {
    let rules = confirming_trigger();
    let mut snapshot = snapshot_with_watcher();
    let mut queue = StepQueue::default();

    let status = queue
        .start_processing(&mut snapshot, &rules, vec![emit("first", EventType::CardsDrawn)])
        .unwrap();

    assert_eq!(status, QueueStatus::Completed);
    assert_eq!(queue.timeline().len(), 1);
    assert_eq!(queue.timeline().entries()[0].event.event_type, EventType::CardsDrawn);
}

// =============================================================================
// Resume Protocol
// =============================================================================

/// A suspended queue refuses new work and the wrong kind of answer.
#[test]
fn test_resume_protocol_errors() {
    let rules = AdditionalRuleRegistry::new();
    let mut snapshot = snapshot_with_watcher();
    let mut queue = StepQueue::default();

    assert_eq!(
        queue.resume(&mut snapshot, &rules, Resume::Confirm),
        Err(QueueError::NotSuspended)
    );

    queue
        .start_processing(&mut snapshot, &rules, vec![lose_life("ask", NotificationLevel::Interactive, 10)])
        .unwrap();

    assert_eq!(
        queue.start_processing(&mut snapshot, &rules, Vec::new()),
        Err(QueueError::Busy)
    );
    assert!(matches!(
        queue.resume(&mut snapshot, &rules, Resume::Select(Vec::new())),
        Err(QueueError::ConfirmationExpected(_))
    ));
    assert!(matches!(
        queue.resume(&mut snapshot, &rules, Resume::Cancel),
        Err(QueueError::NotCancelable(_))
    ));
    assert_eq!(snapshot.life_points[Player::Player], 8000);

    assert_eq!(queue.confirm_current_step(&mut snapshot, &rules), Ok(QueueStatus::Completed));
    assert_eq!(snapshot.life_points[Player::Player], 7990);
}

/// Resetting a suspended queue drops its steps without running them.
#[test]
fn test_reset_drops_pending_steps() {
    let rules = AdditionalRuleRegistry::new();
    let mut snapshot = snapshot_with_watcher();
    let mut queue = StepQueue::default();

    queue
        .start_processing(
            &mut snapshot,
            &rules,
            vec![
                lose_life("ask", NotificationLevel::Interactive, 10),
                lose_life("after", NotificationLevel::Silent, 10),
            ],
        )
        .unwrap();
    queue.reset();

    assert!(!queue.is_active());
    assert!(queue.pending().is_none());
    assert!(queue.queued_step_ids().is_empty());
    assert_eq!(snapshot.life_points[Player::Player], 8000);
}

// =============================================================================
// Observer
// =============================================================================

/// Info steps notify and pause; interactive steps report what they await.
#[test]
fn test_observer_sees_presentation_calls() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let rules = AdditionalRuleRegistry::new();
    let mut snapshot = snapshot_with_watcher();
    let mut queue = StepQueue::new(Duration::from_millis(300)).with_observer(Box::new(Recorder {
        calls: Rc::clone(&calls),
    }));

    queue
        .start_processing(
            &mut snapshot,
            &rules,
            vec![
                lose_life("quiet", NotificationLevel::Silent, 1),
                lose_life("shown", NotificationLevel::Info, 1),
                lose_life("asked", NotificationLevel::Interactive, 1),
            ],
        )
        .unwrap();
    queue.confirm_current_step(&mut snapshot, &rules).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            "notify shown".to_string(),
            "pause 300".to_string(),
            "await asked".to_string(),
            "notify asked".to_string(),
            "done Completed".to_string(),
        ]
    );
}
