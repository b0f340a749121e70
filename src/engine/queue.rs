//! The step queue controller.
//!
//! Runs an ordered list of [`AtomicStep`]s one at a time. Silent and info
//! steps run straight through; interactive steps suspend the queue until
//! [`StepQueue::resume`] is called with a confirmation, a card selection,
//! or a cancellation.
//!
//! ## States
//!
//! ```text
//! Idle --start_processing--> AwaitingConfirmation --(interactive)--> AwaitingSelection
//!                                 |     ^                                 |
//!                                 |     +------------ resume -------------+
//!                                 v
//!                            Finalizing --> Idle
//! ```
//!
//! `AwaitingConfirmation` covers both the auto-advancing run of silent and
//! info steps and a suspended confirmation; [`StepQueue::pending`] tells the
//! two apart.
//!
//! ## Triggers
//!
//! After a step emits events, the trigger steps they spawn are spliced in
//! right after the current step, ahead of everything already queued.

use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use super::observer::{LogObserver, QueueObserver};
use crate::core::InstanceId;
use crate::effects::{AtomicStep, NotificationLevel};
use crate::rules::AdditionalRuleRegistry;
use crate::state::{GameResult, GameSnapshot};
use crate::triggers::{EventTimeline, TriggerCollector};

/// Controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueState {
    #[default]
    Idle,
    AwaitingConfirmation,
    AwaitingSelection,
    Finalizing,
}

/// What a suspended queue is waiting for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingInteraction {
    /// Confirm (or cancel) an interactive step without a selection.
    Confirmation { step_id: String, summary: String },
    /// Choose cards for an interactive step.
    Selection {
        step_id: String,
        summary: String,
        candidates: Vec<InstanceId>,
        min: usize,
        max: usize,
        cancelable: bool,
    },
}

impl PendingInteraction {
    /// ID of the suspended step.
    #[must_use]
    pub fn step_id(&self) -> &str {
        match self {
            PendingInteraction::Confirmation { step_id, .. }
            | PendingInteraction::Selection { step_id, .. } => step_id,
        }
    }

    /// Prompt to show.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            PendingInteraction::Confirmation { summary, .. }
            | PendingInteraction::Selection { summary, .. } => summary,
        }
    }

    /// Check if cancelling is allowed.
    #[must_use]
    pub fn is_cancelable(&self) -> bool {
        matches!(self, PendingInteraction::Selection { cancelable: true, .. })
    }

    /// Offered cards, if this is a selection.
    #[must_use]
    pub fn candidates(&self) -> &[InstanceId] {
        match self {
            PendingInteraction::Selection { candidates, .. } => candidates,
            PendingInteraction::Confirmation { .. } => &[],
        }
    }
}

/// Result of driving the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueStatus {
    /// Every step ran.
    Completed,
    /// A step asked to stop; remaining steps were discarded.
    Stopped(String),
    /// An interactive step was cancelled; remaining steps were discarded.
    Cancelled,
    /// The duel ended; remaining steps were discarded.
    GameOver(GameResult),
    /// Waiting for [`StepQueue::resume`].
    Suspended(PendingInteraction),
}

impl QueueStatus {
    /// Check if the queue is waiting for input.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        matches!(self, QueueStatus::Suspended(_))
    }

    /// The pending interaction, if suspended.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingInteraction> {
        match self {
            QueueStatus::Suspended(pending) => Some(pending),
            _ => None,
        }
    }
}

/// How to resume a suspended queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resume {
    Confirm,
    Select(Vec<InstanceId>),
    Cancel,
}

/// Misuse of the queue controller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("the queue is already processing")]
    Busy,

    #[error("no step is waiting for input")]
    NotSuspended,

    #[error("step {0} expects a card selection")]
    SelectionExpected(String),

    #[error("step {0} expects a confirmation")]
    ConfirmationExpected(String),

    #[error("step {0} cannot be cancelled")]
    NotCancelable(String),
}

/// The step queue controller.
pub struct StepQueue {
    steps: Vec<AtomicStep>,
    index: usize,
    state: QueueState,
    active: bool,
    pending: Option<PendingInteraction>,
    timeline: EventTimeline,
    info_delay: Duration,
    observer: Box<dyn QueueObserver>,
}

impl StepQueue {
    /// Create an idle queue that pauses `info_delay` after info steps.
    #[must_use]
    pub fn new(info_delay: Duration) -> Self {
        Self {
            steps: Vec::new(),
            index: 0,
            state: QueueState::Idle,
            active: false,
            pending: None,
            timeline: EventTimeline::new(),
            info_delay,
            observer: Box::new(LogObserver),
        }
    }

    /// Replace the observer (builder pattern).
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn QueueObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the observer.
    pub fn set_observer(&mut self, observer: Box<dyn QueueObserver>) {
        self.observer = observer;
    }

    // === Observable state ===

    /// Check if a run is in progress (possibly suspended).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current controller state.
    #[must_use]
    pub fn state(&self) -> QueueState {
        self.state
    }

    /// The step at the current index.
    #[must_use]
    pub fn current_step(&self) -> Option<&AtomicStep> {
        if self.active {
            self.steps.get(self.index)
        } else {
            None
        }
    }

    /// What the queue is waiting for, if suspended.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingInteraction> {
        self.pending.as_ref()
    }

    /// IDs of the current step and everything after it.
    #[must_use]
    pub fn queued_step_ids(&self) -> Vec<&str> {
        self.steps
            .iter()
            .skip(self.index)
            .map(|s| s.id.as_str())
            .collect()
    }

    /// Events emitted during the current (or last) run.
    #[must_use]
    pub fn timeline(&self) -> &EventTimeline {
        &self.timeline
    }

    // === Driving ===

    /// Load `steps` and run until the list ends or a step suspends.
    pub fn start_processing(
        &mut self,
        snapshot: &mut GameSnapshot,
        rules: &AdditionalRuleRegistry,
        steps: Vec<AtomicStep>,
    ) -> Result<QueueStatus, QueueError> {
        if self.active {
            return Err(QueueError::Busy);
        }

        self.timeline.clear();
        debug!("processing {} step(s)", steps.len());
        self.steps = steps;
        self.index = 0;
        self.active = true;
        Ok(self.drive(snapshot, rules))
    }

    /// Confirm the suspended step.
    pub fn confirm_current_step(
        &mut self,
        snapshot: &mut GameSnapshot,
        rules: &AdditionalRuleRegistry,
    ) -> Result<QueueStatus, QueueError> {
        self.resume(snapshot, rules, Resume::Confirm)
    }

    /// Resume a suspended queue.
    ///
    /// `snapshot` must be the latest snapshot, which may differ from the
    /// one the queue suspended with.
    pub fn resume(
        &mut self,
        snapshot: &mut GameSnapshot,
        rules: &AdditionalRuleRegistry,
        resume: Resume,
    ) -> Result<QueueStatus, QueueError> {
        let pending = self.pending.clone().ok_or(QueueError::NotSuspended)?;
        let step = self
            .steps
            .get(self.index)
            .cloned()
            .ok_or(QueueError::NotSuspended)?;

        let selection = match (&pending, resume) {
            (_, Resume::Cancel) => {
                if !pending.is_cancelable() {
                    return Err(QueueError::NotCancelable(step.id));
                }
                warn!("step {} cancelled", step.id);
                return Ok(self.finalize(QueueStatus::Cancelled));
            }
            (PendingInteraction::Confirmation { .. }, Resume::Confirm) => None,
            (PendingInteraction::Selection { .. }, Resume::Select(ids)) => Some(ids),
            (PendingInteraction::Confirmation { .. }, Resume::Select(_)) => {
                return Err(QueueError::ConfirmationExpected(step.id));
            }
            (PendingInteraction::Selection { .. }, Resume::Confirm) => {
                return Err(QueueError::SelectionExpected(step.id));
            }
        };

        self.pending = None;
        self.state = QueueState::AwaitingConfirmation;
        if let Some(status) = self.execute(snapshot, rules, &step, selection.as_deref()) {
            return Ok(status);
        }
        Ok(self.drive(snapshot, rules))
    }

    /// Drop everything and return to idle.
    pub fn reset(&mut self) {
        self.steps.clear();
        self.index = 0;
        self.state = QueueState::Idle;
        self.active = false;
        self.pending = None;
        self.timeline.clear();
    }

    fn drive(&mut self, snapshot: &mut GameSnapshot, rules: &AdditionalRuleRegistry) -> QueueStatus {
        loop {
            let Some(step) = self.steps.get(self.index).cloned() else {
                return self.finalize(QueueStatus::Completed);
            };
            self.state = QueueState::AwaitingConfirmation;

            if step.is_interactive() {
                return self.suspend(snapshot, &step);
            }
            if let Some(status) = self.execute(snapshot, rules, &step, None) {
                return status;
            }
        }
    }

    fn suspend(&mut self, snapshot: &GameSnapshot, step: &AtomicStep) -> QueueStatus {
        let pending = match &step.selection {
            Some(config) => {
                let candidates = config.candidates.resolve(snapshot);
                let (min, max) = config.bounds(candidates.len());
                self.state = QueueState::AwaitingSelection;
                PendingInteraction::Selection {
                    step_id: step.id.clone(),
                    summary: if config.summary.is_empty() {
                        step.summary.clone()
                    } else {
                        config.summary.clone()
                    },
                    candidates,
                    min,
                    max,
                    cancelable: config.cancelable,
                }
            }
            None => PendingInteraction::Confirmation {
                step_id: step.id.clone(),
                summary: step.summary.clone(),
            },
        };

        debug!("suspended at {}", step.id);
        self.observer.awaiting(&pending);
        self.pending = Some(pending.clone());
        QueueStatus::Suspended(pending)
    }

    /// Run one step. Returns a status if the run ended.
    fn execute(
        &mut self,
        snapshot: &mut GameSnapshot,
        rules: &AdditionalRuleRegistry,
        step: &AtomicStep,
        selection: Option<&[InstanceId]>,
    ) -> Option<QueueStatus> {
        self.observer.step_started(step);
        debug!("run {} ({:?})", step.id, step.notification);

        let outcome = step.run(snapshot, selection);
        if !outcome.should_continue {
            let error = outcome
                .error
                .unwrap_or_else(|| format!("{} stopped", step.id));
            warn!("step {} stopped the queue: {}", step.id, error);
            return Some(self.finalize(QueueStatus::Stopped(error)));
        }
        if !outcome.success {
            warn!("step {} failed: {:?}", step.id, outcome.error);
        }
        *snapshot = outcome.snapshot;

        if step.notification != NotificationLevel::Silent {
            self.observer.notify(step, outcome.message.as_deref());
        }
        if step.notification == NotificationLevel::Info {
            self.observer.pause(self.info_delay);
        }

        if !snapshot.is_game_over() {
            if let Some(reason) = rules.check_victory(snapshot) {
                *snapshot = snapshot.with_result(GameResult::Win(reason));
            }
        }
        if snapshot.is_game_over() {
            return Some(self.finalize(QueueStatus::GameOver(snapshot.result.clone())));
        }

        if !outcome.events.is_empty() {
            self.timeline.record(outcome.events.iter().cloned());
            let spawned = TriggerCollector::new(rules).collect(snapshot, &outcome.events);
            if !spawned.is_empty() {
                debug!("splicing {} trigger step(s) after {}", spawned.len(), step.id);
                let at = self.index + 1;
                self.steps.splice(at..at, spawned);
            }
        }

        self.index += 1;
        None
    }

    fn finalize(&mut self, status: QueueStatus) -> QueueStatus {
        self.state = QueueState::Finalizing;
        self.observer.finalized(&status);
        info!("queue finalized: {:?}", status);

        self.steps.clear();
        self.index = 0;
        self.pending = None;
        self.active = false;
        self.state = QueueState::Idle;
        status
    }
}

impl Default for StepQueue {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl std::fmt::Debug for StepQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepQueue")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("index", &self.index)
            .field("steps", &self.queued_step_ids())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
