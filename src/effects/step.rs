//! The atomic step: one indivisible unit of effect execution.
//!
//! A step pairs presentation metadata (summary, description, notification
//! level, optional card selection) with an action function
//! `(snapshot, selection) -> StepOutcome`. Steps are disposable: actions and
//! rules build them fresh every time they are asked, and the queue runs each
//! one at most once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardFilter, CardId};
use crate::core::InstanceId;
use crate::state::{GameSnapshot, ZoneName};
use crate::triggers::GameEvent;

/// How the queue presents a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationLevel {
    /// Run immediately, no presentation.
    #[default]
    Silent,
    /// Run, notify, pause briefly.
    Info,
    /// Suspend for a confirmation or card selection.
    Interactive,
}

/// Where the cards offered by a selection come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCandidates {
    /// A fixed list of instances.
    Cards(Vec<InstanceId>),
    /// Every card in a zone matching a filter, resolved when the step is
    /// reached rather than when it is built.
    Zone {
        zone: ZoneName,
        filter: CardFilter,
        exclude: Option<InstanceId>,
    },
}

impl SelectionCandidates {
    /// Resolve the candidate set against a snapshot.
    #[must_use]
    pub fn resolve(&self, snapshot: &GameSnapshot) -> Vec<InstanceId> {
        match self {
            SelectionCandidates::Cards(ids) => ids
                .iter()
                .copied()
                .filter(|&id| snapshot.find_card(id).is_some())
                .collect(),
            SelectionCandidates::Zone {
                zone,
                filter,
                exclude,
            } => snapshot
                .cards_in(*zone)
                .iter()
                .filter(|c| Some(c.instance_id) != *exclude && filter.matches(c))
                .map(|c| c.instance_id)
                .collect(),
        }
    }
}

/// Card selection presented by an interactive step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSelectionConfig {
    pub candidates: SelectionCandidates,
    pub min: usize,
    pub max: usize,
    pub cancelable: bool,
    pub summary: String,
}

impl CardSelectionConfig {
    /// Select exactly `count` cards from `candidates`. Not cancelable.
    #[must_use]
    pub fn exactly(candidates: SelectionCandidates, count: usize) -> Self {
        Self {
            candidates,
            min: count,
            max: count,
            cancelable: false,
            summary: String::new(),
        }
    }

    /// Set the cancelable flag (builder pattern).
    #[must_use]
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Set the prompt (builder pattern).
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Count bounds once the candidate set is known.
    ///
    /// The minimum never exceeds the number of candidates.
    #[must_use]
    pub fn bounds(&self, available: usize) -> (usize, usize) {
        (self.min.min(available), self.max.min(available))
    }

    /// Check a selection against the resolved candidates.
    #[must_use]
    pub fn accepts(&self, selection: &[InstanceId], candidates: &[InstanceId]) -> bool {
        let (min, max) = self.bounds(candidates.len());
        let mut unique = selection.to_vec();
        unique.sort_unstable();
        unique.dedup();

        unique.len() == selection.len()
            && (min..=max).contains(&selection.len())
            && selection.iter().all(|id| candidates.contains(id))
    }
}

/// Result of running a step's action.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// The action did what it set out to do.
    pub success: bool,
    /// Snapshot after the action (unchanged on failure).
    pub snapshot: GameSnapshot,
    /// Events emitted, in order.
    pub events: SmallVec<[GameEvent; 2]>,
    /// Player-facing message.
    pub message: Option<String>,
    /// Failure description.
    pub error: Option<String>,
    /// `false` finalizes the queue early.
    pub should_continue: bool,
}

impl StepOutcome {
    /// A successful outcome.
    #[must_use]
    pub fn success(snapshot: GameSnapshot) -> Self {
        Self {
            success: true,
            snapshot,
            events: SmallVec::new(),
            message: None,
            error: None,
            should_continue: true,
        }
    }

    /// A failed outcome that stops the queue. `snapshot` is the input.
    #[must_use]
    pub fn failure(snapshot: &GameSnapshot, error: impl Into<String>) -> Self {
        Self {
            success: false,
            snapshot: snapshot.clone(),
            events: SmallVec::new(),
            message: None,
            error: Some(error.into()),
            should_continue: false,
        }
    }

    /// Add an event (builder pattern).
    #[must_use]
    pub fn with_event(mut self, event: GameEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Add several events (builder pattern).
    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = GameEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Set the message (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Action function of a step.
pub type StepAction = Arc<dyn Fn(&GameSnapshot, Option<&[InstanceId]>) -> StepOutcome + Send + Sync>;

/// One indivisible unit of state mutation plus presentation metadata.
#[derive(Clone)]
pub struct AtomicStep {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub notification: NotificationLevel,
    pub selection: Option<CardSelectionConfig>,
    action: StepAction,
}

impl AtomicStep {
    /// Create a step.
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        notification: NotificationLevel,
        action: impl Fn(&GameSnapshot, Option<&[InstanceId]>) -> StepOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: String::new(),
            notification,
            selection: None,
            action: Arc::new(action),
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a card selection (builder pattern). Makes the step interactive.
    #[must_use]
    pub fn with_selection(mut self, selection: CardSelectionConfig) -> Self {
        self.notification = NotificationLevel::Interactive;
        self.selection = Some(selection);
        self
    }

    /// Check if the step suspends the queue.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.notification == NotificationLevel::Interactive
    }

    /// Check if the step may be cancelled while suspended.
    #[must_use]
    pub fn is_cancelable(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| s.cancelable)
    }

    /// Run the action.
    #[must_use]
    pub fn run(&self, snapshot: &GameSnapshot, selection: Option<&[InstanceId]>) -> StepOutcome {
        (self.action)(snapshot, selection)
    }
}

impl std::fmt::Debug for AtomicStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicStep")
            .field("id", &self.id)
            .field("summary", &self.summary)
            .field("notification", &self.notification)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

/// What a step is being built for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepContext {
    pub card_id: CardId,
    pub source: InstanceId,
    pub effect_id: String,
    pub card_name: String,
}

impl StepContext {
    /// Create a context for a source instance.
    #[must_use]
    pub fn new(
        card_id: CardId,
        source: InstanceId,
        effect_id: impl Into<String>,
        card_name: impl Into<String>,
    ) -> Self {
        Self {
            card_id,
            source,
            effect_id: effect_id.into(),
            card_name: card_name.into(),
        }
    }

    /// Context with no real source instance, used to dry-build steps at
    /// load time.
    #[must_use]
    pub fn placeholder(card_id: CardId, effect_id: impl Into<String>) -> Self {
        Self::new(card_id, InstanceId::PLACEHOLDER, effect_id, "")
    }

    /// Step ID scoped to this context.
    #[must_use]
    pub fn step_id(&self, key: &str) -> String {
        format!("{}:{}:{}", self.card_id, self.effect_id, key)
    }
}
