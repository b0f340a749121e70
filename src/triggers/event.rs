//! Duel event types.
//!
//! Events are emitted by executed steps and describe what just happened:
//! a spell was activated, cards were drawn, life points changed. Trigger
//! rules listen for specific event types and respond with new steps.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::InstanceId;

/// Kind of event. Serialized kebab-case (`spell-activated`) in card definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    SpellActivated,
    EffectActivated,
    CardsDrawn,
    CardDiscarded,
    SentToGraveyard,
    AddedToHand,
    LifePointsChanged,
    CounterAdded,
    NormalSummoned,
    CardSet,
    PhaseChanged,
}

impl EventType {
    /// All event types.
    pub const ALL: [EventType; 11] = [
        EventType::SpellActivated,
        EventType::EffectActivated,
        EventType::CardsDrawn,
        EventType::CardDiscarded,
        EventType::SentToGraveyard,
        EventType::AddedToHand,
        EventType::LifePointsChanged,
        EventType::CounterAdded,
        EventType::NormalSummoned,
        EventType::CardSet,
        EventType::PhaseChanged,
    ];

    /// The kebab-case name used in card definitions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventType::SpellActivated => "spell-activated",
            EventType::EffectActivated => "effect-activated",
            EventType::CardsDrawn => "cards-drawn",
            EventType::CardDiscarded => "card-discarded",
            EventType::SentToGraveyard => "sent-to-graveyard",
            EventType::AddedToHand => "added-to-hand",
            EventType::LifePointsChanged => "life-points-changed",
            EventType::CounterAdded => "counter-added",
            EventType::NormalSummoned => "normal-summoned",
            EventType::CardSet => "card-set",
            EventType::PhaseChanged => "phase-changed",
        }
    }

    /// Look up an event type by its kebab-case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An event with contextual data.
///
/// ## Event Data
///
/// - `event_type`: What kind of event this is
/// - `source`: The instance the event is about (if any)
/// - `card_id`: That instance's card (if any)
/// - `value`: Numeric payload (cards drawn, life point delta, counters added)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub event_type: EventType,
    pub source: Option<InstanceId>,
    pub card_id: Option<CardId>,
    pub value: i64,
}

impl GameEvent {
    /// Create a new event with just a type.
    #[must_use]
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            source: None,
            card_id: None,
            value: 0,
        }
    }

    /// Set the source instance (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: InstanceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the card ID (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card_id: CardId) -> Self {
        self.card_id = Some(card_id);
        self
    }

    /// Set the numeric payload (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    /// Create a card-centric event.
    #[must_use]
    pub fn for_card(event_type: EventType, source: InstanceId, card_id: CardId) -> Self {
        Self::new(event_type).with_source(source).with_card(card_id)
    }
}
