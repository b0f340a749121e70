//! Event timeline and trigger collection.
//!
//! The `EventTimeline` keeps every event emitted during one queue run, in
//! emission order, with a sequence number. The `TriggerCollector` turns a
//! batch of freshly emitted events into the trigger steps that must run next.

use log::debug;

use super::event::GameEvent;
use crate::effects::AtomicStep;
use crate::rules::AdditionalRuleRegistry;
use crate::state::GameSnapshot;

/// An event with its position in the timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    pub sequence: u64,
    pub event: GameEvent,
}

/// Ordered record of emitted events.
#[derive(Clone, Debug, Default)]
pub struct EventTimeline {
    entries: Vec<TimelineEntry>,
    next_sequence: u64,
}

impl EventTimeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a batch of events, returning the first assigned sequence number.
    pub fn record(&mut self, events: impl IntoIterator<Item = GameEvent>) -> u64 {
        let first = self.next_sequence;
        for event in events {
            self.entries.push(TimelineEntry {
                sequence: self.next_sequence,
                event,
            });
            self.next_sequence += 1;
        }
        first
    }

    /// All recorded entries.
    #[must_use]
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Entries with a sequence number of at least `sequence`.
    pub fn since(&self, sequence: u64) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().filter(move |e| e.sequence >= sequence)
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Matches emitted events against trigger rules.
pub struct TriggerCollector<'a> {
    rules: &'a AdditionalRuleRegistry,
}

impl<'a> TriggerCollector<'a> {
    /// Create a collector over a rule registry.
    #[must_use]
    pub fn new(rules: &'a AdditionalRuleRegistry) -> Self {
        Self { rules }
    }

    /// Steps spawned by `events`, in event order.
    ///
    /// For each event, every trigger rule listening for its type is asked
    /// to apply against each instance of its card in the snapshot; rules
    /// whose `can_apply` holds contribute their trigger steps.
    #[must_use]
    pub fn collect(&self, snapshot: &GameSnapshot, events: &[GameEvent]) -> Vec<AtomicStep> {
        let mut steps = Vec::new();
        for event in events {
            let spawned = self.rules.collect_triggered_steps(snapshot, event);
            if !spawned.is_empty() {
                debug!("{} spawned {} trigger step(s)", event.event_type, spawned.len());
            }
            steps.extend(spawned);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triggers::EventType;

    #[test]
    fn test_record_assigns_sequence_numbers() {
        let mut timeline = EventTimeline::new();

        let first = timeline.record([
            GameEvent::new(EventType::SpellActivated),
            GameEvent::new(EventType::CardsDrawn),
        ]);
        let second = timeline.record([GameEvent::new(EventType::SentToGraveyard)]);

        assert_eq!(first, 0);
        assert_eq!(second, 2);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.entries()[1].event.event_type, EventType::CardsDrawn);

        let recent: Vec<_> = timeline.since(2).collect();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].event.event_type, EventType::SentToGraveyard);
    }

    #[test]
    fn test_clear_keeps_sequence() {
        let mut timeline = EventTimeline::new();
        timeline.record([GameEvent::new(EventType::CardSet)]);
        timeline.clear();

        assert!(timeline.is_empty());
        assert_eq!(timeline.record([GameEvent::new(EventType::CardSet)]), 1);
    }

    #[test]
    fn test_collect_without_rules_is_empty() {
        let rules = AdditionalRuleRegistry::new();
        let snapshot = GameSnapshot::empty(&crate::core::DuelConfig::default());

        let steps = TriggerCollector::new(&rules)
            .collect(&snapshot, &[GameEvent::new(EventType::SpellActivated)]);
        assert!(steps.is_empty());
    }
}
