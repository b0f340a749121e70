//! Event-driven trigger plumbing.
//!
//! Steps emit [`GameEvent`]s when they run. The step queue records them in
//! an [`EventTimeline`] and asks a [`TriggerCollector`] which trigger rules
//! now fire; the resulting steps are spliced into the running queue right
//! after the step that caused them.
//!
//! ## Example Usage
//!
//! ```
//! use rust_duel::core::InstanceId;
//! use rust_duel::cards::CardId;
//! use rust_duel::triggers::{EventTimeline, EventType, GameEvent};
//!
//! let mut timeline = EventTimeline::new();
//! timeline.record([GameEvent::for_card(
//!     EventType::SpellActivated,
//!     InstanceId(1),
//!     CardId::new(55144522),
//! )]);
//!
//! assert_eq!(timeline.len(), 1);
//! ```

mod event;
mod timeline;

pub use event::{EventType, GameEvent};
pub use timeline::{EventTimeline, TimelineEntry, TriggerCollector};
