//! Card instance identification.
//!
//! Every physical card in a duel has a unique `InstanceId`. Two copies of
//! the same card share a [`CardId`](crate::cards::CardId) but never an
//! `InstanceId`.
//!
//! ## ID Layout
//!
//! Instance IDs are allocated sequentially when the duel snapshot is built,
//! main deck first, then extra deck. `0` is never allocated, so it is
//! available as a placeholder when a step is built without a real source.
//!
//! ```
//! use rust_duel::core::InstanceId;
//!
//! let first = InstanceId::first();
//! assert_eq!(first.next(), InstanceId(2));
//! assert!(InstanceId::PLACEHOLDER.is_placeholder());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Placeholder used when building steps outside a real duel
    /// (load-time argument checking).
    pub const PLACEHOLDER: InstanceId = InstanceId(0);

    /// The first ID handed out to a real card.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// The ID following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Check if this is the placeholder ID.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 == 0
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}
