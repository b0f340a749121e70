//! Duel state substrate: zones and the immutable game snapshot.
//!
//! Everything here is a pure function of its inputs. Nothing in this module
//! knows about effects beyond the stored arguments of delayed effects.

pub mod snapshot;
pub mod zones;

pub use snapshot::{DelayedEffect, GameResult, GameSnapshot, SnapshotError};
pub use zones::{ZoneName, Zones};
