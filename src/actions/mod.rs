//! Chainable actions: the things a card can activate.
//!
//! - [`ChainableAction`]: the capability (conditions, activation steps,
//!   resolution steps), tagged with a [`SpellSpeed`] and an [`EffectCategory`]
//! - [`CardAction`]: the shared template every effect uses, delegating the
//!   card-specific part to an [`EffectBody`]
//! - [`ChainableActionRegistry`]: lookup by card ID
//!
//! Declared cards use [`DeclaredBody`], which replays step lists bound by
//! the DSL compiler. Hand-written bodies live in [`library`].

mod action;
mod card_action;
pub mod library;
mod registry;

pub use action::{ChainableAction, EffectCategory, SpellSpeed};
pub use card_action::{CardAction, DeclaredBody, EffectBody};
pub use registry::ChainableActionRegistry;
