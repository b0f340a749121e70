//! # rust-duel
//!
//! A rules engine for a solo trading-card duel built around chains of
//! card effects.
//!
//! ## Design Principles
//!
//! 1. **Immutable Snapshots**: Every transition produces a new `GameSnapshot`.
//!    Cloning is O(1) via `im-rs`, so a chain activation can be rolled back
//!    by keeping the old snapshot.
//!
//! 2. **Atomic Steps**: All card behavior is a list of `AtomicStep`s run by
//!    one `StepQueue`. A step is silent, informational, or interactive; an
//!    interactive step suspends the queue until the player answers.
//!
//! 3. **Data Over Code**: Cards can be declared as JSON documents whose
//!    leaves name registered steps and conditions. Hand-written actions and
//!    declared ones share the same `ChainableAction` trait.
//!
//! ## Modules
//!
//! - `core`: Instance IDs, players, configuration, errors, validation
//! - `cards`: Static card data, instances, filters, the card data registry
//! - `state`: Zones and the immutable `GameSnapshot`
//! - `effects`: Atomic steps, arguments, built-in steps and conditions
//! - `actions`: Chainable actions (spell activations, ignition effects)
//! - `rules`: Additional rules (trigger rules, victory conditions)
//! - `triggers`: Game events, the event timeline, trigger collection
//! - `stack`: The chain of activations
//! - `engine`: The step queue, its observer, and the duel session
//! - `dsl`: JSON card definitions
//! - `commands`: Player commands

pub mod core;
pub mod cards;
pub mod state;
pub mod effects;
pub mod actions;
pub mod rules;
pub mod triggers;
pub mod stack;
pub mod engine;
pub mod dsl;
pub mod commands;

// Re-export commonly used types
pub use crate::core::{
    DuelConfig, EngineError, InstanceId, InvalidReason, Phase, Player, PlayerMap, ValidationResult,
};

pub use crate::cards::{CardData, CardDataRegistry, CardId, CardInstance, Face};

pub use crate::state::{GameResult, GameSnapshot, ZoneName};

pub use crate::effects::{AtomicStep, NotificationLevel, StepContext, StepOutcome};

pub use crate::actions::{ChainableAction, ChainableActionRegistry, EffectCategory, SpellSpeed};

pub use crate::rules::{AdditionalRule, AdditionalRuleRegistry};

pub use crate::triggers::{EventType, GameEvent};

pub use crate::stack::ChainStack;

pub use crate::engine::{DuelSession, QueueStatus, Registries, Resume, StepQueue};

pub use crate::commands::{Command, CommandOutcome};
