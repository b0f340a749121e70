//! Core duel types: instance IDs, players, phases, RNG, configuration, errors.
//!
//! These are the building blocks every other module depends on. None of them
//! know about specific cards.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod validation;

pub use entity::InstanceId;
pub use player::{Player, PlayerMap};
pub use rng::DuelRng;
pub use config::{DuelConfig, Phase, ZoneLimits};
pub use error::EngineError;
pub use validation::{InvalidReason, ValidationResult};
