//! Additional rules: passive effects that apply without being activated.
//!
//! An [`AdditionalRule`] carries a [`RuleCategory`] and an applicability
//! check. Trigger rules also name the events they react to and produce
//! steps when one fires; victory conditions report a win.
//!
//! The engine never interprets card text directly: it asks the
//! [`AdditionalRuleRegistry`] which rules fire for an event and which
//! victory conditions hold.

mod registry;
mod rule;
mod trigger;
mod victory;

pub use registry::AdditionalRuleRegistry;
pub use rule::{AdditionalRule, RuleCategory};
pub use trigger::DeclaredTriggerRule;
pub use victory::{ExodiaVictory, EXODIA_PIECES, EXODIA_THE_FORBIDDEN_ONE};

use crate::core::EngineError;

/// Register every hand-written rule.
pub fn register_builtins(registry: &mut AdditionalRuleRegistry) -> Result<(), EngineError> {
    registry.register(ExodiaVictory)
}
