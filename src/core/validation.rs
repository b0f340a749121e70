//! Player-facing validation results.
//!
//! A refused activation or summon is a legal game situation, not an error:
//! the command reports the reason and the duel carries on with the snapshot
//! untouched.

use serde::{Deserialize, Serialize};

use crate::state::ZoneName;

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    /// The duel already has a result.
    GameOver,
    /// The action is restricted to the main phases.
    NotMainPhase,
    /// Card-specific activation conditions are not met.
    ConditionsNotMet,
    /// The destination zone has no free slot.
    ZoneFull(ZoneName),
    /// The card (or effect) was already used this turn.
    OncePerTurn,
    /// A quick-play spell was set this turn.
    SetThisTurn,
    /// The referenced instance is not in the snapshot.
    CardNotFound,
    /// The card is not in a zone it can be used from.
    WrongZone,
    /// The card must be face-up.
    NotFaceUp,
    /// The normal summon quota is used up.
    NoNormalSummonLeft,
    /// The card cannot be normal summoned.
    NotSummonable,
    /// The card has no matching effect.
    NoEffect,
    /// A chain link may not be slower than the link it responds to.
    ChainSpeedTooLow,
    /// Another effect sequence is still being processed.
    QueueBusy,
    /// Card-specific reason with its own message.
    Custom(String),
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::GameOver => f.write_str("the duel is over"),
            InvalidReason::NotMainPhase => f.write_str("not main phase"),
            InvalidReason::ConditionsNotMet => f.write_str("activation conditions not met"),
            InvalidReason::ZoneFull(zone) => write!(f, "{zone} is full"),
            InvalidReason::OncePerTurn => f.write_str("already activated this turn"),
            InvalidReason::SetThisTurn => {
                f.write_str("quick-play spell cannot be activated the turn it was set")
            }
            InvalidReason::CardNotFound => f.write_str("card not found"),
            InvalidReason::WrongZone => f.write_str("card is not in a usable zone"),
            InvalidReason::NotFaceUp => f.write_str("card is not face-up"),
            InvalidReason::NoNormalSummonLeft => f.write_str("no normal summon left this turn"),
            InvalidReason::NotSummonable => f.write_str("card cannot be normal summoned"),
            InvalidReason::NoEffect => f.write_str("card has no effect to activate"),
            InvalidReason::ChainSpeedTooLow => {
                f.write_str("spell speed too low to chain")
            }
            InvalidReason::QueueBusy => f.write_str("another effect is resolving"),
            InvalidReason::Custom(message) => f.write_str(message),
        }
    }
}

/// Outcome of a validation check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// The action may proceed.
    Valid,
    /// The action is refused.
    Invalid(InvalidReason),
}

impl ValidationResult {
    /// Shorthand for a refusal.
    #[must_use]
    pub fn invalid(reason: InvalidReason) -> Self {
        ValidationResult::Invalid(reason)
    }

    /// `Valid` when `ok`, otherwise a refusal with `reason`.
    #[must_use]
    pub fn check(ok: bool, reason: InvalidReason) -> Self {
        if ok {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(reason)
        }
    }

    /// Check if the action may proceed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The refusal reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }

    /// Chain another check, short-circuiting on the first refusal.
    #[must_use]
    pub fn and_then(self, next: impl FnOnce() -> ValidationResult) -> Self {
        match self {
            ValidationResult::Valid => next(),
            invalid => invalid,
        }
    }
}
