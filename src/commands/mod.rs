//! Player commands: the inbound boundary of the engine.
//!
//! A command checks its own structural preconditions, performs any zone
//! move, and hands the engine a step list (directly or through a chain
//! activation). A refused command leaves the duel untouched and reports an
//! [`InvalidReason`].
//!
//! ## Commands
//!
//! - `ActivateSpellCommand`: activate a spell from hand or a set spell
//! - `ActivateIgnitionCommand`: activate a face-up monster's ignition effect
//! - `NormalSummonCommand`: summon a level 4 or lower monster from hand
//! - `SetSpellCommand`: set a spell or trap face-down
//! - `DrawCommand`: draw cards outside of any effect
//! - `AdvancePhaseCommand`: move to the next phase (or turn)

mod activate;
mod placement;
mod turn;

pub use activate::{ActivateIgnitionCommand, ActivateSpellCommand};
pub use placement::{NormalSummonCommand, SetSpellCommand};
pub use turn::{AdvancePhaseCommand, DrawCommand};

use log::debug;

use crate::cards::CardInstance;
use crate::core::{InstanceId, InvalidReason, ValidationResult};
use crate::engine::{DuelSession, QueueStatus, SessionError};

/// What happened to a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Refused; nothing changed.
    Rejected(InvalidReason),
    /// Carried out; the queue ended (or suspended) with this status.
    Accepted(QueueStatus),
}

impl CommandOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, CommandOutcome::Accepted(_))
    }

    /// The refusal reason, if refused.
    #[must_use]
    pub fn rejection(&self) -> Option<&InvalidReason> {
        match self {
            CommandOutcome::Rejected(reason) => Some(reason),
            CommandOutcome::Accepted(_) => None,
        }
    }

    /// The queue status, if accepted.
    #[must_use]
    pub fn status(&self) -> Option<&QueueStatus> {
        match self {
            CommandOutcome::Accepted(status) => Some(status),
            CommandOutcome::Rejected(_) => None,
        }
    }
}

/// A player command.
///
/// ## Implementation Notes
///
/// - `validate` must not change anything
/// - `apply` is only called after `validate` passed
pub trait Command {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Check whether the command may run now.
    fn validate(&self, session: &DuelSession) -> ValidationResult;

    /// Carry out the command.
    fn apply(&self, session: &mut DuelSession) -> Result<QueueStatus, SessionError>;

    // === Convenience Methods ===

    /// Validate, apply, then check victory conditions.
    fn execute(&self, session: &mut DuelSession) -> Result<CommandOutcome, SessionError> {
        if let ValidationResult::Invalid(reason) = self.validate(session) {
            debug!("{} rejected: {}", self.name(), reason);
            return Ok(CommandOutcome::Rejected(reason));
        }

        let mut status = match self.apply(session) {
            Ok(status) => status,
            Err(SessionError::Rejected(reason)) => return Ok(CommandOutcome::Rejected(reason)),
            Err(e) => return Err(e),
        };

        if !status.is_suspended() && session.check_victory() {
            status = QueueStatus::GameOver(session.snapshot().result.clone());
        }
        Ok(CommandOutcome::Accepted(status))
    }
}

/// Checks every command shares: the duel is on and nothing is resolving.
fn ready(session: &DuelSession) -> ValidationResult {
    if session.snapshot().is_game_over() {
        ValidationResult::invalid(InvalidReason::GameOver)
    } else {
        ValidationResult::check(!session.is_busy(), InvalidReason::QueueBusy)
    }
}

/// Look up a card, refusing if it is gone.
fn find_card(session: &DuelSession, id: InstanceId) -> Result<&CardInstance, InvalidReason> {
    session
        .snapshot()
        .find_card(id)
        .ok_or(InvalidReason::CardNotFound)
}
