//! The step queue controller and the duel session that drives it.
//!
//! ## Key Types
//!
//! - `StepQueue`: runs step lists, suspending on interactive steps
//! - `QueueStatus`: how a run ended, or what it is waiting for
//! - `Resume`: confirmation, selection, or cancellation of a suspended step
//! - `QueueObserver`: presentation hooks (`LogObserver`, `NullObserver`)
//! - `DuelSession`: snapshot + queue + chain stack, shared `Registries`

mod observer;
mod queue;
mod session;

pub use observer::{LogObserver, NullObserver, QueueObserver};
pub use queue::{PendingInteraction, QueueError, QueueState, QueueStatus, Resume, StepQueue};
pub use session::{DuelSession, Registries, SessionError};
