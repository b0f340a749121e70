//! Presentation hooks for the step queue.
//!
//! The queue never renders anything itself. It reports what it is doing
//! to a [`QueueObserver`], which a UI layer implements.

use std::time::Duration;

use log::{debug, info};

use super::queue::{PendingInteraction, QueueStatus};
use crate::effects::AtomicStep;

/// Receives queue progress.
///
/// Every method has a default, so observers only implement what they show.
pub trait QueueObserver {
    /// A step is about to run.
    fn step_started(&mut self, _step: &AtomicStep) {}

    /// An `info` step ran and its message should be shown.
    fn notify(&mut self, _step: &AtomicStep, _message: Option<&str>) {}

    /// Hold after a notification so it can be perceived.
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    /// The queue suspended and waits for a resume call.
    fn awaiting(&mut self, _pending: &PendingInteraction) {}

    /// The queue finished a run.
    fn finalized(&mut self, _status: &QueueStatus) {}
}

/// Observer that shows nothing and never waits.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl QueueObserver for NullObserver {
    fn pause(&mut self, _delay: Duration) {}
}

/// Observer that routes notifications to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl QueueObserver for LogObserver {
    fn step_started(&mut self, step: &AtomicStep) {
        debug!("step {} ({:?})", step.id, step.notification);
    }

    fn notify(&mut self, step: &AtomicStep, message: Option<&str>) {
        info!("{}", message.unwrap_or(&step.summary));
    }

    fn awaiting(&mut self, pending: &PendingInteraction) {
        info!("waiting: {}", pending.summary());
    }
}
