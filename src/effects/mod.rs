//! Effect building blocks.
//!
//! Card effects are composed from two kinds of reusable pieces:
//! - **Conditions**: `(snapshot, source card) -> ValidationResult`
//! - **Steps**: [`AtomicStep`]s, the indivisible units the step queue runs
//!
//! Both are looked up by name in a registry ([`ConditionRegistry`],
//! [`StepRegistry`]) and bound to [`Args`] when a card is loaded.
//!
//! ## Example Usage
//!
//! ```
//! use rust_duel::cards::CardId;
//! use rust_duel::effects::{Args, StepContext, StepRegistry};
//! use rust_duel::core::InstanceId;
//!
//! let steps = StepRegistry::with_builtins().unwrap();
//! let draw_two = steps
//!     .build(CardId::new(55144522), "draw", &Args::new().with("count", 2))
//!     .ok()
//!     .unwrap();
//!
//! let ctx = StepContext::new(CardId::new(55144522), InstanceId(1), "activation", "Pot of Greed");
//! assert_eq!(draw_two(&ctx).id, "55144522:activation:draw");
//! ```

mod args;
pub mod conditions;
mod registry;
mod step;
pub mod steps;

pub use args::{ArgError, ArgValue, Args};
pub use registry::{
    condition, step_builder, Condition, ConditionFactory, ConditionRegistry, StepBuilder,
    StepFactory, StepRegistry,
};
pub use step::{
    AtomicStep, CardSelectionConfig, NotificationLevel, SelectionCandidates, StepAction,
    StepContext, StepOutcome,
};
