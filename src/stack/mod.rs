//! Chain stack.
//!
//! Activations push [`ChainBlock`]s onto a [`ChainStack`]; the duel session
//! pops them newest first and feeds each block's resolution steps into the
//! step queue.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use rust_duel::actions::{library, ChainableAction, SpellSpeed};
//! use rust_duel::core::InstanceId;
//! use rust_duel::stack::{ChainStack, ChainState};
//!
//! let mut chain = ChainStack::new();
//! let pot: Arc<dyn ChainableAction> = Arc::new(library::pot_of_greed());
//! assert_eq!(chain.push_chain_block(pot, InstanceId(1)), Ok(1));
//!
//! assert_eq!(chain.state(), ChainState::Building);
//! assert!(chain.can_chain(SpellSpeed::Two));
//!
//! let block = chain.pop_chain_block().unwrap();
//! assert_eq!(block.chain_number, 1);
//! assert!(chain.is_empty());
//! ```

mod chain;

pub use chain::{ChainBlock, ChainStack, ChainState};
