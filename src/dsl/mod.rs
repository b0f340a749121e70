//! Declarative card definitions.
//!
//! A card is a JSON document: its static data plus optional declared
//! activation/ignition blocks and continuous trigger rules, whose leaves name
//! registry entries (`{"step": "draw", "args": {"count": 2}}`). Loading runs
//! three stages:
//!
//! 1. `validate`: structural check of the raw document, reporting the
//!    first failing field path
//! 2. `schema`: decoding into typed definitions
//! 3. `compiler`: resolving every named step and condition, then
//!    registering card data, actions and rules
//!
//! ## Example Usage
//!
//! ```
//! use rust_duel::cards::CardId;
//! use rust_duel::dsl;
//! use rust_duel::engine::Registries;
//!
//! let mut registries = Registries::new().unwrap();
//! let loaded = dsl::load_str(
//!     r#"{
//!         "id": 70368879,
//!         "data": {"name": "Upstart Goblin", "type": "spell", "frame-type": "spell", "spell-type": "normal"},
//!         "effect-chainable-actions": {
//!             "activation": {
//!                 "conditions": [{"step": "deck_has_at_least", "args": {"count": 1}}],
//!                 "resolutions": [{"step": "draw", "args": {"count": 1}}]
//!             }
//!         }
//!     }"#,
//!     "upstart.json",
//!     &mut registries,
//! )
//! .unwrap();
//!
//! assert_eq!(loaded, vec![CardId::new(70368879)]);
//! assert!(registries.actions.activation(CardId::new(70368879)).is_some());
//! ```

mod compiler;
mod loader;
pub mod schema;
mod validate;

pub use compiler::compile;
pub use loader::{load_builtin, load_dir, load_file, load_str};
pub use schema::CardDefinition;
pub use validate::validate_definition;
