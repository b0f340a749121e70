//! Authoring and integrity errors.
//!
//! Everything in here is a programmer error: a broken card definition, a
//! duplicate registration, a reference to a step that does not exist. They
//! surface at load time and are returned as `Err` so the caller can refuse to
//! start a duel. Legal-but-refused game situations are
//! [`ValidationResult`](super::ValidationResult) instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::cards::CardId;
use crate::effects::ArgError;
use crate::state::SnapshotError;

/// Fatal engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A key was registered twice in the same registry.
    #[error("duplicate {registry} registration: '{key}'")]
    DuplicateKey { registry: &'static str, key: String },

    /// A lookup used a key that was never registered.
    #[error("card {card_id}: unknown {registry} '{key}' (available: {})", available.join(", "))]
    UnknownKey {
        registry: &'static str,
        card_id: CardId,
        key: String,
        available: Vec<String>,
    },

    /// A registry entry rejected the arguments it was given.
    #[error("card {card_id}: invalid arguments for '{key}': {source}")]
    InvalidArgs {
        card_id: CardId,
        key: String,
        #[source]
        source: ArgError,
    },

    /// A card definition failed structural validation.
    #[error("card {}: schema violation at '{path}': {message}", card_id.map_or_else(|| "?".to_string(), |id| id.to_string()))]
    Schema {
        card_id: Option<CardId>,
        path: String,
        message: String,
    },

    /// A card definition references a step or condition that does not exist.
    #[error("card {card_id}: unresolved {kind} '{name}'")]
    UnresolvedName {
        card_id: CardId,
        kind: &'static str,
        name: String,
    },

    /// A document could not be parsed.
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A definition file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A card ID has no registered card data.
    #[error("no card data registered for {0}")]
    UnknownCard(CardId),

    /// A deck list violates the configured size limits.
    #[error("invalid deck: {0}")]
    InvalidDeck(String),

    /// A snapshot transform broke an integrity invariant.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
