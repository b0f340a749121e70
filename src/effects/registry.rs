//! Condition and step registries.
//!
//! Two parallel string-keyed libraries of reusable building blocks:
//!
//! - `ConditionRegistry`: `name -> (args) -> (snapshot, source) -> ValidationResult`
//! - `StepRegistry`: `name -> (args) -> (context) -> AtomicStep`
//!
//! Factories are two-stage. Binding a name to its arguments happens once,
//! when a card is loaded, so unknown names and malformed arguments surface
//! as `EngineError` before a duel starts. The bound result is then cheap to
//! call every time an action or rule needs fresh steps.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::args::{ArgError, Args};
use super::step::{AtomicStep, StepContext};
use crate::cards::{CardId, CardInstance};
use crate::core::{EngineError, ValidationResult};
use crate::state::GameSnapshot;

/// A condition bound to its arguments.
pub type Condition = Arc<dyn Fn(&GameSnapshot, &CardInstance) -> ValidationResult + Send + Sync>;

/// Builds conditions from arguments.
pub type ConditionFactory = Arc<dyn Fn(&Args) -> Result<Condition, ArgError> + Send + Sync>;

/// A step template bound to its arguments.
pub type StepBuilder = Arc<dyn Fn(&StepContext) -> AtomicStep + Send + Sync>;

/// Builds step templates from arguments.
pub type StepFactory = Arc<dyn Fn(&Args) -> Result<StepBuilder, ArgError> + Send + Sync>;

/// Wrap a closure as a [`Condition`].
pub fn condition<F>(f: F) -> Condition
where
    F: Fn(&GameSnapshot, &CardInstance) -> ValidationResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`StepBuilder`].
pub fn step_builder<F>(f: F) -> StepBuilder
where
    F: Fn(&StepContext) -> AtomicStep + Send + Sync + 'static,
{
    Arc::new(f)
}

/// String-keyed factory table shared by both registries.
struct FactoryTable<F> {
    kind: &'static str,
    entries: FxHashMap<String, F>,
}

impl<F> FactoryTable<F> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: FxHashMap::default(),
        }
    }

    fn insert(&mut self, name: &str, factory: F) -> Result<(), EngineError> {
        if self.entries.contains_key(name) {
            return Err(EngineError::DuplicateKey {
                registry: self.kind,
                key: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), factory);
        Ok(())
    }

    fn lookup(&self, card_id: CardId, name: &str) -> Result<&F, EngineError> {
        self.entries.get(name).ok_or_else(|| EngineError::UnknownKey {
            registry: self.kind,
            card_id,
            key: name.to_string(),
            available: self.names(),
        })
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

fn invalid_args(card_id: CardId, key: &str) -> impl FnOnce(ArgError) -> EngineError + '_ {
    move |source| EngineError::InvalidArgs {
        card_id,
        key: key.to_string(),
        source,
    }
}

/// Registry of named conditions.
pub struct ConditionRegistry {
    table: FactoryTable<ConditionFactory>,
}

impl ConditionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: FactoryTable::new("condition"),
        }
    }

    /// Create a registry holding the built-in conditions.
    pub fn with_builtins() -> Result<Self, EngineError> {
        let mut registry = Self::new();
        super::conditions::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Register a condition factory. Fails on a duplicate name.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), EngineError>
    where
        F: Fn(&Args) -> Result<Condition, ArgError> + Send + Sync + 'static,
    {
        self.table.insert(name, Arc::new(factory))
    }

    /// Bind a condition to its arguments.
    pub fn build(&self, card_id: CardId, name: &str, args: &Args) -> Result<Condition, EngineError> {
        let factory = self.table.lookup(card_id, name)?;
        factory(args).map_err(invalid_args(card_id, name))
    }

    /// Check if a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.entries.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.table.names()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.table.entries.clear();
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of named steps.
pub struct StepRegistry {
    table: FactoryTable<StepFactory>,
}

impl StepRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: FactoryTable::new("step"),
        }
    }

    /// Create a registry holding the built-in steps.
    pub fn with_builtins() -> Result<Self, EngineError> {
        let mut registry = Self::new();
        super::steps::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Register a step factory. Fails on a duplicate name.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), EngineError>
    where
        F: Fn(&Args) -> Result<StepBuilder, ArgError> + Send + Sync + 'static,
    {
        self.table.insert(name, Arc::new(factory))
    }

    /// Bind a step to its arguments.
    pub fn build(&self, card_id: CardId, name: &str, args: &Args) -> Result<StepBuilder, EngineError> {
        let factory = self.table.lookup(card_id, name)?;
        factory(args).map_err(invalid_args(card_id, name))
    }

    /// Check if a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.entries.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.table.names()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.table.entries.clear();
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}
