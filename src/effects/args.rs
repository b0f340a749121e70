//! Step and condition arguments.
//!
//! Registry entries are parameterized by an `Args` map: `draw {count: 2}`,
//! `search_deck {count: 1, filter: {...}}`. Values are a small closed set of
//! types, parsed from JSON by the DSL and built with `Args::with` by
//! hand-written effects.
//!
//! ## ArgValue Types
//!
//! - `Int`: Counts, amounts
//! - `Bool`: Flags (optional selections)
//! - `Text`: Names, zones, players, step keys
//! - `List`: Sequences of values
//! - `Map`: Nested objects (card filters, delayed step arguments)
//!
//! Every accessor returns an `ArgError` on a wrong type, so a factory can
//! reject bad arguments at load time instead of at first use.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardFilter;
use crate::core::Player;
use crate::state::ZoneName;

/// Argument problem reported by a step or condition factory.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArgError {
    /// A required argument is absent.
    #[error("missing argument '{0}'")]
    Missing(String),

    /// An argument has the wrong type.
    #[error("argument '{key}' must be {expected}")]
    WrongType { key: String, expected: &'static str },

    /// An argument has the right type but an unusable value.
    #[error("argument '{key}': {message}")]
    Invalid { key: String, message: String },
}

/// Value of a single argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Int(i64),
    Bool(bool),
    Text(String),
    List(Vec<ArgValue>),
    Map(FxHashMap<String, ArgValue>),
}

impl ArgValue {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON value. Floats and nulls are rejected.
    pub fn from_json(key: &str, value: &serde_json::Value) -> Result<Self, ArgError> {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Ok(ArgValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(ArgValue::Int).ok_or(ArgError::WrongType {
                key: key.to_string(),
                expected: "an integer",
            }),
            Value::String(s) => Ok(ArgValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| ArgValue::from_json(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(ArgValue::List),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| ArgValue::from_json(k, v).map(|v| (k.clone(), v)))
                .collect::<Result<FxHashMap<_, _>, _>>()
                .map(ArgValue::Map),
            Value::Null => Err(ArgError::WrongType {
                key: key.to_string(),
                expected: "a non-null value",
            }),
        }
    }

    /// Convert back to JSON (for typed decoding of nested values).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            ArgValue::Int(v) => Value::from(*v),
            ArgValue::Bool(v) => Value::Bool(*v),
            ArgValue::Text(s) => Value::String(s.clone()),
            ArgValue::List(items) => Value::Array(items.iter().map(ArgValue::to_json).collect()),
            ArgValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Int(i64::from(v))
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Text(v)
    }
}

impl From<Args> for ArgValue {
    fn from(v: Args) -> Self {
        ArgValue::Map(v.0)
    }
}

impl From<&CardFilter> for ArgValue {
    fn from(filter: &CardFilter) -> Self {
        // CardFilter serializes to plain JSON objects and strings.
        let json = serde_json::to_value(filter).unwrap_or(serde_json::Value::Null);
        ArgValue::from_json("filter", &json).unwrap_or(ArgValue::Text("any-card".to_string()))
    }
}

/// Named arguments for a registry entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Args(FxHashMap<String, ArgValue>);

impl Args {
    /// Create an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Convert a JSON object. `null` is treated as no arguments.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ArgError> {
        match value {
            serde_json::Value::Null => Ok(Self::new()),
            serde_json::Value::Object(_) => match ArgValue::from_json("args", value)? {
                ArgValue::Map(map) => Ok(Self(map)),
                _ => Ok(Self::new()),
            },
            _ => Err(ArgError::WrongType {
                key: "args".to_string(),
                expected: "an object",
            }),
        }
    }

    /// Get a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    /// Check if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Required integer.
    pub fn int(&self, key: &str) -> Result<i64, ArgError> {
        let value = self.get(key).ok_or_else(|| ArgError::Missing(key.to_string()))?;
        value.as_int().ok_or_else(|| wrong_type(key, "an integer"))
    }

    /// Optional integer with a default.
    pub fn int_or(&self, key: &str, default: i64) -> Result<i64, ArgError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.as_int().ok_or_else(|| wrong_type(key, "an integer")),
        }
    }

    /// Required non-negative count.
    pub fn count(&self, key: &str) -> Result<usize, ArgError> {
        non_negative(key, self.int(key)?)
    }

    /// Optional non-negative count with a default.
    pub fn count_or(&self, key: &str, default: usize) -> Result<usize, ArgError> {
        match self.get(key) {
            None => Ok(default),
            Some(_) => self.count(key),
        }
    }

    /// Optional bool with a default.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ArgError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| wrong_type(key, "a boolean")),
        }
    }

    /// Required text.
    pub fn text(&self, key: &str) -> Result<&str, ArgError> {
        let value = self.get(key).ok_or_else(|| ArgError::Missing(key.to_string()))?;
        value.as_text().ok_or_else(|| wrong_type(key, "a string"))
    }

    /// Nested argument map, empty when absent.
    pub fn nested(&self, key: &str) -> Result<Args, ArgError> {
        match self.get(key) {
            None => Ok(Args::new()),
            Some(ArgValue::Map(map)) => Ok(Args(map.clone())),
            Some(_) => Err(wrong_type(key, "an object")),
        }
    }

    /// Card filter, `AnyCard` when absent.
    pub fn filter(&self, key: &str) -> Result<CardFilter, ArgError> {
        self.typed(key).map(Option::unwrap_or_default)
    }

    /// Player (`self` / `opponent`), with a default.
    pub fn player_or(&self, key: &str, default: Player) -> Result<Player, ArgError> {
        self.typed(key).map(|p| p.unwrap_or(default))
    }

    /// Required zone name (`hand`, `graveyard`, ...).
    pub fn zone(&self, key: &str) -> Result<ZoneName, ArgError> {
        self.typed(key)?
            .ok_or_else(|| ArgError::Missing(key.to_string()))
    }

    fn typed<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ArgError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.to_json())
                .map(Some)
                .map_err(|e| ArgError::Invalid {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }
}

fn wrong_type(key: &str, expected: &'static str) -> ArgError {
    ArgError::WrongType {
        key: key.to_string(),
        expected,
    }
}

fn non_negative(key: &str, value: i64) -> Result<usize, ArgError> {
    usize::try_from(value).map_err(|_| ArgError::Invalid {
        key: key.to_string(),
        message: format!("must not be negative (got {value})"),
    })
}
