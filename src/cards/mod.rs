//! Card system: definitions, instances, filters, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Card passcode
//! - `CardData`: Static card data (type, frame, subtype, monster stats)
//! - `CardInstance`: Runtime card state (zone, face, counters)
//! - `CardFilter`: Declarative predicate over instances
//! - `CardDataRegistry`: Card data lookup, read through `CardDataSource`

pub mod definition;
pub mod filter;
pub mod instance;
pub mod registry;

pub use definition::{CardData, CardId, CardType, FrameType, MonsterStats, SpellType, TrapType};
pub use filter::CardFilter;
pub use instance::{BattlePosition, CardInstance, Face};
pub use registry::{CardDataRegistry, CardDataSource};
