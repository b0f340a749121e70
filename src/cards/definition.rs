//! Card definitions - static card data.
//!
//! `CardData` holds the immutable properties of a card: "Pot of Greed" is a
//! normal spell, "Royal Magical Library" is a level 4 LIGHT Spellcaster with
//! 0 ATK. These are shared by every copy of the card in every duel.
//!
//! Instance-specific data (zone, face, counters) is stored separately in
//! `CardInstance`.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card (its passcode).
///
/// This identifies the card itself (e.g., "Pot of Greed"), not a specific
/// copy in a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    Monster,
    Spell,
    Trap,
}

/// Card frame (what the card border looks like).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameType {
    Normal,
    Effect,
    Ritual,
    Fusion,
    Synchro,
    Xyz,
    Link,
    Spell,
    Trap,
}

impl FrameType {
    /// Frames whose monsters live in the extra deck.
    #[must_use]
    pub const fn is_extra_deck(self) -> bool {
        matches!(
            self,
            FrameType::Fusion | FrameType::Synchro | FrameType::Xyz | FrameType::Link
        )
    }
}

/// Spell subtype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpellType {
    Normal,
    QuickPlay,
    Continuous,
    Field,
    Equip,
    Ritual,
}

/// Trap subtype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrapType {
    Normal,
    Continuous,
    Counter,
}

/// Monster statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStats {
    pub atk: u32,
    pub def: u32,
    pub level: u32,
    pub attribute: Option<String>,
    pub race: Option<String>,
}

/// Static card data.
///
/// ## Example
///
/// ```
/// use rust_duel::cards::{CardData, CardId, SpellType};
///
/// let pot = CardData::spell(CardId::new(55144522), "Pot of Greed", SpellType::Normal);
///
/// assert!(pot.is_spell());
/// assert_eq!(pot.spell_type, Some(SpellType::Normal));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    /// Card passcode.
    pub id: CardId,

    /// Card name.
    pub name: String,

    /// Monster, spell or trap.
    pub card_type: CardType,

    /// Card frame.
    pub frame_type: FrameType,

    /// Spell subtype (spells only).
    pub spell_type: Option<SpellType>,

    /// Trap subtype (traps only).
    pub trap_type: Option<TrapType>,

    /// Monster stats (monsters only).
    pub monster: Option<MonsterStats>,
}

impl CardData {
    /// Create spell card data.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, spell_type: SpellType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type: CardType::Spell,
            frame_type: FrameType::Spell,
            spell_type: Some(spell_type),
            trap_type: None,
            monster: None,
        }
    }

    /// Create trap card data.
    #[must_use]
    pub fn trap(id: CardId, name: impl Into<String>, trap_type: TrapType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type: CardType::Trap,
            frame_type: FrameType::Trap,
            spell_type: None,
            trap_type: Some(trap_type),
            monster: None,
        }
    }

    /// Create monster card data.
    #[must_use]
    pub fn monster(
        id: CardId,
        name: impl Into<String>,
        frame_type: FrameType,
        stats: MonsterStats,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            card_type: CardType::Monster,
            frame_type,
            spell_type: None,
            trap_type: None,
            monster: Some(stats),
        }
    }

    /// Check if this is a monster.
    #[must_use]
    pub fn is_monster(&self) -> bool {
        self.card_type == CardType::Monster
    }

    /// Check if this is a spell.
    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.card_type == CardType::Spell
    }

    /// Check if this is a trap.
    #[must_use]
    pub fn is_trap(&self) -> bool {
        self.card_type == CardType::Trap
    }

    /// Monster level, 0 for non-monsters.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.monster.as_ref().map_or(0, |m| m.level)
    }

    /// Monster race, if any.
    #[must_use]
    pub fn race(&self) -> Option<&str> {
        self.monster.as_ref().and_then(|m| m.race.as_deref())
    }

    /// Check if the card is kept in the extra deck.
    #[must_use]
    pub fn is_extra_deck(&self) -> bool {
        self.frame_type.is_extra_deck()
    }
}
