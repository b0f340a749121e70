//! Zone storage for card instances.
//!
//! Every zone is an ordered `im::Vector<CardInstance>`, so cloning the whole
//! zone set is O(1) and a transform only copies the nodes it touches.
//!
//! Ordering:
//! - Main deck: index 0 is the top of the deck.
//! - Everything else: positional/visual order, appended on arrival.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::{InstanceId, ZoneLimits};

/// Named zone of the duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneName {
    MainDeck,
    ExtraDeck,
    Hand,
    MainMonsterZone,
    SpellTrapZone,
    FieldZone,
    Graveyard,
    Banished,
}

impl ZoneName {
    /// All zones in storage order.
    pub const ALL: [ZoneName; 8] = [
        ZoneName::MainDeck,
        ZoneName::ExtraDeck,
        ZoneName::Hand,
        ZoneName::MainMonsterZone,
        ZoneName::SpellTrapZone,
        ZoneName::FieldZone,
        ZoneName::Graveyard,
        ZoneName::Banished,
    ];

    /// Zones that make up the field.
    pub const FIELD: [ZoneName; 3] = [
        ZoneName::MainMonsterZone,
        ZoneName::SpellTrapZone,
        ZoneName::FieldZone,
    ];

    /// Check if this zone is part of the field.
    #[must_use]
    pub const fn is_field(self) -> bool {
        matches!(
            self,
            ZoneName::MainMonsterZone | ZoneName::SpellTrapZone | ZoneName::FieldZone
        )
    }

    /// Public zones outside the field, where cards are always face-up.
    #[must_use]
    pub const fn is_public_off_field(self) -> bool {
        matches!(self, ZoneName::Graveyard | ZoneName::Banished)
    }

    /// Slot limit for this zone, if it has one.
    #[must_use]
    pub const fn limit(self, limits: &ZoneLimits) -> Option<usize> {
        match self {
            ZoneName::MainMonsterZone => Some(limits.main_monster_zone),
            ZoneName::SpellTrapZone => Some(limits.spell_trap_zone),
            ZoneName::FieldZone => Some(limits.field_zone),
            ZoneName::ExtraDeck => Some(limits.extra_deck),
            _ => None,
        }
    }
}

impl std::fmt::Display for ZoneName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ZoneName::MainDeck => "main deck",
            ZoneName::ExtraDeck => "extra deck",
            ZoneName::Hand => "hand",
            ZoneName::MainMonsterZone => "main monster zone",
            ZoneName::SpellTrapZone => "spell & trap zone",
            ZoneName::FieldZone => "field zone",
            ZoneName::Graveyard => "graveyard",
            ZoneName::Banished => "banished",
        };
        f.write_str(name)
    }
}

/// The eight zones of a duel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    main_deck: Vector<CardInstance>,
    extra_deck: Vector<CardInstance>,
    hand: Vector<CardInstance>,
    main_monster_zone: Vector<CardInstance>,
    spell_trap_zone: Vector<CardInstance>,
    field_zone: Vector<CardInstance>,
    graveyard: Vector<CardInstance>,
    banished: Vector<CardInstance>,
}

impl Zones {
    /// Create an empty zone set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards in a zone, in order.
    #[must_use]
    pub fn get(&self, zone: ZoneName) -> &Vector<CardInstance> {
        match zone {
            ZoneName::MainDeck => &self.main_deck,
            ZoneName::ExtraDeck => &self.extra_deck,
            ZoneName::Hand => &self.hand,
            ZoneName::MainMonsterZone => &self.main_monster_zone,
            ZoneName::SpellTrapZone => &self.spell_trap_zone,
            ZoneName::FieldZone => &self.field_zone,
            ZoneName::Graveyard => &self.graveyard,
            ZoneName::Banished => &self.banished,
        }
    }

    pub(crate) fn get_mut(&mut self, zone: ZoneName) -> &mut Vector<CardInstance> {
        match zone {
            ZoneName::MainDeck => &mut self.main_deck,
            ZoneName::ExtraDeck => &mut self.extra_deck,
            ZoneName::Hand => &mut self.hand,
            ZoneName::MainMonsterZone => &mut self.main_monster_zone,
            ZoneName::SpellTrapZone => &mut self.spell_trap_zone,
            ZoneName::FieldZone => &mut self.field_zone,
            ZoneName::Graveyard => &mut self.graveyard,
            ZoneName::Banished => &mut self.banished,
        }
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn len(&self, zone: ZoneName) -> usize {
        self.get(zone).len()
    }

    /// Total number of cards across all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        ZoneName::ALL.iter().map(|&z| self.len(z)).sum()
    }

    /// Locate a card: its zone and index within that zone.
    #[must_use]
    pub fn locate(&self, id: InstanceId) -> Option<(ZoneName, usize)> {
        ZoneName::ALL.iter().find_map(|&zone| {
            self.get(zone)
                .iter()
                .position(|c| c.instance_id == id)
                .map(|index| (zone, index))
        })
    }

    /// Find a card by instance ID.
    #[must_use]
    pub fn find(&self, id: InstanceId) -> Option<&CardInstance> {
        let (zone, index) = self.locate(id)?;
        self.get(zone).get(index)
    }

    /// Iterate over every card with its storage zone.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneName, &CardInstance)> {
        ZoneName::ALL
            .into_iter()
            .flat_map(move |zone| self.get(zone).iter().map(move |c| (zone, c)))
    }

    /// Check if a zone has room for `extra` more cards.
    #[must_use]
    pub fn has_space(&self, zone: ZoneName, limits: &ZoneLimits, extra: usize) -> bool {
        zone.limit(limits)
            .map_or(true, |limit| self.len(zone) + extra <= limit)
    }
}
