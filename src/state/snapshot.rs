//! Game snapshot: one immutable state of the duel.
//!
//! ## Transform discipline
//!
//! Every method that changes the duel takes `&self` and returns a new
//! `GameSnapshot`. Zones, the activated-card set and the delayed-effect
//! queue are `im` persistent structures, so a transform shares every node it
//! did not touch with its input and cloning a snapshot is O(1).
//!
//! ## Invariants
//!
//! - Each `CardInstance.zone` matches the zone it is stored in
//! - Instance IDs are unique across all zones
//! - Zone sizes respect `ZoneLimits`
//!
//! `validate` checks all three; transforms never produce a snapshot that
//! fails them.

use std::sync::Arc;

use im::{HashSet as ImHashSet, Vector};
use log::{debug, info};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::zones::{ZoneName, Zones};
use crate::cards::{CardData, CardDataSource, CardId, CardInstance, Face};
use crate::core::{DuelConfig, DuelRng, EngineError, InstanceId, Phase, Player, PlayerMap, ZoneLimits};
use crate::effects::Args;

/// Integrity violation in a snapshot transform.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{0} not found")]
    CardNotFound(InstanceId),

    #[error("{0} is full")]
    ZoneFull(ZoneName),

    #[error("{id} declares zone {declared} but is stored in {stored}")]
    ZoneMismatch {
        id: InstanceId,
        declared: ZoneName,
        stored: ZoneName,
    },

    #[error("duplicate {0}")]
    DuplicateInstance(InstanceId),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] bincode::Error),
}

/// Outcome of the duel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[default]
    Ongoing,
    /// The player won, with the reason.
    Win(String),
    /// The player lost, with the reason.
    Lose(String),
    Draw,
}

impl GameResult {
    /// Check if the duel has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }
}

/// An effect that runs when the End phase begins.
///
/// Only the step key and its arguments are stored; the step is rebuilt from
/// the step registry when it fires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelayedEffect {
    /// Sequential ID within the duel.
    pub id: u32,
    /// Card that queued the effect.
    pub card_id: CardId,
    /// Instance that queued the effect.
    pub source: InstanceId,
    /// Step registry key.
    pub step: String,
    /// Step arguments.
    pub args: Args,
}

/// Immutable duel state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Card storage.
    pub zones: Zones,

    /// Life points per side.
    pub life_points: PlayerMap<i32>,

    /// Current phase.
    pub phase: Phase,

    /// Turn number (starts at 1).
    pub turn: u32,

    /// Duel outcome.
    pub result: GameResult,

    /// Normal summons allowed this turn.
    pub normal_summon_limit: u32,

    /// Normal summons used this turn.
    pub normal_summons_used: u32,

    /// Card IDs activated this turn (card-level once-per-turn limits).
    pub activated_card_ids: ImHashSet<CardId>,

    /// Effects waiting for the End phase.
    pub pending_end_phase_effects: Vector<DelayedEffect>,

    /// Slot limits.
    pub zone_limits: ZoneLimits,

    next_instance_id: InstanceId,
    next_delayed_id: u32,
}

impl GameSnapshot {
    /// Create an empty snapshot: no cards, Main Phase 1 of turn 1.
    #[must_use]
    pub fn empty(config: &DuelConfig) -> Self {
        Self {
            zones: Zones::new(),
            life_points: PlayerMap::with_value(config.initial_life_points),
            phase: Phase::Main1,
            turn: 1,
            result: GameResult::Ongoing,
            normal_summon_limit: config.normal_summon_limit,
            normal_summons_used: 0,
            activated_card_ids: ImHashSet::new(),
            pending_end_phase_effects: Vector::new(),
            zone_limits: config.zone_limits,
            next_instance_id: InstanceId::first(),
            next_delayed_id: 1,
        }
    }

    /// Create the starting snapshot of a duel from two deck lists.
    ///
    /// Validates deck sizes, builds one instance per card with sequential
    /// IDs, shuffles the main deck when configured and draws the starting
    /// hand. The duel begins in Main Phase 1 of turn 1.
    pub fn new(
        main_deck: &[CardId],
        extra_deck: &[CardId],
        cards: &dyn CardDataSource,
        config: &DuelConfig,
    ) -> Result<Self, EngineError> {
        if main_deck.len() < config.min_deck_size || main_deck.len() > config.max_deck_size {
            return Err(EngineError::InvalidDeck(format!(
                "main deck has {} cards, expected {}..={}",
                main_deck.len(),
                config.min_deck_size,
                config.max_deck_size
            )));
        }
        if extra_deck.len() > config.zone_limits.extra_deck {
            return Err(EngineError::InvalidDeck(format!(
                "extra deck has {} cards, at most {} allowed",
                extra_deck.len(),
                config.zone_limits.extra_deck
            )));
        }

        let resolve = |id: CardId| cards.card_data(id).ok_or(EngineError::UnknownCard(id));

        let mut main_data = main_deck
            .iter()
            .map(|&id| resolve(id))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(misplaced) = main_data.iter().find(|d| d.is_extra_deck()) {
            return Err(EngineError::InvalidDeck(format!(
                "{} ({}) belongs in the extra deck",
                misplaced.name, misplaced.id
            )));
        }
        let extra_data = extra_deck
            .iter()
            .map(|&id| resolve(id))
            .collect::<Result<Vec<_>, _>>()?;

        if config.shuffle_deck {
            DuelRng::new(config.seed)
                .for_context("main-deck")
                .shuffle(&mut main_data);
        }

        let mut snapshot = Self::empty(config);
        for data in main_data {
            snapshot = snapshot.place_new_card(data, ZoneName::MainDeck)?.0;
        }
        for data in extra_data {
            snapshot = snapshot.place_new_card(data, ZoneName::ExtraDeck)?.0;
        }

        let hand_size = config.starting_hand_size.min(snapshot.zones.len(ZoneName::MainDeck));
        let (snapshot, _) = snapshot.draw(hand_size);

        info!(
            "duel start: {} main deck cards, {} extra deck cards, {} in hand",
            main_deck.len(),
            extra_deck.len(),
            hand_size
        );

        Ok(snapshot)
    }

    // === Queries ===

    /// Find a card by instance ID.
    #[must_use]
    pub fn find_card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.zones.find(id)
    }

    /// Cards in a zone.
    #[must_use]
    pub fn cards_in(&self, zone: ZoneName) -> &Vector<CardInstance> {
        self.zones.get(zone)
    }

    /// Number of cards in the main deck.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.zones.len(ZoneName::MainDeck)
    }

    /// Number of cards in hand.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.zones.len(ZoneName::Hand)
    }

    /// Total number of cards across all zones.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.zones.total()
    }

    /// Check if the duel has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.result.is_over()
    }

    /// Check if a zone has room for `extra` more cards.
    #[must_use]
    pub fn has_space(&self, zone: ZoneName, extra: usize) -> bool {
        self.zones.has_space(zone, &self.zone_limits, extra)
    }

    /// Check if a normal summon is still available this turn.
    #[must_use]
    pub fn can_normal_summon(&self) -> bool {
        self.normal_summons_used < self.normal_summon_limit
    }

    /// Check if a card ID was activated this turn.
    #[must_use]
    pub fn was_card_activated(&self, card_id: CardId) -> bool {
        self.activated_card_ids.contains(&card_id)
    }

    // === Card transforms ===

    /// Add a new card instance to a zone, assigning the next instance ID.
    pub fn place_new_card(
        &self,
        data: Arc<CardData>,
        zone: ZoneName,
    ) -> Result<(Self, InstanceId), SnapshotError> {
        if !self.has_space(zone, 1) {
            return Err(SnapshotError::ZoneFull(zone));
        }

        let id = self.next_instance_id;
        let mut card = CardInstance::new(id, data, zone);
        if zone.is_public_off_field() {
            card = card.with_face(Face::FaceUp);
        }

        let mut next = self.clone();
        next.zones.get_mut(zone).push_back(card);
        next.next_instance_id = id.next();
        Ok((next, id))
    }

    /// Move a card to another zone.
    ///
    /// Leaving the field resets the card's on-field state. The card is
    /// appended to the destination zone.
    pub fn move_card(&self, id: InstanceId, to: ZoneName) -> Result<Self, SnapshotError> {
        self.move_card_with(id, to, |card| card)
    }

    /// Move a card and transform it on the way (e.g. flip face-up).
    pub fn move_card_with(
        &self,
        id: InstanceId,
        to: ZoneName,
        transform: impl FnOnce(CardInstance) -> CardInstance,
    ) -> Result<Self, SnapshotError> {
        let (from, index) = self
            .zones
            .locate(id)
            .ok_or(SnapshotError::CardNotFound(id))?;

        if from == to {
            return self.update_card(id, transform);
        }
        if !self.has_space(to, 1) {
            return Err(SnapshotError::ZoneFull(to));
        }

        let mut next = self.clone();
        let card = next.zones.get_mut(from).remove(index);

        let moved = if (from.is_field() && !to.is_field()) || to.is_public_off_field() {
            card.reset_for(to)
        } else {
            card.in_zone(to)
        };
        let moved = transform(moved);
        if moved.zone != to || moved.instance_id != id {
            return Err(SnapshotError::ZoneMismatch {
                id,
                declared: moved.zone,
                stored: to,
            });
        }

        debug!("move {} ({}): {} -> {}", moved.name(), id, from, to);
        next.zones.get_mut(to).push_back(moved);
        Ok(next)
    }

    /// Replace a card in place.
    ///
    /// The transform may not change the card's zone or identity.
    pub fn update_card(
        &self,
        id: InstanceId,
        transform: impl FnOnce(CardInstance) -> CardInstance,
    ) -> Result<Self, SnapshotError> {
        let (zone, index) = self
            .zones
            .locate(id)
            .ok_or(SnapshotError::CardNotFound(id))?;

        let mut next = self.clone();
        let original = next.zones.get(zone)[index].clone();
        let updated = transform(original);
        if updated.zone != zone || updated.instance_id != id {
            return Err(SnapshotError::ZoneMismatch {
                id,
                declared: updated.zone,
                stored: zone,
            });
        }

        next.zones.get_mut(zone).set(index, updated);
        Ok(next)
    }

    /// Draw up to `count` cards from the top of the main deck.
    ///
    /// Returns the drawn instance IDs. Running out of cards before `count`
    /// draws loses the duel.
    #[must_use]
    pub fn draw(&self, count: usize) -> (Self, Vec<InstanceId>) {
        let mut next = self.clone();
        let mut drawn = Vec::with_capacity(count);

        for _ in 0..count {
            match next.zones.get_mut(ZoneName::MainDeck).pop_front() {
                Some(card) => {
                    drawn.push(card.instance_id);
                    next.zones.get_mut(ZoneName::Hand).push_back(card.in_zone(ZoneName::Hand));
                }
                None => {
                    next = next.with_result(GameResult::Lose("deck out".to_string()));
                    break;
                }
            }
        }

        (next, drawn)
    }

    // === Duel state transforms ===

    /// Add `delta` to a side's life points (negative for damage or costs).
    ///
    /// Life points floor at 0. Reaching 0 ends the duel.
    #[must_use]
    pub fn change_life_points(&self, player: Player, delta: i32) -> Self {
        let mut next = self.clone();
        let current = next.life_points[player];
        let updated = current.saturating_add(delta).max(0);
        next.life_points[player] = updated;

        if updated == 0 && !next.is_game_over() {
            let result = match player {
                Player::Opponent => GameResult::Win("opponent's life points reached 0".to_string()),
                Player::Player => GameResult::Lose("life points reached 0".to_string()),
            };
            next = next.with_result(result);
        }
        next
    }

    /// Copy with a new phase.
    #[must_use]
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    /// Copy with a new result.
    #[must_use]
    pub fn with_result(&self, result: GameResult) -> Self {
        if result != self.result {
            info!("game result: {:?}", result);
        }
        Self {
            result,
            ..self.clone()
        }
    }

    /// Record a card ID as activated this turn.
    #[must_use]
    pub fn mark_card_activated(&self, card_id: CardId) -> Self {
        let mut next = self.clone();
        next.activated_card_ids.insert(card_id);
        next
    }

    /// Record an effect of a specific instance as activated this turn.
    pub fn record_effect_activation(
        &self,
        id: InstanceId,
        effect_id: &str,
    ) -> Result<Self, SnapshotError> {
        self.update_card(id, |card| card.with_activated_effect(effect_id))
    }

    /// Use up one normal summon.
    #[must_use]
    pub fn consume_normal_summon(&self) -> Self {
        Self {
            normal_summons_used: self.normal_summons_used + 1,
            ..self.clone()
        }
    }

    /// Queue an effect for the End phase.
    #[must_use]
    pub fn queue_delayed_effect(
        &self,
        card_id: CardId,
        source: InstanceId,
        step: impl Into<String>,
        args: Args,
    ) -> Self {
        let mut next = self.clone();
        next.pending_end_phase_effects.push_back(DelayedEffect {
            id: self.next_delayed_id,
            card_id,
            source,
            step: step.into(),
            args,
        });
        next.next_delayed_id += 1;
        next
    }

    /// Remove and return every queued delayed effect, oldest first.
    #[must_use]
    pub fn take_delayed_effects(&self) -> (Self, Vec<DelayedEffect>) {
        let effects = self.pending_end_phase_effects.iter().cloned().collect();
        let next = Self {
            pending_end_phase_effects: Vector::new(),
            ..self.clone()
        };
        (next, effects)
    }

    /// Begin the next turn in its Draw phase.
    ///
    /// Clears per-turn limits and every card's per-turn flags.
    #[must_use]
    pub fn start_next_turn(&self) -> Self {
        let mut next = self.clone();
        for zone in ZoneName::ALL {
            let reset: Vector<CardInstance> =
                next.zones.get(zone).iter().map(CardInstance::with_turn_reset).collect();
            *next.zones.get_mut(zone) = reset;
        }
        next.turn += 1;
        next.phase = Phase::Draw;
        next.normal_summons_used = 0;
        next.activated_card_ids = ImHashSet::new();
        next
    }

    // === Integrity ===

    /// Check the snapshot invariants.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = FxHashSet::default();

        for zone in ZoneName::ALL {
            let cards = self.zones.get(zone);
            if let Some(limit) = zone.limit(&self.zone_limits) {
                if cards.len() > limit {
                    return Err(SnapshotError::ZoneFull(zone));
                }
            }
            for card in cards {
                if card.zone != zone {
                    return Err(SnapshotError::ZoneMismatch {
                        id: card.instance_id,
                        declared: card.zone,
                        stored: zone,
                    });
                }
                if !seen.insert(card.instance_id) {
                    return Err(SnapshotError::DuplicateInstance(card.instance_id));
                }
            }
        }
        Ok(())
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
