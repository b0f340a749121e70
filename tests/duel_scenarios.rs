//! End-to-end duel scenarios.
//!
//! These tests drive a `DuelSession` through player commands only, using
//! the built-in card pool, and check the resulting snapshots.

use std::sync::Arc;

use rust_duel::actions::library::POT_OF_GREED;
use rust_duel::cards::CardId;
use rust_duel::commands::{
    ActivateIgnitionCommand, ActivateSpellCommand, AdvancePhaseCommand, Command, CommandOutcome,
    NormalSummonCommand, SetSpellCommand,
};
use rust_duel::core::{DuelConfig, InstanceId, InvalidReason, Phase, Player};
use rust_duel::engine::{DuelSession, NullObserver, PendingInteraction, QueueStatus, Registries, Resume};
use rust_duel::rules::EXODIA_PIECES;
use rust_duel::state::{GameResult, GameSnapshot, ZoneName};

const CELTIC_GUARDIAN: CardId = CardId::new(91152256);
const BATTLE_OX: CardId = CardId::new(5053103);
const SUMMONED_SKULL: CardId = CardId::new(70781052);
const ROYAL_MAGICAL_LIBRARY: CardId = CardId::new(70791313);
const UPSTART_GOBLIN: CardId = CardId::new(70368879);
const HAND_DESTRUCTION: CardId = CardId::new(74519184);
const REINFORCEMENT_OF_THE_ARMY: CardId = CardId::new(32807846);
const TOON_WORLD: CardId = CardId::new(15259703);
const INTO_THE_VOID: CardId = CardId::new(93946239);

// =============================================================================
// Helpers
// =============================================================================

fn config() -> DuelConfig {
    DuelConfig::default().with_info_delay_ms(0)
}

/// Build a session with `deck` (top first) and `hand`, returning the hand's
/// instance IDs in order.
fn table(config: DuelConfig, hand: &[CardId], deck: &[CardId]) -> (DuelSession, Vec<InstanceId>) {
    let registries = Arc::new(Registries::with_builtin_cards().unwrap());
    let mut snapshot = GameSnapshot::empty(&config);
    for &card in deck {
        let data = Arc::clone(registries.cards.get(card).unwrap());
        snapshot = snapshot.place_new_card(data, ZoneName::MainDeck).unwrap().0;
    }
    let mut ids = Vec::new();
    for &card in hand {
        let data = Arc::clone(registries.cards.get(card).unwrap());
        let (next, id) = snapshot.place_new_card(data, ZoneName::Hand).unwrap();
        snapshot = next;
        ids.push(id);
    }
    let session = DuelSession::from_snapshot(registries, config, snapshot).with_observer(Box::new(NullObserver));
    (session, ids)
}

fn completed() -> CommandOutcome {
    CommandOutcome::Accepted(QueueStatus::Completed)
}

fn zone_of(session: &DuelSession, id: InstanceId) -> ZoneName {
    session.snapshot().find_card(id).unwrap().zone
}

// =============================================================================
// Normal Spells
// =============================================================================

/// A draw spell needs enough cards in the deck, and resolves into the graveyard.
#[test]
fn test_pot_of_greed_deck_size_gate() {
    let (mut session, hand) = table(config(), &[POT_OF_GREED], &[CELTIC_GUARDIAN]);
    let before = session.snapshot().clone();

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();

    assert_eq!(outcome.rejection(), Some(&InvalidReason::ConditionsNotMet));
    assert_eq!(session.snapshot(), &before);

    let (mut session, hand) = table(config(), &[POT_OF_GREED], &[CELTIC_GUARDIAN, CELTIC_GUARDIAN]);

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();

    assert_eq!(outcome, completed());
    assert_eq!(session.snapshot().hand_size(), 2);
    assert_eq!(session.snapshot().deck_size(), 0);
    assert_eq!(zone_of(&session, hand[0]), ZoneName::Graveyard);
    assert!(session.chain().is_empty());
    assert!(!session.is_busy());
}

/// Upstart Goblin draws one and gives the opponent 1000 life points.
#[test]
fn test_upstart_goblin_feeds_opponent() {
    let (mut session, hand) = table(config(), &[UPSTART_GOBLIN], &[CELTIC_GUARDIAN]);

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();

    assert_eq!(outcome, completed());
    assert_eq!(session.snapshot().life_points[Player::Opponent], 9000);
    assert_eq!(session.snapshot().life_points[Player::Player], 8000);
    assert_eq!(session.snapshot().hand_size(), 1);
}

/// Searching suspends on a selection limited to matching deck cards.
#[test]
fn test_reinforcement_searches_warrior() {
    let (mut session, hand) = table(
        config(),
        &[REINFORCEMENT_OF_THE_ARMY],
        &[SUMMONED_SKULL, BATTLE_OX, CELTIC_GUARDIAN],
    );

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();

    let Some(QueueStatus::Suspended(PendingInteraction::Selection { candidates, .. })) = outcome.status() else {
        panic!("expected a selection, got {outcome:?}");
    };
    assert_eq!(candidates.len(), 1);
    let guardian = candidates[0];
    assert_eq!(session.snapshot().find_card(guardian).unwrap().card_id, CELTIC_GUARDIAN);

    let status = session.resume(Resume::Select(vec![guardian])).unwrap();

    assert_eq!(status, QueueStatus::Completed);
    assert_eq!(zone_of(&session, guardian), ZoneName::Hand);
    assert_eq!(session.snapshot().deck_size(), 2);
    assert_eq!(zone_of(&session, hand[0]), ZoneName::Graveyard);
}

/// A search with no legal target cannot be activated.
#[test]
fn test_reinforcement_without_target() {
    let (mut session, hand) = table(config(), &[REINFORCEMENT_OF_THE_ARMY], &[SUMMONED_SKULL, BATTLE_OX]);

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();

    assert_eq!(outcome.rejection(), Some(&InvalidReason::ConditionsNotMet));
}

// =============================================================================
// Continuous and Quick-Play Spells
// =============================================================================

/// A continuous spell pays its cost on activation and stays on the field.
#[test]
fn test_toon_world_pays_and_stays() {
    let (mut session, hand) = table(config(), &[TOON_WORLD], &[]);

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();

    assert_eq!(outcome, completed());
    assert_eq!(session.snapshot().life_points[Player::Player], 7000);
    assert_eq!(zone_of(&session, hand[0]), ZoneName::SpellTrapZone);

    let (mut session, hand) = table(config().with_initial_life_points(500), &[TOON_WORLD], &[]);
    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();
    assert_eq!(outcome.rejection(), Some(&InvalidReason::ConditionsNotMet));
}

/// A quick-play spell set this turn waits until the next turn.
#[test]
fn test_hand_destruction_after_set() {
    let deck = [CELTIC_GUARDIAN; 5];
    let (mut session, hand) = table(config(), &[HAND_DESTRUCTION, BATTLE_OX, BATTLE_OX], &deck);

    assert_eq!(SetSpellCommand::new(hand[0]).execute(&mut session).unwrap(), completed());
    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();
    assert_eq!(outcome.rejection(), Some(&InvalidReason::SetThisTurn));
    assert_ne!(outcome.rejection(), Some(&InvalidReason::NotMainPhase));

    // Main 1 -> End -> next turn
    AdvancePhaseCommand.execute(&mut session).unwrap();
    AdvancePhaseCommand.execute(&mut session).unwrap();
    assert_eq!(session.snapshot().turn, 2);
    assert_eq!(session.snapshot().phase, Phase::Draw);
    assert_eq!(session.snapshot().hand_size(), 3);

    let outcome = ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap();
    let Some(QueueStatus::Suspended(pending)) = outcome.status() else {
        panic!("expected a discard selection, got {outcome:?}");
    };
    let discard = vec![hand[1], hand[2]];
    assert!(discard.iter().all(|id| pending.candidates().contains(id)));

    let status = session.resume(Resume::Select(discard)).unwrap();

    assert_eq!(status, QueueStatus::Completed);
    assert_eq!(zone_of(&session, hand[1]), ZoneName::Graveyard);
    assert_eq!(zone_of(&session, hand[2]), ZoneName::Graveyard);
    assert_eq!(zone_of(&session, hand[0]), ZoneName::Graveyard);
    assert_eq!(session.snapshot().hand_size(), 3);
    assert_eq!(session.snapshot().deck_size(), 2);
}

// =============================================================================
// Monsters
// =============================================================================

/// Royal Magical Library collects spell counters and spends them to draw.
#[test]
fn test_royal_magical_library_counters() {
    let deck = [CELTIC_GUARDIAN; 5];
    let hand_cards = [
        ROYAL_MAGICAL_LIBRARY,
        UPSTART_GOBLIN,
        UPSTART_GOBLIN,
        UPSTART_GOBLIN,
        UPSTART_GOBLIN,
    ];
    let (mut session, hand) = table(config(), &hand_cards, &deck);
    let library = hand[0];

    assert_eq!(NormalSummonCommand::new(library).execute(&mut session).unwrap(), completed());

    let outcome = ActivateIgnitionCommand::new(library).execute(&mut session).unwrap();
    assert_eq!(outcome.rejection(), Some(&InvalidReason::ConditionsNotMet));

    for &goblin in &hand[1..] {
        assert_eq!(ActivateSpellCommand::new(goblin).execute(&mut session).unwrap(), completed());
    }
    assert_eq!(session.snapshot().find_card(library).unwrap().counter("spell"), 3);
    assert_eq!(session.snapshot().deck_size(), 1);

    let hand_before = session.snapshot().hand_size();
    let outcome = ActivateIgnitionCommand::new(library).execute(&mut session).unwrap();

    assert_eq!(outcome, completed());
    assert_eq!(session.snapshot().find_card(library).unwrap().counter("spell"), 0);
    assert_eq!(session.snapshot().hand_size(), hand_before + 1);
    assert_eq!(zone_of(&session, library), ZoneName::MainMonsterZone);
}

/// Counters only accrue while the library is face-up on the field.
#[test]
fn test_library_in_hand_collects_nothing() {
    let (mut session, hand) = table(config(), &[ROYAL_MAGICAL_LIBRARY, UPSTART_GOBLIN], &[CELTIC_GUARDIAN]);

    ActivateSpellCommand::new(hand[1]).execute(&mut session).unwrap();

    assert_eq!(session.snapshot().find_card(hand[0]).unwrap().counter("spell"), 0);
    assert_eq!(zone_of(&session, hand[0]), ZoneName::Hand);
}

// =============================================================================
// End Phase and Victory
// =============================================================================

/// Into the Void draws now and discards the whole hand in the End Phase.
#[test]
fn test_into_the_void_end_phase_discard() {
    let (mut session, hand) = table(
        config(),
        &[INTO_THE_VOID, CELTIC_GUARDIAN, CELTIC_GUARDIAN, BATTLE_OX],
        &[BATTLE_OX, BATTLE_OX],
    );

    assert_eq!(ActivateSpellCommand::new(hand[0]).execute(&mut session).unwrap(), completed());
    assert_eq!(session.snapshot().hand_size(), 4);
    assert_eq!(session.snapshot().pending_end_phase_effects.len(), 1);

    assert_eq!(AdvancePhaseCommand.execute(&mut session).unwrap(), completed());

    assert_eq!(session.snapshot().phase, Phase::End);
    assert_eq!(session.snapshot().hand_size(), 0);
    assert_eq!(session.snapshot().cards_in(ZoneName::Graveyard).len(), 5);
    assert!(session.snapshot().pending_end_phase_effects.is_empty());
}

/// Drawing the last Exodia piece wins mid-resolution.
#[test]
fn test_exodia_drawn_by_pot_of_greed() {
    let mut hand_cards = EXODIA_PIECES[1..].to_vec();
    hand_cards.push(POT_OF_GREED);
    let (mut session, hand) = table(config(), &hand_cards, &[EXODIA_PIECES[0], CELTIC_GUARDIAN]);

    let outcome = ActivateSpellCommand::new(hand[4]).execute(&mut session).unwrap();

    assert!(matches!(
        outcome,
        CommandOutcome::Accepted(QueueStatus::GameOver(GameResult::Win(_)))
    ));
    assert!(session.snapshot().is_game_over());
    assert!(session.chain().is_empty());
    assert!(!session.is_busy());

    let outcome = AdvancePhaseCommand.execute(&mut session).unwrap();
    assert_eq!(outcome.rejection(), Some(&InvalidReason::GameOver));
}

/// A duel built from deck lists starts with a five card hand in Main Phase 1.
#[test]
fn test_duel_from_deck_lists() {
    let registries = Arc::new(Registries::with_builtin_cards().unwrap());
    let deck: Vec<CardId> = [CELTIC_GUARDIAN, BATTLE_OX, POT_OF_GREED, UPSTART_GOBLIN]
        .iter()
        .cycle()
        .take(40)
        .copied()
        .collect();

    let session = DuelSession::new(Arc::clone(&registries), config().with_seed(7), &deck, &[]).unwrap();

    assert_eq!(session.snapshot().hand_size(), 5);
    assert_eq!(session.snapshot().deck_size(), 35);
    assert_eq!(session.snapshot().phase, Phase::Main1);
    assert_eq!(session.snapshot().turn, 1);
    assert!(!session.snapshot().is_game_over());

    let again = DuelSession::new(registries, config().with_seed(7), &deck, &[]).unwrap();
    assert_eq!(session.snapshot(), again.snapshot());
}
