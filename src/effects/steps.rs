//! Built-in steps.
//!
//! Each step is available two ways: as a plain function building an
//! [`AtomicStep`] for a [`StepContext`] (used by hand-written effect bodies),
//! and as a registry entry keyed by name (used by card definitions).
//!
//! | Key | Args | Level |
//! |---|---|---|
//! | `draw` | `count` | silent |
//! | `discard_from_hand` | `count` | interactive |
//! | `search_deck` | `count`, `filter?`, `optional?` | interactive |
//! | `salvage_from_graveyard` | `count`, `filter?` | interactive |
//! | `gain_life_points` | `amount`, `target?` | info |
//! | `pay_life_points` | `amount` | info |
//! | `add_counter` | `counter`, `count`, `max?` | silent |
//! | `remove_counter` | `counter`, `count` | silent |
//! | `send_source_to_graveyard` | | silent |
//! | `queue_end_phase_effect` | `step`, `args?` | silent |
//! | `notify` | `message` | info |
//! | `discard_hand` | | silent |

use super::args::{ArgError, Args};
use super::registry::{step_builder, StepRegistry};
use super::step::{
    AtomicStep, CardSelectionConfig, NotificationLevel, SelectionCandidates, StepContext, StepOutcome,
};
use crate::cards::CardFilter;
use crate::core::{EngineError, InstanceId, Player};
use crate::state::{GameSnapshot, SnapshotError, ZoneName};
use crate::triggers::{EventType, GameEvent};

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "card"
    } else {
        "cards"
    }
}

/// Move every selected card to `to`, emitting one event per card.
fn move_selected(
    snapshot: &GameSnapshot,
    selection: &[InstanceId],
    to: ZoneName,
    event_type: EventType,
) -> Result<(GameSnapshot, Vec<GameEvent>), SnapshotError> {
    let mut next = snapshot.clone();
    let mut events = Vec::with_capacity(selection.len());
    for &id in selection {
        let card_id = next
            .find_card(id)
            .map(|c| c.card_id)
            .ok_or(SnapshotError::CardNotFound(id))?;
        next = next.move_card(id, to)?;
        events.push(GameEvent::for_card(event_type, id, card_id));
    }
    Ok((next, events))
}

/// Validate a selection against its config, or produce the failure outcome.
fn checked_selection<'a>(
    snapshot: &GameSnapshot,
    config: &CardSelectionConfig,
    selection: Option<&'a [InstanceId]>,
) -> Result<&'a [InstanceId], StepOutcome> {
    let selection = selection.ok_or_else(|| StepOutcome::failure(snapshot, "no cards selected"))?;
    let candidates = config.candidates.resolve(snapshot);
    if !config.accepts(selection, &candidates) {
        let (min, max) = config.bounds(candidates.len());
        return Err(StepOutcome::failure(
            snapshot,
            format!("expected {min}..={max} cards, got {}", selection.len()),
        ));
    }
    Ok(selection)
}

/// Draw `count` cards.
#[must_use]
pub fn draw_step(ctx: &StepContext, count: usize) -> AtomicStep {
    let source = ctx.source;
    let card_id = ctx.card_id;
    AtomicStep::new(
        ctx.step_id("draw"),
        format!("Draw {count} {}", plural(count)),
        NotificationLevel::Silent,
        move |snapshot, _| {
            let (next, drawn) = snapshot.draw(count);
            StepOutcome::success(next)
                .with_event(
                    GameEvent::for_card(EventType::CardsDrawn, source, card_id)
                        .with_value(drawn.len() as i64),
                )
                .with_message(format!("Drew {} {}", drawn.len(), plural(drawn.len())))
        },
    )
    .with_description(format!("Draw {count} {} from the deck", plural(count)))
}

/// Discard `count` cards from hand, chosen by the player. Not cancelable.
#[must_use]
pub fn discard_from_hand_step(ctx: &StepContext, count: usize) -> AtomicStep {
    let config = CardSelectionConfig::exactly(
        SelectionCandidates::Zone {
            zone: ZoneName::Hand,
            filter: CardFilter::AnyCard,
            exclude: Some(ctx.source),
        },
        count,
    )
    .with_summary(format!("Select {count} {} to discard", plural(count)));

    let check = config.clone();
    AtomicStep::new(
        ctx.step_id("discard_from_hand"),
        format!("Discard {count} {}", plural(count)),
        NotificationLevel::Interactive,
        move |snapshot, selection| {
            let selection = match checked_selection(snapshot, &check, selection) {
                Ok(selection) => selection,
                Err(outcome) => return outcome,
            };
            match move_selected(snapshot, selection, ZoneName::Graveyard, EventType::CardDiscarded) {
                Ok((next, events)) => StepOutcome::success(next)
                    .with_events(events)
                    .with_message(format!("Discarded {} {}", selection.len(), plural(selection.len()))),
                Err(e) => StepOutcome::failure(snapshot, e.to_string()),
            }
        },
    )
    .with_selection(config)
}

/// Add `count` cards matching `filter` from the deck to the hand.
#[must_use]
pub fn search_deck_step(
    ctx: &StepContext,
    count: usize,
    filter: CardFilter,
    optional: bool,
) -> AtomicStep {
    let config = CardSelectionConfig::exactly(
        SelectionCandidates::Zone {
            zone: ZoneName::MainDeck,
            filter,
            exclude: None,
        },
        count,
    )
    .with_cancelable(optional)
    .with_summary(format!("Select {count} {} to add to your hand", plural(count)));

    add_to_hand_step(ctx, "search_deck", config)
}

/// Add `count` cards matching `filter` from the graveyard to the hand.
#[must_use]
pub fn salvage_from_graveyard_step(ctx: &StepContext, count: usize, filter: CardFilter) -> AtomicStep {
    let config = CardSelectionConfig::exactly(
        SelectionCandidates::Zone {
            zone: ZoneName::Graveyard,
            filter,
            exclude: Some(ctx.source),
        },
        count,
    )
    .with_summary(format!("Select {count} {} to add to your hand", plural(count)));

    add_to_hand_step(ctx, "salvage_from_graveyard", config)
}

fn add_to_hand_step(ctx: &StepContext, key: &str, config: CardSelectionConfig) -> AtomicStep {
    let check = config.clone();
    AtomicStep::new(
        ctx.step_id(key),
        config.summary.clone(),
        NotificationLevel::Interactive,
        move |snapshot, selection| {
            let selection = match checked_selection(snapshot, &check, selection) {
                Ok(selection) => selection,
                Err(outcome) => return outcome,
            };
            match move_selected(snapshot, selection, ZoneName::Hand, EventType::AddedToHand) {
                Ok((next, events)) => StepOutcome::success(next)
                    .with_events(events)
                    .with_message(format!("Added {} {} to hand", selection.len(), plural(selection.len()))),
                Err(e) => StepOutcome::failure(snapshot, e.to_string()),
            }
        },
    )
    .with_selection(config)
}

/// `target` gains `amount` life points.
#[must_use]
pub fn gain_life_points_step(ctx: &StepContext, amount: i32, target: Player) -> AtomicStep {
    let source = ctx.source;
    let card_id = ctx.card_id;
    let whose = match target {
        Player::Player => "You gain",
        Player::Opponent => "Your opponent gains",
    };
    let summary = format!("{whose} {amount} LP");
    AtomicStep::new(
        ctx.step_id("gain_life_points"),
        summary.clone(),
        NotificationLevel::Info,
        move |snapshot, _| {
            StepOutcome::success(snapshot.change_life_points(target, amount))
                .with_event(
                    GameEvent::for_card(EventType::LifePointsChanged, source, card_id)
                        .with_value(i64::from(amount)),
                )
                .with_message(summary.clone())
        },
    )
}

/// Pay `amount` life points. Fails if the player cannot afford it.
#[must_use]
pub fn pay_life_points_step(ctx: &StepContext, amount: i32) -> AtomicStep {
    let source = ctx.source;
    let card_id = ctx.card_id;
    AtomicStep::new(
        ctx.step_id("pay_life_points"),
        format!("Pay {amount} LP"),
        NotificationLevel::Info,
        move |snapshot, _| {
            if snapshot.life_points[Player::Player] < amount {
                return StepOutcome::failure(snapshot, format!("cannot pay {amount} LP"));
            }
            StepOutcome::success(snapshot.change_life_points(Player::Player, -amount))
                .with_event(
                    GameEvent::for_card(EventType::LifePointsChanged, source, card_id)
                        .with_value(-i64::from(amount)),
                )
                .with_message(format!("Paid {amount} LP"))
        },
    )
}

/// Place counters on the source card.
#[must_use]
pub fn add_counter_step(ctx: &StepContext, counter: &str, count: u32, max: Option<u32>) -> AtomicStep {
    let source = ctx.source;
    let card_id = ctx.card_id;
    let counter = counter.to_string();
    AtomicStep::new(
        ctx.step_id("add_counter"),
        format!("Place {count} {counter} counter(s)"),
        NotificationLevel::Silent,
        move |snapshot, _| {
            let before = snapshot.find_card(source).map_or(0, |c| c.counter(&counter));
            match snapshot.update_card(source, |c| c.with_counter_delta(&counter, i64::from(count), max)) {
                Ok(next) => {
                    // Only the counters actually placed; none once capped.
                    let after = next.find_card(source).map_or(0, |c| c.counter(&counter));
                    let added = after.saturating_sub(before);
                    let outcome = StepOutcome::success(next);
                    if added == 0 {
                        return outcome;
                    }
                    outcome.with_event(
                        GameEvent::for_card(EventType::CounterAdded, source, card_id).with_value(i64::from(added)),
                    )
                }
                Err(e) => StepOutcome::failure(snapshot, e.to_string()),
            }
        },
    )
}

/// Remove counters from the source card. Fails if there are too few.
#[must_use]
pub fn remove_counter_step(ctx: &StepContext, counter: &str, count: u32) -> AtomicStep {
    let source = ctx.source;
    let counter = counter.to_string();
    AtomicStep::new(
        ctx.step_id("remove_counter"),
        format!("Remove {count} {counter} counter(s)"),
        NotificationLevel::Silent,
        move |snapshot, _| {
            let available = snapshot.find_card(source).map_or(0, |c| c.counter(&counter));
            if available < count {
                return StepOutcome::failure(
                    snapshot,
                    format!("needs {count} {counter} counter(s), has {available}"),
                );
            }
            match snapshot.update_card(source, |c| c.with_counter_delta(&counter, -i64::from(count), None)) {
                Ok(next) => StepOutcome::success(next),
                Err(e) => StepOutcome::failure(snapshot, e.to_string()),
            }
        },
    )
}

/// Send the source card to the graveyard.
///
/// Succeeds without a change when the card has already left.
#[must_use]
pub fn send_source_to_graveyard_step(ctx: &StepContext) -> AtomicStep {
    let source = ctx.source;
    let card_id = ctx.card_id;
    AtomicStep::new(
        ctx.step_id("send_source_to_graveyard"),
        "Send to graveyard",
        NotificationLevel::Silent,
        move |snapshot, _| match snapshot.find_card(source) {
            Some(card) if card.zone != ZoneName::Graveyard => {
                match snapshot.move_card(source, ZoneName::Graveyard) {
                    Ok(next) => StepOutcome::success(next)
                        .with_event(GameEvent::for_card(EventType::SentToGraveyard, source, card_id)),
                    Err(e) => StepOutcome::failure(snapshot, e.to_string()),
                }
            }
            _ => StepOutcome::success(snapshot.clone()),
        },
    )
}

/// Queue a step to run when the End phase begins.
#[must_use]
pub fn queue_end_phase_effect_step(ctx: &StepContext, step: &str, args: Args) -> AtomicStep {
    let source = ctx.source;
    let card_id = ctx.card_id;
    let step = step.to_string();
    AtomicStep::new(
        ctx.step_id("queue_end_phase_effect"),
        "Apply during the End Phase",
        NotificationLevel::Silent,
        move |snapshot, _| {
            StepOutcome::success(snapshot.queue_delayed_effect(card_id, source, step.clone(), args.clone()))
        },
    )
}

/// Show a message.
#[must_use]
pub fn notify_step(ctx: &StepContext, message: &str) -> AtomicStep {
    let message = message.to_string();
    AtomicStep::new(
        ctx.step_id("notify"),
        message.clone(),
        NotificationLevel::Info,
        move |snapshot, _| StepOutcome::success(snapshot.clone()).with_message(message.clone()),
    )
}

/// Discard the entire hand.
#[must_use]
pub fn discard_hand_step(ctx: &StepContext) -> AtomicStep {
    AtomicStep::new(
        ctx.step_id("discard_hand"),
        "Discard your hand",
        NotificationLevel::Silent,
        move |snapshot, _| {
            let hand: Vec<_> = snapshot
                .cards_in(ZoneName::Hand)
                .iter()
                .map(|c| c.instance_id)
                .collect();
            match move_selected(snapshot, &hand, ZoneName::Graveyard, EventType::CardDiscarded) {
                Ok((next, events)) => StepOutcome::success(next)
                    .with_events(events)
                    .with_message(format!("Discarded {} {}", hand.len(), plural(hand.len()))),
                Err(e) => StepOutcome::failure(snapshot, e.to_string()),
            }
        },
    )
}

fn life_amount(args: &Args) -> Result<i32, ArgError> {
    let amount = args.int("amount")?;
    i32::try_from(amount)
        .ok()
        .filter(|a| *a >= 0)
        .ok_or_else(|| ArgError::Invalid {
            key: "amount".to_string(),
            message: format!("must be between 0 and {} (got {amount})", i32::MAX),
        })
}

fn counter_count(args: &Args, key: &str) -> Result<u32, ArgError> {
    let count = args.count(key)?;
    u32::try_from(count).map_err(|_| ArgError::Invalid {
        key: key.to_string(),
        message: "too large".to_string(),
    })
}

/// Register every built-in step.
pub fn register_builtins(registry: &mut StepRegistry) -> Result<(), EngineError> {
    registry.register("draw", |args| {
        let count = args.count("count")?;
        Ok(step_builder(move |ctx| draw_step(ctx, count)))
    })?;

    registry.register("discard_from_hand", |args| {
        let count = args.count("count")?;
        Ok(step_builder(move |ctx| discard_from_hand_step(ctx, count)))
    })?;

    registry.register("search_deck", |args| {
        let count = args.count_or("count", 1)?;
        let filter = args.filter("filter")?;
        let optional = args.bool_or("optional", false)?;
        Ok(step_builder(move |ctx| search_deck_step(ctx, count, filter.clone(), optional)))
    })?;

    registry.register("salvage_from_graveyard", |args| {
        let count = args.count_or("count", 1)?;
        let filter = args.filter("filter")?;
        Ok(step_builder(move |ctx| salvage_from_graveyard_step(ctx, count, filter.clone())))
    })?;

    registry.register("gain_life_points", |args| {
        let amount = life_amount(args)?;
        let target = args.player_or("target", Player::Player)?;
        Ok(step_builder(move |ctx| gain_life_points_step(ctx, amount, target)))
    })?;

    registry.register("pay_life_points", |args| {
        let amount = life_amount(args)?;
        Ok(step_builder(move |ctx| pay_life_points_step(ctx, amount)))
    })?;

    registry.register("add_counter", |args| {
        let counter = args.text("counter")?.to_string();
        let count = counter_count(args, "count")?;
        let max = match args.get("max") {
            Some(_) => Some(counter_count(args, "max")?),
            None => None,
        };
        Ok(step_builder(move |ctx| add_counter_step(ctx, &counter, count, max)))
    })?;

    registry.register("remove_counter", |args| {
        let counter = args.text("counter")?.to_string();
        let count = counter_count(args, "count")?;
        Ok(step_builder(move |ctx| remove_counter_step(ctx, &counter, count)))
    })?;

    registry.register("send_source_to_graveyard", |_| {
        Ok(step_builder(send_source_to_graveyard_step))
    })?;

    registry.register("queue_end_phase_effect", |args| {
        let step = args.text("step")?.to_string();
        let delayed_args = args.nested("args")?;
        Ok(step_builder(move |ctx| {
            queue_end_phase_effect_step(ctx, &step, delayed_args.clone())
        }))
    })?;

    registry.register("notify", |args| {
        let message = args.text("message")?.to_string();
        Ok(step_builder(move |ctx| notify_step(ctx, &message)))
    })?;

    registry.register("discard_hand", |_| Ok(step_builder(discard_hand_step)))?;

    Ok(())
}
