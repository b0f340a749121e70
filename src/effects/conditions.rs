//! Built-in conditions.
//!
//! | Key | Args |
//! |---|---|
//! | `deck_has_at_least` | `count` |
//! | `hand_has_at_least` | `count` (source card excluded) |
//! | `graveyard_has_at_least` | `count`, `filter?` |
//! | `life_points_at_least` | `amount` |
//! | `counters_at_least` | `counter`, `count` |
//! | `monster_zone_has_space` | |
//! | `zone_has_matching` | `zone`, `filter?`, `count` |
//! | `not_activated_this_turn` | |
//!
//! Every refusal is `InvalidReason::ConditionsNotMet`.

use super::args::ArgError;
use super::registry::{condition, Condition, ConditionRegistry};
use crate::cards::CardFilter;
use crate::core::{EngineError, InvalidReason, Player, ValidationResult};
use crate::state::ZoneName;

fn met(ok: bool) -> ValidationResult {
    ValidationResult::check(ok, InvalidReason::ConditionsNotMet)
}

/// Main deck holds at least `count` cards.
#[must_use]
pub fn deck_has_at_least(count: usize) -> Condition {
    condition(move |snapshot, _| met(snapshot.deck_size() >= count))
}

/// Hand holds at least `count` cards besides the source.
#[must_use]
pub fn hand_has_at_least(count: usize) -> Condition {
    condition(move |snapshot, source| {
        let others = snapshot
            .cards_in(ZoneName::Hand)
            .iter()
            .filter(|c| c.instance_id != source.instance_id)
            .count();
        met(others >= count)
    })
}

/// A zone holds at least `count` cards matching `filter`.
#[must_use]
pub fn zone_has_matching(zone: ZoneName, filter: CardFilter, count: usize) -> Condition {
    condition(move |snapshot, source| {
        let matching = snapshot
            .cards_in(zone)
            .iter()
            .filter(|c| c.instance_id != source.instance_id && filter.matches(c))
            .count();
        met(matching >= count)
    })
}

/// Register every built-in condition.
pub fn register_builtins(registry: &mut ConditionRegistry) -> Result<(), EngineError> {
    registry.register("deck_has_at_least", |args| {
        Ok(deck_has_at_least(args.count("count")?))
    })?;

    registry.register("hand_has_at_least", |args| {
        Ok(hand_has_at_least(args.count("count")?))
    })?;

    registry.register("graveyard_has_at_least", |args| {
        Ok(zone_has_matching(
            ZoneName::Graveyard,
            args.filter("filter")?,
            args.count("count")?,
        ))
    })?;

    registry.register("life_points_at_least", |args| {
        let amount = args.int("amount")?;
        Ok(condition(move |snapshot, _| {
            met(i64::from(snapshot.life_points[Player::Player]) >= amount)
        }))
    })?;

    registry.register("counters_at_least", |args| {
        let counter = args.text("counter")?.to_string();
        let count = args.count("count")?;
        let count = u32::try_from(count).map_err(|_| ArgError::Invalid {
            key: "count".to_string(),
            message: "too large".to_string(),
        })?;
        Ok(condition(move |_, source| met(source.counter(&counter) >= count)))
    })?;

    registry.register("monster_zone_has_space", |_| {
        Ok(condition(|snapshot, _| {
            ValidationResult::check(
                snapshot.has_space(ZoneName::MainMonsterZone, 1),
                InvalidReason::ConditionsNotMet,
            )
        }))
    })?;

    registry.register("zone_has_matching", |args| {
        Ok(zone_has_matching(
            args.zone("zone")?,
            args.filter("filter")?,
            args.count_or("count", 1)?,
        ))
    })?;

    registry.register("not_activated_this_turn", |_| {
        Ok(condition(|snapshot, source| {
            met(!snapshot.was_card_activated(source.card_id))
        }))
    })?;

    Ok(())
}
