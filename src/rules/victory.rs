//! Alternate victory conditions.

use super::rule::{AdditionalRule, RuleCategory};
use crate::cards::{CardId, CardInstance};
use crate::state::{GameSnapshot, ZoneName};

/// Exodia the Forbidden One.
pub const EXODIA_THE_FORBIDDEN_ONE: CardId = CardId::new(33396948);

/// The head and four limbs.
pub const EXODIA_PIECES: [CardId; 5] = [
    EXODIA_THE_FORBIDDEN_ONE,
    CardId::new(70903634),
    CardId::new(7902349),
    CardId::new(8124921),
    CardId::new(44519536),
];

/// Holding all five Exodia pieces in hand wins the duel.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExodiaVictory;

impl ExodiaVictory {
    fn assembled(snapshot: &GameSnapshot) -> bool {
        let hand = snapshot.cards_in(ZoneName::Hand);
        EXODIA_PIECES
            .iter()
            .all(|piece| hand.iter().any(|c| c.card_id == *piece))
    }
}

impl AdditionalRule for ExodiaVictory {
    fn card_id(&self) -> CardId {
        EXODIA_THE_FORBIDDEN_ONE
    }

    fn effect_id(&self) -> &str {
        "victory"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::VictoryCondition
    }

    fn can_apply(&self, snapshot: &GameSnapshot, source: &CardInstance) -> bool {
        source.zone == ZoneName::Hand && Self::assembled(snapshot)
    }

    fn victory_reason(&self, snapshot: &GameSnapshot) -> Option<String> {
        Self::assembled(snapshot).then(|| "Exodia the Forbidden One assembled".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, FrameType, MonsterStats};
    use crate::core::DuelConfig;
    use std::sync::Arc;

    fn with_pieces(count: usize) -> GameSnapshot {
        let mut snapshot = GameSnapshot::empty(&DuelConfig::default());
        for piece in EXODIA_PIECES.iter().take(count) {
            let data = Arc::new(CardData::monster(
                *piece,
                format!("Piece {piece}"),
                FrameType::Effect,
                MonsterStats::default(),
            ));
            snapshot = snapshot.place_new_card(data, ZoneName::Hand).unwrap().0;
        }
        snapshot
    }

    #[test]
    fn test_four_pieces_is_not_enough() {
        assert_eq!(ExodiaVictory.victory_reason(&with_pieces(4)), None);
    }

    #[test]
    fn test_five_pieces_win() {
        let snapshot = with_pieces(5);
        assert!(ExodiaVictory.victory_reason(&snapshot).is_some());

        let head = &snapshot.cards_in(ZoneName::Hand)[0];
        assert!(ExodiaVictory.can_apply(&snapshot, head));
    }
}
