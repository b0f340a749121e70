//! A running duel: snapshot, step queue, chain stack, and the registries
//! they consult.
//!
//! The session wires the chain stack to the step queue. Activating an
//! action pushes a chain block and runs its activation steps; unless the
//! chain is left open for a response, the session then pops blocks newest
//! first and runs each block's resolution steps. A suspension anywhere in
//! between returns control to the caller, and [`DuelSession::resume`] picks
//! up where the session left off.

use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use super::observer::QueueObserver;
use super::queue::{QueueError, QueueStatus, Resume, StepQueue};
use crate::actions::{library, ChainableAction, ChainableActionRegistry};
use crate::cards::{CardDataRegistry, CardId};
use crate::core::{DuelConfig, EngineError, InstanceId, InvalidReason};
use crate::effects::{
    AtomicStep, ConditionRegistry, NotificationLevel, StepContext, StepOutcome, StepRegistry,
};
use crate::rules::{self, AdditionalRuleRegistry};
use crate::stack::{ChainBlock, ChainStack};
use crate::state::{DelayedEffect, GameResult, GameSnapshot, SnapshotError, ZoneName};

/// Every lookup table the engine consults.
///
/// Built once at process start and shared by sessions through an `Arc`.
pub struct Registries {
    pub cards: CardDataRegistry,
    pub conditions: ConditionRegistry,
    pub steps: StepRegistry,
    pub actions: ChainableActionRegistry,
    pub rules: AdditionalRuleRegistry,
}

impl Registries {
    /// Registries with the built-in conditions and steps, and no cards.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            cards: CardDataRegistry::new(),
            conditions: ConditionRegistry::with_builtins()?,
            steps: StepRegistry::with_builtins()?,
            actions: ChainableActionRegistry::new(),
            rules: AdditionalRuleRegistry::new(),
        })
    }

    /// Registries with the full built-in card pool loaded.
    pub fn with_builtin_cards() -> Result<Self, EngineError> {
        let mut registries = Self::new()?;
        library::register_builtins(&mut registries.actions)?;
        rules::register_builtins(&mut registries.rules)?;
        crate::dsl::load_builtin(&mut registries)?;
        Ok(registries)
    }

    /// Empty every registry, built-ins included.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.conditions.clear();
        self.steps.clear();
        self.actions.clear();
        self.rules.clear();
    }
}

impl std::fmt::Debug for Registries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registries")
            .field("cards", &self.cards.len())
            .field("actions", &self.actions.len())
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

/// Why the session refused to drive the engine.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("{0}")]
    Rejected(InvalidReason),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// What to do once the queue finishes its current run.
#[derive(Debug, Default)]
enum Continuation {
    #[default]
    Idle,
    /// Activation steps are running; resolve the chain afterwards if
    /// `resolve`, restore `rollback` if the activation does not complete.
    Activation {
        resolve: bool,
        rollback: Box<GameSnapshot>,
    },
    /// A chain block is resolving; keep popping afterwards.
    Resolution(ChainBlock),
}

/// A running duel.
pub struct DuelSession {
    registries: Arc<Registries>,
    config: DuelConfig,
    snapshot: GameSnapshot,
    queue: StepQueue,
    chain: ChainStack,
    continuation: Continuation,
}

impl DuelSession {
    /// Start a duel from two deck lists.
    pub fn new(
        registries: Arc<Registries>,
        config: DuelConfig,
        main_deck: &[CardId],
        extra_deck: &[CardId],
    ) -> Result<Self, EngineError> {
        let snapshot = GameSnapshot::new(main_deck, extra_deck, &registries.cards, &config)?;
        let mut session = Self::from_snapshot(registries, config, snapshot);
        session.check_victory();
        Ok(session)
    }

    /// Resume a duel from an existing snapshot.
    #[must_use]
    pub fn from_snapshot(registries: Arc<Registries>, config: DuelConfig, snapshot: GameSnapshot) -> Self {
        Self {
            queue: StepQueue::new(config.info_delay()),
            registries,
            config,
            snapshot,
            chain: ChainStack::new(),
            continuation: Continuation::Idle,
        }
    }

    /// Replace the queue observer (builder pattern).
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn QueueObserver>) -> Self {
        self.queue.set_observer(observer);
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn chain(&self) -> &ChainStack {
        &self.chain
    }

    #[must_use]
    pub fn queue(&self) -> &StepQueue {
        &self.queue
    }

    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    #[must_use]
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// Check if the queue is running or suspended.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.queue.is_active()
    }

    /// Replace the snapshot outside of any queue run.
    ///
    /// Used by commands for structural changes that need no steps.
    pub fn replace_snapshot(&mut self, snapshot: GameSnapshot) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(QueueError::Busy.into());
        }
        self.snapshot = snapshot;
        Ok(())
    }

    // === Driving ===

    /// Run a plain step list with no chain involvement.
    pub fn run_steps(&mut self, steps: Vec<AtomicStep>) -> Result<QueueStatus, SessionError> {
        if self.is_busy() {
            return Err(QueueError::Busy.into());
        }
        self.continuation = Continuation::Idle;
        let status = self
            .queue
            .start_processing(&mut self.snapshot, &self.registries.rules, steps)?;
        self.continue_after(status)
    }

    /// Activate `action` from the card `source` as it stands now.
    pub fn activate(
        &mut self,
        action: Arc<dyn ChainableAction>,
        source: InstanceId,
        open_chain: bool,
    ) -> Result<QueueStatus, SessionError> {
        self.activate_with(action, source, open_chain, |s| Ok(s.clone()))
    }

    /// Activate `action` after applying `place`, the structural zone move
    /// that puts the card where it activates from.
    ///
    /// Pushes a chain block and runs the activation steps. If they complete
    /// and `open_chain` is false, the chain resolves. If they stop or are
    /// cancelled, the block is popped and the snapshot from before `place`
    /// is restored.
    pub fn activate_with<F>(
        &mut self,
        action: Arc<dyn ChainableAction>,
        source: InstanceId,
        open_chain: bool,
        place: F,
    ) -> Result<QueueStatus, SessionError>
    where
        F: FnOnce(&GameSnapshot) -> Result<GameSnapshot, SnapshotError>,
    {
        if self.is_busy() {
            return Err(QueueError::Busy.into());
        }

        let placed = place(&self.snapshot)?;
        let card = placed
            .find_card(source)
            .cloned()
            .ok_or(SessionError::Rejected(InvalidReason::CardNotFound))?;
        let chain_number = self
            .chain
            .push_chain_block(Arc::clone(&action), source)
            .map_err(SessionError::Rejected)?;
        info!(
            "activate {} ({}) as chain link {}",
            card.name(),
            action.effect_id(),
            chain_number
        );

        let steps = action.create_activation_steps(&placed, &card);
        let rollback = std::mem::replace(&mut self.snapshot, placed);
        self.continuation = Continuation::Activation {
            resolve: !open_chain,
            rollback: Box::new(rollback),
        };
        let status = self
            .queue
            .start_processing(&mut self.snapshot, &self.registries.rules, steps)?;
        self.continue_after(status)
    }

    /// Pop and resolve chain blocks, newest first, until the chain is empty
    /// or a step suspends.
    pub fn resolve_chain(&mut self) -> Result<QueueStatus, SessionError> {
        if self.is_busy() {
            return Err(QueueError::Busy.into());
        }

        let mut last = QueueStatus::Completed;
        while let Some(block) = self.chain.pop_chain_block() {
            let Some(source) = self.snapshot.find_card(block.source_instance_id).cloned() else {
                warn!(
                    "chain link {}: source {} is gone, skipping",
                    block.chain_number, block.source_instance_id
                );
                continue;
            };

            let steps = block.action.create_resolution_steps(&self.snapshot, &source);
            self.continuation = Continuation::Resolution(block.clone());
            let status = self
                .queue
                .start_processing(&mut self.snapshot, &self.registries.rules, steps)?;
            match status {
                QueueStatus::Suspended(_) => return Ok(status),
                QueueStatus::GameOver(_) => {
                    self.continuation = Continuation::Idle;
                    self.chain.reset();
                    return Ok(status);
                }
                QueueStatus::Completed => {}
                other => {
                    warn!("chain link {} ended early: {:?}", block.chain_number, other);
                    self.settle_unfinished_link(&block)?;
                    last = other;
                }
            }
        }

        self.continuation = Continuation::Idle;
        Ok(last)
    }

    /// Resume a suspended queue and carry on with whatever the session was
    /// doing when it suspended.
    pub fn resume(&mut self, resume: Resume) -> Result<QueueStatus, SessionError> {
        let status = self
            .queue
            .resume(&mut self.snapshot, &self.registries.rules, resume)?;
        self.continue_after(status)
    }

    /// Run every effect queued for the End phase, oldest first.
    pub fn run_delayed_effects(&mut self) -> Result<QueueStatus, SessionError> {
        if self.is_busy() {
            return Err(QueueError::Busy.into());
        }
        let (next, effects) = self.snapshot.take_delayed_effects();
        self.snapshot = next;
        if effects.is_empty() {
            return Ok(QueueStatus::Completed);
        }

        info!("running {} delayed effect(s)", effects.len());
        let steps = effects.iter().map(|e| self.delayed_step(e)).collect();
        self.run_steps(steps)
    }

    /// Apply victory rules to the current snapshot. Returns `true` if the
    /// duel is over.
    pub fn check_victory(&mut self) -> bool {
        if !self.snapshot.is_game_over() {
            if let Some(reason) = self.registries.rules.check_victory(&self.snapshot) {
                self.snapshot = self.snapshot.with_result(GameResult::Win(reason));
            }
        }
        self.snapshot.is_game_over()
    }

    /// Drop any queued steps and open chain.
    pub fn reset(&mut self) {
        self.queue.reset();
        self.chain.reset();
        self.continuation = Continuation::Idle;
    }

    fn delayed_step(&self, effect: &DelayedEffect) -> AtomicStep {
        let name = self
            .snapshot
            .find_card(effect.source)
            .map(|c| c.name().to_string())
            .or_else(|| self.registries.cards.get(effect.card_id).map(|d| d.name.clone()))
            .unwrap_or_default();
        let ctx = StepContext::new(
            effect.card_id,
            effect.source,
            format!("delayed-{}", effect.id),
            name,
        );

        match self
            .registries
            .steps
            .build(effect.card_id, &effect.step, &effect.args)
        {
            Ok(builder) => builder(&ctx),
            Err(e) => {
                let message = e.to_string();
                AtomicStep::new(
                    ctx.step_id(&effect.step),
                    "Delayed effect",
                    NotificationLevel::Silent,
                    move |s, _| StepOutcome::failure(s, message.clone()),
                )
            }
        }
    }

    /// A spell that leaves the field on resolution still does so when its
    /// resolution stops or is cancelled partway through.
    fn settle_unfinished_link(&mut self, block: &ChainBlock) -> Result<(), SessionError> {
        if !block.action.category().leaves_field_on_resolution() {
            return Ok(());
        }
        let source = block.source_instance_id;
        if self.snapshot.find_card(source).is_some_and(|card| card.is_on_field()) {
            info!("chain link {}: sending {} to the graveyard", block.chain_number, source);
            self.snapshot = self.snapshot.move_card(source, ZoneName::Graveyard)?;
        }
        Ok(())
    }

    fn continue_after(&mut self, status: QueueStatus) -> Result<QueueStatus, SessionError> {
        if status.is_suspended() {
            return Ok(status);
        }

        match std::mem::take(&mut self.continuation) {
            Continuation::Idle => Ok(status),
            Continuation::Activation { resolve, rollback } => match status {
                QueueStatus::Completed if resolve => self.resolve_chain(),
                QueueStatus::Completed => Ok(status),
                QueueStatus::GameOver(_) => {
                    self.chain.reset();
                    Ok(status)
                }
                _ => {
                    warn!("activation did not complete, restoring the previous snapshot");
                    self.chain.pop_chain_block();
                    self.snapshot = *rollback;
                    Ok(status)
                }
            },
            Continuation::Resolution(block) => match status {
                QueueStatus::GameOver(_) => {
                    self.chain.reset();
                    Ok(status)
                }
                _ => {
                    if status != QueueStatus::Completed {
                        warn!("chain link {} ended early: {:?}", block.chain_number, status);
                        self.settle_unfinished_link(&block)?;
                    }
                    // Report the resumed link's early stop unless a later
                    // link suspends or ends the duel.
                    let rest = self.resolve_chain()?;
                    if status == QueueStatus::Completed
                        || rest.is_suspended()
                        || matches!(rest, QueueStatus::GameOver(_))
                    {
                        Ok(rest)
                    } else {
                        Ok(status)
                    }
                }
            },
        }
    }
}

impl std::fmt::Debug for DuelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuelSession")
            .field("phase", &self.snapshot.phase)
            .field("turn", &self.snapshot.turn)
            .field("result", &self.snapshot.result)
            .field("chain", &self.chain.len())
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{CardAction, DeclaredBody, EffectCategory};
    use crate::cards::{CardData, CardFilter, Face, FrameType, MonsterStats, SpellType};
    use crate::effects::{step_builder, steps};
    use crate::engine::NullObserver;
    use crate::state::ZoneName;

    fn session_with(spells: &[CardData], deck: usize) -> (DuelSession, Vec<InstanceId>) {
        let config = DuelConfig::default().with_info_delay_ms(0);
        let mut snapshot = GameSnapshot::empty(&config);
        let filler = Arc::new(CardData::monster(
            CardId::new(900),
            "Filler",
            FrameType::Normal,
            MonsterStats {
                level: 4,
                ..MonsterStats::default()
            },
        ));
        for _ in 0..deck {
            snapshot = snapshot.place_new_card(Arc::clone(&filler), ZoneName::MainDeck).unwrap().0;
        }
        let mut ids = Vec::new();
        for spell in spells {
            let (next, id) = snapshot.place_new_card(Arc::new(spell.clone()), ZoneName::Hand).unwrap();
            snapshot = next;
            ids.push(id);
        }

        let registries = Arc::new(Registries::new().unwrap());
        let session = DuelSession::from_snapshot(registries, config, snapshot)
            .with_observer(Box::new(NullObserver));
        (session, ids)
    }

    fn to_field(id: InstanceId) -> impl FnOnce(&GameSnapshot) -> Result<GameSnapshot, SnapshotError> {
        move |s| s.move_card_with(id, ZoneName::SpellTrapZone, |c| c.with_face(Face::FaceUp))
    }

    fn pot() -> CardData {
        CardData::spell(library::POT_OF_GREED, "Pot of Greed", SpellType::Normal)
    }

    #[test]
    fn test_activation_resolves_immediately() {
        let (mut session, ids) = session_with(&[pot()], 3);
        let action: Arc<dyn ChainableAction> = Arc::new(library::pot_of_greed());

        let status = session.activate_with(action, ids[0], false, to_field(ids[0])).unwrap();

        assert_eq!(status, QueueStatus::Completed);
        assert_eq!(session.snapshot().hand_size(), 2);
        assert_eq!(session.snapshot().deck_size(), 1);
        assert_eq!(session.snapshot().find_card(ids[0]).unwrap().zone, ZoneName::Graveyard);
        assert!(session.chain().is_empty());
        assert!(session.snapshot().was_card_activated(library::POT_OF_GREED));
    }

    #[test]
    fn test_open_chain_resolves_newest_first() {
        let quick = CardData::spell(CardId::new(77), "Quick Draw", SpellType::QuickPlay);
        let (mut session, ids) = session_with(&[pot(), quick], 5);

        let pot_action: Arc<dyn ChainableAction> = Arc::new(library::pot_of_greed());
        let quick_action: Arc<dyn ChainableAction> = Arc::new(CardAction::new(
            CardId::new(77),
            "activation",
            EffectCategory::QuickPlaySpell,
            DeclaredBody {
                resolutions: vec![step_builder(|ctx| steps::draw_step(ctx, 1))],
                ..DeclaredBody::default()
            },
        ));

        let status = session.activate_with(pot_action, ids[0], true, to_field(ids[0])).unwrap();
        assert_eq!(status, QueueStatus::Completed);
        assert_eq!(session.chain().len(), 1);
        assert_eq!(session.snapshot().deck_size(), 5);

        session.activate_with(quick_action, ids[1], false, to_field(ids[1])).unwrap();

        assert!(session.chain().is_empty());
        assert_eq!(session.snapshot().deck_size(), 2);
        let graveyard: Vec<_> = session
            .snapshot()
            .cards_in(ZoneName::Graveyard)
            .iter()
            .map(|c| c.instance_id)
            .collect();
        assert_eq!(graveyard, vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_cancelled_activation_restores_snapshot() {
        let spell = CardData::spell(CardId::new(78), "Optional Search", SpellType::Normal);
        let (mut session, ids) = session_with(&[spell], 3);
        let before = session.snapshot().clone();
        let action: Arc<dyn ChainableAction> = Arc::new(CardAction::new(
            CardId::new(78),
            "activation",
            EffectCategory::NormalSpell,
            DeclaredBody {
                activations: vec![step_builder(|ctx| {
                    steps::search_deck_step(ctx, 1, CardFilter::AnyCard, true)
                })],
                ..DeclaredBody::default()
            },
        ));

        let status = session.activate_with(action, ids[0], false, to_field(ids[0])).unwrap();
        assert!(status.is_suspended());
        assert_eq!(session.chain().len(), 1);

        let status = session.resume(Resume::Cancel).unwrap();

        assert_eq!(status, QueueStatus::Cancelled);
        assert_eq!(session.snapshot(), &before);
        assert!(session.chain().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_busy_session_rejects_new_work() {
        let spell = CardData::spell(CardId::new(79), "Confirm", SpellType::Normal);
        let (mut session, ids) = session_with(&[spell], 3);
        let action: Arc<dyn ChainableAction> = Arc::new(CardAction::new(
            CardId::new(79),
            "activation",
            EffectCategory::NormalSpell,
            DeclaredBody {
                resolutions: vec![step_builder(|ctx| steps::discard_from_hand_step(ctx, 1))],
                ..DeclaredBody::default()
            },
        ));
        let (snapshot, _) = session.snapshot().draw(1);
        session.replace_snapshot(snapshot).unwrap();

        let status = session.activate_with(action, ids[0], false, to_field(ids[0])).unwrap();
        assert!(status.is_suspended());

        assert!(matches!(
            session.run_steps(Vec::new()),
            Err(SessionError::Queue(QueueError::Busy))
        ));
        assert!(matches!(
            session.resolve_chain(),
            Err(SessionError::Queue(QueueError::Busy))
        ));
    }

    #[test]
    fn test_delayed_effects_run_once() {
        let (mut session, _) = session_with(&[], 3);
        let queued = session.snapshot().queue_delayed_effect(
            CardId::new(1),
            InstanceId(999),
            "draw",
            crate::effects::Args::new().with("count", 2),
        );
        session.replace_snapshot(queued).unwrap();

        assert_eq!(session.run_delayed_effects().unwrap(), QueueStatus::Completed);
        assert_eq!(session.snapshot().hand_size(), 2);
        assert!(session.snapshot().pending_end_phase_effects.is_empty());

        assert_eq!(session.run_delayed_effects().unwrap(), QueueStatus::Completed);
        assert_eq!(session.snapshot().hand_size(), 2);
    }
}
