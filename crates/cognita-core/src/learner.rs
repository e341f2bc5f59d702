//! Learner State Tracker
//!
//! Owns the one-per-unit [`UserKnowledgeState`] and evolves it through the
//! mastery state machine:
//!
//! ```text
//! unknown ──read──> learning ──(level ≥ 0.7)──> learned ──(level ≥ 0.9)──> mastered
//!                       ^                          │
//!                       └──────(level ≤ 0.1)───────┘
//!
//! muted / ignored: user overrides, reachable from anywhere, undone by restore
//! ```
//!
//! | action         | level change | status rule                                      |
//! |----------------|--------------|--------------------------------------------------|
//! | read           | +0.10        | unknown → learning                               |
//! | tested_success | +0.15        | learning → learned if level ≥ 0.7                |
//! | tested_fail    | −0.05        | learned → learning if level ≤ 0.1                |
//! | explained      | +0.15        | unknown/learning → learned if level ≥ 0.7        |
//! | mastered       | level = 1.0  | → mastered, always                               |
//!
//! After every action a `learned` unit at level ≥ 0.9 is promoted to
//! `mastered`. While a unit is muted or ignored its level still moves but
//! the automatic rules are suspended.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::traits::{StateStore, UnitStore};
use crate::types::{
    AvatarStats, HistoryAction, IdGenerator, KnowledgeStatus, LearningAction, StateId, UnitId,
    UserKnowledgeState,
};

pub const READ_DELTA: f64 = 0.10;
pub const TESTED_SUCCESS_DELTA: f64 = 0.15;
pub const TESTED_FAIL_DELTA: f64 = -0.05;
pub const EXPLAINED_DELTA: f64 = 0.15;

/// learning → learned
pub const LEARNED_THRESHOLD: f64 = 0.7;
/// learned → learning
pub const DEMOTION_THRESHOLD: f64 = 0.1;
/// learned → mastered
pub const MASTERY_THRESHOLD: f64 = 0.9;

/// Level precision: levels are rounded to 6 decimal places
const LEVEL_SCALE: f64 = 1_000_000.0;

/// Clamp to [0, 1] and drop floating-point noise so `0.55 + 0.15 == 0.7`
pub fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        return 0.0;
    }
    (level.clamp(0.0, 1.0) * LEVEL_SCALE).round() / LEVEL_SCALE
}

fn level_delta(action: LearningAction) -> f64 {
    match action {
        LearningAction::Read => READ_DELTA,
        LearningAction::TestedSuccess => TESTED_SUCCESS_DELTA,
        LearningAction::TestedFail => TESTED_FAIL_DELTA,
        LearningAction::Explained => EXPLAINED_DELTA,
        LearningAction::Mastered => 0.0,
    }
}

/// Apply one action to a state in place. Pure apart from the given timestamp.
pub fn transition(
    state: &mut UserKnowledgeState,
    action: LearningAction,
    explicit_level: Option<f64>,
    at: DateTime<Utc>,
) {
    use KnowledgeStatus::*;

    if action == LearningAction::Mastered {
        state.level = 1.0;
        state.status = Mastered;
        state.prior_status = None;
    } else {
        let next = explicit_level.unwrap_or(state.level + level_delta(action));
        state.level = clamp_level(next);

        if !state.status.is_override() {
            let level = state.level;
            state.status = match (action, state.status) {
                (LearningAction::Read, Unknown) => Learning,
                (LearningAction::TestedSuccess, Learning) if level >= LEARNED_THRESHOLD => Learned,
                (LearningAction::TestedFail, Learned) if level <= DEMOTION_THRESHOLD => Learning,
                (LearningAction::Explained, Unknown | Learning) if level >= LEARNED_THRESHOLD => {
                    Learned
                }
                (_, status) => status,
            };

            if state.status == Learned && state.level >= MASTERY_THRESHOLD {
                state.status = Mastered;
            }
        }
    }

    state.record(action.into(), at);
}

/// User-directed override of the automatic graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOverride {
    Mute,
    Ignore,
}

pub struct LearnerStateTracker {
    units: Arc<dyn UnitStore>,
    states: Arc<dyn StateStore>,
    ids: Arc<dyn IdGenerator>,
    update_lock: Mutex<()>,
}

impl LearnerStateTracker {
    pub fn new(
        units: Arc<dyn UnitStore>,
        states: Arc<dyn StateStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            units,
            states,
            ids,
            update_lock: Mutex::new(()),
        }
    }

    /// Create the initial `unknown/0` state for a freshly created unit.
    ///
    /// A unit never gets a second state: if one already exists the creation
    /// is suppressed and the existing state is returned.
    pub async fn initialize(&self, unit_id: &UnitId) -> CoreResult<UserKnowledgeState> {
        let _guard = self.update_lock.lock().await;
        self.initialize_locked(unit_id).await
    }

    async fn initialize_locked(&self, unit_id: &UnitId) -> CoreResult<UserKnowledgeState> {
        if let Some(existing) = self.states.state_for_unit(unit_id).await? {
            warn!(
                unit_id = %unit_id,
                state_id = %existing.id,
                "Invariant violation: unit already has a knowledge state, reusing it"
            );
            return Ok(existing);
        }

        let state =
            UserKnowledgeState::initial(StateId::generate(self.ids.as_ref()), unit_id.clone(), Utc::now());
        self.states.put_state(state.clone()).await?;
        debug!(unit_id = %unit_id, state_id = %state.id, "Created knowledge state");
        Ok(state)
    }

    /// Current state of a unit, if any
    pub async fn state_for(&self, unit_id: &UnitId) -> CoreResult<Option<UserKnowledgeState>> {
        self.states.state_for_unit(unit_id).await
    }

    pub async fn list(&self) -> CoreResult<Vec<UserKnowledgeState>> {
        self.states.list_states().await
    }

    /// Apply a learning action to a unit's state and persist it.
    ///
    /// Fails with `NotFound` if the unit does not exist. A unit without a
    /// state gets a default one first.
    pub async fn apply(
        &self,
        unit_id: &UnitId,
        action: LearningAction,
        explicit_level: Option<f64>,
    ) -> CoreResult<UserKnowledgeState> {
        let _guard = self.update_lock.lock().await;
        let mut state = self.load_or_heal(unit_id).await?;

        let before = state.status;
        transition(&mut state, action, explicit_level, Utc::now());
        self.states.put_state(state.clone()).await?;

        if before != state.status {
            info!(
                unit_id = %unit_id,
                action = %action,
                from = %before,
                to = %state.status,
                level = state.level,
                "Knowledge status changed"
            );
        } else {
            debug!(unit_id = %unit_id, action = %action, level = state.level, "Knowledge level updated");
        }

        Ok(state)
    }

    /// Mute or ignore a unit, remembering the status to restore later
    pub async fn set_override(
        &self,
        unit_id: &UnitId,
        status_override: StatusOverride,
    ) -> CoreResult<UserKnowledgeState> {
        let _guard = self.update_lock.lock().await;
        let mut state = self.load_or_heal(unit_id).await?;

        if !state.status.is_override() {
            state.prior_status = Some(state.status);
        }
        let (status, action) = match status_override {
            StatusOverride::Mute => (KnowledgeStatus::Muted, HistoryAction::Muted),
            StatusOverride::Ignore => (KnowledgeStatus::Ignored, HistoryAction::Ignored),
        };
        state.status = status;
        state.record(action, Utc::now());

        self.states.put_state(state.clone()).await?;
        info!(unit_id = %unit_id, status = %state.status, "Knowledge status overridden");
        Ok(state)
    }

    pub async fn mute(&self, unit_id: &UnitId) -> CoreResult<UserKnowledgeState> {
        self.set_override(unit_id, StatusOverride::Mute).await
    }

    pub async fn ignore(&self, unit_id: &UnitId) -> CoreResult<UserKnowledgeState> {
        self.set_override(unit_id, StatusOverride::Ignore).await
    }

    /// Undo a mute/ignore override.
    ///
    /// Muted units return to their prior status with their level intact;
    /// ignored units start over as `unknown` at level 0.
    pub async fn restore(&self, unit_id: &UnitId) -> CoreResult<UserKnowledgeState> {
        let _guard = self.update_lock.lock().await;
        let mut state = self.load_or_heal(unit_id).await?;

        match state.status {
            KnowledgeStatus::Muted => {
                state.status = state.prior_status.take().unwrap_or_default();
            }
            KnowledgeStatus::Ignored => {
                state.status = KnowledgeStatus::Unknown;
                state.level = 0.0;
                state.prior_status = None;
            }
            _ => {}
        }
        state.record(HistoryAction::Restored, Utc::now());

        self.states.put_state(state.clone()).await?;
        info!(unit_id = %unit_id, status = %state.status, "Knowledge status restored");
        Ok(state)
    }

    /// Aggregate view over all states
    pub async fn avatar_stats(&self) -> CoreResult<AvatarStats> {
        let total_units = self.units.count_units().await?;
        let states = self.states.list_states().await?;
        Ok(AvatarStats::from_states(total_units, &states))
    }

    async fn load_or_heal(&self, unit_id: &UnitId) -> CoreResult<UserKnowledgeState> {
        if self.units.get_unit(unit_id).await?.is_none() {
            return Err(CoreError::not_found("unit", unit_id));
        }

        match self.states.state_for_unit(unit_id).await? {
            Some(state) => Ok(state),
            None => {
                warn!(unit_id = %unit_id, "Unit has no knowledge state, creating default");
                self.initialize_locked(unit_id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use crate::types::{KnowledgeUnit, SequentialIdGenerator, UnitKind};
    use proptest::prelude::*;

    fn fresh_state() -> UserKnowledgeState {
        UserKnowledgeState::initial(StateId::new("uks_1"), UnitId::new("unit_1"), Utc::now())
    }

    fn state_at(status: KnowledgeStatus, level: f64) -> UserKnowledgeState {
        let mut state = fresh_state();
        state.status = status;
        state.level = level;
        state
    }

    async fn tracker_with_unit() -> (LearnerStateTracker, Arc<InMemoryStore>, UnitId) {
        let store = Arc::new(InMemoryStore::new());
        let unit_id = UnitId::new("unit_1");
        store
            .put_unit(KnowledgeUnit {
                id: unit_id.clone(),
                title: "Osmosis".to_string(),
                kind: UnitKind::Concept,
                description: String::new(),
                source_block_ids: vec![],
                confidence: 0.8,
            })
            .await
            .unwrap();
        let tracker = LearnerStateTracker::new(
            store.clone(),
            store.clone(),
            Arc::new(SequentialIdGenerator::new()),
        );
        (tracker, store, unit_id)
    }

    #[test]
    fn test_read_then_two_successes() {
        let mut state = fresh_state();
        let now = Utc::now();
        transition(&mut state, LearningAction::Read, None, now);
        transition(&mut state, LearningAction::TestedSuccess, None, now);
        transition(&mut state, LearningAction::TestedSuccess, None, now);

        assert_eq!(state.level, 0.4);
        assert_eq!(state.status, KnowledgeStatus::Learning);
        assert_eq!(state.history.len(), 4);
    }

    #[test]
    fn test_success_reaches_learned_at_threshold() {
        let mut state = fresh_state();
        let now = Utc::now();
        transition(&mut state, LearningAction::Read, None, now);
        for _ in 0..4 {
            transition(&mut state, LearningAction::TestedSuccess, None, now);
        }
        assert_eq!(state.level, 0.7);
        assert_eq!(state.status, KnowledgeStatus::Learned);
    }

    #[test]
    fn test_learned_stays_learned_until_demotion_threshold() {
        let mut state = state_at(KnowledgeStatus::Learned, 0.75);
        let now = Utc::now();
        for expected in [0.7, 0.65, 0.6] {
            transition(&mut state, LearningAction::TestedFail, None, now);
            assert_eq!(state.level, expected);
            assert_eq!(state.status, KnowledgeStatus::Learned);
        }

        let mut low = state_at(KnowledgeStatus::Learned, 0.15);
        transition(&mut low, LearningAction::TestedFail, None, now);
        assert_eq!(low.level, 0.1);
        assert_eq!(low.status, KnowledgeStatus::Learning);
    }

    #[test]
    fn test_learned_promotes_to_mastered_at_point_nine() {
        let mut state = state_at(KnowledgeStatus::Learned, 0.8);
        transition(&mut state, LearningAction::TestedSuccess, None, Utc::now());
        assert_eq!(state.level, 0.95);
        assert_eq!(state.status, KnowledgeStatus::Mastered);
    }

    #[test]
    fn test_learning_can_jump_to_mastered_in_one_step() {
        let mut state = state_at(KnowledgeStatus::Learning, 0.85);
        transition(&mut state, LearningAction::TestedSuccess, None, Utc::now());
        assert_eq!(state.level, 1.0);
        assert_eq!(state.status, KnowledgeStatus::Mastered);
    }

    #[test]
    fn test_explained_promotes_from_unknown() {
        let mut state = state_at(KnowledgeStatus::Unknown, 0.6);
        transition(&mut state, LearningAction::Explained, None, Utc::now());
        assert_eq!(state.status, KnowledgeStatus::Learned);

        let mut mastered = state_at(KnowledgeStatus::Mastered, 0.95);
        transition(&mut mastered, LearningAction::Explained, None, Utc::now());
        assert_eq!(mastered.status, KnowledgeStatus::Mastered);
    }

    #[test]
    fn test_explicit_mastered_is_unconditional() {
        let mut state = state_at(KnowledgeStatus::Ignored, 0.2);
        state.prior_status = Some(KnowledgeStatus::Learning);
        transition(&mut state, LearningAction::Mastered, Some(0.3), Utc::now());
        assert_eq!(state.level, 1.0);
        assert_eq!(state.status, KnowledgeStatus::Mastered);
        assert_eq!(state.prior_status, None);
    }

    #[test]
    fn test_explicit_level_replaces_delta() {
        let mut state = state_at(KnowledgeStatus::Learning, 0.2);
        transition(&mut state, LearningAction::TestedSuccess, Some(0.75), Utc::now());
        assert_eq!(state.level, 0.75);
        assert_eq!(state.status, KnowledgeStatus::Learned);
    }

    #[test]
    fn test_overrides_suspend_automatic_rules() {
        let mut state = state_at(KnowledgeStatus::Muted, 0.0);
        transition(&mut state, LearningAction::Read, None, Utc::now());
        assert_eq!(state.status, KnowledgeStatus::Muted);
        assert_eq!(state.level, 0.1);
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(-0.3), 0.0);
        assert_eq!(clamp_level(1.7), 1.0);
        assert_eq!(clamp_level(f64::NAN), 0.0);
        assert_eq!(clamp_level(0.55 + 0.15), 0.7);
    }

    fn any_action() -> impl Strategy<Value = LearningAction> {
        prop_oneof![
            Just(LearningAction::Read),
            Just(LearningAction::TestedSuccess),
            Just(LearningAction::TestedFail),
            Just(LearningAction::Explained),
            Just(LearningAction::Mastered),
        ]
    }

    proptest! {
        #[test]
        fn prop_level_always_within_bounds(
            steps in prop::collection::vec((any_action(), prop::option::of(-2.0f64..3.0)), 0..60)
        ) {
            let mut state = fresh_state();
            for (action, explicit) in steps {
                transition(&mut state, action, explicit, Utc::now());
                prop_assert!((0.0..=1.0).contains(&state.level));
            }
        }

        #[test]
        fn prop_every_action_is_recorded(actions in prop::collection::vec(any_action(), 0..30)) {
            let mut state = fresh_state();
            for action in &actions {
                transition(&mut state, *action, None, Utc::now());
            }
            prop_assert_eq!(state.history.len(), actions.len() + 1);
        }
    }

    #[tokio::test]
    async fn test_apply_to_missing_unit_is_not_found() {
        let (tracker, _store, _unit) = tracker_with_unit().await;
        let err = tracker
            .apply(&UnitId::new("ghost"), LearningAction::Read, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_apply_heals_missing_state() {
        let (tracker, store, unit_id) = tracker_with_unit().await;
        assert!(store.state_for_unit(&unit_id).await.unwrap().is_none());

        let state = tracker
            .apply(&unit_id, LearningAction::Read, None)
            .await
            .unwrap();
        assert_eq!(state.status, KnowledgeStatus::Learning);
        assert_eq!(state.level, 0.1);
        // initial read entry + applied read
        assert_eq!(state.history.len(), 2);
        assert_eq!(store.list_states().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_twice_reuses_state() {
        let (tracker, store, unit_id) = tracker_with_unit().await;
        let first = tracker.initialize(&unit_id).await.unwrap();
        let second = tracker.initialize(&unit_id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_states().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mute_and_restore_keeps_level() {
        let (tracker, _store, unit_id) = tracker_with_unit().await;
        tracker.initialize(&unit_id).await.unwrap();
        tracker
            .apply(&unit_id, LearningAction::Read, None)
            .await
            .unwrap();

        let muted = tracker
            .set_override(&unit_id, StatusOverride::Mute)
            .await
            .unwrap();
        assert_eq!(muted.status, KnowledgeStatus::Muted);
        assert_eq!(muted.prior_status, Some(KnowledgeStatus::Learning));

        let restored = tracker.restore(&unit_id).await.unwrap();
        assert_eq!(restored.status, KnowledgeStatus::Learning);
        assert_eq!(restored.level, 0.1);
        assert_eq!(restored.prior_status, None);
    }

    #[tokio::test]
    async fn test_restore_from_ignored_resets_level() {
        let (tracker, _store, unit_id) = tracker_with_unit().await;
        tracker.initialize(&unit_id).await.unwrap();
        tracker
            .apply(&unit_id, LearningAction::Explained, Some(0.8))
            .await
            .unwrap();

        tracker
            .set_override(&unit_id, StatusOverride::Mute)
            .await
            .unwrap();
        let ignored = tracker
            .set_override(&unit_id, StatusOverride::Ignore)
            .await
            .unwrap();
        // prior status survives stacked overrides
        assert_eq!(ignored.prior_status, Some(KnowledgeStatus::Learned));

        let restored = tracker.restore(&unit_id).await.unwrap();
        assert_eq!(restored.status, KnowledgeStatus::Unknown);
        assert_eq!(restored.level, 0.0);
        assert_eq!(
            restored.history.last().map(|h| h.action),
            Some(HistoryAction::Restored)
        );
    }

    #[tokio::test]
    async fn test_avatar_stats() {
        let (tracker, _store, unit_id) = tracker_with_unit().await;
        tracker.initialize(&unit_id).await.unwrap();
        tracker
            .apply(&unit_id, LearningAction::Mastered, None)
            .await
            .unwrap();

        let stats = tracker.avatar_stats().await.unwrap();
        assert_eq!(stats.total_units, 1);
        assert_eq!(stats.mastered_units, 1);
        assert_eq!(stats.average_level, 1.0);
    }
}
