use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use refika_core::Clock;
use refika_core::model::{MatchingPair, PairId, validate_pairs};

use super::events::{Deferred, DeferredKind, MatchEvent, MatchingProgress, SessionStatus};
use super::round::Round;
use super::settings::MatchingSettings;
use crate::error::MatchingError;

//
// ─── BUILDER ───────────────────────────────────────────────────────────────────
//

/// Configures a session before its first shuffle.
#[derive(Debug, Default)]
pub struct MatchingSessionBuilder {
    settings: MatchingSettings,
    clock: Clock,
    rng: Option<StdRng>,
}

impl MatchingSessionBuilder {
    #[must_use]
    pub fn settings(mut self, settings: MatchingSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Use a seeded generator so every shuffle is reproducible.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Validate `pairs`, shuffle them into the pool and put the first round on the board.
    ///
    /// An empty collection gives a session that is already won, with zero rounds.
    ///
    /// # Errors
    ///
    /// Returns `MatchingError::InvalidPairs` for duplicate ids or blank texts.
    pub fn start(self, pairs: Vec<MatchingPair>) -> Result<MatchingSession, MatchingError> {
        validate_pairs(&pairs)?;
        let rng = self
            .rng
            .unwrap_or_else(|| StdRng::from_rng(&mut rand::rng()));

        let mut session = MatchingSession {
            settings: self.settings,
            clock: self.clock,
            rng,
            pairs,
            pool: VecDeque::new(),
            round: None,
            rounds_loaded: 0,
            matched: HashSet::new(),
            selected_left: None,
            completed: 0,
            status: SessionStatus::InProgress,
            pending: None,
            generation: 0,
        };
        session.reset();
        Ok(session)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-threaded matching game: shuffles pairs into rounds and tracks
/// left/right selections until the player clears every round or makes one
/// wrong pairing.
///
/// Every input method returns the events it produced. Out-of-order input
/// (a right click with nothing selected, clicking a matched pair, anything
/// after the game ended) is ignored and yields no events.
pub struct MatchingSession {
    settings: MatchingSettings,
    clock: Clock,
    rng: StdRng,
    pairs: Vec<MatchingPair>,
    pool: VecDeque<MatchingPair>,
    round: Option<Round>,
    rounds_loaded: usize,
    matched: HashSet<PairId>,
    selected_left: Option<PairId>,
    completed: usize,
    status: SessionStatus,
    pending: Option<Deferred>,
    generation: u64,
}

impl MatchingSession {
    #[must_use]
    pub fn builder() -> MatchingSessionBuilder {
        MatchingSessionBuilder::default()
    }

    /// Start a session with default settings, the system clock and a fresh random shuffle.
    ///
    /// # Errors
    ///
    /// Returns `MatchingError::InvalidPairs` for duplicate ids or blank texts.
    pub fn start(pairs: Vec<MatchingPair>) -> Result<Self, MatchingError> {
        Self::builder().start(pairs)
    }

    /// Throw away all progress and replay the original collection with a new shuffle.
    pub fn restart(&mut self) -> Vec<MatchEvent> {
        tracing::debug!(generation = self.generation + 1, "restarting matching session");
        self.reset()
    }

    /// Remember `id` as the pending left-side pick, replacing any earlier one.
    pub fn select_left(&mut self, id: PairId) -> Vec<MatchEvent> {
        if !self.accepts_input() || self.matched.contains(&id) || !self.on_board(id) {
            return Vec::new();
        }
        self.selected_left = Some(id);
        vec![MatchEvent::LeftSelected { id }]
    }

    /// Pair the pending left pick with the right-side fragment of `id`.
    ///
    /// The pick is correct only when both fragments come from the same pair;
    /// texts are never compared.
    pub fn select_right(&mut self, id: PairId) -> Vec<MatchEvent> {
        if !self.accepts_input() || self.matched.contains(&id) || !self.on_board(id) {
            return Vec::new();
        }
        let Some(left) = self.selected_left.take() else {
            return Vec::new();
        };

        if left != id {
            tracing::debug!(%left, right = %id, "mismatch");
            self.schedule(DeferredKind::Lose, self.settings.mismatch_delay());
            return vec![MatchEvent::Mismatch { left, right: id }];
        }

        self.matched.insert(id);
        self.completed += 1;
        tracing::debug!(%id, completed = self.completed, "pair matched");
        let mut events = vec![MatchEvent::PairMatched {
            id,
            completed: self.completed,
        }];

        if let Some(round) = &self.round
            && self.matched.len() == round.len()
        {
            events.push(MatchEvent::RoundComplete {
                round: round.index(),
            });
            let kind = if self.pool.is_empty() {
                DeferredKind::Win
            } else {
                DeferredKind::NextRound
            };
            self.schedule(kind, self.settings.next_round_delay());
        }
        events
    }

    /// Resolve the pending transition if it is due according to the session clock.
    pub fn poll(&mut self) -> Vec<MatchEvent> {
        self.poll_at(self.clock.now())
    }

    /// Resolve the pending transition if it is due at `now`.
    pub fn poll_at(&mut self, now: DateTime<Utc>) -> Vec<MatchEvent> {
        match self.pending {
            Some(deferred) if deferred.is_due(now) => self.resolve(deferred),
            _ => Vec::new(),
        }
    }

    /// Resolve the pending transition immediately, skipping the animation delay.
    pub fn flush_pending(&mut self) -> Vec<MatchEvent> {
        match self.pending {
            Some(deferred) => self.resolve(deferred),
            None => Vec::new(),
        }
    }

    /// Apply a deferred transition handed out by `pending`.
    ///
    /// Stale transitions (already resolved, or scheduled before a restart)
    /// are dropped.
    pub fn resolve(&mut self, deferred: Deferred) -> Vec<MatchEvent> {
        if self.pending != Some(deferred) {
            tracing::trace!(
                generation = deferred.generation,
                current = self.generation,
                "dropping stale deferred transition"
            );
            return Vec::new();
        }
        self.pending = None;
        match deferred.kind {
            DeferredKind::NextRound => self.load_next_round(),
            DeferredKind::Win => self.finish(SessionStatus::Won),
            DeferredKind::Lose => self.finish(SessionStatus::Lost),
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<Deferred> {
        self.pending
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn selected_left(&self) -> Option<PairId> {
        self.selected_left
    }

    #[must_use]
    pub fn is_matched(&self, id: PairId) -> bool {
        self.matched.contains(&id)
    }

    #[must_use]
    pub fn matched_ids(&self) -> &HashSet<PairId> {
        &self.matched
    }

    /// Correct pairings since the last start or restart.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// Pairs still waiting for a round.
    #[must_use]
    pub fn remaining_in_pool(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn progress(&self) -> MatchingProgress {
        MatchingProgress {
            completed: self.completed,
            total: self.pairs.len(),
            round: self.rounds_loaded,
            rounds_total: self.settings.rounds_for(self.pairs.len()),
            status: self.status,
        }
    }

    fn accepts_input(&self) -> bool {
        !self.status.is_terminal() && self.pending.is_none()
    }

    fn on_board(&self, id: PairId) -> bool {
        self.round.as_ref().is_some_and(|round| round.contains(id))
    }

    fn schedule(&mut self, kind: DeferredKind, delay: Duration) {
        self.pending = Some(Deferred {
            generation: self.generation,
            kind,
            due_at: self.clock.deadline_after(delay),
            delay,
        });
    }

    fn reset(&mut self) -> Vec<MatchEvent> {
        self.generation += 1;
        self.pending = None;

        let mut shuffled = self.pairs.clone();
        shuffled.shuffle(&mut self.rng);
        self.pool = VecDeque::from(shuffled);

        self.round = None;
        self.rounds_loaded = 0;
        self.matched.clear();
        self.selected_left = None;
        self.completed = 0;
        self.status = SessionStatus::InProgress;
        tracing::debug!(
            pairs = self.pairs.len(),
            generation = self.generation,
            "matching session started"
        );
        self.load_next_round()
    }

    fn load_next_round(&mut self) -> Vec<MatchEvent> {
        let drawn = Round::draw(
            self.rounds_loaded,
            &mut self.pool,
            self.settings.set_size(),
            &mut self.rng,
        );
        let Some(round) = drawn else {
            return self.finish(SessionStatus::Won);
        };

        self.matched.clear();
        self.selected_left = None;
        self.rounds_loaded += 1;
        tracing::debug!(round = round.index(), size = round.len(), "round loaded");

        let event = MatchEvent::RoundChanged {
            round: round.index(),
            left_order: round.left_order().to_vec(),
            right_order: round.right_order().to_vec(),
        };
        self.round = Some(round);
        vec![event]
    }

    fn finish(&mut self, status: SessionStatus) -> Vec<MatchEvent> {
        self.status = status;
        self.round = None;
        self.matched.clear();
        self.selected_left = None;
        self.pending = None;

        let completed = self.completed;
        tracing::info!(?status, completed, total = self.pairs.len(), "matching session finished");
        match status {
            SessionStatus::Lost => vec![MatchEvent::Lost { completed }],
            _ => vec![MatchEvent::Won { completed }],
        }
    }
}

impl fmt::Debug for MatchingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingSession")
            .field("pairs_len", &self.pairs.len())
            .field("pool_len", &self.pool.len())
            .field("round", &self.round.as_ref().map(Round::index))
            .field("matched_len", &self.matched.len())
            .field("selected_left", &self.selected_left)
            .field("completed", &self.completed)
            .field("status", &self.status)
            .field("pending", &self.pending.map(|d| d.kind))
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use refika_core::time::{fixed_clock, fixed_now};

    fn pairs(n: u128) -> Vec<MatchingPair> {
        (1..=n)
            .map(|i| {
                MatchingPair::new(PairId::from_u128(i), format!("L{i}"), format!("R{i}")).unwrap()
            })
            .collect()
    }

    fn session(n: u128) -> MatchingSession {
        MatchingSession::builder()
            .clock(fixed_clock())
            .seed(42)
            .start(pairs(n))
            .unwrap()
    }

    fn round_ids(session: &MatchingSession) -> Vec<PairId> {
        session.round().unwrap().left_order().to_vec()
    }

    /// Match every pair on the board in left-column order.
    fn clear_round(session: &mut MatchingSession) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        for id in round_ids(session) {
            events.extend(session.select_left(id));
            events.extend(session.select_right(id));
        }
        events
    }

    #[test]
    fn seven_pairs_play_as_five_then_two() {
        let mut session = session(7);
        assert_eq!(session.round().unwrap().len(), 5);

        let events = clear_round(&mut session);
        assert!(events.contains(&MatchEvent::RoundComplete { round: 0 }));
        assert_eq!(session.pending().unwrap().kind(), DeferredKind::NextRound);

        let events = session.flush_pending();
        assert!(matches!(events[..], [MatchEvent::RoundChanged { round: 1, .. }]));
        assert_eq!(session.round().unwrap().len(), 2);
        assert!(session.matched_ids().is_empty());

        clear_round(&mut session);
        assert_eq!(session.pending().unwrap().kind(), DeferredKind::Win);
        let events = session.flush_pending();
        assert_eq!(events, vec![MatchEvent::Won { completed: 7 }]);
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(session.completed_count(), 7);
        assert!(session.round().is_none());
    }

    #[test]
    fn mismatch_loses_after_delay() {
        let mut session = session(5);
        let ids = round_ids(&session);

        session.select_left(ids[0]);
        let events = session.select_right(ids[1]);
        assert_eq!(
            events,
            vec![MatchEvent::Mismatch {
                left: ids[0],
                right: ids[1]
            }]
        );
        assert_eq!(session.status(), SessionStatus::InProgress);

        let early = fixed_now() + chrono::Duration::milliseconds(399);
        assert!(session.poll_at(early).is_empty());
        assert_eq!(session.status(), SessionStatus::InProgress);

        let due = fixed_now() + chrono::Duration::milliseconds(400);
        assert_eq!(session.poll_at(due), vec![MatchEvent::Lost { completed: 0 }]);
        assert_eq!(session.status(), SessionStatus::Lost);
    }

    #[test]
    fn round_advance_waits_for_next_round_delay() {
        let mut session = session(6);
        clear_round(&mut session);

        let pending = session.pending().unwrap();
        assert_eq!(pending.kind(), DeferredKind::NextRound);
        assert_eq!(pending.due_at(), fixed_now() + chrono::Duration::milliseconds(600));

        assert!(session.poll_at(fixed_now() + chrono::Duration::milliseconds(599)).is_empty());
        let events = session.poll_at(fixed_now() + chrono::Duration::milliseconds(600));
        assert!(matches!(events[..], [MatchEvent::RoundChanged { round: 1, .. }]));
    }

    #[test]
    fn select_right_without_left_is_noop() {
        let mut session = session(5);
        let id = round_ids(&session)[0];

        assert!(session.select_right(id).is_empty());
        assert_eq!(session.completed_count(), 0);
        assert_eq!(session.selected_left(), None);
        assert!(session.pending().is_none());
    }

    #[test]
    fn new_left_pick_replaces_pending_one() {
        let mut session = session(5);
        let ids = round_ids(&session);

        session.select_left(ids[0]);
        session.select_left(ids[1]);
        assert_eq!(session.selected_left(), Some(ids[1]));

        let events = session.select_right(ids[1]);
        assert!(matches!(events[..], [MatchEvent::PairMatched { .. }]));
    }

    #[test]
    fn matched_pairs_ignore_further_clicks() {
        let mut session = session(5);
        let ids = round_ids(&session);
        session.select_left(ids[0]);
        session.select_right(ids[0]);

        assert!(session.select_left(ids[0]).is_empty());
        session.select_left(ids[1]);
        assert!(session.select_right(ids[0]).is_empty());
        assert_eq!(session.selected_left(), Some(ids[1]));
        assert_eq!(session.completed_count(), 1);
    }

    #[test]
    fn ids_off_the_board_are_ignored() {
        let mut session = session(7);
        let on_board = round_ids(&session);
        let off_board = (1..=7)
            .map(PairId::from_u128)
            .find(|id| !on_board.contains(id))
            .unwrap();

        assert!(session.select_left(off_board).is_empty());
        session.select_left(on_board[0]);
        assert!(session.select_right(off_board).is_empty());
        assert_eq!(session.selected_left(), Some(on_board[0]));
    }

    #[test]
    fn identical_texts_do_not_match_across_ids() {
        let twins = vec![
            MatchingPair::new(PairId::from_u128(1), "same", "same").unwrap(),
            MatchingPair::new(PairId::from_u128(2), "same", "same").unwrap(),
        ];
        let mut session = MatchingSession::builder()
            .clock(fixed_clock())
            .seed(1)
            .start(twins)
            .unwrap();

        session.select_left(PairId::from_u128(1));
        let events = session.select_right(PairId::from_u128(2));
        assert!(matches!(events[..], [MatchEvent::Mismatch { .. }]));
        session.flush_pending();
        assert_eq!(session.status(), SessionStatus::Lost);
    }

    #[test]
    fn input_is_locked_while_a_transition_is_pending() {
        let mut session = session(5);
        let ids = round_ids(&session);
        session.select_left(ids[0]);
        session.select_right(ids[1]);

        assert!(session.select_left(ids[2]).is_empty());
        assert!(session.select_right(ids[2]).is_empty());
    }

    #[test]
    fn terminal_states_ignore_input() {
        let mut session = session(5);
        let ids = round_ids(&session);
        session.select_left(ids[0]);
        session.select_right(ids[1]);
        session.flush_pending();

        assert!(session.select_left(ids[2]).is_empty());
        assert!(session.flush_pending().is_empty());
        assert_eq!(session.status(), SessionStatus::Lost);
    }

    #[test]
    fn empty_collection_is_won_immediately() {
        let session = MatchingSession::builder().seed(1).start(Vec::new()).unwrap();
        assert_eq!(session.status(), SessionStatus::Won);
        assert!(session.round().is_none());
        assert_eq!(session.progress().rounds_total, 0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut input = pairs(3);
        input.push(input[0].clone());
        let err = MatchingSession::start(input).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidPairs(_)));
    }

    #[test]
    fn restart_from_lost_resets_everything() {
        let mut session = session(7);
        clear_round(&mut session);
        session.flush_pending();
        let ids = round_ids(&session);
        session.select_left(ids[0]);
        session.select_right(ids[1]);
        session.flush_pending();
        assert_eq!(session.status(), SessionStatus::Lost);

        let events = session.restart();
        assert!(matches!(events[..], [MatchEvent::RoundChanged { round: 0, .. }]));
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.completed_count(), 0);
        assert_eq!(session.round().unwrap().len(), 5);
        assert_eq!(session.remaining_in_pool(), 2);
    }

    #[test]
    fn stale_transition_is_dropped_after_restart() {
        let mut session = session(5);
        let ids = round_ids(&session);
        session.select_left(ids[0]);
        session.select_right(ids[1]);
        let stale = session.pending().unwrap();

        session.restart();
        assert!(session.resolve(stale).is_empty());
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert!(session.pending().is_none());

        // A new transition in the new generation still resolves normally.
        let ids = round_ids(&session);
        session.select_left(ids[0]);
        session.select_right(ids[0]);
        assert!(session.resolve(stale).is_empty());
        assert_eq!(session.completed_count(), 1);
    }

    #[test]
    fn progress_tracks_rounds() {
        let mut session = session(12);
        let progress = session.progress();
        assert_eq!(progress.round, 1);
        assert_eq!(progress.rounds_total, 3);
        assert_eq!(progress.total, 12);

        clear_round(&mut session);
        session.flush_pending();
        assert_eq!(session.progress().round, 2);
        assert_eq!(session.progress().completed, 5);
        assert!(!session.progress().is_all_matched());

        while session.round().is_some() {
            clear_round(&mut session);
            session.flush_pending();
        }
        let progress = session.progress();
        assert!(progress.is_all_matched());
        assert!(progress.status.is_terminal());
    }
}
