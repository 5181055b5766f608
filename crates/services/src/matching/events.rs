use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use refika_core::model::PairId;

/// Lifecycle of a matching session. `Won` and `Lost` hold until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Won,
    Lost,
}

impl SessionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Won | SessionStatus::Lost)
    }
}

/// What a session reports back to the driving UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A new round is on the board; the match set starts empty.
    RoundChanged {
        round: usize,
        left_order: Vec<PairId>,
        right_order: Vec<PairId>,
    },
    LeftSelected { id: PairId },
    /// Carries no state meaning; drives the celebratory animation.
    PairMatched { id: PairId, completed: usize },
    RoundComplete { round: usize },
    /// Drives the shake animation; the loss follows after the mismatch delay.
    Mismatch { left: PairId, right: PairId },
    Won { completed: usize },
    Lost { completed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredKind {
    NextRound,
    Win,
    Lose,
}

/// A one-shot transition the session scheduled for later.
///
/// Tagged with the session generation: once the session restarts, a
/// deferred transition from before the restart resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub(crate) generation: u64,
    pub(crate) kind: DeferredKind,
    pub(crate) due_at: DateTime<Utc>,
    pub(crate) delay: Duration,
}

impl Deferred {
    #[must_use]
    pub fn kind(&self) -> DeferredKind {
        self.kind
    }

    #[must_use]
    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Delay it was scheduled with, for drivers that sleep rather than poll.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchingProgress {
    pub completed: usize,
    pub total: usize,
    /// One-based number of the round on the board, or the last one played.
    pub round: usize,
    pub rounds_total: usize,
    pub status: SessionStatus,
}

impl MatchingProgress {
    #[must_use]
    pub fn is_all_matched(&self) -> bool {
        self.completed == self.total
    }
}
