//! Shared error types for the services crate.

use thiserror::Error;

use refika_core::model::{GameError, GameId, PairError, QuizError, QuizId, TermId};
use storage::StorageError;

use crate::matching::MatchingSettingsError;

/// Errors emitted by the matching engine and `MatchingLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchingError {
    #[error("matching game {0} not found")]
    GameNotFound(GameId),
    #[error(transparent)]
    InvalidPairs(#[from] PairError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Settings(#[from] MatchingSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizFlow` and `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("no questions available for this quiz")]
    NoQuestions,
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("page limit must be > 0")]
    InvalidLimit,
    #[error("term {0} not found")]
    TermNotFound(TermId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
