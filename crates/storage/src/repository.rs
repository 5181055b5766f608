use async_trait::async_trait;
use refika_core::model::{
    GameError, GameId, MatchingGame, MatchingGameDraft, Quiz, QuizDraft, QuizError, QuizId, Term,
    TermError, TermId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::page::{ListQuery, Page};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("term {0} not found")]
    TermNotFound(TermId),

    #[error("term {0} still has quizzes or matching games")]
    TermInUse(TermId),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Term(#[from] TermError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Listing row for a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    pub question_count: usize,
}

/// Listing row for a matching game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub title: String,
    pub pair_count: usize,
}

#[async_trait]
pub trait TermRepository: Send + Sync {
    /// Create a term; the generated id comes back with it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Term` if the name is blank.
    async fn insert_term(&self, name: &str) -> Result<Term, StorageError>;

    /// Persist a term under its existing id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the term cannot be stored.
    async fn upsert_term(&self, term: &Term) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_term(&self, id: TermId) -> Result<Option<Term>, StorageError>;

    /// All terms ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_terms(&self) -> Result<Vec<Term>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no term has this id, or
    /// `StorageError::TermInUse` while quizzes or games still belong to it.
    async fn delete_term(&self, id: TermId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Validate and store a new quiz, returning it with generated ids.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Quiz` if the draft is invalid.
    async fn insert_quiz(&self, draft: QuizDraft) -> Result<Quiz, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError>;

    /// Quizzes of a term, filtered by title and paginated.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_quizzes(
        &self,
        term_id: TermId,
        query: &ListQuery,
    ) -> Result<Page<QuizSummary>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no quiz has this id.
    async fn delete_quiz(&self, id: QuizId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait MatchingGameRepository: Send + Sync {
    /// Validate and store a new game, returning it with generated ids.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Game` if the draft is invalid.
    async fn insert_game(&self, draft: MatchingGameDraft) -> Result<MatchingGame, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the game cannot be stored.
    async fn upsert_game(&self, game: &MatchingGame) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_game(&self, id: GameId) -> Result<Option<MatchingGame>, StorageError>;

    /// Games of a term, filtered by title and paginated.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_games(
        &self,
        term_id: TermId,
        query: &ListQuery,
    ) -> Result<Page<GameSummary>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no game has this id.
    async fn delete_game(&self, id: GameId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for tests and the terminal driver.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    terms: Arc<Mutex<HashMap<TermId, Term>>>,
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    games: Arc<Mutex<HashMap<GameId, MatchingGame>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TermRepository for InMemoryRepository {
    async fn insert_term(&self, name: &str) -> Result<Term, StorageError> {
        let term = Term::new(TermId::generate(), name)?;
        lock(&self.terms)?.insert(term.id(), term.clone());
        Ok(term)
    }

    async fn upsert_term(&self, term: &Term) -> Result<(), StorageError> {
        term.validate()?;
        lock(&self.terms)?.insert(term.id(), term.clone());
        Ok(())
    }

    async fn get_term(&self, id: TermId) -> Result<Option<Term>, StorageError> {
        Ok(lock(&self.terms)?.get(&id).cloned())
    }

    async fn list_terms(&self) -> Result<Vec<Term>, StorageError> {
        let mut terms: Vec<Term> = lock(&self.terms)?.values().cloned().collect();
        terms.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(terms)
    }

    async fn delete_term(&self, id: TermId) -> Result<(), StorageError> {
        let in_use = lock(&self.quizzes)?.values().any(|quiz| quiz.term_id() == id)
            || lock(&self.games)?.values().any(|game| game.term_id() == id);
        if in_use {
            return Err(StorageError::TermInUse(id));
        }
        lock(&self.terms)?
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn insert_quiz(&self, draft: QuizDraft) -> Result<Quiz, StorageError> {
        let quiz = draft.build()?;
        lock(&self.quizzes)?.insert(quiz.id(), quiz.clone());
        Ok(quiz)
    }

    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        quiz.validate()?;
        lock(&self.quizzes)?.insert(quiz.id(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        Ok(lock(&self.quizzes)?.get(&id).cloned())
    }

    async fn list_quizzes(
        &self,
        term_id: TermId,
        query: &ListQuery,
    ) -> Result<Page<QuizSummary>, StorageError> {
        let mut rows: Vec<QuizSummary> = lock(&self.quizzes)?
            .values()
            .filter(|quiz| quiz.term_id() == term_id && query.matches_title(quiz.title()))
            .map(|quiz| QuizSummary {
                id: quiz.id(),
                title: quiz.title().to_owned(),
                question_count: quiz.questions().len(),
            })
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(query.paginate(rows))
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<(), StorageError> {
        lock(&self.quizzes)?
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl MatchingGameRepository for InMemoryRepository {
    async fn insert_game(&self, draft: MatchingGameDraft) -> Result<MatchingGame, StorageError> {
        let game = draft.build()?;
        lock(&self.games)?.insert(game.id(), game.clone());
        Ok(game)
    }

    async fn upsert_game(&self, game: &MatchingGame) -> Result<(), StorageError> {
        game.validate()?;
        lock(&self.games)?.insert(game.id(), game.clone());
        Ok(())
    }

    async fn get_game(&self, id: GameId) -> Result<Option<MatchingGame>, StorageError> {
        Ok(lock(&self.games)?.get(&id).cloned())
    }

    async fn list_games(
        &self,
        term_id: TermId,
        query: &ListQuery,
    ) -> Result<Page<GameSummary>, StorageError> {
        let mut rows: Vec<GameSummary> = lock(&self.games)?
            .values()
            .filter(|game| game.term_id() == term_id && query.matches_title(game.title()))
            .map(|game| GameSummary {
                id: game.id(),
                title: game.title().to_owned(),
                pair_count: game.pairs().len(),
            })
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(query.paginate(rows))
    }

    async fn delete_game(&self, id: GameId) -> Result<(), StorageError> {
        lock(&self.games)?
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub terms: Arc<dyn TermRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub games: Arc<dyn MatchingGameRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let terms: Arc<dyn TermRepository> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let games: Arc<dyn MatchingGameRepository> = Arc::new(repo);
        Self {
            terms,
            quizzes,
            games,
        }
    }
}
