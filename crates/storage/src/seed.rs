use refika_core::model::{MatchingGame, Quiz, Term, TermId};
use serde::{Deserialize, Serialize};

use crate::repository::{Storage, StorageError};

/// Catalog snapshot loaded from JSON, e.g. an export of the hosted backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub games: Vec<MatchingGame>,
}

impl SeedData {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the JSON does not match the seed shape.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Validate every record and write it through the repositories.
    ///
    /// Quizzes and games must belong to a term that is already stored or
    /// part of this seed.
    ///
    /// # Errors
    ///
    /// Returns the first validation or storage failure, or
    /// `StorageError::TermNotFound` for a record pointing at an unknown term.
    /// Records written before it stay written.
    pub async fn load_into(self, storage: &Storage) -> Result<(), StorageError> {
        for term in &self.terms {
            storage.terms.upsert_term(term).await?;
        }
        for quiz in &self.quizzes {
            ensure_term(storage, quiz.term_id()).await?;
            storage.quizzes.upsert_quiz(quiz).await?;
        }
        for game in &self.games {
            ensure_term(storage, game.term_id()).await?;
            storage.games.upsert_game(game).await?;
        }
        Ok(())
    }
}

async fn ensure_term(storage: &Storage, term_id: TermId) -> Result<(), StorageError> {
    match storage.terms.get_term(term_id).await? {
        Some(_) => Ok(()),
        None => Err(StorageError::TermNotFound(term_id)),
    }
}
