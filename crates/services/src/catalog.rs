use std::sync::Arc;

use refika_core::model::{Term, TermId};
use storage::repository::{
    GameSummary, MatchingGameRepository, QuizRepository, QuizSummary, TermRepository,
};
use storage::{ListQuery, Page};

use crate::error::CatalogError;

/// Term-scoped listings of quizzes and matching games.
#[derive(Clone)]
pub struct CatalogService {
    terms: Arc<dyn TermRepository>,
    quizzes: Arc<dyn QuizRepository>,
    games: Arc<dyn MatchingGameRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        terms: Arc<dyn TermRepository>,
        quizzes: Arc<dyn QuizRepository>,
        games: Arc<dyn MatchingGameRepository>,
    ) -> Self {
        Self {
            terms,
            quizzes,
            games,
        }
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn terms(&self) -> Result<Vec<Term>, CatalogError> {
        Ok(self.terms.list_terms().await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::InvalidLimit` for a zero page size,
    /// `CatalogError::TermNotFound` for an unknown term, or a storage error.
    pub async fn quizzes(
        &self,
        term_id: TermId,
        query: &ListQuery,
    ) -> Result<Page<QuizSummary>, CatalogError> {
        self.check(term_id, query).await?;
        Ok(self.quizzes.list_quizzes(term_id, query).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::InvalidLimit` for a zero page size,
    /// `CatalogError::TermNotFound` for an unknown term, or a storage error.
    pub async fn games(
        &self,
        term_id: TermId,
        query: &ListQuery,
    ) -> Result<Page<GameSummary>, CatalogError> {
        self.check(term_id, query).await?;
        Ok(self.games.list_games(term_id, query).await?)
    }

    async fn check(&self, term_id: TermId, query: &ListQuery) -> Result<(), CatalogError> {
        if query.limit == 0 {
            return Err(CatalogError::InvalidLimit);
        }
        self.terms
            .get_term(term_id)
            .await?
            .ok_or(CatalogError::TermNotFound(term_id))?;
        Ok(())
    }
}
