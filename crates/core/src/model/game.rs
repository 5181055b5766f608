use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{GameId, PairId, TermId};
use crate::model::pair::{MatchingPair, PairError, validate_pairs};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("game title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Pair(#[from] PairError),
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unsaved pair texts; ids are assigned when the game is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDraft {
    pub left_text: String,
    pub right_text: String,
}

impl PairDraft {
    #[must_use]
    pub fn new(left_text: impl Into<String>, right_text: impl Into<String>) -> Self {
        Self {
            left_text: left_text.into(),
            right_text: right_text.into(),
        }
    }
}

/// A matching game as entered by an admin, before ids exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingGameDraft {
    pub term_id: TermId,
    pub title: String,
    pub pairs: Vec<PairDraft>,
}

impl MatchingGameDraft {
    /// Validates the draft and assigns freshly generated ids to the game and every pair.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyTitle` for a blank title, or `GameError::Pair`
    /// when any pair has a blank side.
    pub fn build(self) -> Result<MatchingGame, GameError> {
        let pairs = self
            .pairs
            .into_iter()
            .map(|draft| MatchingPair::new(PairId::generate(), draft.left_text, draft.right_text))
            .collect::<Result<Vec<_>, _>>()?;
        MatchingGame::new(GameId::generate(), self.term_id, self.title, pairs)
    }
}

//
// ─── GAME ──────────────────────────────────────────────────────────────────────
//

/// A titled collection of matching pairs belonging to a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingGame {
    id: GameId,
    term_id: TermId,
    title: String,
    pairs: Vec<MatchingPair>,
}

impl MatchingGame {
    /// # Errors
    ///
    /// Returns `GameError` if the title is blank or the pairs fail validation.
    pub fn new(
        id: GameId,
        term_id: TermId,
        title: impl Into<String>,
        pairs: Vec<MatchingPair>,
    ) -> Result<Self, GameError> {
        let game = Self {
            id,
            term_id,
            title: title.into(),
            pairs,
        };
        game.validate()?;
        Ok(game)
    }

    /// Re-checks invariants; used after deserializing.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the title is blank or the pairs fail validation.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.title.trim().is_empty() {
            return Err(GameError::EmptyTitle);
        }
        validate_pairs(&self.pairs)?;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn term_id(&self) -> TermId {
        self.term_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn pairs(&self) -> &[MatchingPair] {
        &self.pairs
    }

    #[must_use]
    pub fn into_pairs(self) -> Vec<MatchingPair> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_build_assigns_distinct_ids() {
        let draft = MatchingGameDraft {
            term_id: TermId::from_u128(1),
            title: "Fruits".into(),
            pairs: vec![PairDraft::new("elma", "apple"), PairDraft::new("armut", "pear")],
        };
        let game = draft.build().unwrap();
        assert_eq!(game.pairs().len(), 2);
        assert_ne!(game.pairs()[0].id(), game.pairs()[1].id());
    }

    #[test]
    fn draft_with_blank_pair_is_rejected() {
        let draft = MatchingGameDraft {
            term_id: TermId::from_u128(1),
            title: "Fruits".into(),
            pairs: vec![PairDraft::new("elma", " ")],
        };
        assert!(matches!(
            draft.build(),
            Err(GameError::Pair(PairError::EmptyRightText { .. }))
        ));
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = MatchingGame::new(GameId::from_u128(1), TermId::from_u128(1), " ", Vec::new())
            .unwrap_err();
        assert_eq!(err, GameError::EmptyTitle);
    }
}
