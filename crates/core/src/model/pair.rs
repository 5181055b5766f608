use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::PairId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PairError {
    #[error("pair {id} has an empty left text")]
    EmptyLeftText { id: PairId },

    #[error("pair {id} has an empty right text")]
    EmptyRightText { id: PairId },

    #[error("pair id {id} appears more than once")]
    DuplicateId { id: PairId },
}

//
// ─── MATCHING PAIR ─────────────────────────────────────────────────────────────
//

/// A left/right text unit the player has to connect.
///
/// Pairs are matched by identity: two pairs with identical texts but
/// different ids are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    id: PairId,
    left_text: String,
    right_text: String,
}

impl MatchingPair {
    /// Creates a pair, rejecting blank texts.
    ///
    /// # Errors
    ///
    /// Returns `PairError::EmptyLeftText` or `PairError::EmptyRightText`
    /// when either side is empty after trimming.
    pub fn new(
        id: PairId,
        left_text: impl Into<String>,
        right_text: impl Into<String>,
    ) -> Result<Self, PairError> {
        let pair = Self {
            id,
            left_text: left_text.into(),
            right_text: right_text.into(),
        };
        pair.check_texts()?;
        Ok(pair)
    }

    #[must_use]
    pub fn id(&self) -> PairId {
        self.id
    }

    #[must_use]
    pub fn left_text(&self) -> &str {
        &self.left_text
    }

    #[must_use]
    pub fn right_text(&self) -> &str {
        &self.right_text
    }

    fn check_texts(&self) -> Result<(), PairError> {
        if self.left_text.trim().is_empty() {
            return Err(PairError::EmptyLeftText { id: self.id });
        }
        if self.right_text.trim().is_empty() {
            return Err(PairError::EmptyRightText { id: self.id });
        }
        Ok(())
    }
}

/// Validates a pair collection before it is handed to a matching session.
///
/// Deserialized pairs skip the constructor, so loaders run this on whatever
/// they fetched.
///
/// # Errors
///
/// Returns the first `PairError` found: blank texts or a repeated id.
pub fn validate_pairs(pairs: &[MatchingPair]) -> Result<(), PairError> {
    let mut seen = HashSet::with_capacity(pairs.len());
    for pair in pairs {
        pair.check_texts()?;
        if !seen.insert(pair.id) {
            return Err(PairError::DuplicateId { id: pair.id });
        }
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
