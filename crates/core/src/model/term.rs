use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::TermId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TermError {
    #[error("term name cannot be empty")]
    EmptyName,
}

/// An academic period that scopes which quizzes and games a student sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    id: TermId,
    name: String,
}

impl Term {
    /// # Errors
    ///
    /// Returns `TermError::EmptyName` if the name is blank.
    pub fn new(id: TermId, name: impl Into<String>) -> Result<Self, TermError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(TermError::EmptyName);
        }
        Ok(Self { id, name })
    }

    /// Re-checks the name; used after deserializing.
    ///
    /// # Errors
    ///
    /// Returns `TermError::EmptyName` if the name is blank.
    pub fn validate(&self) -> Result<(), TermError> {
        if self.name.trim().is_empty() {
            return Err(TermError::EmptyName);
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> TermId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
