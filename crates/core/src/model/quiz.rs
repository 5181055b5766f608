use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId, QuizId, TermId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("question {question} has empty text")]
    EmptyQuestionText { question: QuestionId },

    #[error("question {question} has no options")]
    NoOptions { question: QuestionId },

    #[error("question {question} has no correct option")]
    NoCorrectOption { question: QuestionId },

    #[error("option {option} has empty text")]
    EmptyOptionText { option: OptionId },

    #[error("option id {option} appears more than once in question {question}")]
    DuplicateOption {
        question: QuestionId,
        option: OptionId,
    },

    #[error("question points add up to more than {}", u32::MAX)]
    PointsOverflow,
}

//
// ─── OPTIONS & QUESTIONS ───────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    id: OptionId,
    text: String,
    is_correct: bool,
}

impl QuizOption {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyOptionText` if the text is blank.
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Result<Self, QuizError> {
        let option = Self {
            id,
            text: text.into(),
            is_correct,
        };
        if option.text.trim().is_empty() {
            return Err(QuizError::EmptyOptionText { option: id });
        }
        Ok(option)
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// A single quiz question worth `points` when answered correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    points: u32,
    options: Vec<QuizOption>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuizError` if the text is blank, there are no options,
    /// no option is marked correct, or option ids repeat.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        points: u32,
        options: Vec<QuizOption>,
    ) -> Result<Self, QuizError> {
        let question = Self {
            id,
            text: text.into(),
            points,
            options,
        };
        question.validate()?;
        Ok(question)
    }

    fn validate(&self) -> Result<(), QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::EmptyQuestionText { question: self.id });
        }
        if self.options.is_empty() {
            return Err(QuizError::NoOptions { question: self.id });
        }
        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if option.text.trim().is_empty() {
                return Err(QuizError::EmptyOptionText { option: option.id });
            }
            if !seen.insert(option.id) {
                return Err(QuizError::DuplicateOption {
                    question: self.id,
                    option: option.id,
                });
            }
        }
        if !self.options.iter().any(QuizOption::is_correct) {
            return Err(QuizError::NoCorrectOption { question: self.id });
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Ids of every option marked correct.
    #[must_use]
    pub fn correct_option_ids(&self) -> Vec<OptionId> {
        self.options
            .iter()
            .filter(|option| option.is_correct)
            .map(QuizOption::id)
            .collect()
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    term_id: TermId,
    title: String,
    questions: Vec<Question>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank or any question is invalid.
    pub fn new(
        id: QuizId,
        term_id: TermId,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let quiz = Self {
            id,
            term_id,
            title: title.into(),
            questions,
        };
        quiz.validate()?;
        Ok(quiz)
    }

    /// Re-checks invariants; used after deserializing.
    ///
    /// # Errors
    ///
    /// Returns the first `QuizError` found.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        self.questions.iter().try_for_each(Question::validate)?;
        sum_points(&self.questions).map(|_| ())
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
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
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    /// Maximum attainable score. Saturates on quizzes that skipped validation.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.questions
            .iter()
            .map(Question::points)
            .fold(0, u32::saturating_add)
    }
}

/// Sum of question points.
///
/// # Errors
///
/// Returns `QuizError::PointsOverflow` if the sum does not fit in a `u32`.
pub fn sum_points(questions: &[Question]) -> Result<u32, QuizError> {
    questions.iter().try_fold(0_u32, |total, question| {
        total
            .checked_add(question.points())
            .ok_or(QuizError::PointsOverflow)
    })
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub points: u32,
    pub options: Vec<OptionDraft>,
}

/// A quiz as entered by an admin, before ids exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub term_id: TermId,
    pub title: String,
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// Validates the draft and assigns generated ids to the quiz, its questions and options.
    ///
    /// # Errors
    ///
    /// Returns the first `QuizError` found.
    pub fn build(self) -> Result<Quiz, QuizError> {
        let questions = self
            .questions
            .into_iter()
            .map(|question| {
                let options = question
                    .options
                    .into_iter()
                    .map(|opt| QuizOption::new(OptionId::generate(), opt.text, opt.is_correct))
                    .collect::<Result<Vec<_>, _>>()?;
                Question::new(QuestionId::generate(), question.text, question.points, options)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Quiz::new(QuizId::generate(), self.term_id, self.title, questions)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
