use std::sync::Arc;

use refika_core::model::QuizId;
use storage::repository::QuizRepository;
use tracing::instrument;

use super::flow::QuizFlow;
use crate::error::QuizFlowError;
use crate::notify::Notifier;

/// A quiz fetched from storage, ready on its first question.
#[derive(Debug, Clone)]
pub struct LoadedQuiz {
    pub quiz_id: QuizId,
    pub title: String,
    pub flow: QuizFlow,
}

/// Loads quizzes and builds flows for them.
#[derive(Clone)]
pub struct QuizLoopService {
    quizzes: Arc<dyn QuizRepository>,
    notifier: Notifier,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self {
            quizzes,
            notifier: Notifier::default(),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// # Errors
    ///
    /// Returns `QuizFlowError::QuizNotFound` for an unknown id,
    /// `QuizFlowError::NoQuestions` for a quiz without questions, or a
    /// validation/storage error.
    #[instrument(level = "info", skip(self))]
    pub async fn start_quiz(&self, quiz_id: QuizId) -> Result<LoadedQuiz, QuizFlowError> {
        let result = self.load(quiz_id).await;
        if let Err(err) = &result {
            tracing::warn!(%quiz_id, error = %err, "failed to start quiz");
            self.notifier.error(format!("Could not load the quiz: {err}"));
        }
        result
    }

    async fn load(&self, quiz_id: QuizId) -> Result<LoadedQuiz, QuizFlowError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(QuizFlowError::QuizNotFound(quiz_id))?;
        quiz.validate()?;

        let title = quiz.title().to_owned();
        let flow = QuizFlow::new(quiz.into_questions())?;
        Ok(LoadedQuiz {
            quiz_id,
            title,
            flow,
        })
    }
}
