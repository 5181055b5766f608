use refika_core::model::{OptionId, Question, QuestionId, sum_points};
use serde::Serialize;

use crate::error::QuizFlowError;

/// Feedback shown once a question has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub selected: OptionId,
    pub is_correct: bool,
    pub points_awarded: u32,
    pub correct_options: Vec<OptionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
}

impl QuizResult {
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}

/// Where `QuizFlow::next` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Question(usize),
    Finished(QuizResult),
}

/// Steps through questions one at a time, one answer per question.
#[derive(Debug, Clone)]
pub struct QuizFlow {
    questions: Vec<Question>,
    index: usize,
    score: u32,
    total: u32,
    answer: Option<AnswerFeedback>,
    finished: bool,
}

impl QuizFlow {
    /// # Errors
    ///
    /// Returns `QuizFlowError::NoQuestions` if `questions` is empty, or
    /// `QuizFlowError::Quiz` if their points overflow a `u32`.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizFlowError> {
        if questions.is_empty() {
            return Err(QuizFlowError::NoQuestions);
        }
        let total = sum_points(&questions)?;
        Ok(Self {
            questions,
            index: 0,
            score: 0,
            total,
            answer: None,
            finished: false,
        })
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.finished {
            return None;
        }
        self.questions.get(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Points banked from questions already moved past.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answer(&self) -> Option<&AnswerFeedback> {
        self.answer.as_ref()
    }

    /// Answer the current question.
    ///
    /// Only the first answer counts; later picks, unknown options and picks
    /// after the quiz finished return `None`.
    pub fn select_option(&mut self, option_id: OptionId) -> Option<&AnswerFeedback> {
        if self.answer.is_some() {
            return None;
        }
        let question = self.current_question()?;
        let option = question.option(option_id)?;

        let is_correct = option.is_correct();
        let feedback = AnswerFeedback {
            question_id: question.id(),
            selected: option_id,
            is_correct,
            points_awarded: if is_correct { question.points() } else { 0 },
            correct_options: question.correct_option_ids(),
        };
        tracing::debug!(question = %feedback.question_id, is_correct, "quiz answer");
        self.answer = Some(feedback);
        self.answer.as_ref()
    }

    /// Bank the current answer and move on. `None` until the question is answered.
    pub fn next(&mut self) -> Option<QuizStep> {
        if self.finished {
            return None;
        }
        let feedback = self.answer.take()?;
        self.score += feedback.points_awarded;

        if self.index + 1 < self.questions.len() {
            self.index += 1;
            Some(QuizStep::Question(self.index))
        } else {
            self.finished = true;
            let result = self.result();
            tracing::info!(score = result.score, total = result.total, "quiz finished");
            Some(QuizStep::Finished(result))
        }
    }

    /// Score so far against the maximum attainable points.
    #[must_use]
    pub fn result(&self) -> QuizResult {
        QuizResult {
            score: self.score,
            total: self.total,
        }
    }

    /// Start over from the first question with a zero score.
    pub fn retry(&mut self) {
        self.index = 0;
        self.score = 0;
        self.answer = None;
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refika_core::model::{QuizError, QuizOption};

    fn question(id: u128, points: u32) -> Question {
        let base = id * 10;
        Question::new(
            QuestionId::from_u128(id),
            format!("Q{id}"),
            points,
            vec![
                QuizOption::new(OptionId::from_u128(base + 1), "right", true).unwrap(),
                QuizOption::new(OptionId::from_u128(base + 2), "wrong", false).unwrap(),
            ],
        )
        .unwrap()
    }

    fn right(id: u128) -> OptionId {
        OptionId::from_u128(id * 10 + 1)
    }

    fn wrong(id: u128) -> OptionId {
        OptionId::from_u128(id * 10 + 2)
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert!(matches!(
            QuizFlow::new(Vec::new()),
            Err(QuizFlowError::NoQuestions)
        ));
    }

    #[test]
    fn scores_correct_answers_by_points() {
        let mut flow = QuizFlow::new(vec![question(1, 10), question(2, 5), question(3, 20)]).unwrap();

        assert!(flow.select_option(right(1)).unwrap().is_correct);
        assert_eq!(flow.next(), Some(QuizStep::Question(1)));

        let feedback = flow.select_option(wrong(2)).unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_options, vec![right(2)]);
        assert_eq!(flow.next(), Some(QuizStep::Question(2)));

        assert!(flow.is_last());
        flow.select_option(right(3));
        assert_eq!(
            flow.next(),
            Some(QuizStep::Finished(QuizResult { score: 30, total: 35 }))
        );
        assert!(flow.is_finished());
        assert!(flow.current_question().is_none());
    }

    #[test]
    fn only_first_answer_counts() {
        let mut flow = QuizFlow::new(vec![question(1, 10)]).unwrap();
        flow.select_option(wrong(1));
        assert!(flow.select_option(right(1)).is_none());
        assert_eq!(flow.next(), Some(QuizStep::Finished(QuizResult { score: 0, total: 10 })));
    }

    #[test]
    fn overflowing_points_are_rejected() {
        let err = QuizFlow::new(vec![question(1, u32::MAX), question(2, u32::MAX)]).unwrap_err();
        assert!(matches!(err, QuizFlowError::Quiz(QuizError::PointsOverflow)));
    }

    #[test]
    fn max_points_quiz_scores_without_overflow() {
        let mut flow = QuizFlow::new(vec![question(1, u32::MAX - 1), question(2, 1)]).unwrap();
        flow.select_option(right(1));
        flow.next();
        flow.select_option(right(2));
        assert_eq!(
            flow.next(),
            Some(QuizStep::Finished(QuizResult { score: u32::MAX, total: u32::MAX }))
        );
    }

    #[test]
    fn next_requires_an_answer() {
        let mut flow = QuizFlow::new(vec![question(1, 10), question(2, 10)]).unwrap();
        assert_eq!(flow.next(), None);
        assert_eq!(flow.index(), 0);
    }

    #[test]
    fn unknown_option_is_ignored() {
        let mut flow = QuizFlow::new(vec![question(1, 10)]).unwrap();
        assert!(flow.select_option(right(2)).is_none());
        assert!(flow.answer().is_none());
    }

    #[test]
    fn retry_resets_progress() {
        let mut flow = QuizFlow::new(vec![question(1, 10)]).unwrap();
        flow.select_option(right(1));
        flow.next();
        assert!(flow.result().is_perfect());

        flow.retry();
        assert!(!flow.is_finished());
        assert_eq!(flow.score(), 0);
        assert_eq!(flow.current_question().unwrap().id(), QuestionId::from_u128(1));
    }
}
