mod flow;
mod workflow;

pub use crate::error::QuizFlowError;
pub use flow::{AnswerFeedback, QuizFlow, QuizResult, QuizStep};
pub use workflow::{LoadedQuiz, QuizLoopService};
