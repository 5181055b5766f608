mod game;
mod ids;
mod pair;
mod quiz;
mod term;

pub use ids::{GameId, OptionId, PairId, ParseIdError, QuestionId, QuizId, TermId};

pub use game::{GameError, MatchingGame, MatchingGameDraft, PairDraft};
pub use pair::{MatchingPair, PairError, validate_pairs};
pub use quiz::{
    OptionDraft, Question, QuestionDraft, Quiz, QuizDraft, QuizError, QuizOption, sum_points,
};
pub use term::{Term, TermError};
