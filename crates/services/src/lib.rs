#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod matching;
pub mod notify;
pub mod quiz;

pub use refika_core::Clock;

pub use catalog::CatalogService;
pub use error::{CatalogError, MatchingError, QuizFlowError};
pub use notify::{Notifier, Toast, ToastKind};

pub use matching::{
    LoadedGame, MatchEvent, MatchingLoopService, MatchingSession, MatchingSettings, SessionStatus,
};
pub use quiz::{LoadedQuiz, QuizFlow, QuizLoopService, QuizResult, QuizStep};
