mod engine;
mod events;
mod round;
mod settings;
mod workflow;

// Public API of the matching subsystem.
pub use crate::error::MatchingError;
pub use engine::{MatchingSession, MatchingSessionBuilder};
pub use events::{Deferred, DeferredKind, MatchEvent, MatchingProgress, SessionStatus};
pub use round::Round;
pub use settings::{
    MISMATCH_DELAY, MatchingSettings, MatchingSettingsError, NEXT_ROUND_DELAY, SET_SIZE,
};
pub use workflow::{LoadedGame, MatchingLoopService};
