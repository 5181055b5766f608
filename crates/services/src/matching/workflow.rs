use std::sync::Arc;

use refika_core::Clock;
use refika_core::model::GameId;
use storage::repository::MatchingGameRepository;
use tracing::instrument;

use super::engine::MatchingSession;
use super::settings::MatchingSettings;
use crate::error::MatchingError;
use crate::notify::Notifier;

/// A game fetched from storage with its session already on the first round.
#[derive(Debug)]
pub struct LoadedGame {
    pub game_id: GameId,
    pub title: String,
    pub session: MatchingSession,
}

/// Loads matching games and starts sessions for them.
#[derive(Clone)]
pub struct MatchingLoopService {
    clock: Clock,
    games: Arc<dyn MatchingGameRepository>,
    settings: MatchingSettings,
    notifier: Notifier,
    seed: Option<u64>,
}

impl MatchingLoopService {
    #[must_use]
    pub fn new(clock: Clock, games: Arc<dyn MatchingGameRepository>) -> Self {
        Self {
            clock,
            games,
            settings: MatchingSettings::default(),
            notifier: Notifier::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: MatchingSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Seed every session this service starts; used for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Fetch a game, validate its pairs and start a session on it.
    ///
    /// Failures are also published to the notifier as error toasts.
    ///
    /// # Errors
    ///
    /// Returns `MatchingError::GameNotFound` for an unknown id,
    /// `MatchingError::Storage` when the repository fails, or a validation
    /// error when the stored pairs are malformed.
    #[instrument(level = "info", skip(self))]
    pub async fn start_game(&self, game_id: GameId) -> Result<LoadedGame, MatchingError> {
        let result = self.load_and_start(game_id).await;
        if let Err(err) = &result {
            tracing::warn!(%game_id, error = %err, "failed to start matching game");
            self.notifier
                .error(format!("Could not load the matching game: {err}"));
        }
        result
    }

    async fn load_and_start(&self, game_id: GameId) -> Result<LoadedGame, MatchingError> {
        let game = self
            .games
            .get_game(game_id)
            .await?
            .ok_or(MatchingError::GameNotFound(game_id))?;
        game.validate()?;

        let title = game.title().to_owned();
        let mut builder = MatchingSession::builder()
            .settings(self.settings)
            .clock(self.clock);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        let session = builder.start(game.into_pairs())?;
        tracing::info!(%game_id, %title, pairs = session.total_pairs(), "matching game started");

        Ok(LoadedGame {
            game_id,
            title,
            session,
        })
    }
}
