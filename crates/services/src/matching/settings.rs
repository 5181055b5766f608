use std::time::Duration;
use thiserror::Error;

/// Pairs shown together in one round.
pub const SET_SIZE: usize = 5;

/// Pause after a round is cleared before the next one (or the win) lands.
pub const NEXT_ROUND_DELAY: Duration = Duration::from_millis(600);

/// Pause after a wrong pairing before the session is lost.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatchingSettingsError {
    #[error("set size must be > 0")]
    InvalidSetSize,
}

/// Tunables for a matching session.
///
/// The delays only pace animations; they never change which transition happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingSettings {
    set_size: usize,
    next_round_delay: Duration,
    mismatch_delay: Duration,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            set_size: SET_SIZE,
            next_round_delay: NEXT_ROUND_DELAY,
            mismatch_delay: MISMATCH_DELAY,
        }
    }
}

impl MatchingSettings {
    /// # Errors
    ///
    /// Returns `MatchingSettingsError::InvalidSetSize` if `set_size` is zero.
    pub fn new(
        set_size: usize,
        next_round_delay: Duration,
        mismatch_delay: Duration,
    ) -> Result<Self, MatchingSettingsError> {
        if set_size == 0 {
            return Err(MatchingSettingsError::InvalidSetSize);
        }
        Ok(Self {
            set_size,
            next_round_delay,
            mismatch_delay,
        })
    }

    /// Same set size, both delays zeroed.
    #[must_use]
    pub fn without_delays(self) -> Self {
        Self {
            next_round_delay: Duration::ZERO,
            mismatch_delay: Duration::ZERO,
            ..self
        }
    }

    #[must_use]
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    #[must_use]
    pub fn next_round_delay(&self) -> Duration {
        self.next_round_delay
    }

    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        self.mismatch_delay
    }

    /// Number of rounds needed for `total` pairs.
    #[must_use]
    pub fn rounds_for(&self, total: usize) -> usize {
        total.div_ceil(self.set_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_game_constants() {
        let settings = MatchingSettings::default();
        assert_eq!(settings.set_size(), 5);
        assert_eq!(settings.next_round_delay(), Duration::from_millis(600));
        assert_eq!(settings.mismatch_delay(), Duration::from_millis(400));
    }

    #[test]
    fn zero_set_size_is_rejected() {
        let err = MatchingSettings::new(0, NEXT_ROUND_DELAY, MISMATCH_DELAY).unwrap_err();
        assert_eq!(err, MatchingSettingsError::InvalidSetSize);
    }

    #[test]
    fn rounds_for_rounds_up() {
        let settings = MatchingSettings::default();
        assert_eq!(settings.rounds_for(0), 0);
        assert_eq!(settings.rounds_for(5), 1);
        assert_eq!(settings.rounds_for(7), 2);
    }
}
