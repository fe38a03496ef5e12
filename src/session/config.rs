//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    identifiers::UserId,
    scale::ScaleType,
};

/// Configuration for one human-in-the-loop session.
///
/// Tempo, volume and the chord settings are irrelevant to learning; they are
/// carried here so render adapters can be built from the same configuration
/// the session logs.
///
/// # Examples
///
/// ```
/// use melodiq::session::SessionConfig;
/// use melodiq::scale::ScaleType;
///
/// let config = SessionConfig::new("000000")
///     .with_scale_type(ScaleType::Minor)
///     .with_track_length(4)
///     .with_total_episodes(1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Owner of the learned Q-table.
    pub user_id: UserId,
    /// Base MIDI note the scale is rooted at.
    pub base_note: u8,
    /// Scale type for the pitch pool.
    pub scale_type: ScaleType,
    /// Tempo in BPM (render pass-through).
    pub tempo: u16,
    /// MIDI volume (render pass-through).
    pub volume: u8,
    /// Whether render adapters add chord accompaniment.
    pub chords: bool,
    /// Chord insertion frequency in beats (render pass-through).
    pub chord_freq: u8,
    /// Whether render adapters include the percussion line.
    pub percussion: bool,
    /// Notes per freshly generated track.
    pub track_length: usize,
    /// Episodes before the session completes.
    pub total_episodes: usize,
    /// Learning rate α.
    pub learning_rate: f64,
    /// Discount factor γ.
    pub discount_factor: f64,
    /// Initial exploration rate ε₀.
    pub initial_epsilon: f64,
    /// Multiplicative exploration decay per episode.
    pub epsilon_decay: f64,
    /// Random seed (None = non-deterministic).
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Create a configuration for `user_id` with the standard defaults.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Set the base MIDI note.
    pub fn with_base_note(mut self, base_note: u8) -> Self {
        self.base_note = base_note;
        self
    }

    /// Set the scale type.
    pub fn with_scale_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }

    /// Set the track length.
    pub fn with_track_length(mut self, track_length: usize) -> Self {
        self.track_length = track_length;
        self
    }

    /// Set the number of episodes.
    pub fn with_total_episodes(mut self, total_episodes: usize) -> Self {
        self.total_episodes = total_episodes;
        self
    }

    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor γ.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the initial exploration rate ε₀.
    pub fn with_initial_epsilon(mut self, initial_epsilon: f64) -> Self {
        self.initial_epsilon = initial_epsilon;
        self
    }

    /// Set the exploration decay rate.
    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    /// Set the random seed for deterministic sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.track_length == 0 {
            return Err(Error::InvalidConfiguration {
                message: "track_length must be at least 1".to_string(),
            });
        }
        if self.total_episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "total_episodes must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning_rate {} must be in [0, 1]", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!("discount_factor {} must be in [0, 1]", self.discount_factor),
            });
        }
        if !(0.0..=1.0).contains(&self.initial_epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("initial_epsilon {} must be in [0, 1]", self.initial_epsilon),
            });
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon_decay {} must be in (0, 1]", self.epsilon_decay),
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: UserId::new("000000"),
            base_note: 60,
            scale_type: ScaleType::Major,
            tempo: 90,
            volume: 90,
            chords: false,
            chord_freq: 4,
            percussion: true,
            track_length: 8,
            total_episodes: 10,
            learning_rate: 0.1,
            discount_factor: 0.9,
            initial_epsilon: 0.5,
            epsilon_decay: 0.01,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_track_length_is_rejected() {
        let config = SessionConfig::default().with_track_length(0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_out_of_range_learning_rate_is_rejected() {
        let config = SessionConfig::default().with_learning_rate(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_epsilon_decay_is_rejected() {
        let config = SessionConfig::default().with_epsilon_decay(0.0);
        assert!(config.validate().is_err());
    }
}
