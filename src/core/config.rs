//! Game configuration.
//!
//! A `GameConfig` fixes everything that varies between house rules: seat
//! count, the score that wins, the minimum bank, and how that minimum is
//! applied. Builders follow the `with_*` style and `validate()` is checked
//! once when an environment is created.

use serde::{Deserialize, Serialize};

use super::error::FarkleError;

/// When the minimum bank applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankRule {
    /// Only a player's first bank of the game must reach the minimum.
    /// The qualifying total includes the player's banked score.
    #[default]
    FirstBankOnly,
    /// Every bank must reach the minimum from the current turn alone.
    EveryBank,
}

/// Game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (1-255).
    pub player_count: usize,

    /// Banked score that ends the game. Reaching it exactly wins.
    pub win_score: u32,

    /// Minimum points required to bank (see `bank_rule`).
    pub min_bank_score: u32,

    /// Which banks the minimum applies to.
    pub bank_rule: BankRule,

    /// Actions after which an episode reports truncation. `None` = unlimited.
    pub max_steps: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            win_score: 10_000,
            min_bank_score: 500,
            bank_rule: BankRule::FirstBankOnly,
            max_steps: Some(500),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    pub fn with_win_score(mut self, score: u32) -> Self {
        self.win_score = score;
        self
    }

    pub fn with_min_bank_score(mut self, score: u32) -> Self {
        self.min_bank_score = score;
        self
    }

    pub fn with_bank_rule(mut self, rule: BankRule) -> Self {
        self.bank_rule = rule;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u32>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), FarkleError> {
        if !(1..=255).contains(&self.player_count) {
            return Err(FarkleError::InvalidConfig {
                reason: format!("player_count must be 1-255, got {}", self.player_count),
            });
        }
        if self.win_score == 0 {
            return Err(FarkleError::InvalidConfig {
                reason: "win_score must be positive".to_string(),
            });
        }
        if self.max_steps == Some(0) {
            return Err(FarkleError::InvalidConfig {
                reason: "max_steps must be positive when set".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.win_score, 10_000);
        assert_eq!(config.min_bank_score, 500);
        assert_eq!(config.bank_rule, BankRule::FirstBankOnly);
        assert_eq!(config.max_steps, Some(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::new()
            .with_player_count(4)
            .with_win_score(5000)
            .with_min_bank_score(300)
            .with_bank_rule(BankRule::EveryBank)
            .with_max_steps(None);

        assert_eq!(config.player_count, 4);
        assert_eq!(config.win_score, 5000);
        assert_eq!(config.min_bank_score, 300);
        assert_eq!(config.bank_rule, BankRule::EveryBank);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameConfig::new().with_player_count(0).validate().is_err());
        assert!(GameConfig::new().with_player_count(256).validate().is_err());
        assert!(GameConfig::new().with_win_score(0).validate().is_err());
        assert!(GameConfig::new().with_max_steps(Some(0)).validate().is_err());
        assert!(GameConfig::new().with_player_count(1).validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_bank_rule(BankRule::EveryBank);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
