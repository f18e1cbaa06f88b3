//! Caller-supplied game configuration.
//!
//! Deserializes from a JS object or JSON with every field optional:
//! `{ size: 5, values: ["a", ...], gameId: "office" }`.

use serde::{Deserialize, Serialize};

use crate::board;
use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_SIZE: usize = 5;
pub const DEFAULT_GAME_ID: &str = "default";

/// The 22 lowercase letters `a` through `v`.
pub fn default_values() -> Vec<String> {
    ('a'..='v').map(|c| c.to_string()).collect()
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

fn default_game_id() -> String {
    DEFAULT_GAME_ID.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default = "default_values")]
    pub values: Vec<String>,
    /// Namespace for storage keys and the leaderboard path.
    #[serde(default = "default_game_id")]
    pub game_id: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            values: default_values(),
            game_id: default_game_id(),
        }
    }
}

/// A validated board shape: odd size plus a value list padded to `size²`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSpec {
    pub size: usize,
    pub values: Vec<String>,
}

impl GameConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = game_id.into();
        self
    }

    /// Check the pool and produce the board shape every generation will use.
    pub fn board_spec(&self) -> ConfigResult<BoardSpec> {
        if self.values.is_empty() {
            return Err(ConfigError::EmptyValuePool);
        }
        let size = board::coerce_size(self.size);
        let values = board::pad_values(&self.values, size * size);
        Ok(BoardSpec { size, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.size, 5);
        assert_eq!(config.values.len(), 22);
        assert_eq!(config.values.first().map(String::as_str), Some("a"));
        assert_eq!(config.values.last().map(String::as_str), Some("v"));
        assert_eq!(config.game_id, "default");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GameConfig = serde_json::from_str(r#"{"gameId":"office","size":3}"#).unwrap();
        assert_eq!(config.size, 3);
        assert_eq!(config.game_id, "office");
        assert_eq!(config.values, default_values());

        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_empty_pool_is_fatal() {
        let config = GameConfig::default().with_values(Vec::<String>::new());
        assert_eq!(config.board_spec(), Err(ConfigError::EmptyValuePool));
    }

    #[test]
    fn test_board_spec_coerces_and_pads() {
        let spec = GameConfig::default()
            .with_size(4)
            .with_values(["x", "y"])
            .board_spec()
            .unwrap();
        assert_eq!(spec.size, 3);
        assert_eq!(spec.values, vec!["x", "y", "x", "y", "x", "y", "x", "y", "x"]);
    }

    #[test]
    fn test_default_spec_fills_25() {
        let spec = GameConfig::default().board_spec().unwrap();
        assert_eq!(spec.size, 5);
        assert_eq!(spec.values.len(), 25);
        assert_eq!(&spec.values[22..], &["a", "b", "c"]);
    }
}
