//! Leaderboard records and the sink they are pushed to.

use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::types::Millis;

/// One finished game as it is stored on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Wall-clock time of the bingo.
    pub timestamp: Millis,
    /// Milliseconds from board creation to bingo.
    pub duration: Millis,
}

/// Append-only record store. Returns the generated key of the new record.
pub trait LeaderboardSink {
    fn push(&mut self, path: &str, entry: &LeaderboardEntry) -> Result<String, SinkError>;
}

/// `games/<gameId>/leaderboard`
pub fn leaderboard_path(game_id: &str) -> String {
    format!("games/{}/leaderboard", game_id)
}

/// Keeps records in memory with sequential keys.
#[derive(Debug, Default, Clone)]
pub struct MemoryLeaderboard {
    pub records: Vec<(String, String, LeaderboardEntry)>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records under `path`, oldest first.
    pub fn entries<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a LeaderboardEntry> + 'a {
        self.records
            .iter()
            .filter(move |(p, _, _)| p == path)
            .map(|(_, _, entry)| entry)
    }
}

impl LeaderboardSink for MemoryLeaderboard {
    fn push(&mut self, path: &str, entry: &LeaderboardEntry) -> Result<String, SinkError> {
        let key = format!("entry-{}", self.records.len());
        self.records.push((path.to_string(), key.clone(), entry.clone()));
        Ok(key)
    }
}
