//! Persisting board progress in a key-value store.
//!
//! Each field is stored on its own as JSON under `bingo-<gameId>_<field>`, the
//! layout the page has always used in `localStorage`. Keyboard focus and the
//! value pool are never written: focus restarts at the top-left cell and the
//! values always come from the current config.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::game::GameState;

/// Minimal string key-value store, e.g. `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store for native hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub const FIELD_GRID: &str = "grid";
pub const FIELD_MIDPOINT: &str = "midpoint";
pub const FIELD_SELECTION: &str = "selection";
pub const FIELD_SIZE: &str = "size";
pub const FIELD_START_TIME: &str = "startTime";
pub const FIELD_END_TIME: &str = "endTime";
pub const FIELD_BINGO: &str = "bingo";
pub const FIELD_SUBMITTED: &str = "leaderboardSubmitted";

/// Storage key for one field of one game.
pub fn field_key(game_id: &str, field: &str) -> String {
    format!("bingo-{}_{}", game_id, field)
}

fn write<T: Serialize>(
    store: &mut dyn KeyValueStore,
    game_id: &str,
    field: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(&field_key(game_id, field), &json)
}

fn read<T: DeserializeOwned>(store: &dyn KeyValueStore, game_id: &str, field: &str) -> Option<T> {
    let raw = store.get(&field_key(game_id, field))?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding stored {} for game {}: {}", field, game_id, e);
            None
        }
    }
}

/// Write every persisted field of `state`.
pub fn save(store: &mut dyn KeyValueStore, game_id: &str, state: &GameState) -> Result<(), StorageError> {
    write(store, game_id, FIELD_GRID, &state.grid)?;
    write(store, game_id, FIELD_MIDPOINT, &state.midpoint)?;
    write(store, game_id, FIELD_SELECTION, &state.selection)?;
    write(store, game_id, FIELD_SIZE, &state.size)?;
    write(store, game_id, FIELD_START_TIME, &state.start_time)?;
    write(store, game_id, FIELD_END_TIME, &state.end_time)?;
    write(store, game_id, FIELD_BINGO, &state.bingo)?;
    write(store, game_id, FIELD_SUBMITTED, &state.leaderboard_submitted)?;
    Ok(())
}

/// Overlay whatever was stored for `game_id` onto `fresh`.
///
/// Missing or unreadable fields keep their fresh value. If the merged board
/// does not hang together (malformed grid) or was saved for a different size
/// than `fresh`, the stored progress is dropped and `fresh` is returned
/// unchanged.
pub fn load(store: &dyn KeyValueStore, game_id: &str, fresh: GameState) -> GameState {
    let mut state = fresh.clone();
    let mut restored = 0usize;

    macro_rules! restore {
        ($field:expr, $slot:expr) => {
            if let Some(value) = read(store, game_id, $field) {
                $slot = value;
                restored += 1;
            }
        };
    }

    restore!(FIELD_GRID, state.grid);
    restore!(FIELD_MIDPOINT, state.midpoint);
    restore!(FIELD_SELECTION, state.selection);
    restore!(FIELD_SIZE, state.size);
    restore!(FIELD_START_TIME, state.start_time);
    restore!(FIELD_END_TIME, state.end_time);
    restore!(FIELD_BINGO, state.bingo);
    restore!(FIELD_SUBMITTED, state.leaderboard_submitted);

    if restored == 0 {
        return fresh;
    }
    if !state.is_consistent() {
        log::warn!("stored board for game {} is inconsistent, starting fresh", game_id);
        return fresh;
    }
    if state.size != fresh.size {
        log::info!(
            "stored board for game {} is {}x{}, configured for {}x{}; starting fresh",
            game_id, state.size, state.size, fresh.size, fresh.size
        );
        return fresh;
    }
    log::debug!("restored {} stored fields for game {}", restored, game_id);
    state
}
