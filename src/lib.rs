//! Bingo board game core, compiled to WebAssembly for the board page.
//!
//! Generates shuffled odd-sized boards, tracks the player's selection and
//! keyboard focus, and detects a completed row, column or diagonal. The page
//! supplies storage, the leaderboard and rendering; this crate only owns the
//! game state.

pub mod board;
pub mod config;
pub mod duration;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod rng;
pub mod session;
pub mod storage;
pub mod types;

pub use config::GameConfig;
pub use error::{ConfigError, ConfigResult};
pub use game::{Event, GameState};
pub use session::{Clock, Session, SystemClock};
pub use types::{Cell, CellId, Direction, Grid, Millis};

#[cfg(target_arch = "wasm32")]
pub use wasm_exports::BingoBoard;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::config::GameConfig;
    use crate::duration::format_duration;
    use crate::error::{SinkError, StorageError};
    use crate::leaderboard::{LeaderboardEntry, LeaderboardSink};
    use crate::session::Session;
    use crate::storage::KeyValueStore;
    use crate::types::Direction;

    /// Any object with `getItem(key)` / `setItem(key, value)`, e.g. `localStorage`.
    struct JsStorage(JsValue);

    impl JsStorage {
        fn method(&self, name: &str) -> Option<js_sys::Function> {
            js_sys::Reflect::get(&self.0, &name.into())
                .ok()?
                .dyn_into::<js_sys::Function>()
                .ok()
        }
    }

    impl KeyValueStore for JsStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.method("getItem")?.call1(&self.0, &key.into()).ok()?.as_string()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let set_item = self
                .method("setItem")
                .ok_or_else(|| StorageError::WriteFailed("storage has no setItem".to_string()))?;
            set_item
                .call2(&self.0, &key.into(), &value.into())
                .map(|_| ())
                .map_err(|e| StorageError::WriteFailed(format!("{:?}", e)))
        }
    }

    /// JS callback `(path, record) => key`.
    struct JsLeaderboard(js_sys::Function);

    impl LeaderboardSink for JsLeaderboard {
        fn push(&mut self, path: &str, entry: &LeaderboardEntry) -> Result<String, SinkError> {
            let record = serde_wasm_bindgen::to_value(entry)
                .map_err(|e| SinkError::Rejected(e.to_string()))?;
            let key = self
                .0
                .call2(&JsValue::NULL, &path.into(), &record)
                .map_err(|e| SinkError::Rejected(format!("{:?}", e)))?;
            Ok(key.as_string().unwrap_or_default())
        }
    }

    #[wasm_bindgen(js_name = "BingoBoard")]
    pub struct BingoBoard {
        session: Session,
        leaderboard: Option<JsLeaderboard>,
    }

    #[wasm_bindgen(js_class = "BingoBoard")]
    impl BingoBoard {
        /// `config`: `{ size?, values?, gameId? }`. `storage`: a `localStorage`-like
        /// object or `undefined`. `leaderboard`: `(path, record) => key`.
        /// `onFocus`: called with the cell id whenever keyboard focus moves.
        #[wasm_bindgen(constructor)]
        pub fn new(
            config: JsValue,
            storage: JsValue,
            leaderboard: Option<js_sys::Function>,
            on_focus: Option<js_sys::Function>,
        ) -> Result<BingoBoard, JsError> {
            let config: GameConfig = if config.is_undefined() || config.is_null() {
                GameConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)?
            };
            let mut session = Session::new(config)?;
            if storage.is_object() {
                session = session.with_store(Box::new(JsStorage(storage)));
            }
            if let Some(callback) = on_focus {
                session = session.on_focus(move |id| {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(id as u32)) {
                        log::warn!("focus callback failed: {:?}", e);
                    }
                });
            }
            Ok(BingoBoard {
                session,
                leaderboard: leaderboard.map(JsLeaderboard),
            })
        }

        pub fn toggle(&mut self, row: usize, col: usize) {
            self.session.toggle(row, col);
        }

        pub fn focus(&mut self, row: usize, col: usize) {
            self.session.focus(row, col);
        }

        /// Returns true when `key` was an arrow key and the default should be prevented.
        #[wasm_bindgen(js_name = "keyDown")]
        pub fn key_down(&mut self, key: &str) -> bool {
            self.session.key_down(key)
        }

        /// `direction`: `"up" | "down" | "left" | "right"`.
        #[wasm_bindgen(js_name = "moveActive")]
        pub fn move_active(&mut self, direction: JsValue) -> Result<(), JsError> {
            let direction: Direction = serde_wasm_bindgen::from_value(direction)?;
            self.session.move_active(direction);
            Ok(())
        }

        pub fn refresh(&mut self) {
            self.session.refresh();
        }

        /// Returns the new record's key, or `undefined` if nothing was recorded.
        #[wasm_bindgen(js_name = "submitScore")]
        pub fn submit_score(&mut self, name: &str) -> Option<String> {
            match self.leaderboard.as_mut() {
                Some(sink) => self.session.submit_score(name, sink),
                None => {
                    log::warn!("no leaderboard callback configured");
                    None
                }
            }
        }

        /// Full game state as a plain JS object.
        pub fn state(&self) -> Result<JsValue, JsError> {
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            Ok(self.session.state().serialize(&serializer)?)
        }

        #[wasm_bindgen(getter)]
        pub fn bingo(&self) -> bool {
            self.session.state().bingo
        }

        #[wasm_bindgen(getter, js_name = "activeCell")]
        pub fn active_cell(&self) -> u32 {
            self.session.state().active_cell as u32
        }

        /// `"1 min, 5 sec"` once there is a bingo.
        #[wasm_bindgen(js_name = "formattedDuration")]
        pub fn formatted_duration(&self) -> Option<String> {
            self.session.state().duration().map(format_duration)
        }
    }
}
