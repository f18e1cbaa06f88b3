//! A running game: state plus the collaborators transitions need.
//!
//! [`Session`] samples the clock, runs the shuffle, feeds the resulting
//! [`Event`] through [`GameState::update`], then notifies the focus observer
//! and writes progress to the store. Store and leaderboard failures are
//! logged and otherwise ignored.

use crate::board;
use crate::config::{BoardSpec, GameConfig};
use crate::error::ConfigResult;
use crate::game::{Event, GameState};
use crate::leaderboard::{leaderboard_path, LeaderboardEntry, LeaderboardSink};
use crate::rng::{BoardRng, RandomIndex};
use crate::storage::{self, KeyValueStore};
use crate::types::{CellId, Direction, Millis};

/// Source of wall-clock time.
pub trait Clock {
    fn now(&self) -> Millis;
}

impl<F: Fn() -> Millis> Clock for F {
    fn now(&self) -> Millis {
        self()
    }
}

/// `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> Millis {
        js_sys::Date::now() as Millis
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> Millis {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or(0)
    }
}

pub struct Session<R = BoardRng, C = SystemClock> {
    config: GameConfig,
    spec: BoardSpec,
    state: GameState,
    rng: R,
    clock: C,
    store: Option<Box<dyn KeyValueStore>>,
    on_focus: Option<Box<dyn FnMut(CellId)>>,
}

impl Session {
    /// New board from system entropy and the system clock.
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        Self::with_parts(config, BoardRng::new(), SystemClock)
    }
}

impl<R: RandomIndex, C: Clock> Session<R, C> {
    /// New board with an injected random source and clock.
    pub fn with_parts(config: GameConfig, mut rng: R, clock: C) -> ConfigResult<Self> {
        let spec = config.board_spec()?;
        let grid = board::generate_grid(&spec.values, spec.size, &mut rng);
        let state = GameState::new(grid, clock.now());
        log::info!("new {}x{} board for game {}", spec.size, spec.size, config.game_id);
        Ok(Self {
            config,
            spec,
            state,
            rng,
            clock,
            store: None,
            on_focus: None,
        })
    }

    /// Attach a store, restoring any progress saved for this game id.
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        let fresh = self.state.clone();
        self.state = storage::load(&*store, &self.config.game_id, fresh);
        self.store = Some(store);
        self
    }

    /// Call `hook` with the new active cell whenever focus moves within a board.
    pub fn on_focus(mut self, hook: impl FnMut(CellId) + 'static) -> Self {
        self.on_focus = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The padded value list every refresh shuffles.
    pub fn values(&self) -> &[String] {
        &self.spec.values
    }

    pub fn store(&self) -> Option<&dyn KeyValueStore> {
        self.store.as_deref()
    }

    pub fn toggle(&mut self, row: usize, col: usize) {
        let at = self.clock.now();
        self.dispatch(Event::Toggle { row, col, at });
    }

    pub fn focus(&mut self, row: usize, col: usize) {
        self.dispatch(Event::Focus { row, col });
    }

    pub fn move_active(&mut self, direction: Direction) {
        self.dispatch(Event::Move(direction));
    }

    /// Handle a `KeyboardEvent.key`. Returns true if it was a navigation key,
    /// so the caller knows to suppress the browser default.
    pub fn key_down(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(direction) => {
                self.move_active(direction);
                true
            }
            None => false,
        }
    }

    /// Reshuffle the same values into a new board and restart the timer.
    pub fn refresh(&mut self) {
        let grid = board::generate_grid(&self.spec.values, self.spec.size, &mut self.rng);
        let at = self.clock.now();
        self.dispatch(Event::Reset { grid, at });
        log::info!("refreshed board for game {}", self.config.game_id);
    }

    /// Record the current win under `name`.
    ///
    /// Does nothing without a bingo, after an earlier submission, or for an
    /// empty name. Returns the sink's key for the new record. A sink failure is
    /// logged and still counts as submitted.
    pub fn submit_score(&mut self, name: &str, sink: &mut dyn LeaderboardSink) -> Option<String> {
        if !self.state.bingo || self.state.leaderboard_submitted {
            log::debug!("no unsubmitted win to record");
            return None;
        }
        if name.is_empty() {
            return None;
        }
        let entry = LeaderboardEntry {
            name: name.to_string(),
            timestamp: self.state.end_time,
            duration: self.state.end_time.saturating_sub(self.state.start_time),
        };
        let key = match sink.push(&leaderboard_path(&self.config.game_id), &entry) {
            Ok(key) => {
                log::info!("recorded {} on leaderboard as {}", entry.name, key);
                Some(key)
            }
            Err(e) => {
                log::warn!("leaderboard push failed: {}", e);
                None
            }
        };
        self.dispatch(Event::Submitted);
        key
    }

    fn dispatch(&mut self, event: Event) {
        let same_board = !matches!(event, Event::Reset { .. });
        let prev_active = self.state.active_cell;

        self.state.update(event);

        if same_board && self.state.active_cell != prev_active {
            if let Some(hook) = self.on_focus.as_mut() {
                hook(self.state.active_cell);
            }
        }
        self.persist();
    }

    fn persist(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = storage::save(&mut **store, &self.config.game_id, &self.state) {
                log::warn!("could not save game {}: {}", self.config.game_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, SinkError, StorageError};
    use crate::leaderboard::MemoryLeaderboard;
    use crate::storage::{field_key, MemoryStore};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Clock that tests can wind forward.
    fn manual_clock(start: Millis) -> (Rc<Cell<Millis>>, impl Fn() -> Millis) {
        let t = Rc::new(Cell::new(start));
        let handle = Rc::clone(&t);
        (t, move || handle.get())
    }

    fn session(size: usize, start: Millis) -> (Rc<Cell<Millis>>, Session<BoardRng, impl Fn() -> Millis>) {
        let (t, clock) = manual_clock(start);
        let config = GameConfig::default().with_size(size).with_game_id("test");
        let s = Session::with_parts(config, BoardRng::from_seed(42), clock).unwrap();
        (t, s)
    }

    struct FailingSink;

    impl LeaderboardSink for FailingSink {
        fn push(&mut self, _path: &str, _entry: &LeaderboardEntry) -> Result<String, SinkError> {
            Err(SinkError::Rejected("offline".into()))
        }
    }

    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteFailed("quota exceeded".into()))
        }
    }

    fn win_top_row<R: RandomIndex, C: Clock>(s: &mut Session<R, C>) {
        for col in 0..s.state().size {
            s.toggle(0, col);
        }
    }

    #[test]
    fn test_empty_pool_fails_before_any_state() {
        let config = GameConfig::default().with_values(Vec::<String>::new());
        assert_eq!(Session::new(config).err(), Some(ConfigError::EmptyValuePool));
    }

    #[test]
    fn test_even_size_is_coerced() {
        let (_, s) = session(6, 0);
        assert_eq!(s.state().size, 5);
        assert_eq!(s.values().len(), 25);
    }

    #[test]
    fn test_generated_board_is_permutation_of_padded_values() {
        let (_, s) = session(5, 0);
        let mut on_board: Vec<String> = s.state().grid.cells().map(|c| c.value.clone()).collect();
        let mut expected = s.values().to_vec();
        on_board.sort();
        expected.sort();
        assert_eq!(on_board, expected);
    }

    #[test]
    fn test_bingo_records_end_time_from_clock() {
        let (t, mut s) = session(5, 1_000);
        t.set(61_000);
        win_top_row(&mut s);
        assert!(s.state().bingo);
        assert_eq!(s.state().end_time, 61_000);
        assert_eq!(s.state().duration(), Some(60_000));

        t.set(70_000);
        s.toggle(4, 0);
        assert_eq!(s.state().end_time, 61_000);
    }

    #[test]
    fn test_refresh_resets_and_keeps_values() {
        let (t, mut s) = session(5, 1_000);
        win_top_row(&mut s);
        s.move_active(Direction::Down);
        let values_before = s.values().to_vec();
        let start_before = s.state().start_time;

        t.set(5_000);
        s.refresh();
        let state = s.state();
        assert!(!state.bingo);
        assert!(!state.leaderboard_submitted);
        assert_eq!(state.selected_ids(), vec![12]);
        assert_eq!(state.selection.len(), 1);
        assert_eq!(state.end_time, 0);
        assert!(state.start_time >= start_before);
        assert_eq!(state.start_time, 5_000);
        assert_eq!((state.active_cell, state.active_row, state.active_col), (0, 0, 0));
        assert_eq!(s.values(), values_before.as_slice());
    }

    #[test]
    fn test_key_down_navigation() {
        let (_, mut s) = session(5, 0);
        assert!(s.key_down("ArrowRight"));
        assert!(s.key_down("Down"));
        assert!(!s.key_down("Enter"));
        assert_eq!((s.state().active_row, s.state().active_col), (1, 1));
        assert!(s.key_down("ArrowUp"));
        assert!(s.key_down("ArrowUp"));
        assert_eq!(s.state().active_cell, 1);
    }

    #[test]
    fn test_focus_hook_follows_active_cell() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let (_, s) = session(3, 0);
        let mut s = s.on_focus(move |id| sink.borrow_mut().push(id));

        s.move_active(Direction::Left); // clamped, no change
        s.move_active(Direction::Right);
        s.toggle(2, 2);
        s.focus(1, 1);
        s.toggle(1, 1); // free cell, ignored
        s.refresh(); // new board resets focus without notifying
        s.move_active(Direction::Down);

        assert_eq!(*seen.borrow(), vec![1, 8, 4, 3]);
    }

    #[test]
    fn test_submit_requires_bingo_and_name() {
        let (t, mut s) = session(3, 1_000);
        let mut sink = MemoryLeaderboard::new();
        assert_eq!(s.submit_score("ada", &mut sink), None);
        assert!(sink.records.is_empty());

        t.set(4_000);
        win_top_row(&mut s);
        assert_eq!(s.submit_score("", &mut sink), None);
        assert!(!s.state().leaderboard_submitted);

        let key = s.submit_score("ada", &mut sink);
        assert_eq!(key.as_deref(), Some("entry-0"));
        assert!(s.state().leaderboard_submitted);
        let entries: Vec<_> = sink.entries("games/test/leaderboard").collect();
        assert_eq!(
            entries,
            vec![&LeaderboardEntry { name: "ada".into(), timestamp: 4_000, duration: 3_000 }]
        );

        // Only once per win.
        assert_eq!(s.submit_score("ada again", &mut sink), None);
        assert_eq!(sink.records.len(), 1);

        s.refresh();
        assert!(!s.state().leaderboard_submitted);
    }

    #[test]
    fn test_sink_failure_does_not_disturb_game() {
        let (_, mut s) = session(3, 0);
        win_top_row(&mut s);
        let before = s.state().clone();
        assert_eq!(s.submit_score("ada", &mut FailingSink), None);
        assert!(s.state().leaderboard_submitted);
        assert_eq!(s.state().selection, before.selection);
        assert_eq!(s.state().end_time, before.end_time);
    }

    #[test]
    fn test_store_roundtrip_across_sessions() {
        let (_, s) = session(5, 100);
        let mut s = s.with_store(Box::new(MemoryStore::new()));
        s.toggle(0, 0);
        s.toggle(3, 1);
        s.move_active(Direction::Right);

        let saved = s.store().and_then(|st| st.get(&field_key("test", "selection")));
        assert_eq!(saved.as_deref(), Some(r#"{"0":true,"12":true,"16":true}"#));

        // Rebuild the store a new page load would see.
        let mut copy = MemoryStore::new();
        for field in ["grid", "midpoint", "selection", "size", "startTime", "endTime", "bingo", "leaderboardSubmitted"] {
            let key = field_key("test", field);
            if let Some(v) = s.store().and_then(|st| st.get(&key)) {
                copy.set(&key, &v).unwrap();
            }
        }
        let (_, reloaded) = manual_clock(9_999);
        let config = GameConfig::default().with_game_id("test");
        let r = Session::with_parts(config, BoardRng::from_seed(7), reloaded)
            .unwrap()
            .with_store(Box::new(copy));

        assert_eq!(r.state().grid, s.state().grid);
        assert_eq!(r.state().selection, s.state().selection);
        assert_eq!(r.state().start_time, 100);
        assert_eq!(r.state().active_cell, 0);
    }

    #[test]
    fn test_refresh_after_reload_keeps_configured_size() {
        let (_, small) = session(3, 0);
        let mut small = small.with_store(Box::new(MemoryStore::new()));
        small.toggle(0, 0);

        let mut copy = MemoryStore::new();
        for field in ["grid", "midpoint", "selection", "size", "startTime", "endTime", "bingo", "leaderboardSubmitted"] {
            let key = field_key("test", field);
            if let Some(v) = small.store().and_then(|st| st.get(&key)) {
                copy.set(&key, &v).unwrap();
            }
        }

        let (_, clock) = manual_clock(50);
        let config = GameConfig::default().with_game_id("test");
        let mut s = Session::with_parts(config, BoardRng::from_seed(3), clock)
            .unwrap()
            .with_store(Box::new(copy));
        assert_eq!(s.state().size, 5);
        assert_eq!(s.state().grid.size(), 5);
        assert_eq!(s.state().selected_ids(), vec![12]);

        s.refresh();
        assert_eq!(s.state().size, 5);
        assert_eq!(s.state().grid.size(), 5);
    }

    #[test]
    fn test_store_failure_is_not_fatal() {
        let (_, s) = session(3, 0);
        let mut s = s.with_store(Box::new(FullStore));
        win_top_row(&mut s);
        assert!(s.state().bingo);
    }
}
