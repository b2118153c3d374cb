// Best-effort persistence. The scorecard keeps working in memory whatever
// happens on disk, so every failure path here degrades to "no saved game"
// or a skipped write, never an error the game has to handle.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::game::model::{GameState, SCHEMA_VERSION};

// Namespace key for the saved scorecard; versioned alongside the schema.
pub const STORAGE_KEY: &str = "wizard-score-tracker-v1";

pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// A store writing `<dir>/wizard-score-tracker-v1.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Returns the saved game, or `None` for a missing, unreadable, corrupt,
    /// or forward-incompatible snapshot. A version mismatch is "no saved
    /// game", not an error; old snapshots are discarded, never migrated.
    pub fn load(&self) -> Option<GameState> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let state: GameState = serde_json::from_str(&raw).ok()?;
        if state.version != SCHEMA_VERSION {
            return None;
        }
        Some(state)
    }

    pub fn save(&self, state: &GameState) {
        if let Ok(json) = serde_json::to_string(state) {
            let _ = fs::write(&self.path, json);
        }
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Coalesces a burst of snapshots into one deferred write of the latest.
/// Each pushed snapshot supersedes any pending one; the write happens once
/// the debounce window passes with nothing newer. Dropping the saver flushes
/// whatever is still pending.
pub struct DebouncedSaver {
    sender: Option<Sender<GameState>>,
    handle: Option<JoinHandle<()>>,
}

impl DebouncedSaver {
    pub fn spawn(store: Store, debounce: Duration) -> Self {
        let (sender, receiver) = mpsc::channel::<GameState>();
        let handle = thread::spawn(move || {
            while let Ok(mut latest) = receiver.recv() {
                loop {
                    match receiver.recv_timeout(debounce) {
                        // a newer snapshot cancels the pending write
                        Ok(newer) => latest = newer,
                        Err(RecvTimeoutError::Timeout) => {
                            store.save(&latest);
                            break;
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            store.save(&latest);
                            return;
                        }
                    }
                }
            }
        });
        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    pub fn push(&self, state: GameState) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(state);
        }
    }
}

impl Drop for DebouncedSaver {
    fn drop(&mut self) {
        // closing the channel tells the thread to flush and exit
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
