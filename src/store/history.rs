//! History Store
//!
//! Durable log of conversation turns. Read in full at startup, overwritten
//! in full on every save. This file is the sole carrier of conversational
//! state across process restarts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::types::{Role, Turn};

/// The append-only conversation log, backed by a JSON array on disk.
pub struct HistoryStore {
    path: PathBuf,
    turns: Vec<Turn>,
}

impl HistoryStore {
    /// Load the history file at `path`. A missing or unparseable file is
    /// non-fatal: the store starts empty and the condition is logged.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let turns = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<Turn>>(&contents) {
                Ok(turns) => turns,
                Err(err) => {
                    warn!(path = %path.display(), %err, "history file corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        HistoryStore { path, turns }
    }

    /// Append a turn. Turns are never edited or removed.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True when the most recent persisted turn is a user turn, meaning a
    /// prior invocation restarted before producing a reply.
    pub fn ends_with_user_turn(&self) -> bool {
        matches!(self.turns.last(), Some(t) if t.role == Role::User)
    }

    /// Persist the full turn sequence, atomically (write temp, then rename).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create history directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.turns)
            .context("failed to serialize history")?;
        write_atomic(&self.path, &json)
            .with_context(|| format!("failed to write history file: {}", self.path.display()))
    }
}

/// Write `contents` to `path` via a temp file in the same directory followed
/// by a rename, so readers never observe a partial file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::load(dir.path().join("history.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = HistoryStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::load(&path);
        store.push(Turn::user("hello"));
        store.push(Turn::assistant("hi there"));
        store.save().unwrap();

        let reloaded = HistoryStore::load(&path);
        assert_eq!(reloaded.turns(), store.turns());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/history.json");

        let mut store = HistoryStore::load(&path);
        store.push(Turn::user("hello"));
        store.save().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_ends_with_user_turn() {
        let dir = tempdir().unwrap();
        let mut store = HistoryStore::load(dir.path().join("history.json"));
        assert!(!store.ends_with_user_turn());

        store.push(Turn::user("hello"));
        assert!(store.ends_with_user_turn());

        store.push(Turn::assistant("hi"));
        assert!(!store.ends_with_user_turn());
    }
}
