//! Isolated test environment with a temp database.

#![allow(dead_code)]

use super::{QuireCommand, TestNote};
use quire::domain::{Note, NotePath};
use quire::store::NoteStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding the database and a private config home.
///
/// Everything is removed when the environment is dropped.
pub struct TestEnv {
    temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.root().join("notes.sqlite")
    }

    pub fn config_home(&self) -> PathBuf {
        self.root().join("config")
    }

    /// Opens the environment's database directly through the library.
    pub fn store(&self) -> NoteStore {
        NoteStore::open(&self.db_path()).expect("Failed to open store")
    }

    /// Saves `note` through the library, bypassing the CLI.
    pub fn add_note(&self, note: &TestNote) -> Note {
        let path = NotePath::new(note.path()).expect("Invalid note path");
        self.store()
            .save(&path, note.to_markdown().as_bytes())
            .expect("Failed to save test note")
    }

    /// A command bound to this environment's database and config home.
    pub fn cmd(&self) -> QuireCommand {
        QuireCommand::new()
            .config_home(&self.config_home())
            .db(&self.db_path())
    }

    /// Writes a file under the environment root and returns its path.
    pub fn write_file(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_add_note_is_visible_to_store() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("inbox/first", "First").tag("todo"));

        let store = env.store();
        let notes = store.list().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title(), "First");
        assert_eq!(notes[0].tags().as_slice(), ["todo"]);
    }

    #[test]
    fn test_env_command_uses_db() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], env.db_path().to_string_lossy());
    }
}
