//! Fluent wrapper around assert_cmd::Command.

#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Builder for one invocation of the `quire` binary.
///
/// The config directory is always redirected so a developer's own
/// `config.toml` never leaks into a test run.
pub struct QuireCommand {
    args: Vec<String>,
    config_home: Option<PathBuf>,
    stdin: Option<Vec<u8>>,
}

impl QuireCommand {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_home: None,
            stdin: None,
        }
    }

    /// Sets the global `--db` option.
    pub fn db(mut self, path: &Path) -> Self {
        self.args.push("--db".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Points `XDG_CONFIG_HOME` at `dir`.
    pub fn config_home(mut self, dir: &Path) -> Self {
        self.config_home = Some(dir.to_path_buf());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Feeds `input` to the process on stdin.
    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("quire").expect("Failed to find quire binary");
        cmd.args(&self.args).env_remove("RUST_LOG");
        if let Some(dir) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", dir).env("HOME", dir);
        }
        if let Some(input) = self.stdin {
            cmd.write_stdin(input);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    pub fn search(self, query: &str) -> Self {
        self.args(["search", query])
    }

    pub fn show(self, path: &str) -> Self {
        self.args(["show", path])
    }

    pub fn render(self, path: &str) -> Self {
        self.args(["render", path])
    }

    pub fn tagged(self, tag: &str) -> Self {
        self.args(["tagged", tag])
    }

    /// `save <path>`, reading the text from stdin.
    pub fn save(self, path: &str, text: &str) -> Self {
        self.args(["save", path]).stdin(text.as_bytes().to_vec())
    }

    // ===========================================
    // Format Options
    // ===========================================

    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

impl Default for QuireCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        QuireCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_db() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("notes.sqlite");
        let cmd = QuireCommand::new().db(&db);
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], db.to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = QuireCommand::new().ls().format_json();
        let args = cmd.get_args();
        assert_eq!(args, ["ls", "--format", "json"]);
    }
}
