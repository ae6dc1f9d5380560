//! Abstractions over the two kinds of sources an inspection reads from.
//!
//! The `FileSystem` trait covers `/proc` text files and the container marker
//! file, the `CommandRunner` trait covers external commands (`env`, `uname`).
//! Both have a real implementation and an in-memory one under
//! [`crate::collector::mock`] for tests.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Creates `path` exclusively and writes `contents` into it.
    ///
    /// Fails with `AlreadyExists` if the file is already there, so two
    /// concurrent creators cannot both succeed.
    fn create_new(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Best-effort read: returns the file contents, or an empty string when
    /// the file is missing or unreadable.
    fn read_or_empty(&self, path: &Path) -> String {
        match self.read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Could not read {}: {e}", path.display());
                String::new()
            }
        }
    }
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_new(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()
    }
}

/// Failure to run an external command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    EmptyCommand,
    #[error("failed to run `{command}`: {reason}")]
    Spawn { command: String, reason: String },
    #[error("`{command}` exited with {}", exit_code_label(.code))]
    ExitStatus { command: String, code: Option<i32> },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}

impl CommandError {
    /// Degraded value recorded in place of command output.
    ///
    /// Non-zero exits become `"ERROR"`; failures to start the process carry
    /// their reason.
    pub fn sentinel(&self) -> String {
        match self {
            CommandError::ExitStatus { .. } => "ERROR".to_string(),
            CommandError::Spawn { reason, .. } => format!("IO Exception {reason}"),
            CommandError::EmptyCommand => "IO Exception empty command".to_string(),
        }
    }
}

/// Runs an external command and returns its captured standard output.
pub trait CommandRunner: Send + Sync {
    /// Runs `argv[0]` with the remaining arguments, blocking until it exits.
    fn run(&self, argv: &[&str]) -> Result<String, CommandError>;
}

/// Runs commands with `std::process::Command`.
///
/// There is no timeout: a hung command blocks the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[&str]) -> Result<String, CommandError> {
        let (program, args) = argv.split_first().ok_or(CommandError::EmptyCommand)?;
        let command = argv.join(" ");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| CommandError::Spawn {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(CommandError::ExitStatus {
                command,
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
