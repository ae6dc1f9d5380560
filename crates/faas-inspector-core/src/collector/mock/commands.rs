//! Canned command outputs for testing collectors without spawning processes.

use crate::collector::traits::{CommandError, CommandRunner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Command runner that answers from a table keyed by the space-joined argv.
///
/// Commands missing from the table fail the way a missing binary does.
/// Every call is recorded, in order, for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockCommands {
    outputs: HashMap<String, Result<String, CommandError>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a successful command with the given stdout.
    pub fn with_output(mut self, argv: &[&str], stdout: impl Into<String>) -> Self {
        self.outputs.insert(argv.join(" "), Ok(stdout.into()));
        self
    }

    /// Registers a command that exits with a non-zero status.
    pub fn with_exit_status(mut self, argv: &[&str], code: i32) -> Self {
        let command = argv.join(" ");
        self.outputs.insert(
            command.clone(),
            Err(CommandError::ExitStatus {
                command,
                code: Some(code),
            }),
        );
        self
    }

    /// Returns the commands run so far, space-joined.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CommandRunner for MockCommands {
    fn run(&self, argv: &[&str]) -> Result<String, CommandError> {
        if argv.is_empty() {
            return Err(CommandError::EmptyCommand);
        }
        let command = argv.join(" ");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());

        match self.outputs.get(&command) {
            Some(result) => result.clone(),
            None => Err(CommandError::Spawn {
                command,
                reason: "No such file or directory (os error 2)".to_string(),
            }),
        }
    }
}
