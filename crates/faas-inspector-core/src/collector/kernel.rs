//! Kernel version via `uname -v`.

use crate::collector::traits::{CommandError, CommandRunner};

pub struct KernelCollector<C: CommandRunner> {
    runner: C,
}

impl<C: CommandRunner> KernelCollector<C> {
    pub fn new(runner: C) -> Self {
        Self { runner }
    }

    /// Kernel version string, surrounding whitespace trimmed.
    pub fn version(&self) -> Result<String, CommandError> {
        let output = self.runner.run(&["uname", "-v"])?;
        Ok(output.trim().to_string())
    }
}
