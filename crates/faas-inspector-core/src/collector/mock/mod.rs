//! Mock sources for testing collectors without Linux.

pub mod commands;
pub mod filesystem;
pub mod scenarios;

pub use commands::MockCommands;
pub use filesystem::MockFs;
pub use scenarios::{SCENARIO_BTIME, SCENARIO_KERNEL_VERSION};
