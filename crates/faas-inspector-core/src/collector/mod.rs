//! Environment collectors for a single function invocation.
//!
//! Each collector reads one kind of source and reports typed results. Sources
//! are reached only through the [`FileSystem`] and [`CommandRunner`] traits, so
//! every collector can be exercised against [`MockFs`] and [`MockCommands`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Inspector                           │
//! │  ┌──────────────┐ ┌────────────────┐ ┌──────────┐ ┌────────┐ │
//! │  │ CpuCollector │ │ContainerStamper│ │ Platform │ │ Kernel │ │
//! │  │ /proc/cpuinfo│ │ marker file    │ │ `env`    │ │`uname` │ │
//! │  │ /proc/stat   │ │ /proc/stat     │ │          │ │        │ │
//! │  └──────┬───────┘ └───────┬────────┘ └────┬─────┘ └───┬────┘ │
//! │         └────────┬────────┘               └─────┬─────┘      │
//! │           ┌──────▼──────┐              ┌────────▼──────┐     │
//! │           │ FileSystem  │ (trait)      │ CommandRunner │     │
//! │           └──────┬──────┘              └────────┬──────┘     │
//! └──────────────────┼──────────────────────────────┼────────────┘
//!           ┌────────┴───────┐            ┌─────────┴─────────┐
//!     ┌─────▼─────┐   ┌──────▼─────┐ ┌────▼──────────────┐ ┌──▼───────────┐
//!     │  RealFs   │   │   MockFs   │ │SystemCommandRunner│ │ MockCommands │
//!     └───────────┘   └────────────┘ └───────────────────┘ └──────────────┘
//! ```
//!
//! Collectors return `Result<_, CollectError>`; turning an error into a
//! missing attribute is the inspector's job.

pub mod container;
pub mod cpu;
pub mod kernel;
pub mod mock;
pub mod platform;
pub mod procfs;
pub mod traits;

use thiserror::Error;

pub use container::{ContainerStamp, ContainerStamper};
pub use cpu::CpuCollector;
pub use kernel::KernelCollector;
pub use mock::{MockCommands, MockFs};
pub use platform::{Platform, PlatformCollector, detect_platform};
pub use procfs::ParseError;
pub use traits::{CommandError, CommandRunner, FileSystem, RealFs, SystemCommandRunner};

/// Error type for collection failures.
#[derive(Debug, Error)]
pub enum CollectError {
    /// I/O error reading a source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Source present but not in the expected shape.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
