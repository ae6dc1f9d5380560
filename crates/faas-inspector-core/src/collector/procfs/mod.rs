//! Parsers for the Linux `/proc` filesystem.
//!
//! Only the two kernel text sources the inspector consumes are covered:
//! `/proc/cpuinfo` and `/proc/stat`.

pub mod parser;

pub use parser::{CpuCounters, CpuIdentity, ParseError};
