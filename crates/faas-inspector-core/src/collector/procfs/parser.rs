//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions over file content. They never panic on short or
//! malformed input: whatever cannot be read is reported as missing.

use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Splits `label : value` lines on the first colon.
///
/// Both sides are trimmed. Lines without a colon (including the blank lines
/// separating processors in `/proc/cpuinfo`) are skipped.
pub fn parse_label_values(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(label, value)| (label.trim(), value.trim()))
}

/// CPU identity strings from `/proc/cpuinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuIdentity {
    /// First `model name` value, e.g. `Intel(R) Xeon(R) Processor @ 2.50GHz`.
    pub model_name: Option<String>,
    /// First `model` value, e.g. `63`.
    pub model: Option<String>,
}

/// Parses the first `model name` and `model` entries of `/proc/cpuinfo`.
///
/// Only the first processor block matters: on a single host every block
/// repeats the same identity.
pub fn parse_cpu_identity(content: &str) -> CpuIdentity {
    let mut identity = CpuIdentity::default();

    for (label, value) in parse_label_values(content) {
        match label {
            "model name" if identity.model_name.is_none() => {
                identity.model_name = Some(value.to_string());
            }
            "model" if identity.model.is_none() => {
                identity.model = Some(value.to_string());
            }
            _ => {}
        }
        if identity.model_name.is_some() && identity.model.is_some() {
            break;
        }
    }

    identity
}

/// Aggregate CPU time counters from the first line of `/proc/stat`, in clock ticks.
///
/// Older kernels report fewer columns; every field that is absent or not a
/// number stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub user: Option<u64>,
    pub nice: Option<u64>,
    pub system: Option<u64>,
    pub idle: Option<u64>,
    pub iowait: Option<u64>,
    pub irq: Option<u64>,
    pub softirq: Option<u64>,
    pub steal: Option<u64>,
}

impl CpuCounters {
    /// Counters in `/proc/stat` column order, paired with their column name.
    pub fn fields(&self) -> [(&'static str, Option<u64>); 8] {
        [
            ("user", self.user),
            ("nice", self.nice),
            ("system", self.system),
            ("idle", self.idle),
            ("iowait", self.iowait),
            ("irq", self.irq),
            ("softirq", self.softirq),
            ("steal", self.steal),
        ]
    }
}

/// Parses the aggregate `cpu` line, which must be the first line of `/proc/stat`.
///
/// The label is followed by a variable amount of whitespace (the kernel pads
/// it with two spaces), so columns are taken after whitespace splitting.
pub fn parse_cpu_counters(content: &str) -> Result<CpuCounters, ParseError> {
    let first_line = content
        .lines()
        .next()
        .ok_or_else(|| ParseError::new("empty stat content"))?;

    let parts: Vec<&str> = first_line.split_whitespace().collect();
    match parts.first() {
        Some(&"cpu") => {}
        Some(label) => {
            return Err(ParseError::new(format!(
                "expected aggregate cpu line, got '{label}'"
            )));
        }
        None => return Err(ParseError::new("blank first line in stat")),
    }

    let get_val = |idx: usize| -> Option<u64> { parts.get(idx).and_then(|s| s.parse().ok()) };

    Ok(CpuCounters {
        user: get_val(1),
        nice: get_val(2),
        system: get_val(3),
        idle: get_val(4),
        iowait: get_val(5),
        irq: get_val(6),
        softirq: get_val(7),
        steal: get_val(8),
    })
}

/// Parses the `btime` line of `/proc/stat` (boot time, seconds since epoch).
pub fn parse_boot_time(content: &str) -> Result<u64, ParseError> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("btime"))
        .ok_or_else(|| ParseError::new("no btime line in stat"))?;

    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| ParseError::new("btime line has no value"))?
        .parse()
        .map_err(|_| ParseError::new(format!("invalid btime value in '{line}'")))
}
