//! CPU identity and time counters from `/proc`.

use crate::collector::CollectError;
use crate::collector::procfs::parser::{
    CpuCounters, CpuIdentity, parse_cpu_counters, parse_cpu_identity,
};
use crate::collector::traits::FileSystem;
use std::path::PathBuf;

/// Reads `/proc/cpuinfo` and the aggregate line of `/proc/stat`.
pub struct CpuCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
}

impl<F: FileSystem> CpuCollector<F> {
    /// Creates a new CPU collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually `/proc`)
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// CPU model name and model number.
    ///
    /// A missing or unreadable `/proc/cpuinfo` reads as empty and yields an
    /// identity with neither field set.
    pub fn identity(&self) -> CpuIdentity {
        let content = self.fs.read_or_empty(&self.proc_path.join("cpuinfo"));
        parse_cpu_identity(&content)
    }

    /// Aggregate CPU time counters in clock ticks.
    pub fn counters(&self) -> Result<CpuCounters, CollectError> {
        let path = self.proc_path.join("stat");
        let content = self.fs.read_to_string(&path)?;
        Ok(parse_cpu_counters(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_identity_x86() {
        let collector = CpuCollector::new(MockFs::x86_container(), "/proc");
        let identity = collector.identity();
        assert_eq!(
            identity.model_name.as_deref(),
            Some("Intel(R) Xeon(R) Processor @ 2.50GHz")
        );
        assert_eq!(identity.model.as_deref(), Some("63"));
    }

    #[test]
    fn test_identity_missing_cpuinfo() {
        let collector = CpuCollector::new(MockFs::sandboxed_container(), "/proc");
        assert_eq!(collector.identity(), CpuIdentity::default());
    }

    #[test]
    fn test_identity_unreadable_cpuinfo() {
        let fs = MockFs::x86_container();
        fs.add_unreadable("/proc/cpuinfo");
        let collector = CpuCollector::new(fs, "/proc");
        assert_eq!(collector.identity(), CpuIdentity::default());
    }

    #[test]
    fn test_counters() {
        let collector = CpuCollector::new(MockFs::x86_container(), "/proc");
        let counters = collector.counters().unwrap();
        assert_eq!(counters.user, Some(4705));
        assert_eq!(counters.nice, Some(356));
        assert_eq!(counters.system, Some(584));
        assert_eq!(counters.idle, Some(3699));
        assert_eq!(counters.iowait, Some(23));
        assert_eq!(counters.irq, Some(0));
        assert_eq!(counters.softirq, Some(19));
        assert_eq!(counters.steal, Some(12));
    }

    #[test]
    fn test_counters_custom_proc_path() {
        let fs = MockFs::new();
        fs.add_file("/host/proc/stat", "cpu 100 20 30 500 10 5 2 1\n");
        let collector = CpuCollector::new(fs, "/host/proc");
        assert_eq!(collector.counters().unwrap().user, Some(100));
    }

    #[test]
    fn test_counters_missing_stat() {
        let collector = CpuCollector::new(MockFs::sandboxed_container(), "/proc");
        assert!(matches!(collector.counters(), Err(CollectError::Io(_))));
    }
}
