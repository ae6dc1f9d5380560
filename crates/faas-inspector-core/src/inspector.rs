//! Per-invocation inspector.
//!
//! One `Inspector` is created per function invocation. Its collectors run
//! independently: a failure in one only leaves its own attributes out of the
//! record (command failures are recorded as a sentinel string instead).

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::attributes::{AttributeRecord, AttributeValue, keys};
use crate::collector::{
    ContainerStamper, CpuCollector, FileSystem, KernelCollector, Platform, PlatformCollector,
    RealFs, SystemCommandRunner, traits::CommandRunner,
};
use crate::config::InspectorConfig;
use crate::timing::{InspectionTiming, InvocationClock};

/// Attribute names for the aggregate CPU counters, in `/proc/stat` column order.
const CPU_COUNTER_KEYS: [&str; 8] = [
    keys::CPU_USR,
    keys::CPU_NICE,
    keys::CPU_KRN,
    keys::CPU_IDLE,
    keys::CPU_IOWAIT,
    keys::CPU_IRQ,
    keys::CPU_SOFT_IRQ,
    keys::VM_CPU_STEAL,
];

/// Collects environment facts for one invocation into an [`AttributeRecord`].
pub struct Inspector<F = RealFs, C = SystemCommandRunner>
where
    F: FileSystem + Clone,
    C: CommandRunner + Clone,
{
    attributes: AttributeRecord,
    clock: InvocationClock,
    cpu_collector: CpuCollector<F>,
    container_stamper: ContainerStamper<F>,
    kernel_collector: KernelCollector<C>,
    platform_collector: PlatformCollector<C>,
    last_timing: Option<InspectionTiming>,
}

impl Inspector {
    /// Creates an inspector over the real filesystem and real commands.
    pub fn new() -> Self {
        Self::with_config(InspectorConfig::default())
    }

    pub fn with_config(config: InspectorConfig) -> Self {
        Self::with_sources(RealFs::new(), SystemCommandRunner::new(), config)
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, C> Inspector<F, C>
where
    F: FileSystem + Clone,
    C: CommandRunner + Clone,
{
    /// Creates an inspector over the given sources.
    ///
    /// The start time is captured here; `version` and `lang` are recorded
    /// immediately.
    pub fn with_sources(fs: F, runner: C, config: InspectorConfig) -> Self {
        let clock = InvocationClock::start();

        let mut attributes = AttributeRecord::new();
        attributes.set(keys::VERSION, config.version);
        attributes.set(keys::LANG, config.lang.as_str());

        Self {
            attributes,
            clock,
            cpu_collector: CpuCollector::new(fs.clone(), &config.proc_path),
            container_stamper: ContainerStamper::new(fs, &config.marker_path, &config.proc_path),
            kernel_collector: KernelCollector::new(runner.clone()),
            platform_collector: PlatformCollector::new(runner),
            last_timing: None,
        }
    }

    /// Records container identity (`uuid`, `newcontainer`) and host boot
    /// time (`vmuptime`).
    pub fn inspect_container(&mut self) {
        let stamp = self.container_stamper.stamp();
        self.attributes.set(keys::UUID, stamp.uuid);
        self.attributes.set(keys::NEW_CONTAINER, stamp.new_container);

        match self.container_stamper.boot_time() {
            Ok(btime) => match i64::try_from(btime) {
                Ok(btime) => self.attributes.set(keys::VM_UPTIME, btime),
                Err(_) => debug!("Boot time {btime} out of range, skipping"),
            },
            Err(e) => debug!("Skipping vmuptime: {e}"),
        }
    }

    /// Records CPU identity (`cpuType`, `cpuModel`) and the aggregate CPU
    /// time counters.
    pub fn inspect_cpu(&mut self) {
        let identity = self.cpu_collector.identity();
        match identity.model_name {
            Some(model_name) => self.attributes.set(keys::CPU_TYPE, model_name),
            None => debug!("No 'model name' in cpuinfo, skipping cpuType"),
        }
        match identity.model {
            Some(model) => self.attributes.set(keys::CPU_MODEL, model),
            None => debug!("No 'model' in cpuinfo, skipping cpuModel"),
        }

        let counters = match self.cpu_collector.counters() {
            Ok(counters) => counters,
            Err(e) => {
                debug!("Skipping CPU counters: {e}");
                return;
            }
        };
        for (key, (field, value)) in CPU_COUNTER_KEYS.into_iter().zip(counters.fields()) {
            match value.and_then(|v| i64::try_from(v).ok()) {
                Some(value) => self.attributes.set(key, value),
                None => debug!("CPU counter '{field}' unavailable, skipping {key}"),
            }
        }
    }

    /// Records the hosting platform (`platform`).
    ///
    /// If `env` cannot be run the platform is reported as unknown.
    pub fn inspect_platform(&mut self) {
        let platform = self.platform_collector.detect().unwrap_or_else(|e| {
            debug!("Platform detection failed: {e}");
            Platform::Unknown
        });
        self.attributes.set(keys::PLATFORM, platform.name());
    }

    /// Records the kernel version (`linuxVersion`).
    ///
    /// A failed `uname` is recorded as its error sentinel.
    pub fn inspect_linux(&mut self) {
        let version = self.kernel_collector.version().unwrap_or_else(|e| {
            debug!("Kernel version unavailable: {e}");
            e.sentinel()
        });
        self.attributes.set(keys::LINUX_VERSION, version);
    }

    /// Runs every collector, then records `frameworkRuntime`.
    ///
    /// Also records timing information accessible via `last_timing()`.
    pub fn inspect_all(&mut self) {
        let total_start = Instant::now();
        let mut timing = InspectionTiming::default();

        let start = Instant::now();
        self.inspect_cpu();
        timing.cpu = start.elapsed();

        let start = Instant::now();
        self.inspect_container();
        timing.container = start.elapsed();

        let start = Instant::now();
        self.inspect_linux();
        timing.linux = start.elapsed();

        let start = Instant::now();
        self.inspect_platform();
        timing.platform = start.elapsed();

        self.add_timestamp(keys::FRAMEWORK_RUNTIME);

        timing.total = total_start.elapsed();
        debug!(
            "Inspection took {:?} (cpu={:?}, container={:?}, linux={:?}, platform={:?})",
            timing.total, timing.cpu, timing.container, timing.linux, timing.platform
        );
        self.last_timing = Some(timing);
    }

    /// Adds or overwrites a custom attribute.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.set(key, value);
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Records milliseconds elapsed since construction under `key`.
    pub fn add_timestamp(&mut self, key: impl Into<String>) {
        let elapsed = self.clock.elapsed_ms();
        self.attributes.set(key, elapsed);
    }

    /// Wall-clock time this inspector was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.clock.started_at()
    }

    /// Returns timing information from the last `inspect_all`.
    pub fn last_timing(&self) -> Option<&InspectionTiming> {
        self.last_timing.as_ref()
    }

    pub fn attributes(&self) -> &AttributeRecord {
        &self.attributes
    }

    /// Records total `runtime` and returns the finished record.
    ///
    /// Calling it again only recomputes `runtime`.
    pub fn finish(&mut self) -> AttributeRecord {
        let elapsed = self.clock.elapsed_ms();
        self.attributes.set(keys::RUNTIME, elapsed);
        self.attributes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockCommands, MockFs, SCENARIO_BTIME, SCENARIO_KERNEL_VERSION};
    use std::time::Duration;

    const MARKER: &str = "/tmp/container-id";

    fn mock_inspector(fs: &MockFs, commands: &MockCommands) -> Inspector<MockFs, MockCommands> {
        Inspector::with_sources(fs.clone(), commands.clone(), InspectorConfig::default())
    }

    fn int(record: &AttributeRecord, key: &str) -> Option<i64> {
        record.get(key).and_then(|v| v.as_i64())
    }

    fn text<'a>(record: &'a AttributeRecord, key: &str) -> Option<&'a str> {
        record.get(key).and_then(|v| v.as_str())
    }

    #[test]
    fn test_construction_sets_version_and_lang_only() {
        let inspector = mock_inspector(&MockFs::new(), &MockCommands::new());
        let record = inspector.attributes();
        assert_eq!(record.get(keys::VERSION), Some(&AttributeValue::Float(0.2)));
        assert_eq!(text(record, keys::LANG), Some("rust"));
        assert!(!record.contains_key(keys::RUNTIME));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_inspect_all_aws_lambda() {
        let fs = MockFs::x86_container();
        let commands = MockCommands::aws_lambda();
        let mut inspector = mock_inspector(&fs, &commands);

        inspector.inspect_all();
        let record = inspector.finish();

        assert_eq!(text(&record, keys::PLATFORM), Some("AWS Lambda"));
        assert_eq!(
            text(&record, keys::LINUX_VERSION),
            Some(SCENARIO_KERNEL_VERSION)
        );
        assert_eq!(
            text(&record, keys::CPU_TYPE),
            Some("Intel(R) Xeon(R) Processor @ 2.50GHz")
        );
        assert_eq!(text(&record, keys::CPU_MODEL), Some("63"));
        assert_eq!(int(&record, keys::CPU_USR), Some(4705));
        assert_eq!(int(&record, keys::VM_CPU_STEAL), Some(12));
        assert_eq!(int(&record, keys::VM_UPTIME), Some(SCENARIO_BTIME as i64));
        assert_eq!(int(&record, keys::NEW_CONTAINER), Some(1));
        assert_eq!(text(&record, keys::UUID).map(str::len), Some(36));
        assert!(int(&record, keys::FRAMEWORK_RUNTIME).is_some());

        let runtime = int(&record, keys::RUNTIME).unwrap();
        assert!(runtime >= 0);
        assert!(runtime >= int(&record, keys::FRAMEWORK_RUNTIME).unwrap());
    }

    #[test]
    fn test_inspect_all_runs_commands_in_order() {
        let commands = MockCommands::google_cloud_functions();
        let mut inspector = mock_inspector(&MockFs::x86_container(), &commands);
        inspector.inspect_all();

        assert_eq!(commands.calls(), vec!["uname -v", "env"]);
        assert_eq!(
            text(inspector.attributes(), keys::PLATFORM),
            Some("Google Cloud Functions")
        );
        assert!(inspector.last_timing().is_some());
    }

    #[test]
    fn test_synthetic_stat_counters_and_boot_time() {
        let fs = MockFs::new();
        fs.add_file(
            "/proc/stat",
            "cpu 100 20 30 500 10 5 2 1\nbtime 1600000000\n",
        );
        let mut inspector = mock_inspector(&fs, &MockCommands::new());

        inspector.inspect_cpu();
        inspector.inspect_container();
        let record = inspector.finish();

        assert_eq!(int(&record, keys::CPU_USR), Some(100));
        assert_eq!(int(&record, keys::CPU_NICE), Some(20));
        assert_eq!(int(&record, keys::CPU_KRN), Some(30));
        assert_eq!(int(&record, keys::CPU_IDLE), Some(500));
        assert_eq!(int(&record, keys::CPU_IOWAIT), Some(10));
        assert_eq!(int(&record, keys::CPU_IRQ), Some(5));
        assert_eq!(int(&record, keys::CPU_SOFT_IRQ), Some(2));
        assert_eq!(int(&record, keys::VM_CPU_STEAL), Some(1));
        assert_eq!(int(&record, keys::VM_UPTIME), Some(1_600_000_000));
    }

    #[test]
    fn test_short_stat_line_omits_missing_counters() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  4705 356 584 3699\n");
        let mut inspector = mock_inspector(&fs, &MockCommands::new());

        inspector.inspect_cpu();
        let record = inspector.attributes();
        assert_eq!(int(record, keys::CPU_IDLE), Some(3699));
        assert!(!record.contains_key(keys::CPU_IOWAIT));
        assert!(!record.contains_key(keys::VM_CPU_STEAL));
    }

    #[test]
    fn test_sandboxed_container_degrades() {
        let fs = MockFs::sandboxed_container();
        let mut inspector = mock_inspector(&fs, &MockCommands::no_commands());

        inspector.inspect_all();
        let record = inspector.finish();

        for key in [keys::CPU_TYPE, keys::CPU_MODEL, keys::VM_UPTIME, keys::CPU_USR] {
            assert!(!record.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(text(&record, keys::PLATFORM), Some("Unknown Platform"));
        assert!(
            text(&record, keys::LINUX_VERSION)
                .unwrap()
                .starts_with("IO Exception")
        );
        // The marker is still stamped.
        assert_eq!(int(&record, keys::NEW_CONTAINER), Some(1));
        assert!(record.contains_key(keys::VERSION));
        assert!(record.contains_key(keys::LANG));
        assert!(record.contains_key(keys::RUNTIME));
    }

    #[test]
    fn test_plain_host_is_unknown_platform() {
        let commands = MockCommands::plain_host();
        let mut inspector = mock_inspector(&MockFs::x86_container(), &commands);

        inspector.inspect_all();
        let record = inspector.finish();

        assert_eq!(text(&record, keys::PLATFORM), Some("Unknown Platform"));
        assert_eq!(text(&record, keys::LINUX_VERSION), Some(SCENARIO_KERNEL_VERSION));
        assert!(commands.calls().contains(&"env".to_string()));
    }

    #[test]
    fn test_arm_container_omits_cpu_identity() {
        let commands = MockCommands::aws_lambda();
        let mut inspector = mock_inspector(&MockFs::arm_container(), &commands);
        inspector.inspect_cpu();
        let record = inspector.attributes();
        assert!(!record.contains_key(keys::CPU_TYPE));
        assert!(!record.contains_key(keys::CPU_MODEL));
        assert_eq!(int(record, keys::CPU_USR), Some(4705));
    }

    #[test]
    fn test_uname_non_zero_exit_records_sentinel() {
        let commands = MockCommands::new().with_exit_status(&["uname", "-v"], 1);
        let mut inspector = mock_inspector(&MockFs::new(), &commands);
        inspector.inspect_linux();
        assert_eq!(
            text(inspector.attributes(), keys::LINUX_VERSION),
            Some("ERROR")
        );
    }

    #[test]
    fn test_warm_container_keeps_uuid() {
        let fs = MockFs::x86_container();
        let commands = MockCommands::aws_lambda();

        let mut cold = mock_inspector(&fs, &commands);
        cold.inspect_all();
        let cold = cold.finish();

        let marker = fs.contents(MARKER).unwrap();
        assert_eq!(marker.len(), 36);
        assert_eq!(int(&cold, keys::NEW_CONTAINER), Some(1));
        assert_eq!(text(&cold, keys::UUID), Some(marker.as_str()));

        let mut warm = mock_inspector(&fs, &commands);
        warm.inspect_all();
        let warm = warm.finish();

        assert_eq!(int(&warm, keys::NEW_CONTAINER), Some(0));
        assert_eq!(text(&warm, keys::UUID), text(&cold, keys::UUID));
    }

    #[test]
    fn test_custom_marker_path() {
        let fs = MockFs::new();
        let config = InspectorConfig::default().with_marker_path("/var/task/.id");
        let mut inspector = Inspector::with_sources(fs.clone(), MockCommands::new(), config);
        inspector.inspect_container();

        assert!(fs.contents("/var/task/.id").is_some());
        assert!(fs.contents(MARKER).is_none());
    }

    #[test]
    fn test_timestamp_same_key_keeps_last() {
        let mut inspector = mock_inspector(&MockFs::new(), &MockCommands::new());
        inspector.add_timestamp("checkpoint");
        std::thread::sleep(Duration::from_millis(20));
        inspector.add_timestamp("checkpoint");

        let second = int(inspector.attributes(), "checkpoint").unwrap();
        assert!(second >= 20);
        assert_eq!(inspector.attributes().len(), 3);
    }

    #[test]
    fn test_timestamps_different_keys_kept() {
        let mut inspector = mock_inspector(&MockFs::new(), &MockCommands::new());
        inspector.add_timestamp("before");
        std::thread::sleep(Duration::from_millis(10));
        inspector.add_timestamp("after");
        let record = inspector.finish();

        let before = int(&record, "before").unwrap();
        let after = int(&record, "after").unwrap();
        let runtime = int(&record, keys::RUNTIME).unwrap();
        assert!(before >= 0);
        assert!(after >= before + 10);
        assert!(runtime >= after);
    }

    #[test]
    fn test_finish_twice_only_recomputes_runtime() {
        let commands = MockCommands::aws_lambda();
        let mut inspector = mock_inspector(&MockFs::x86_container(), &commands);
        inspector.inspect_all();
        let first = inspector.finish();
        std::thread::sleep(Duration::from_millis(5));
        let second = inspector.finish();

        assert_eq!(first.len(), second.len());
        for (key, value) in first.iter() {
            if key != keys::RUNTIME {
                assert_eq!(second.get(key), Some(value));
            }
        }
        assert!(int(&second, keys::RUNTIME) >= int(&first, keys::RUNTIME));
    }

    #[test]
    fn test_custom_attribute_survives_collectors() {
        let commands = MockCommands::ibm_cloud_functions();
        let mut inspector = mock_inspector(&MockFs::x86_container(), &commands);
        inspector.add_attribute("requestId", "req-42");
        inspector.add_attribute("batchSize", 16i64);
        inspector.add_attribute("ratio", 0.5);
        inspector.inspect_all();

        assert_eq!(
            inspector.attribute("requestId"),
            Some(&AttributeValue::from("req-42"))
        );
        assert_eq!(
            inspector.attribute("batchSize"),
            Some(&AttributeValue::Int(16))
        );
        assert_eq!(inspector.attribute("ratio"), Some(&AttributeValue::Float(0.5)));
        assert_eq!(
            inspector.attribute(keys::PLATFORM),
            Some(&AttributeValue::from("IBM Cloud Functions"))
        );
    }

    #[test]
    fn test_started_at_before_finish() {
        let mut inspector = mock_inspector(&MockFs::new(), &MockCommands::new());
        let started_at = inspector.started_at();
        inspector.finish();
        assert!(started_at <= Utc::now());
    }
}
