//! Pre-built mock sources for testing.
//!
//! These scenarios provide realistic `/proc` contents and command outputs for
//! the hosting environments the inspector recognises.

use super::commands::MockCommands;
use super::filesystem::MockFs;

/// Boot time used by every scenario's `/proc/stat`.
pub const SCENARIO_BTIME: u64 = 1_700_000_000;

/// Kernel version string returned by `uname -v` in every scenario.
pub const SCENARIO_KERNEL_VERSION: &str = "#1 SMP Wed Nov 8 19:45:13 UTC 2023";

const XEON_CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 63
model name\t: Intel(R) Xeon(R) Processor @ 2.50GHz
stepping\t: 2
microcode\t: 0x1
cpu MHz\t\t: 2500.000
cache size\t: 33792 KB
flags\t\t: fpu vme de pse tsc msr pae mce cx8 apic sep

processor\t: 1
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 63
model name\t: Intel(R) Xeon(R) Processor @ 2.50GHz
stepping\t: 2
";

const GRAVITON_CPUINFO: &str = "\
processor\t: 0
BogoMIPS\t: 243.75
Features\t: fp asimd evtstrm aes pmull sha1 sha2 crc32 atomics
CPU implementer\t: 0x41
CPU architecture: 8
CPU variant\t: 0x1
CPU part\t: 0xd0c
CPU revision\t: 1
";

const TWO_CPU_STAT: &str = "\
cpu  4705 356 584 3699 23 0 19 12 0 0
cpu0 2350 178 292 1850 11 0 10 6 0 0
cpu1 2355 178 292 1849 12 0 9 6 0 0
intr 114930548 113199788 3 0 5 263 0 4 [...]
ctxt 1990473
btime 1700000000
processes 2915
procs_running 1
procs_blocked 0
";

const LAMBDA_ENV: &str = "\
AWS_LAMBDA_FUNCTION_VERSION=$LATEST
AWS_LAMBDA_FUNCTION_NAME=inspector-demo
AWS_LAMBDA_FUNCTION_MEMORY_SIZE=512
AWS_REGION=us-east-1
LAMBDA_TASK_ROOT=/var/task
PATH=/usr/local/bin:/usr/bin/:/bin:/opt/bin
";

const GOOGLE_ENV: &str = "\
X_GOOGLE_FUNCTION_NAME=inspector-demo
X_GOOGLE_FUNCTION_REGION=us-central1
FUNCTION_TARGET=inspect
PATH=/usr/local/bin:/usr/bin:/bin
";

const IBM_ENV: &str = "\
__OW_API_HOST=https://us-south.functions.cloud.ibm.com
__OW_ACTION_NAME=/ns/inspector-demo
PATH=/usr/local/bin:/usr/bin:/bin
";

const AZURE_ENV: &str = "\
WEBSITE_SITE_NAME=inspector-demo
FUNCTIONS_WORKER_RUNTIME=custom
AzureWebJobsScriptRoot=/home/site/wwwroot
HOME=/home
CONTAINER_IMAGE_URL=mcr.microsoft.com/azure-functions/base:4.0
";

const PLAIN_ENV: &str = "\
HOME=/root
PATH=/usr/local/bin:/usr/bin:/bin
TERM=xterm
";

impl MockFs {
    /// x86 Lambda-style container with full `/proc` access.
    pub fn x86_container() -> Self {
        let fs = Self::new();
        fs.add_file("/proc/cpuinfo", XEON_CPUINFO);
        fs.add_file("/proc/stat", TWO_CPU_STAT);
        fs
    }

    /// ARM (Graviton-style) container: `/proc/cpuinfo` has no `model name`.
    pub fn arm_container() -> Self {
        let fs = Self::new();
        fs.add_file("/proc/cpuinfo", GRAVITON_CPUINFO);
        fs.add_file("/proc/stat", TWO_CPU_STAT);
        fs
    }

    /// Sandboxed container without any `/proc` entries.
    pub fn sandboxed_container() -> Self {
        Self::new()
    }
}

impl MockCommands {
    fn with_env(env: &str) -> Self {
        Self::new()
            .with_output(&["env"], env)
            .with_output(&["uname", "-v"], format!("{SCENARIO_KERNEL_VERSION}\n"))
    }

    pub fn aws_lambda() -> Self {
        Self::with_env(LAMBDA_ENV)
    }

    pub fn google_cloud_functions() -> Self {
        Self::with_env(GOOGLE_ENV)
    }

    pub fn ibm_cloud_functions() -> Self {
        Self::with_env(IBM_ENV)
    }

    pub fn azure_functions() -> Self {
        Self::with_env(AZURE_ENV)
    }

    /// A host that is not a recognised FaaS platform.
    pub fn plain_host() -> Self {
        Self::with_env(PLAIN_ENV)
    }

    /// Neither `env` nor `uname` can be started.
    pub fn no_commands() -> Self {
        Self::new()
    }
}
