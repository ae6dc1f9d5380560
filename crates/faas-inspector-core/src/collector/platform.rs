//! FaaS platform detection from the process environment.
//!
//! Detection is a substring heuristic over the output of `env`. Recognising a
//! new provider means adding one entry to [`PLATFORM_MARKERS`].

use crate::collector::traits::{CommandError, CommandRunner};
use std::fmt;

/// Hosting platform of the current invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    AwsLambda,
    GoogleCloudFunctions,
    IbmCloudFunctions,
    AzureFunctions,
    Unknown,
}

impl Platform {
    pub fn name(self) -> &'static str {
        match self {
            Platform::AwsLambda => "AWS Lambda",
            Platform::GoogleCloudFunctions => "Google Cloud Functions",
            Platform::IbmCloudFunctions => "IBM Cloud Functions",
            Platform::AzureFunctions => "Azure Functions",
            Platform::Unknown => "Unknown Platform",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Environment substrings, checked in order; first match wins.
pub const PLATFORM_MARKERS: &[(&str, Platform)] = &[
    ("AWS_LAMBDA", Platform::AwsLambda),
    ("X_GOOGLE", Platform::GoogleCloudFunctions),
    ("functions.cloud.ibm", Platform::IbmCloudFunctions),
    ("microsoft.com/azure-functions", Platform::AzureFunctions),
];

/// Classifies `env` output (`KEY=VALUE` lines).
pub fn detect_platform(environment: &str) -> Platform {
    PLATFORM_MARKERS
        .iter()
        .find(|(marker, _)| environment.contains(marker))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Unknown)
}

/// Runs `env` and classifies its output.
pub struct PlatformCollector<C: CommandRunner> {
    runner: C,
}

impl<C: CommandRunner> PlatformCollector<C> {
    pub fn new(runner: C) -> Self {
        Self { runner }
    }

    pub fn detect(&self) -> Result<Platform, CommandError> {
        let environment = self.runner.run(&["env"])?;
        Ok(detect_platform(&environment))
    }
}
