//! faas-inspector - one-shot runtime inspection.
//!
//! Runs every collector once, as a function invocation would, and prints the
//! finished attribute record as JSON on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use faas_inspector_core::config::{DEFAULT_MARKER_PATH, DEFAULT_PROC_PATH};
use faas_inspector_core::{AttributeValue, Inspector, InspectorConfig};

/// Runtime self-inspection probe for serverless functions.
#[derive(Parser)]
#[command(name = "faas-inspector", about = "Runtime self-inspection probe", version)]
struct Args {
    /// Path to /proc filesystem.
    #[arg(long, env = "FAAS_INSPECTOR_PROC_PATH", default_value = DEFAULT_PROC_PATH)]
    proc_path: String,

    /// Container marker file.
    #[arg(long, env = "FAAS_INSPECTOR_MARKER_PATH", default_value = DEFAULT_MARKER_PATH)]
    marker_path: String,

    /// Extra attribute to record, as KEY=VALUE. Repeatable.
    /// Integer and float values are recorded as numbers.
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    attributes: Vec<(String, AttributeValue)>,

    /// Named timestamp to record after collection. Repeatable.
    #[arg(long = "timestamp", value_name = "NAME")]
    timestamps: Vec<String>,

    /// Pretty-print the JSON record.
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Parses a `KEY=VALUE` pair.
fn parse_attribute(s: &str) -> Result<(String, AttributeValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid attribute '{s}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid attribute '{s}': empty key"));
    }
    let Ok(value) = value.parse::<AttributeValue>();
    Ok((key.to_string(), value))
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Stdout is reserved for the record, so logs are written to stderr.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["faas_inspector", "faas_inspector_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = InspectorConfig::default()
        .with_proc_path(&args.proc_path)
        .with_marker_path(&args.marker_path);

    let mut inspector = Inspector::with_config(config);
    info!(
        "faas-inspector {} starting at {}",
        env!("CARGO_PKG_VERSION"),
        inspector.started_at()
    );
    info!("Config: proc={}, marker={}", args.proc_path, args.marker_path);

    for (key, value) in args.attributes {
        inspector.add_attribute(key, value);
    }

    inspector.inspect_all();

    for name in args.timestamps {
        inspector.add_timestamp(name);
    }

    let record = inspector.finish();
    info!("Collected {} attributes", record.len());

    let json = if args.pretty {
        serde_json::to_string_pretty(&record)
    } else {
        serde_json::to_string(&record)
    };
    let json = match json {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize record: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{json}").and_then(|()| stdout.flush()) {
        error!("Failed to write record: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
