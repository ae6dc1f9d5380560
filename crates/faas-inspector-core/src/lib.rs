//! faas-inspector-core — runtime self-inspection for serverless functions.
//!
//! Provides:
//! - `attributes` — the flat key/value record an inspection produces
//! - `collector` — `/proc` parsers and collectors for CPU, container, platform and kernel facts
//! - `config` — source paths and record identity
//! - `timing` — invocation start time and collector timing
//! - `inspector` — the per-invocation orchestrator
//!
//! ```
//! use faas_inspector_core::collector::{MockCommands, MockFs};
//! use faas_inspector_core::{Inspector, InspectorConfig};
//!
//! let mut inspector = Inspector::with_sources(
//!     MockFs::x86_container(),
//!     MockCommands::aws_lambda(),
//!     InspectorConfig::default(),
//! );
//! inspector.inspect_all();
//! let record = inspector.finish();
//! assert_eq!(record.get("platform").and_then(|v| v.as_str()), Some("AWS Lambda"));
//! ```

pub mod attributes;
pub mod collector;
pub mod config;
pub mod inspector;
pub mod timing;

pub use attributes::{AttributeRecord, AttributeValue};
pub use config::InspectorConfig;
pub use inspector::Inspector;
