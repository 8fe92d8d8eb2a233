//! Docflow Config
//!
//! This crate contains the serializable definition types for docflow task
//! fragments. Definitions carry every option as optional; they are turned into
//! fully populated settings by [`resolve_task`] and [`resolve_retry`] before any
//! other crate sees them.
//!
//! Definitions can be loaded from:
//! - JSON files (via the CLI with `docflow render fragment.json`)
//! - Any other source that produces the same JSON shape
//!
//! # Example
//!
//! ```json
//! {
//!   "fragment_id": "classify",
//!   "name": "Classify document",
//!   "tasks": [
//!     {
//!       "task_id": "start-classification",
//!       "target": "start_execution",
//!       "state_machine_arn": "arn:aws:states:us-east-1:123456789012:stateMachine:classify",
//!       "integration_pattern": "run_until_complete",
//!       "associate_with_parent": true,
//!       "input": { "type": "object", "value": { "manifest.$": "$.manifest" } }
//!     }
//!   ]
//! }
//! ```

mod defaults;
mod enums;
mod error;
mod fragment;
mod settings;
mod task;

pub use defaults::ConfigDefaults;
pub use enums::{IntegrationPattern, LogFormat, TransientErrorKind};
pub use error::ConfigError;
pub use fragment::FragmentDef;
pub use settings::{RetrySettings, TaskSettings, resolve_retry, resolve_task};
pub use task::{InputDef, RetryDef, StatementDef, TaskDef, TaskTargetDef};
