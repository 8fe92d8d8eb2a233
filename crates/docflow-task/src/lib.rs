//! Docflow Task
//!
//! A [`TaskNode`] wraps one call to an external target (a nested workflow
//! execution or a compute function) for use in a workflow graph.
//!
//! # Lifecycle
//!
//! ```text
//! TaskSpec::builder(target)        - caller options
//! └── build()                      - pattern, input shape, token, name checks
//!
//! TaskNode::new(id, spec, retry)   - derives the access policy and renders
//! ├── descriptor()                 - resource id + parameters for the engine
//! ├── to_state(next)               - the engine state for this node
//! └── invoke(invoker, payload)     - runs the call under the retry policy
//! ```
//!
//! Everything is immutable after construction and can be shared freely
//! between readers.

mod error;
mod input;
mod invoke;
mod node;
mod retry;
mod spec;
mod target;

pub use docflow_config::InputDef as TaskInput;
pub use error::TaskError;
pub use input::{EXECUTION_ID_KEY, FULL_PAYLOAD_PATH, PARENT_EXECUTION_ID_PATH, TASK_TOKEN_PATH};
pub use invoke::{ComputeInvoker, InvocationDescriptor, InvocationError};
pub use node::TaskNode;
pub use retry::{MAX_ATTEMPTS_LIMIT, RetryError, RetryPolicy};
pub use spec::{TaskSpec, TaskSpecBuilder, sanitize_execution_name};
pub use target::TaskTarget;
