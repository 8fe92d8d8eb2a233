use thiserror::Error;

/// Errors that can occur while resolving a fragment definition.
///
/// Any of them aborts the whole build; no partial fragment is returned.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Duplicate task ID.
  #[error("duplicate task id: {task_id}")]
  DuplicateTaskId { task_id: String },

  /// Fragment has no tasks.
  #[error("fragment '{fragment_id}' has no tasks")]
  NoTasks { fragment_id: String },

  /// A task definition could not be filled in.
  #[error("invalid configuration: {0}")]
  Config(#[from] docflow_config::ConfigError),

  /// A task could not be constructed.
  #[error("task '{task_id}' is invalid")]
  Task {
    task_id: String,
    #[source]
    source: docflow_task::TaskError,
  },

  /// The tasks could not be chained.
  #[error("fragment '{fragment_id}' could not be composed")]
  Workflow {
    fragment_id: String,
    #[source]
    source: docflow_workflow::WorkflowError,
  },
}
