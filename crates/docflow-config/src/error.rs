use thiserror::Error;

/// Errors raised while filling in a definition.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("task id must not be empty")]
  EmptyTaskId,

  #[error("partition must not be empty")]
  EmptyPartition,

  #[error("timeout for task '{task_id}' must be greater than zero")]
  ZeroTimeout { task_id: String },

  #[error("retry {field} {message}")]
  RetryOutOfRange {
    field: &'static str,
    message: &'static str,
  },
}

impl ConfigError {
  pub(crate) fn retry_range(field: &'static str, message: &'static str) -> Self {
    Self::RetryOutOfRange { field, message }
  }
}
