use docflow_config::TransientErrorKind;
use docflow_integration::IntegrationError;
use thiserror::Error;

/// Errors raised while constructing a task. All of them are fatal to the
/// graph being built.
#[derive(Debug, Error)]
pub enum TaskError {
  #[error(transparent)]
  Integration(#[from] IntegrationError),

  /// `associate_with_parent` needs an object to merge the parent id into.
  #[error("associate_with_parent requires an object input, got a {kind} input")]
  InvalidInputShape { kind: &'static str },

  #[error(
    "waiting for an external token requires an input key ending in '.$' \
     that references the task token ($$.Task.Token)"
  )]
  MissingTaskToken,

  #[error("task target resource must not be empty")]
  MissingTarget,

  #[error("partition must not be empty")]
  MissingPartition,

  #[error("task id must not be empty")]
  MissingId,

  #[error("execution name '{name}' has no valid characters left after sanitizing")]
  InvalidExecutionName { name: String },

  #[error("execution names are only supported when starting an execution")]
  ExecutionNameNotSupported,

  #[error("timeout must be greater than zero")]
  InvalidTimeout,

  #[error("invalid retry policy: {message}")]
  InvalidRetryPolicy { message: String },

  #[error("error '{kind}' is listed more than once in the retry policy")]
  DuplicateRetryError { kind: TransientErrorKind },
}

impl TaskError {
  pub(crate) fn invalid_retry(message: impl Into<String>) -> Self {
    Self::InvalidRetryPolicy {
      message: message.into(),
    }
  }
}
