use tracing::debug;

use crate::defaults::ConfigDefaults;
use crate::enums::{IntegrationPattern, TransientErrorKind};
use crate::error::ConfigError;
use crate::task::{InputDef, RetryDef, StatementDef, TaskDef, TaskTargetDef};

/// A task definition with every option filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSettings {
  pub task_id: String,
  pub partition: String,
  pub target: TaskTargetDef,
  pub input: Option<InputDef>,
  pub execution_name: Option<String>,
  pub associate_with_parent: bool,
  pub integration_pattern: IntegrationPattern,
  /// `None` leaves the timeout to the engine.
  pub timeout_seconds: Option<u64>,
  pub retry: RetrySettings,
  pub policy_statements: Option<Vec<StatementDef>>,
}

/// Retry options with every field filled in.
///
/// Ranges are checked by [`resolve_retry`]; duplicate errors and the engine's
/// upper attempt limit are checked when the retry policy is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
  /// Total attempts, the first call included.
  pub max_attempts: u32,
  pub backoff_rate: f64,
  pub interval_seconds: u64,
  pub errors: Vec<TransientErrorKind>,
}

/// Fill a retry definition from the defaults, field by field.
pub fn resolve_retry(
  def: Option<RetryDef>,
  defaults: &RetrySettings,
) -> Result<RetrySettings, ConfigError> {
  let def = def.unwrap_or_default();
  let settings = RetrySettings {
    max_attempts: def.max_attempts.unwrap_or(defaults.max_attempts),
    backoff_rate: def.backoff_rate.unwrap_or(defaults.backoff_rate),
    interval_seconds: def.interval_seconds.unwrap_or(defaults.interval_seconds),
    errors: def.errors.unwrap_or_else(|| defaults.errors.clone()),
  };

  if settings.max_attempts == 0 {
    return Err(ConfigError::retry_range("max_attempts", "must be at least 1"));
  }
  if !settings.backoff_rate.is_finite() || settings.backoff_rate < 1.0 {
    return Err(ConfigError::retry_range("backoff_rate", "must be at least 1.0"));
  }
  if settings.interval_seconds == 0 {
    return Err(ConfigError::retry_range("interval_seconds", "must be greater than zero"));
  }
  if settings.errors.is_empty() {
    return Err(ConfigError::retry_range("errors", "must not be empty"));
  }

  Ok(settings)
}

/// Fill a task definition from the defaults.
///
/// `partition` overrides the default partition when the enclosing fragment
/// names one.
pub fn resolve_task(
  def: TaskDef,
  partition: Option<&str>,
  defaults: &ConfigDefaults,
) -> Result<TaskSettings, ConfigError> {
  if def.task_id.trim().is_empty() {
    return Err(ConfigError::EmptyTaskId);
  }

  let partition = partition.unwrap_or(&defaults.partition);
  if partition.trim().is_empty() {
    return Err(ConfigError::EmptyPartition);
  }

  if def.timeout_seconds == Some(0) {
    return Err(ConfigError::ZeroTimeout {
      task_id: def.task_id,
    });
  }

  let settings = TaskSettings {
    partition: partition.to_string(),
    target: def.target,
    input: def.input,
    execution_name: def.execution_name,
    associate_with_parent: def.associate_with_parent.unwrap_or(false),
    integration_pattern: def
      .integration_pattern
      .unwrap_or(defaults.integration_pattern),
    timeout_seconds: def.timeout_seconds,
    retry: resolve_retry(def.retry, &defaults.retry)?,
    policy_statements: def.policy_statements,
    task_id: def.task_id,
  };

  debug!(
    task_id = %settings.task_id,
    pattern = %settings.integration_pattern,
    "task_settings_resolved"
  );

  Ok(settings)
}
