use std::fmt;

use serde::{Deserialize, Serialize};

/// How a task invokes its target and how the workflow engine waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationPattern {
  /// Call the service and continue as soon as the call is accepted.
  #[serde(alias = "REQUEST_RESPONSE")]
  FireAndForget,
  /// Call the service and block until the started job completes.
  #[serde(alias = "RUN_JOB")]
  RunUntilComplete,
  /// Call the service with a task token and block until the token is reported back.
  #[serde(alias = "WAIT_FOR_TASK_TOKEN")]
  WaitForExternalToken,
}

impl IntegrationPattern {
  pub const ALL: [IntegrationPattern; 3] = [
    IntegrationPattern::FireAndForget,
    IntegrationPattern::RunUntilComplete,
    IntegrationPattern::WaitForExternalToken,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      IntegrationPattern::FireAndForget => "fire_and_forget",
      IntegrationPattern::RunUntilComplete => "run_until_complete",
      IntegrationPattern::WaitForExternalToken => "wait_for_external_token",
    }
  }
}

impl fmt::Display for IntegrationPattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error codes reported by the workflow engine that are worth retrying.
///
/// Serialized as the engine's own error name, e.g. `"Lambda.ServiceException"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransientErrorKind {
  #[serde(rename = "Lambda.ServiceException")]
  LambdaServiceException,
  #[serde(rename = "Lambda.AWSLambdaException")]
  LambdaAwsLambdaException,
  #[serde(rename = "Lambda.SdkClientException")]
  LambdaSdkClientException,
  #[serde(rename = "Lambda.ClientExecutionTimeoutException")]
  LambdaClientExecutionTimeout,
  #[serde(rename = "Lambda.TooManyRequestsException")]
  LambdaTooManyRequests,
  #[serde(rename = "States.Timeout")]
  StatesTimeout,
  #[serde(rename = "States.TaskFailed")]
  StatesTaskFailed,
}

impl TransientErrorKind {
  /// The service errors a function invocation retries by default.
  pub const FUNCTION_DEFAULTS: [TransientErrorKind; 4] = [
    TransientErrorKind::LambdaClientExecutionTimeout,
    TransientErrorKind::LambdaServiceException,
    TransientErrorKind::LambdaAwsLambdaException,
    TransientErrorKind::LambdaSdkClientException,
  ];

  pub fn code(&self) -> &'static str {
    match self {
      TransientErrorKind::LambdaServiceException => "Lambda.ServiceException",
      TransientErrorKind::LambdaAwsLambdaException => "Lambda.AWSLambdaException",
      TransientErrorKind::LambdaSdkClientException => "Lambda.SdkClientException",
      TransientErrorKind::LambdaClientExecutionTimeout => "Lambda.ClientExecutionTimeoutException",
      TransientErrorKind::LambdaTooManyRequests => "Lambda.TooManyRequestsException",
      TransientErrorKind::StatesTimeout => "States.Timeout",
      TransientErrorKind::StatesTaskFailed => "States.TaskFailed",
    }
  }

  /// Look up the kind for an engine error code.
  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      "Lambda.ServiceException" => Some(TransientErrorKind::LambdaServiceException),
      "Lambda.AWSLambdaException" => Some(TransientErrorKind::LambdaAwsLambdaException),
      "Lambda.SdkClientException" => Some(TransientErrorKind::LambdaSdkClientException),
      "Lambda.ClientExecutionTimeoutException" => {
        Some(TransientErrorKind::LambdaClientExecutionTimeout)
      }
      "Lambda.TooManyRequestsException" => Some(TransientErrorKind::LambdaTooManyRequests),
      "States.Timeout" => Some(TransientErrorKind::StatesTimeout),
      "States.TaskFailed" => Some(TransientErrorKind::StatesTaskFailed),
      _ => None,
    }
  }
}

impl fmt::Display for TransientErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

/// Output format for the CLI's log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pattern_accepts_engine_aliases() {
    let pattern: IntegrationPattern = serde_json::from_str("\"RUN_JOB\"").unwrap();
    assert_eq!(pattern, IntegrationPattern::RunUntilComplete);

    let pattern: IntegrationPattern = serde_json::from_str("\"wait_for_external_token\"").unwrap();
    assert_eq!(pattern, IntegrationPattern::WaitForExternalToken);
  }

  #[test]
  fn test_error_kind_code_matches_serde_name() {
    for kind in [
      TransientErrorKind::LambdaServiceException,
      TransientErrorKind::LambdaAwsLambdaException,
      TransientErrorKind::LambdaSdkClientException,
      TransientErrorKind::LambdaClientExecutionTimeout,
      TransientErrorKind::LambdaTooManyRequests,
      TransientErrorKind::StatesTimeout,
      TransientErrorKind::StatesTaskFailed,
    ] {
      let json = serde_json::to_value(kind).unwrap();
      assert_eq!(json, serde_json::Value::String(kind.code().to_string()));
      assert_eq!(TransientErrorKind::from_code(kind.code()), Some(kind));
    }
  }

  #[test]
  fn test_unknown_code_is_not_transient() {
    assert_eq!(TransientErrorKind::from_code("States.Permissions"), None);
  }
}
