use serde::{Deserialize, Serialize};

use crate::enums::{IntegrationPattern, TransientErrorKind};

/// A single task as written in a fragment definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
  pub task_id: String,
  #[serde(flatten)]
  pub target: TaskTargetDef,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub input: Option<InputDef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub execution_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub associate_with_parent: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub integration_pattern: Option<IntegrationPattern>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_seconds: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub retry: Option<RetryDef>,
  /// Statements that replace the derived access policy entirely.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub policy_statements: Option<Vec<StatementDef>>,
}

/// What the task calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum TaskTargetDef {
  /// Start a nested workflow execution.
  StartExecution { state_machine_arn: String },
  /// Invoke a compute function.
  InvokeFunction { function_arn: String },
}

/// Input passed to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputDef {
  /// A structured object; keys ending in `.$` are resolved by the engine.
  Object(serde_json::Map<String, serde_json::Value>),
  /// A path into the current step's payload, e.g. `$.manifest`.
  Path(String),
  /// A literal string.
  Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetryDef {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_attempts: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub backoff_rate: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub interval_seconds: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub errors: Option<Vec<TransientErrorKind>>,
}

/// A caller supplied authorization statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDef {
  pub actions: Vec<String>,
  pub resources: Vec<String>,
}
