use docflow_config::{IntegrationPattern, TaskSettings};
use docflow_integration::{
  AccessPolicy, AccessPolicyBuilder, PolicyStatement, ServiceIntegration, validate_supported,
};
use serde_json::Value;

use crate::TaskInput;
use crate::error::TaskError;
use crate::input::{ShapedInput, kind_of, references_task_token, shape_input};
use crate::invoke::InvocationDescriptor;
use crate::target::TaskTarget;

const MAX_EXECUTION_NAME_LEN: usize = 80;

/// Reduce an execution name to the characters the engine accepts.
///
/// Keeps ASCII letters, digits, `-` and `_`, then truncates to 80 characters.
pub fn sanitize_execution_name(name: &str) -> String {
  name
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
    .take(MAX_EXECUTION_NAME_LEN)
    .collect()
}

/// A validated task configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
  target: TaskTarget,
  integration: ServiceIntegration,
  partition: String,
  input: Option<TaskInput>,
  execution_name: Option<String>,
  associate_with_parent: bool,
  pattern: IntegrationPattern,
  timeout_seconds: Option<u64>,
  policy_statements: Option<Vec<PolicyStatement>>,
}

impl TaskSpec {
  pub fn builder(target: TaskTarget) -> TaskSpecBuilder {
    TaskSpecBuilder::new(target)
  }

  /// Build a spec from resolved settings.
  pub fn from_settings(settings: &TaskSettings) -> Result<Self, TaskError> {
    let mut builder = Self::builder(settings.target.clone().into())
      .partition(settings.partition.clone())
      .pattern(settings.integration_pattern)
      .associate_with_parent(settings.associate_with_parent);

    if let Some(input) = &settings.input {
      builder = builder.input(input.clone());
    }
    if let Some(name) = &settings.execution_name {
      builder = builder.execution_name(name.clone());
    }
    if let Some(timeout) = settings.timeout_seconds {
      builder = builder.timeout_seconds(timeout);
    }
    if let Some(statements) = &settings.policy_statements {
      builder = builder.policy_statements(statements.iter().cloned().map(Into::into).collect());
    }

    builder.build()
  }

  pub fn target(&self) -> &TaskTarget {
    &self.target
  }

  pub fn pattern(&self) -> IntegrationPattern {
    self.pattern
  }

  pub fn partition(&self) -> &str {
    &self.partition
  }

  pub fn input(&self) -> Option<&TaskInput> {
    self.input.as_ref()
  }

  pub fn execution_name(&self) -> Option<&str> {
    self.execution_name.as_deref()
  }

  pub fn associate_with_parent(&self) -> bool {
    self.associate_with_parent
  }

  /// Passed through to the engine; never enforced here.
  pub fn timeout_seconds(&self) -> Option<u64> {
    self.timeout_seconds
  }

  /// The access policy the workflow's role needs for this task.
  pub fn access_policy(&self) -> AccessPolicy {
    let builder = AccessPolicyBuilder::new(self.target.arn(), self.pattern, self.target.scope());
    match &self.policy_statements {
      Some(statements) => builder.with_statements(statements.clone()).build(),
      None => builder.build(),
    }
  }

  /// The call the engine makes for this task.
  pub fn render(&self) -> InvocationDescriptor {
    let (target_key, input_key) = self.target.parameter_keys();

    let mut parameters = serde_json::Map::new();
    parameters.insert(
      target_key.to_string(),
      Value::String(self.target.arn().to_string()),
    );

    match shape_input(self.input.as_ref(), self.associate_with_parent) {
      ShapedInput::Value(value) => {
        parameters.insert(input_key.to_string(), value);
      }
      ShapedInput::Path(path) => {
        parameters.insert(format!("{}.$", input_key), Value::String(path));
      }
    }

    if let Some(name) = &self.execution_name {
      parameters.insert("Name".to_string(), Value::String(name.clone()));
    }

    InvocationDescriptor {
      resource_id: self.integration.resource_id(&self.partition, self.pattern),
      parameters,
    }
  }
}

/// Collects options for a [`TaskSpec`]; `build` validates them together.
#[derive(Debug, Clone)]
pub struct TaskSpecBuilder {
  target: TaskTarget,
  partition: String,
  input: Option<TaskInput>,
  execution_name: Option<String>,
  associate_with_parent: bool,
  pattern: IntegrationPattern,
  timeout_seconds: Option<u64>,
  policy_statements: Option<Vec<PolicyStatement>>,
}

impl TaskSpecBuilder {
  fn new(target: TaskTarget) -> Self {
    Self {
      target,
      partition: "aws".to_string(),
      input: None,
      execution_name: None,
      associate_with_parent: false,
      pattern: IntegrationPattern::FireAndForget,
      timeout_seconds: None,
      policy_statements: None,
    }
  }

  pub fn partition(mut self, partition: impl Into<String>) -> Self {
    self.partition = partition.into();
    self
  }

  pub fn input(mut self, input: TaskInput) -> Self {
    self.input = Some(input);
    self
  }

  pub fn execution_name(mut self, name: impl Into<String>) -> Self {
    self.execution_name = Some(name.into());
    self
  }

  pub fn associate_with_parent(mut self, associate: bool) -> Self {
    self.associate_with_parent = associate;
    self
  }

  pub fn pattern(mut self, pattern: IntegrationPattern) -> Self {
    self.pattern = pattern;
    self
  }

  pub fn timeout_seconds(mut self, timeout: u64) -> Self {
    self.timeout_seconds = Some(timeout);
    self
  }

  /// Replace the derived access policy with these statements.
  pub fn policy_statements(mut self, statements: Vec<PolicyStatement>) -> Self {
    self.policy_statements = Some(statements);
    self
  }

  pub fn build(self) -> Result<TaskSpec, TaskError> {
    if self.target.arn().trim().is_empty() {
      return Err(TaskError::MissingTarget);
    }
    if self.partition.trim().is_empty() {
      return Err(TaskError::MissingPartition);
    }

    validate_supported(self.pattern, self.target.supported_patterns())?;

    let (service, api) = self.target.service_api();
    let integration = ServiceIntegration::new(service, api)?;

    if self.associate_with_parent {
      match &self.input {
        Some(TaskInput::Object(_)) | None => {}
        Some(other) => {
          return Err(TaskError::InvalidInputShape {
            kind: kind_of(other),
          });
        }
      }
    }

    if self.pattern == IntegrationPattern::WaitForExternalToken {
      match &self.input {
        None => return Err(TaskError::MissingTaskToken),
        Some(TaskInput::Path(_)) => {}
        Some(TaskInput::Text(_)) => return Err(TaskError::MissingTaskToken),
        Some(TaskInput::Object(_)) => {
          let ShapedInput::Value(shaped) =
            shape_input(self.input.as_ref(), self.associate_with_parent)
          else {
            return Err(TaskError::MissingTaskToken);
          };
          if !references_task_token(&shaped) {
            return Err(TaskError::MissingTaskToken);
          }
        }
      }
    }

    let execution_name = match self.execution_name {
      Some(name) => {
        if !matches!(self.target, TaskTarget::StartExecution { .. }) {
          return Err(TaskError::ExecutionNameNotSupported);
        }
        let sanitized = sanitize_execution_name(&name);
        if sanitized.is_empty() {
          return Err(TaskError::InvalidExecutionName { name });
        }
        Some(sanitized)
      }
      None => None,
    };

    if self.timeout_seconds == Some(0) {
      return Err(TaskError::InvalidTimeout);
    }

    Ok(TaskSpec {
      target: self.target,
      integration,
      partition: self.partition,
      input: self.input,
      execution_name,
      associate_with_parent: self.associate_with_parent,
      pattern: self.pattern,
      timeout_seconds: self.timeout_seconds,
      policy_statements: self.policy_statements,
    })
  }
}

#[cfg(test)]
mod tests {
  use docflow_integration::IntegrationError;
  use serde_json::json;

  use super::*;
  use crate::input::{EXECUTION_ID_KEY, PARENT_EXECUTION_ID_PATH, TASK_TOKEN_PATH};

  const NESTED: &str = "arn:aws:states:us-east-1:123456789012:stateMachine:nested";
  const SPLITTER: &str = "arn:aws:lambda:us-east-1:123456789012:function:splitter";

  fn object(value: Value) -> TaskInput {
    match value {
      Value::Object(fields) => TaskInput::Object(fields),
      _ => panic!("expected object"),
    }
  }

  #[test]
  fn test_run_until_complete_resource_id() {
    let spec = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .pattern(IntegrationPattern::RunUntilComplete)
      .build()
      .unwrap();

    let descriptor = spec.render();
    assert_eq!(
      descriptor.resource_id,
      "arn:aws:states:::states:startExecution.sync"
    );
    assert_eq!(descriptor.parameters["StateMachineArn"], NESTED);
    assert_eq!(descriptor.parameters["Input.$"], "$");
  }

  #[test]
  fn test_partition_flows_into_resource_id() {
    let spec = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .partition("aws-cn")
      .build()
      .unwrap();
    assert_eq!(
      spec.render().resource_id,
      "arn:aws-cn:states:::states:startExecution"
    );
  }

  #[test]
  fn test_associate_with_parent_merges_caller_fields() {
    let spec = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .associate_with_parent(true)
      .input(object(json!({"manifest.$": "$.manifest", "mime": "image/png"})))
      .build()
      .unwrap();

    let input = &spec.render().parameters["Input"];
    assert_eq!(input[EXECUTION_ID_KEY], PARENT_EXECUTION_ID_PATH);
    assert_eq!(input["manifest.$"], "$.manifest");
    assert_eq!(input["mime"], "image/png");
  }

  #[test]
  fn test_associate_with_parent_rejects_path_input() {
    let result = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .associate_with_parent(true)
      .input(TaskInput::Path("$.manifest".to_string()))
      .build();

    assert!(matches!(
      result,
      Err(TaskError::InvalidInputShape { kind: "path" })
    ));
  }

  #[test]
  fn test_associate_with_parent_rejects_text_input() {
    let result = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .associate_with_parent(true)
      .input(TaskInput::Text("hello".to_string()))
      .build();

    assert!(matches!(
      result,
      Err(TaskError::InvalidInputShape { kind: "text" })
    ));
  }

  #[test]
  fn test_function_cannot_run_until_complete() {
    let result = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .pattern(IntegrationPattern::RunUntilComplete)
      .build();

    assert!(matches!(
      result,
      Err(TaskError::Integration(
        IntegrationError::UnsupportedPattern { .. }
      ))
    ));
  }

  #[test]
  fn test_token_pattern_requires_token_in_input() {
    let missing = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .pattern(IntegrationPattern::WaitForExternalToken)
      .input(object(json!({"Payload.$": "$"})))
      .build();
    assert!(matches!(missing, Err(TaskError::MissingTaskToken)));

    let absent = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .pattern(IntegrationPattern::WaitForExternalToken)
      .build();
    assert!(matches!(absent, Err(TaskError::MissingTaskToken)));

    let unresolved_key = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .pattern(IntegrationPattern::WaitForExternalToken)
      .input(object(json!({"token": TASK_TOKEN_PATH})))
      .build();
    assert!(matches!(unresolved_key, Err(TaskError::MissingTaskToken)));

    let text = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .pattern(IntegrationPattern::WaitForExternalToken)
      .input(TaskInput::Text(TASK_TOKEN_PATH.to_string()))
      .build();
    assert!(matches!(text, Err(TaskError::MissingTaskToken)));

    let present = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .pattern(IntegrationPattern::WaitForExternalToken)
      .input(object(json!({"Token.$": TASK_TOKEN_PATH, "Payload.$": "$"})))
      .build()
      .unwrap();
    assert_eq!(
      present.render().resource_id,
      "arn:aws:states:::lambda:invoke.waitForTaskToken"
    );
  }

  #[test]
  fn test_function_payload_parameters() {
    let spec = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .input(TaskInput::Path("$.manifest".to_string()))
      .build()
      .unwrap();

    let descriptor = spec.render();
    assert_eq!(descriptor.resource_id, "arn:aws:states:::lambda:invoke");
    assert_eq!(descriptor.parameters["FunctionName"], SPLITTER);
    assert_eq!(descriptor.parameters["Payload.$"], "$.manifest");
  }

  #[test]
  fn test_execution_name_is_sanitized() {
    let spec = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .execution_name("scan 01/page#3.pdf")
      .build()
      .unwrap();

    assert_eq!(spec.execution_name(), Some("scan01page3pdf"));
    assert_eq!(spec.render().parameters["Name"], "scan01page3pdf");
  }

  #[test]
  fn test_execution_name_rejected_for_functions_and_when_empty() {
    let function = TaskSpec::builder(TaskTarget::invoke_function(SPLITTER))
      .execution_name("split")
      .build();
    assert!(matches!(function, Err(TaskError::ExecutionNameNotSupported)));

    let empty = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .execution_name("///")
      .build();
    assert!(matches!(empty, Err(TaskError::InvalidExecutionName { .. })));
  }

  #[test]
  fn test_sanitize_truncates_to_eighty() {
    let long = "a".repeat(100);
    assert_eq!(sanitize_execution_name(&long).len(), 80);
  }

  #[test]
  fn test_empty_target_and_zero_timeout_rejected() {
    assert!(matches!(
      TaskSpec::builder(TaskTarget::start_execution("")).build(),
      Err(TaskError::MissingTarget)
    ));
    assert!(matches!(
      TaskSpec::builder(TaskTarget::start_execution(NESTED))
        .timeout_seconds(0)
        .build(),
      Err(TaskError::InvalidTimeout)
    ));
  }

  #[test]
  fn test_policy_statements_replace_derivation() {
    let custom = vec![PolicyStatement::allow(["states:StartExecution"], ["*"])];
    let spec = TaskSpec::builder(TaskTarget::start_execution(NESTED))
      .policy_statements(custom.clone())
      .build()
      .unwrap();

    assert_eq!(spec.access_policy().statements(), custom.as_slice());
  }
}
