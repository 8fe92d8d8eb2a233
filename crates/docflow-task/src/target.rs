use docflow_config::{IntegrationPattern, TaskTargetDef};
use docflow_integration::PolicyScope;

const FUNCTION_PATTERNS: &[IntegrationPattern] = &[
  IntegrationPattern::FireAndForget,
  IntegrationPattern::WaitForExternalToken,
];

/// What a task calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTarget {
  /// Start a nested workflow execution.
  StartExecution { state_machine_arn: String },
  /// Invoke a compute function.
  InvokeFunction { function_arn: String },
}

impl TaskTarget {
  pub fn start_execution(state_machine_arn: impl Into<String>) -> Self {
    Self::StartExecution {
      state_machine_arn: state_machine_arn.into(),
    }
  }

  pub fn invoke_function(function_arn: impl Into<String>) -> Self {
    Self::InvokeFunction {
      function_arn: function_arn.into(),
    }
  }

  /// Identifier of the called resource.
  pub fn arn(&self) -> &str {
    match self {
      TaskTarget::StartExecution { state_machine_arn } => state_machine_arn,
      TaskTarget::InvokeFunction { function_arn } => function_arn,
    }
  }

  /// `{service, api}` pair of the engine integration.
  pub fn service_api(&self) -> (&'static str, &'static str) {
    match self {
      TaskTarget::StartExecution { .. } => ("states", "startExecution"),
      TaskTarget::InvokeFunction { .. } => ("lambda", "invoke"),
    }
  }

  /// Patterns the engine can supervise this target with.
  ///
  /// A function call cannot be run to completion: it either returns or hands
  /// its token to someone else.
  pub fn supported_patterns(&self) -> &'static [IntegrationPattern] {
    match self {
      TaskTarget::StartExecution { .. } => &IntegrationPattern::ALL,
      TaskTarget::InvokeFunction { .. } => FUNCTION_PATTERNS,
    }
  }

  pub fn scope(&self) -> PolicyScope {
    match self {
      TaskTarget::StartExecution { .. } => PolicyScope::Execution,
      TaskTarget::InvokeFunction { .. } => PolicyScope::Function,
    }
  }

  /// Parameter keys for the target identifier and its input.
  pub(crate) fn parameter_keys(&self) -> (&'static str, &'static str) {
    match self {
      TaskTarget::StartExecution { .. } => ("StateMachineArn", "Input"),
      TaskTarget::InvokeFunction { .. } => ("FunctionName", "Payload"),
    }
  }
}

impl From<TaskTargetDef> for TaskTarget {
  fn from(def: TaskTargetDef) -> Self {
    match def {
      TaskTargetDef::StartExecution { state_machine_arn } => {
        TaskTarget::StartExecution { state_machine_arn }
      }
      TaskTargetDef::InvokeFunction { function_arn } => TaskTarget::InvokeFunction { function_arn },
    }
  }
}
