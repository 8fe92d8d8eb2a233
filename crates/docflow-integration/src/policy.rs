//! Scoped access policies.
//!
//! A task's policy is either derived from its target and integration pattern
//! or supplied verbatim by the caller. The two paths never mix: a caller
//! supplied list replaces derivation entirely.

use docflow_config::{IntegrationPattern, StatementDef};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pattern::required_actions_for;

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
  Allow,
  Deny,
}

/// One authorization statement: a set of actions on a set of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
  #[serde(rename = "Effect")]
  pub effect: Effect,
  #[serde(rename = "Action")]
  pub actions: Vec<String>,
  #[serde(rename = "Resource")]
  pub resources: Vec<String>,
}

impl PolicyStatement {
  /// An `Allow` statement.
  pub fn allow<A, R>(actions: A, resources: R) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
  {
    Self {
      effect: Effect::Allow,
      actions: actions.into_iter().map(Into::into).collect(),
      resources: resources.into_iter().map(Into::into).collect(),
    }
  }

  /// Whether this statement allows `action` on `resource`.
  pub fn allows(&self, action: &str, resource: &str) -> bool {
    self.effect == Effect::Allow
      && self.actions.iter().any(|a| a == action)
      && self.resources.iter().any(|r| r == "*" || r == resource)
  }
}

impl From<StatementDef> for PolicyStatement {
  fn from(def: StatementDef) -> Self {
    Self::allow(def.actions, def.resources)
  }
}

/// The kind of target a task starts, which decides the "start" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyScope {
  /// A nested workflow execution.
  Execution,
  /// A compute function invocation.
  Function,
}

impl PolicyScope {
  pub fn start_action(&self) -> &'static str {
    match self {
      PolicyScope::Execution => "states:StartExecution",
      PolicyScope::Function => "lambda:InvokeFunction",
    }
  }
}

/// Ordered authorization statements for an execution role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPolicy {
  statements: Vec<PolicyStatement>,
}

impl AccessPolicy {
  pub fn from_statements(statements: Vec<PolicyStatement>) -> Self {
    Self { statements }
  }

  pub fn statements(&self) -> &[PolicyStatement] {
    &self.statements
  }

  pub fn len(&self) -> usize {
    self.statements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.statements.is_empty()
  }

  /// Whether any statement allows `action` on `resource`.
  pub fn allows(&self, action: &str, resource: &str) -> bool {
    self.statements.iter().any(|s| s.allows(action, resource))
  }

  /// Render as a policy document.
  pub fn to_document(&self) -> serde_json::Value {
    serde_json::json!({
      "Version": "2012-10-17",
      "Statement": self.statements,
    })
  }
}

/// Derive the minimal policy to start `target` and supervise it with `pattern`.
///
/// Task-token callbacks are granted on `*`: the token is opaque and only
/// exists at run time, so there is no narrower resource to name.
pub fn build_access_policy(
  target: &str,
  pattern: IntegrationPattern,
  scope: PolicyScope,
) -> AccessPolicy {
  let mut statements = vec![PolicyStatement::allow([scope.start_action()], [target])];

  for action in required_actions_for(pattern) {
    statements.push(PolicyStatement::allow([*action], ["*"]));
  }

  AccessPolicy::from_statements(statements)
}

/// Chooses between a caller supplied statement list and derivation.
#[derive(Debug, Clone)]
pub struct AccessPolicyBuilder {
  target: String,
  pattern: IntegrationPattern,
  scope: PolicyScope,
  overrides: Option<Vec<PolicyStatement>>,
}

impl AccessPolicyBuilder {
  pub fn new(target: impl Into<String>, pattern: IntegrationPattern, scope: PolicyScope) -> Self {
    Self {
      target: target.into(),
      pattern,
      scope,
      overrides: None,
    }
  }

  /// Use `statements` as the whole policy instead of deriving one.
  pub fn with_statements(mut self, statements: Vec<PolicyStatement>) -> Self {
    self.overrides = Some(statements);
    self
  }

  pub fn build(self) -> AccessPolicy {
    match self.overrides {
      Some(statements) => {
        debug!(resource = %self.target, count = statements.len(), "access_policy_overridden");
        AccessPolicy::from_statements(statements)
      }
      None => {
        let policy = build_access_policy(&self.target, self.pattern, self.scope);
        debug!(
          resource = %self.target,
          pattern = %self.pattern,
          count = policy.len(),
          "access_policy_derived"
        );
        policy
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const NESTED: &str = "arn:aws:states:us-east-1:123456789012:stateMachine:nested";

  #[test]
  fn test_fire_and_forget_only_starts() {
    let policy = build_access_policy(
      NESTED,
      IntegrationPattern::FireAndForget,
      PolicyScope::Execution,
    );

    assert_eq!(
      policy.statements(),
      &[PolicyStatement::allow(["states:StartExecution"], [NESTED])]
    );
  }

  #[test]
  fn test_run_until_complete_only_starts() {
    let policy = build_access_policy(
      NESTED,
      IntegrationPattern::RunUntilComplete,
      PolicyScope::Execution,
    );

    assert_eq!(policy.len(), 1);
    assert!(policy.allows("states:StartExecution", NESTED));
  }

  #[test]
  fn test_token_pattern_adds_callbacks_on_wildcard() {
    let policy = build_access_policy(
      NESTED,
      IntegrationPattern::WaitForExternalToken,
      PolicyScope::Execution,
    );

    assert_eq!(policy.len(), 3);
    assert_eq!(
      policy.statements()[0],
      PolicyStatement::allow(["states:StartExecution"], [NESTED])
    );
    assert_eq!(
      policy.statements()[1],
      PolicyStatement::allow(["states:SendTaskSuccess"], ["*"])
    );
    assert_eq!(
      policy.statements()[2],
      PolicyStatement::allow(["states:SendTaskFailure"], ["*"])
    );
  }

  #[test]
  fn test_start_statement_is_scoped_to_target() {
    let policy = build_access_policy(
      NESTED,
      IntegrationPattern::FireAndForget,
      PolicyScope::Execution,
    );
    let other = "arn:aws:states:us-east-1:123456789012:stateMachine:other";
    assert!(!policy.allows("states:StartExecution", other));
  }

  #[test]
  fn test_function_scope_invokes() {
    let function = "arn:aws:lambda:us-east-1:123456789012:function:classifier";
    let policy = build_access_policy(
      function,
      IntegrationPattern::WaitForExternalToken,
      PolicyScope::Function,
    );
    assert!(policy.allows("lambda:InvokeFunction", function));
    assert!(policy.allows("states:SendTaskSuccess", "anything"));
  }

  #[test]
  fn test_builder_derives_without_overrides() {
    let policy = AccessPolicyBuilder::new(
      NESTED,
      IntegrationPattern::WaitForExternalToken,
      PolicyScope::Execution,
    )
    .build();
    assert_eq!(
      policy,
      build_access_policy(
        NESTED,
        IntegrationPattern::WaitForExternalToken,
        PolicyScope::Execution
      )
    );
  }

  #[test]
  fn test_builder_overrides_bypass_derivation() {
    let custom = vec![PolicyStatement::allow(["states:StartExecution"], ["*"])];

    let policy = AccessPolicyBuilder::new(
      NESTED,
      IntegrationPattern::WaitForExternalToken,
      PolicyScope::Execution,
    )
    .with_statements(custom.clone())
    .build();

    assert_eq!(policy.statements(), custom.as_slice());
    assert!(!policy.allows("states:SendTaskSuccess", "*"));
  }

  #[test]
  fn test_policy_document_shape() {
    let policy = build_access_policy(
      NESTED,
      IntegrationPattern::FireAndForget,
      PolicyScope::Execution,
    );

    let document = policy.to_document();
    assert_eq!(document["Version"], "2012-10-17");
    assert_eq!(document["Statement"][0]["Effect"], "Allow");
    assert_eq!(document["Statement"][0]["Action"][0], "states:StartExecution");
    assert_eq!(document["Statement"][0]["Resource"][0], NESTED);
  }
}
