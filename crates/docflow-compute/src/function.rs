//! Compute function profiles.
//!
//! A profile pairs a deployed function with the environment it is configured
//! with and the bucket access its role needs, and knows how to wire the
//! function into a workflow as a [`TaskNode`].

use std::collections::BTreeMap;

use docflow_config::{ConfigDefaults, IntegrationPattern};
use docflow_integration::{AccessPolicy, BucketGrant, PolicyStatement, required_actions_for};
use docflow_task::{
  FULL_PAYLOAD_PATH, PARENT_EXECUTION_ID_PATH, RetryPolicy, TASK_TOKEN_PATH, TaskError, TaskInput,
  TaskNode, TaskSpec, TaskTarget,
};
use serde_json::{Map, Value};
use tracing::debug;

pub const OUTPUT_BUCKET_VAR: &str = "S3_OUTPUT_BUCKET";
pub const OUTPUT_PREFIX_VAR: &str = "S3_OUTPUT_PREFIX";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
  DocumentSplitter,
  Classifier,
}

impl FunctionKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      FunctionKind::DocumentSplitter => "document_splitter",
      FunctionKind::Classifier => "classifier",
    }
  }
}

/// Where a function reads its documents and writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBuckets {
  pub input_bucket: String,
  pub input_prefix: Option<String>,
  pub output_bucket: String,
  pub output_prefix: String,
}

#[derive(Debug, Clone)]
pub struct ComputeFunction {
  kind: FunctionKind,
  function_arn: String,
  environment: BTreeMap<String, String>,
  grants: Vec<BucketGrant>,
}

impl ComputeFunction {
  /// Splits a document into one file per page under the output prefix.
  ///
  /// Pages can be large, so the output grant allows multipart uploads.
  pub fn document_splitter(
    function_arn: impl Into<String>,
    buckets: &FunctionBuckets,
    defaults: &ConfigDefaults,
  ) -> Self {
    let grants = vec![
      BucketGrant::read(&buckets.input_bucket, buckets.input_prefix.clone()),
      BucketGrant::write_multipart(&buckets.output_bucket, Some(buckets.output_prefix.clone())),
    ];
    Self::new(FunctionKind::DocumentSplitter, function_arn, buckets, defaults, grants)
  }

  /// Classifies extracted text and reports the result through a task token.
  pub fn classifier(
    function_arn: impl Into<String>,
    buckets: &FunctionBuckets,
    defaults: &ConfigDefaults,
  ) -> Self {
    let grants = vec![
      BucketGrant::read(&buckets.input_bucket, buckets.input_prefix.clone()),
      BucketGrant::write(&buckets.output_bucket, Some(buckets.output_prefix.clone())),
    ];
    Self::new(FunctionKind::Classifier, function_arn, buckets, defaults, grants)
  }

  fn new(
    kind: FunctionKind,
    function_arn: impl Into<String>,
    buckets: &FunctionBuckets,
    defaults: &ConfigDefaults,
    grants: Vec<BucketGrant>,
  ) -> Self {
    let environment = BTreeMap::from([
      (OUTPUT_BUCKET_VAR.to_string(), buckets.output_bucket.clone()),
      (OUTPUT_PREFIX_VAR.to_string(), buckets.output_prefix.clone()),
      (LOG_LEVEL_VAR.to_string(), defaults.log_level.clone()),
    ]);

    Self {
      kind,
      function_arn: function_arn.into(),
      environment,
      grants,
    }
  }

  pub fn kind(&self) -> FunctionKind {
    self.kind
  }

  pub fn function_arn(&self) -> &str {
    &self.function_arn
  }

  pub fn environment(&self) -> &BTreeMap<String, String> {
    &self.environment
  }

  pub fn grants(&self) -> &[BucketGrant] {
    &self.grants
  }

  /// The policy of the function's own role.
  ///
  /// A function invoked with a task token reports completion itself, so its
  /// role also carries the callback actions.
  pub fn role_policy(&self, partition: &str, pattern: IntegrationPattern) -> AccessPolicy {
    let mut statements: Vec<PolicyStatement> = self
      .grants
      .iter()
      .map(|grant| grant.to_statement(partition))
      .collect();

    let callbacks = required_actions_for(pattern);
    if !callbacks.is_empty() {
      statements.push(PolicyStatement::allow(callbacks.iter().copied(), ["*"]));
    }

    AccessPolicy::from_statements(statements)
  }

  /// Input handed to the function for `pattern`.
  ///
  /// Token-waiting calls wrap the payload with the token and the calling
  /// execution id. Other calls pass the payload through as is.
  pub fn default_input(pattern: IntegrationPattern) -> TaskInput {
    match pattern {
      IntegrationPattern::WaitForExternalToken => {
        let mut object = Map::new();
        object.insert("Token.$".to_string(), Value::from(TASK_TOKEN_PATH));
        object.insert("ExecutionId.$".to_string(), Value::from(PARENT_EXECUTION_ID_PATH));
        object.insert("Payload.$".to_string(), Value::from(FULL_PAYLOAD_PATH));
        TaskInput::Object(object)
      }
      _ => TaskInput::Path(FULL_PAYLOAD_PATH.to_string()),
    }
  }

  /// Build the task node invoking this function.
  pub fn task_node(
    &self,
    task_id: &str,
    partition: &str,
    pattern: IntegrationPattern,
    retry: RetryPolicy,
  ) -> Result<TaskNode, TaskError> {
    debug!(
      function = self.kind.as_str(),
      task_id = task_id,
      pattern = %pattern,
      "compute_task_node"
    );

    let spec = TaskSpec::builder(TaskTarget::invoke_function(&self.function_arn))
      .partition(partition)
      .pattern(pattern)
      .input(Self::default_input(pattern))
      .build()?;

    TaskNode::new(task_id, spec, retry)
  }
}

#[cfg(test)]
mod tests {
  use docflow_config::TransientErrorKind;
  use serde_json::json;

  use super::*;

  fn buckets() -> FunctionBuckets {
    FunctionBuckets {
      input_bucket: "documents".to_string(),
      input_prefix: Some("uploads".to_string()),
      output_bucket: "processed".to_string(),
      output_prefix: "split".to_string(),
    }
  }

  fn defaults() -> ConfigDefaults {
    ConfigDefaults::default()
  }

  fn retry() -> RetryPolicy {
    RetryPolicy::new(6, 2.0, 2, TransientErrorKind::FUNCTION_DEFAULTS.to_vec()).unwrap()
  }

  const SPLITTER_ARN: &str = "arn:aws:lambda:us-east-1:123456789012:function:splitter";
  const CLASSIFIER_ARN: &str = "arn:aws:lambda:us-east-1:123456789012:function:classifier";

  #[test]
  fn test_environment() {
    let splitter = ComputeFunction::document_splitter(SPLITTER_ARN, &buckets(), &defaults());

    assert_eq!(splitter.environment()["S3_OUTPUT_BUCKET"], "processed");
    assert_eq!(splitter.environment()["S3_OUTPUT_PREFIX"], "split");
    assert_eq!(splitter.environment()["LOG_LEVEL"], "INFO");
  }

  #[test]
  fn test_log_level_follows_defaults() {
    let defaults = ConfigDefaults {
      log_level: "DEBUG".to_string(),
      ..ConfigDefaults::default()
    };
    let classifier = ComputeFunction::classifier(CLASSIFIER_ARN, &buckets(), &defaults);

    assert_eq!(classifier.environment()["LOG_LEVEL"], "DEBUG");
  }

  #[test]
  fn test_splitter_role_allows_multipart_output() {
    let splitter = ComputeFunction::document_splitter(SPLITTER_ARN, &buckets(), &defaults());
    let policy = splitter.role_policy("aws", IntegrationPattern::FireAndForget);

    assert_eq!(policy.len(), 2);
    assert!(policy.allows("s3:GetObject", "arn:aws:s3:::documents/uploads*"));
    assert!(policy.allows("s3:AbortMultipartUpload", "arn:aws:s3:::processed/split*"));
    assert!(!policy.allows("states:SendTaskSuccess", "*"));
  }

  #[test]
  fn test_classifier_role_reports_token() {
    let classifier = ComputeFunction::classifier(CLASSIFIER_ARN, &buckets(), &defaults());
    let policy = classifier.role_policy("aws", IntegrationPattern::WaitForExternalToken);

    assert_eq!(policy.len(), 3);
    assert!(policy.allows("s3:PutObject", "arn:aws:s3:::processed/split*"));
    assert!(!policy.allows("s3:AbortMultipartUpload", "arn:aws:s3:::processed/split*"));
    assert!(policy.allows("states:SendTaskSuccess", "*"));
    assert!(policy.allows("states:SendTaskFailure", "*"));
  }

  #[test]
  fn test_classifier_token_node() {
    let classifier = ComputeFunction::classifier(CLASSIFIER_ARN, &buckets(), &defaults());
    let node = classifier
      .task_node("Classify", "aws", IntegrationPattern::WaitForExternalToken, retry())
      .unwrap();

    let descriptor = node.descriptor();
    assert_eq!(
      descriptor.resource_id,
      "arn:aws:states:::lambda:invoke.waitForTaskToken"
    );
    assert_eq!(descriptor.parameters["FunctionName"], json!(CLASSIFIER_ARN));
    assert_eq!(
      descriptor.parameters["Payload"],
      json!({
        "Token.$": "$$.Task.Token",
        "ExecutionId.$": "$$.Execution.Id",
        "Payload.$": "$"
      })
    );
  }

  #[test]
  fn test_splitter_passes_payload_through() {
    let splitter = ComputeFunction::document_splitter(SPLITTER_ARN, &buckets(), &defaults());
    let node = splitter
      .task_node("Split", "aws-cn", IntegrationPattern::FireAndForget, retry())
      .unwrap();

    assert_eq!(node.descriptor().resource_id, "arn:aws-cn:states:::lambda:invoke");
    assert_eq!(node.descriptor().parameters["Payload.$"], json!("$"));
  }

  #[test]
  fn test_functions_cannot_run_until_complete() {
    let splitter = ComputeFunction::document_splitter(SPLITTER_ARN, &buckets(), &defaults());
    let err = splitter
      .task_node("Split", "aws", IntegrationPattern::RunUntilComplete, retry())
      .unwrap_err();

    assert!(matches!(err, TaskError::Integration(_)));
  }
}
