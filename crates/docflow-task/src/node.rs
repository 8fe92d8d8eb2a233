use docflow_integration::AccessPolicy;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::error::TaskError;
use crate::invoke::{ComputeInvoker, InvocationDescriptor};
use crate::retry::{RetryError, RetryPolicy};
use crate::spec::TaskSpec;

/// One task in a workflow graph.
///
/// A node has a single entry and a single success exit. Its access policy
/// and rendered invocation are computed once, in [`TaskNode::new`], so a node
/// is never observable without them.
#[derive(Debug, Clone)]
pub struct TaskNode {
  id: String,
  spec: TaskSpec,
  retry: RetryPolicy,
  policy: AccessPolicy,
  descriptor: InvocationDescriptor,
}

impl TaskNode {
  #[instrument(name = "task_node_build", skip_all, fields(task_id = %id))]
  pub fn new(id: &str, spec: TaskSpec, retry: RetryPolicy) -> Result<Self, TaskError> {
    if id.trim().is_empty() {
      return Err(TaskError::MissingId);
    }

    let policy = spec.access_policy();
    let descriptor = spec.render();

    info!(
      task_id = %id,
      resource = %descriptor.resource_id,
      pattern = %spec.pattern(),
      statements = policy.len(),
      "task_node_built"
    );

    Ok(Self {
      id: id.to_string(),
      spec,
      retry,
      policy,
      descriptor,
    })
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn spec(&self) -> &TaskSpec {
    &self.spec
  }

  pub fn retry_policy(&self) -> &RetryPolicy {
    &self.retry
  }

  pub fn access_policy(&self) -> &AccessPolicy {
    &self.policy
  }

  pub fn descriptor(&self) -> &InvocationDescriptor {
    &self.descriptor
  }

  /// The engine state for this node, continuing at `next` or ending.
  pub fn to_state(&self, next: Option<&str>) -> Value {
    let mut state = Map::new();
    state.insert("Type".to_string(), Value::from("Task"));
    state.insert(
      "Resource".to_string(),
      Value::from(self.descriptor.resource_id.clone()),
    );
    state.insert(
      "Parameters".to_string(),
      Value::Object(self.descriptor.parameters.clone()),
    );
    if let Some(timeout) = self.spec.timeout_seconds() {
      state.insert("TimeoutSeconds".to_string(), Value::from(timeout));
    }
    state.insert(
      "Retry".to_string(),
      Value::Array(vec![self.retry.to_state()]),
    );
    match next {
      Some(next) => {
        state.insert("Next".to_string(), Value::from(next));
      }
      None => {
        state.insert("End".to_string(), Value::Bool(true));
      }
    }
    Value::Object(state)
  }

  /// Enter the node: call the target through `invoker` under the retry policy.
  ///
  /// Each call is a fresh entry with its own attempt count.
  pub async fn invoke<I>(&self, invoker: &I, payload: &Value) -> Result<Value, RetryError>
  where
    I: ComputeInvoker + ?Sized,
  {
    let id = self.id.as_str();
    let descriptor = &self.descriptor;
    self
      .retry
      .run(id, move |attempt| {
        debug!(task_id = %id, attempt, "invocation_attempt");
        invoker.invoke(descriptor, payload)
      })
      .await
  }
}
