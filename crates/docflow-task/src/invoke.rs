//! The seam to the compute runtime.

use async_trait::async_trait;
use docflow_config::TransientErrorKind;
use serde::{Deserialize, Serialize};

/// What the engine calls: a resource identifier and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationDescriptor {
  #[serde(rename = "Resource")]
  pub resource_id: String,
  #[serde(rename = "Parameters")]
  pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// A failed invocation, identified by the engine's error code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct InvocationError {
  pub code: String,
  pub message: String,
}

impl InvocationError {
  pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      message: message.into(),
    }
  }

  pub fn transient(kind: TransientErrorKind, message: impl Into<String>) -> Self {
    Self::new(kind.code(), message)
  }

  pub fn kind(&self) -> Option<TransientErrorKind> {
    TransientErrorKind::from_code(&self.code)
  }
}

/// Runs a rendered invocation against the compute runtime.
///
/// Payloads are opaque JSON: an input location in, output locations or a
/// classification out.
#[async_trait]
pub trait ComputeInvoker: Send + Sync {
  async fn invoke(
    &self,
    descriptor: &InvocationDescriptor,
    payload: &serde_json::Value,
  ) -> Result<serde_json::Value, InvocationError>;
}
