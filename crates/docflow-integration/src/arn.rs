use docflow_config::IntegrationPattern;

use crate::error::IntegrationError;
use crate::pattern::suffix_for;

/// A `{service, api}` pair the workflow engine integrates with directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIntegration {
  service: String,
  api: String,
}

impl ServiceIntegration {
  pub fn new(service: impl Into<String>, api: impl Into<String>) -> Result<Self, IntegrationError> {
    let service = service.into();
    let api = api.into();
    if service.trim().is_empty() || api.trim().is_empty() {
      return Err(IntegrationError::MalformedResourceId { service, api });
    }
    Ok(Self { service, api })
  }

  pub fn service(&self) -> &str {
    &self.service
  }

  pub fn api(&self) -> &str {
    &self.api
  }

  /// Resource identifier without the pattern suffix.
  pub fn base_resource_id(&self, partition: &str) -> String {
    format!("arn:{}:states:::{}:{}", partition, self.service, self.api)
  }

  /// Resource identifier the engine calls for `pattern`.
  pub fn resource_id(&self, partition: &str, pattern: IntegrationPattern) -> String {
    format!("{}{}", self.base_resource_id(partition), suffix_for(pattern))
  }
}
