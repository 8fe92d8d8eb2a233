use crate::enums::{IntegrationPattern, TransientErrorKind};
use crate::settings::RetrySettings;

/// Values used for every option a definition leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDefaults {
  pub partition: String,
  pub integration_pattern: IntegrationPattern,
  pub retry: RetrySettings,
  pub log_level: String,
}

impl Default for ConfigDefaults {
  fn default() -> Self {
    Self {
      partition: "aws".to_string(),
      integration_pattern: IntegrationPattern::FireAndForget,
      retry: RetrySettings {
        max_attempts: 6,
        backoff_rate: 2.0,
        interval_seconds: 2,
        errors: TransientErrorKind::FUNCTION_DEFAULTS.to_vec(),
      },
      log_level: "INFO".to_string(),
    }
  }
}

impl ConfigDefaults {
  /// Defaults with a different partition.
  pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
    self.partition = partition.into();
    self
  }
}
