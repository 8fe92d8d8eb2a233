use docflow_config::IntegrationPattern;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
  /// The pattern is not one the task type can be supervised with.
  #[error(
    "unsupported integration pattern '{pattern}', supported patterns: [{}]",
    pattern_list(.supported)
  )]
  UnsupportedPattern {
    pattern: IntegrationPattern,
    supported: Vec<IntegrationPattern>,
  },

  /// Service or api name missing from an integration resource identifier.
  #[error("malformed resource identifier: service='{service}', api='{api}'")]
  MalformedResourceId { service: String, api: String },
}

fn pattern_list(patterns: &[IntegrationPattern]) -> String {
  patterns
    .iter()
    .map(|p| p.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}
