use docflow_config::IntegrationPattern;

use crate::error::IntegrationError;

const CALLBACK_ACTIONS: &[&str] = &["states:SendTaskSuccess", "states:SendTaskFailure"];

/// Resource identifier suffix the engine uses to pick the waiting mode.
pub fn suffix_for(pattern: IntegrationPattern) -> &'static str {
  match pattern {
    IntegrationPattern::FireAndForget => "",
    IntegrationPattern::RunUntilComplete => ".sync",
    IntegrationPattern::WaitForExternalToken => ".waitForTaskToken",
  }
}

/// Actions the engine's callers need to supervise a task with this pattern.
pub fn required_actions_for(pattern: IntegrationPattern) -> &'static [&'static str] {
  match pattern {
    IntegrationPattern::FireAndForget | IntegrationPattern::RunUntilComplete => &[],
    IntegrationPattern::WaitForExternalToken => CALLBACK_ACTIONS,
  }
}

/// Check that `pattern` is one of `supported`.
pub fn validate_supported(
  pattern: IntegrationPattern,
  supported: &[IntegrationPattern],
) -> Result<(), IntegrationError> {
  if supported.contains(&pattern) {
    Ok(())
  } else {
    Err(IntegrationError::UnsupportedPattern {
      pattern,
      supported: supported.to_vec(),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn test_suffixes_are_distinct() {
    let suffixes: HashSet<&str> = IntegrationPattern::ALL.iter().map(|p| suffix_for(*p)).collect();
    assert_eq!(suffixes.len(), 3);
    assert_eq!(suffix_for(IntegrationPattern::FireAndForget), "");
    assert_eq!(suffix_for(IntegrationPattern::RunUntilComplete), ".sync");
    assert_eq!(
      suffix_for(IntegrationPattern::WaitForExternalToken),
      ".waitForTaskToken"
    );
  }

  #[test]
  fn test_only_token_pattern_requires_callbacks() {
    assert!(required_actions_for(IntegrationPattern::FireAndForget).is_empty());
    assert!(required_actions_for(IntegrationPattern::RunUntilComplete).is_empty());

    let actions = required_actions_for(IntegrationPattern::WaitForExternalToken);
    assert!(actions.contains(&"states:SendTaskSuccess"));
    assert!(actions.contains(&"states:SendTaskFailure"));
  }

  #[test]
  fn test_validate_supported_accepts_members() {
    for pattern in IntegrationPattern::ALL {
      assert!(validate_supported(pattern, &IntegrationPattern::ALL).is_ok());
    }
  }

  #[test]
  fn test_validate_supported_names_pattern_and_set() {
    let supported = [
      IntegrationPattern::FireAndForget,
      IntegrationPattern::WaitForExternalToken,
    ];

    let err = validate_supported(IntegrationPattern::RunUntilComplete, &supported).unwrap_err();

    match &err {
      IntegrationError::UnsupportedPattern {
        pattern,
        supported: listed,
      } => {
        assert_eq!(*pattern, IntegrationPattern::RunUntilComplete);
        assert_eq!(listed.as_slice(), &supported);
      }
      other => panic!("unexpected error: {other}"),
    }

    assert_eq!(
      err.to_string(),
      "unsupported integration pattern 'run_until_complete', \
       supported patterns: [fire_and_forget, wait_for_external_token]"
    );
  }
}
