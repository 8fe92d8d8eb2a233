//! Input shaping.

use serde_json::{Map, Value};

use crate::TaskInput;

/// Key the engine reads to link a started execution to its parent.
pub const EXECUTION_ID_KEY: &str = "AWS_STEP_FUNCTIONS_STARTED_BY_EXECUTION_ID.$";
/// Context path of the current execution's id.
pub const PARENT_EXECUTION_ID_PATH: &str = "$$.Execution.Id";
/// Context path of the task token handed out for token callbacks.
pub const TASK_TOKEN_PATH: &str = "$$.Task.Token";
/// Path selecting the whole incoming payload.
pub const FULL_PAYLOAD_PATH: &str = "$";

/// Input after shaping: a concrete value, or a path the engine resolves.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ShapedInput {
  Value(Value),
  Path(String),
}

pub(crate) fn kind_of(input: &TaskInput) -> &'static str {
  match input {
    TaskInput::Object(_) => "object",
    TaskInput::Path(_) => "path",
    TaskInput::Text(_) => "text",
  }
}

/// Shape the input handed to the target.
///
/// With `associate_with_parent` the parent execution id is merged under the
/// caller's fields; caller fields win on a key collision. Callers must have
/// rejected non-object inputs already.
pub(crate) fn shape_input(input: Option<&TaskInput>, associate_with_parent: bool) -> ShapedInput {
  if associate_with_parent {
    let mut merged = Map::new();
    merged.insert(
      EXECUTION_ID_KEY.to_string(),
      Value::String(PARENT_EXECUTION_ID_PATH.to_string()),
    );
    if let Some(TaskInput::Object(fields)) = input {
      for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
      }
    }
    return ShapedInput::Value(Value::Object(merged));
  }

  match input {
    Some(TaskInput::Object(fields)) => ShapedInput::Value(Value::Object(fields.clone())),
    Some(TaskInput::Text(text)) => ShapedInput::Value(Value::String(text.clone())),
    Some(TaskInput::Path(path)) => ShapedInput::Path(path.clone()),
    None => ShapedInput::Path(FULL_PAYLOAD_PATH.to_string()),
  }
}

/// Whether `value` hands the task token to the target.
///
/// The engine only resolves paths under keys ending in `.$`; a token path
/// under any other key reaches the target as literal text.
pub(crate) fn references_task_token(value: &Value) -> bool {
  match value {
    Value::Array(items) => items.iter().any(references_task_token),
    Value::Object(fields) => fields.iter().any(|(key, field)| {
      let resolved = key.ends_with(".$")
        && field
          .as_str()
          .is_some_and(|path| path.contains(TASK_TOKEN_PATH));
      resolved || references_task_token(field)
    }),
    _ => false,
  }
}
