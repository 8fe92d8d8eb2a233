use serde::{Deserialize, Serialize};

use crate::task::TaskDef;

/// A chain of tasks, executed in the order they are listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentDef {
  pub fragment_id: String,
  pub name: String,
  /// Partition used when building resource identifiers, e.g. `aws-cn`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub partition: Option<String>,
  pub tasks: Vec<TaskDef>,
}
