use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("a fragment needs at least one node")]
  EmptyChain,

  /// Chaining a node twice would close a cycle inside the fragment.
  #[error("node '{node_id}' appears more than once in the fragment")]
  DuplicateNode { node_id: String },
}
