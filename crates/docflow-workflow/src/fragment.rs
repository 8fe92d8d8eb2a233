use std::collections::HashSet;
use std::sync::Arc;

use docflow_task::TaskNode;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::WorkflowError;
use crate::graph::Graph;

/// A sub-graph of task nodes with one start and one or more ends.
///
/// Nodes are shared, not owned: a fragment only records how they are wired.
#[derive(Debug, Clone)]
pub struct Fragment {
  start: Arc<TaskNode>,
  ends: Vec<Arc<TaskNode>>,
  /// Every node, in chain order.
  nodes: Vec<Arc<TaskNode>>,
  /// Success transitions: (from, to).
  edges: Vec<(String, String)>,
}

impl Fragment {
  /// A fragment of one node: it is both the start and the only end.
  pub fn single(node: Arc<TaskNode>) -> Self {
    Self {
      start: node.clone(),
      ends: vec![node.clone()],
      nodes: vec![node],
      edges: Vec::new(),
    }
  }

  /// Chain `nodes` in order, wiring each node's success exit to the next
  /// node's entry.
  pub fn chain(nodes: &[Arc<TaskNode>]) -> Result<Self, WorkflowError> {
    let (first, rest) = nodes.split_first().ok_or(WorkflowError::EmptyChain)?;

    let mut fragment = Self::single(first.clone());
    for node in rest {
      fragment = fragment.then(Self::single(node.clone()))?;
    }

    debug!(
      start = %fragment.start.id(),
      nodes = fragment.nodes.len(),
      "fragment_chained"
    );

    Ok(fragment)
  }

  /// Continue this fragment with `next`: every end is wired to `next`'s start.
  pub fn then(self, next: Fragment) -> Result<Self, WorkflowError> {
    let mut seen: HashSet<&str> = self.nodes.iter().map(|n| n.id()).collect();
    for node in &next.nodes {
      if !seen.insert(node.id()) {
        return Err(WorkflowError::DuplicateNode {
          node_id: node.id().to_string(),
        });
      }
    }

    let mut edges = self.edges;
    for end in &self.ends {
      edges.push((end.id().to_string(), next.start.id().to_string()));
    }
    edges.extend(next.edges);

    let mut nodes = self.nodes;
    nodes.extend(next.nodes);

    Ok(Self {
      start: self.start,
      ends: next.ends,
      nodes,
      edges,
    })
  }

  /// The node the embedding graph enters through.
  pub fn start(&self) -> &Arc<TaskNode> {
    &self.start
  }

  /// The nodes whose exits leave the fragment.
  pub fn ends(&self) -> &[Arc<TaskNode>] {
    &self.ends
  }

  pub fn nodes(&self) -> &[Arc<TaskNode>] {
    &self.nodes
  }

  pub fn edges(&self) -> &[(String, String)] {
    &self.edges
  }

  pub fn get_node(&self, node_id: &str) -> Option<&Arc<TaskNode>> {
    self.nodes.iter().find(|n| n.id() == node_id)
  }

  /// The node a success exit of `node_id` leads to, if any.
  pub fn next_of(&self, node_id: &str) -> Option<&str> {
    self
      .edges
      .iter()
      .find(|(from, _)| from == node_id)
      .map(|(_, to)| to.as_str())
  }

  pub fn graph(&self) -> Graph {
    Graph::new(self.nodes.iter().map(|n| n.id()), &self.edges)
  }

  /// Render `{StartAt, States}` for the workflow engine.
  pub fn to_states(&self) -> Value {
    let mut states = Map::new();
    for node in &self.nodes {
      states.insert(
        node.id().to_string(),
        node.to_state(self.next_of(node.id())),
      );
    }
    serde_json::json!({
      "StartAt": self.start.id(),
      "States": states,
    })
  }
}
