use std::collections::HashMap;

/// Adjacency view of a fragment for traversal.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: node_id -> list of downstream node_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: node_id -> list of upstream node_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Nodes with no incoming edges.
  entry_points: Vec<String>,
  /// Nodes with no outgoing edges.
  exit_points: Vec<String>,
}

impl Graph {
  /// Build a graph from node ids (in order) and edges.
  pub fn new<'a>(node_ids: impl IntoIterator<Item = &'a str>, edges: &[(String, String)]) -> Self {
    let node_ids: Vec<&str> = node_ids.into_iter().collect();
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for node_id in &node_ids {
      adjacency.entry(node_id.to_string()).or_default();
      reverse_adjacency.entry(node_id.to_string()).or_default();
    }

    for (from, to) in edges {
      adjacency.entry(from.clone()).or_default().push(to.clone());
      reverse_adjacency
        .entry(to.clone())
        .or_default()
        .push(from.clone());
    }

    let entry_points = node_ids
      .iter()
      .filter(|id| reverse_adjacency.get(**id).is_none_or(|v| v.is_empty()))
      .map(|id| id.to_string())
      .collect();

    let exit_points = node_ids
      .iter()
      .filter(|id| adjacency.get(**id).is_none_or(|v| v.is_empty()))
      .map(|id| id.to_string())
      .collect();

    Self {
      adjacency,
      reverse_adjacency,
      entry_points,
      exit_points,
    }
  }

  /// Nodes with no incoming edges.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Nodes with no outgoing edges.
  pub fn exit_points(&self) -> &[String] {
    &self.exit_points
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node_id: &str) -> &[String] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }
}
