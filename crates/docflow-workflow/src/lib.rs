//! Docflow Workflow
//!
//! A [`Fragment`] is a reusable sub-graph of task nodes with exactly one entry
//! and one or more exits. Fragments are built by chaining nodes in order and
//! can be chained onto each other; the embedding graph only ever sees the
//! start and end handles.
//!
//! Fragments are acyclic. Loops belong to the embedding graph.

mod error;
mod fragment;
mod graph;

pub use error::WorkflowError;
pub use fragment::Fragment;
pub use graph::Graph;
