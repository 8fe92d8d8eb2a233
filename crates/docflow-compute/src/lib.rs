//! Docflow Compute
//!
//! Typed views of the compute functions docflow tasks invoke. The task layer
//! treats their payloads as opaque JSON; this crate names the shapes the
//! document splitter and the classifier exchange, and builds the task nodes
//! and role policies that go with them.

mod classify;
mod error;
mod function;
mod payload;
mod s3;

pub use classify::{CLASSIFICATION_THRESHOLD, UNCLASSIFIED, pick_document_type};
pub use error::ComputeError;
pub use function::{ComputeFunction, FunctionBuckets, FunctionKind};
pub use payload::{
  ClassificationRequest, ClassificationResult, Manifest, MetaData, SplitterRequest,
  SplitterResponse, SupportedMime,
};
pub use s3::S3Path;
