use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComputeError {
  #[error("'{path}' is not an s3 path in the form s3://bucket/key")]
  InvalidS3Path { path: String },

  #[error("unsupported mime type: {mime}")]
  UnsupportedMime { mime: String },

  #[error("classification request has no text location")]
  MissingTextLocation,
}
