use std::fmt;
use std::str::FromStr;

use crate::error::ComputeError;

/// A bucket and key, written `s3://bucket/key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Path {
  pub bucket: String,
  pub key: String,
}

impl S3Path {
  pub fn parse(path: &str) -> Result<Self, ComputeError> {
    let invalid = || ComputeError::InvalidS3Path {
      path: path.to_string(),
    };

    if path.len() <= 7 || !path.to_ascii_lowercase().starts_with("s3://") {
      return Err(invalid());
    }

    let (bucket, key) = path[5..].split_once('/').ok_or_else(invalid)?;
    if bucket.is_empty() {
      return Err(invalid());
    }

    Ok(Self {
      bucket: bucket.to_string(),
      key: key.to_string(),
    })
  }

  /// File name of the key without its extension.
  pub fn file_stem(&self) -> &str {
    let name = self.key.rsplit('/').next().unwrap_or(&self.key);
    match name.rsplit_once('.') {
      Some((stem, _)) if !stem.is_empty() => stem,
      _ => name,
    }
  }
}

impl FromStr for S3Path {
  type Err = ComputeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for S3Path {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "s3://{}/{}", self.bucket, self.key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_bucket_and_key() {
    let path = S3Path::parse("s3://documents/uploads/scan.pdf").unwrap();
    assert_eq!(path.bucket, "documents");
    assert_eq!(path.key, "uploads/scan.pdf");
    assert_eq!(path.to_string(), "s3://documents/uploads/scan.pdf");
    assert_eq!(path.file_stem(), "scan");
  }

  #[test]
  fn test_scheme_is_case_insensitive() {
    let path: S3Path = "S3://documents/a.png".parse().unwrap();
    assert_eq!(path.bucket, "documents");
  }

  #[test]
  fn test_rejects_malformed_paths() {
    for bad in ["s3://", "s3://ab", "https://documents/a.pdf", "s3://bucket", "s3:///key"] {
      assert!(S3Path::parse(bad).is_err(), "{} should be rejected", bad);
    }
  }
}
