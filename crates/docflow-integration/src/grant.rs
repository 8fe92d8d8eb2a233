//! Bucket grants for the compute functions a task invokes.

use crate::policy::PolicyStatement;

const READ_ACTIONS: &[&str] = &["s3:GetObject", "s3:ListBucket"];
const WRITE_ACTIONS: &[&str] = &["s3:PutObject"];
const WRITE_MULTIPART_ACTIONS: &[&str] = &[
  "s3:PutObject",
  "s3:AbortMultipartUpload",
  "s3:ListMultipartUploadParts",
  "s3:ListBucketMultipartUploads",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketAccess {
  Read,
  /// Single part uploads only.
  Write,
  WriteMultipart,
}

impl BucketAccess {
  pub fn actions(&self) -> &'static [&'static str] {
    match self {
      BucketAccess::Read => READ_ACTIONS,
      BucketAccess::Write => WRITE_ACTIONS,
      BucketAccess::WriteMultipart => WRITE_MULTIPART_ACTIONS,
    }
  }
}

/// Access to a bucket, optionally narrowed to a key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketGrant {
  pub bucket: String,
  pub prefix: Option<String>,
  pub access: BucketAccess,
}

impl BucketGrant {
  pub fn read(bucket: impl Into<String>, prefix: Option<String>) -> Self {
    Self::new(bucket, prefix, BucketAccess::Read)
  }

  pub fn write(bucket: impl Into<String>, prefix: Option<String>) -> Self {
    Self::new(bucket, prefix, BucketAccess::Write)
  }

  pub fn write_multipart(bucket: impl Into<String>, prefix: Option<String>) -> Self {
    Self::new(bucket, prefix, BucketAccess::WriteMultipart)
  }

  fn new(bucket: impl Into<String>, prefix: Option<String>, access: BucketAccess) -> Self {
    Self {
      bucket: bucket.into(),
      prefix,
      access,
    }
  }

  /// The statement granting this access, covering the bucket and its objects.
  pub fn to_statement(&self, partition: &str) -> PolicyStatement {
    let bucket_arn = format!("arn:{}:s3:::{}", partition, self.bucket);
    let object_arn = match &self.prefix {
      Some(prefix) => format!("{}/{}*", bucket_arn, prefix.trim_matches('/')),
      None => format!("{}/*", bucket_arn),
    };
    PolicyStatement::allow(self.access.actions().iter().copied(), [bucket_arn, object_arn])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_read_grant_covers_bucket_and_prefix() {
    let statement =
      BucketGrant::read("documents", Some("uploads/".to_string())).to_statement("aws");

    assert_eq!(statement.actions, vec!["s3:GetObject", "s3:ListBucket"]);
    assert_eq!(
      statement.resources,
      vec!["arn:aws:s3:::documents", "arn:aws:s3:::documents/uploads*"]
    );
  }

  #[test]
  fn test_plain_write_has_no_multipart_actions() {
    let statement = BucketGrant::write("results", None).to_statement("aws");

    assert_eq!(statement.actions, vec!["s3:PutObject"]);
    assert_eq!(statement.resources[1], "arn:aws:s3:::results/*");
  }

  #[test]
  fn test_multipart_write_actions() {
    let statement = BucketGrant::write_multipart("pages", None).to_statement("aws");

    assert!(statement.allows("s3:PutObject", "arn:aws:s3:::pages/*"));
    assert!(statement.allows("s3:AbortMultipartUpload", "arn:aws:s3:::pages/*"));
    assert!(statement.allows("s3:ListMultipartUploadParts", "arn:aws:s3:::pages/*"));
    assert!(statement.allows("s3:ListBucketMultipartUploads", "arn:aws:s3:::pages"));
  }
}
