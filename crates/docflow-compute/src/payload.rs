//! Request and response payloads of the compute functions.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::s3::S3Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
  pub key: String,
  pub value: String,
}

/// Describes one document to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
  #[serde(rename = "s3Path")]
  pub s3_path: String,
  #[serde(rename = "metaData", default, skip_serializing_if = "Vec::is_empty")]
  pub meta_data: Vec<MetaData>,
}

impl Manifest {
  pub fn location(&self) -> Result<S3Path, ComputeError> {
    S3Path::parse(&self.s3_path)
  }
}

/// Document types the splitter can break into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedMime {
  Pdf,
  Png,
  Jpeg,
  Tiff,
}

impl SupportedMime {
  pub fn from_mime(mime: &str) -> Result<Self, ComputeError> {
    match mime {
      "application/pdf" => Ok(SupportedMime::Pdf),
      "image/png" => Ok(SupportedMime::Png),
      "image/jpeg" => Ok(SupportedMime::Jpeg),
      "image/tiff" => Ok(SupportedMime::Tiff),
      other => Err(ComputeError::UnsupportedMime {
        mime: other.to_string(),
      }),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      SupportedMime::Pdf => "application/pdf",
      SupportedMime::Png => "image/png",
      SupportedMime::Jpeg => "image/jpeg",
      SupportedMime::Tiff => "image/tiff",
    }
  }

  /// Extension of the page files the splitter writes.
  pub fn page_extension(&self) -> &'static str {
    match self {
      SupportedMime::Pdf => "pdf",
      SupportedMime::Png => "png",
      SupportedMime::Jpeg => "jpeg",
      SupportedMime::Tiff => "tiff",
    }
  }

  /// Name of the file the splitter writes for the 1-based `page`.
  pub fn page_file_name(&self, page: usize) -> String {
    format!("{}.{}", page, self.page_extension())
  }

  /// Whether the document can hold more than one page.
  pub fn is_multi_page(&self) -> bool {
    matches!(self, SupportedMime::Pdf | SupportedMime::Tiff)
  }
}

/// Input of the document splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterRequest {
  pub manifest: Manifest,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mime: Option<String>,
}

impl SplitterRequest {
  /// Check the request names a supported document at a valid location.
  pub fn validate(&self) -> Result<SupportedMime, ComputeError> {
    self.manifest.location()?;
    let mime = self.mime.as_deref().unwrap_or_default();
    SupportedMime::from_mime(mime)
  }
}

/// Output of the document splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterResponse {
  #[serde(rename = "documentSplitterS3OutputPath")]
  pub output_path: String,
  #[serde(rename = "documentSplitterS3OutputBucket")]
  pub output_bucket: String,
  /// Page file names, e.g. `1.pdf`, in page order.
  pub pages: Vec<String>,
  pub mime: String,
}

impl SplitterResponse {
  /// The response for `page_count` pages written under `output_path`.
  pub fn for_pages(
    output_bucket: impl Into<String>,
    output_path: impl Into<String>,
    mime: SupportedMime,
    page_count: usize,
  ) -> Self {
    Self {
      output_path: output_path.into(),
      output_bucket: output_bucket.into(),
      pages: (1..=page_count).map(|page| mime.page_file_name(page)).collect(),
      mime: mime.as_str().to_string(),
    }
  }

  pub fn page_count(&self) -> usize {
    self.pages.len()
  }
}

/// Input of the classifier, as handed over by a token-waiting task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
  #[serde(rename = "Token")]
  pub token: String,
  #[serde(rename = "ExecutionId")]
  pub execution_id: String,
  #[serde(rename = "Payload")]
  pub payload: serde_json::Value,
}

impl ClassificationRequest {
  /// Where the extracted text to classify is stored.
  pub fn text_location(&self) -> Result<S3Path, ComputeError> {
    let path = self.payload["txt_output_location"]["TextractOutputCSVPath"]
      .as_str()
      .ok_or(ComputeError::MissingTextLocation)?;
    S3Path::parse(path)
  }
}

/// What the classifier reports back through the task token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
  #[serde(rename = "documentType")]
  pub document_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub confidence: Option<f64>,
}
