use crate::payload::ClassificationResult;

/// Score a category must exceed to be picked.
pub const CLASSIFICATION_THRESHOLD: f64 = 0.5;
/// Document type reported when no category is confident enough.
pub const UNCLASSIFIED: &str = "NONE";

/// Pick the first category scoring above `threshold`.
pub fn pick_document_type<'a, I>(categories: I, threshold: f64) -> ClassificationResult
where
  I: IntoIterator<Item = (&'a str, f64)>,
{
  categories
    .into_iter()
    .find(|(_, score)| *score > threshold)
    .map(|(name, score)| ClassificationResult {
      document_type: name.to_string(),
      confidence: Some(score),
    })
    .unwrap_or_else(|| ClassificationResult {
      document_type: UNCLASSIFIED.to_string(),
      confidence: None,
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_picks_confident_category() {
    let result = pick_document_type(
      [
        ("AWS_PAYSTUBS", 3.09e-6),
        ("AWS_OTHER", 0.99995),
        ("AWS_W2", 4.5e-5),
      ],
      CLASSIFICATION_THRESHOLD,
    );

    assert_eq!(result.document_type, "AWS_OTHER");
    assert_eq!(result.confidence, Some(0.99995));
  }

  #[test]
  fn test_first_above_threshold_wins() {
    let result = pick_document_type([("A", 0.6), ("B", 0.9)], CLASSIFICATION_THRESHOLD);
    assert_eq!(result.document_type, "A");
  }

  #[test]
  fn test_threshold_is_exclusive() {
    let result = pick_document_type([("A", 0.5)], CLASSIFICATION_THRESHOLD);
    assert_eq!(result.document_type, UNCLASSIFIED);
    assert_eq!(result.confidence, None);
  }
}
