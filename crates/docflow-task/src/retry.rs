//! Retry policies.
//!
//! A policy lists the transient errors it retries. Anything else fails the
//! node at once. Attempts are counted per node entry: every call to
//! [`RetryPolicy::run`] starts again at attempt one.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use docflow_config::{RetrySettings, TransientErrorKind};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::TaskError;
use crate::invoke::InvocationError;

/// Largest attempt count the engine's retrier can express.
pub const MAX_ATTEMPTS_LIMIT: u32 = 100_000_000;

/// A node's run-time failure after retry handling.
#[derive(Debug, Error)]
pub enum RetryError {
  /// Every attempt failed with a retryable error.
  #[error("retries exhausted after {attempts} attempts")]
  RetriesExhausted {
    attempts: u32,
    #[source]
    last: InvocationError,
  },

  /// The error is not one the policy retries.
  #[error("invocation failed with a non-retryable error")]
  Terminal(#[source] InvocationError),
}

impl RetryError {
  /// The error reported by the final attempt.
  pub fn last_error(&self) -> &InvocationError {
    match self {
      RetryError::RetriesExhausted { last, .. } => last,
      RetryError::Terminal(e) => e,
    }
  }
}

/// Bounded retries with exponential backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
  max_attempts: u32,
  backoff_rate: f64,
  interval_seconds: u64,
  errors: Vec<TransientErrorKind>,
}

impl RetryPolicy {
  /// Create a policy.
  ///
  /// `max_attempts` counts every call, the first one included.
  pub fn new(
    max_attempts: u32,
    backoff_rate: f64,
    interval_seconds: u64,
    errors: impl IntoIterator<Item = TransientErrorKind>,
  ) -> Result<Self, TaskError> {
    if max_attempts == 0 {
      return Err(TaskError::invalid_retry("max_attempts must be at least 1"));
    }
    if max_attempts > MAX_ATTEMPTS_LIMIT {
      return Err(TaskError::invalid_retry(format!(
        "max_attempts must be at most {}, got {}",
        MAX_ATTEMPTS_LIMIT, max_attempts
      )));
    }
    if !backoff_rate.is_finite() || backoff_rate < 1.0 {
      return Err(TaskError::invalid_retry(format!(
        "backoff_rate must be at least 1.0, got {}",
        backoff_rate
      )));
    }
    if interval_seconds == 0 {
      return Err(TaskError::invalid_retry(
        "interval_seconds must be greater than zero",
      ));
    }

    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for kind in errors {
      if !seen.insert(kind) {
        return Err(TaskError::DuplicateRetryError { kind });
      }
      ordered.push(kind);
    }
    if ordered.is_empty() {
      return Err(TaskError::invalid_retry("at least one error must be retried"));
    }

    Ok(Self {
      max_attempts,
      backoff_rate,
      interval_seconds,
      errors: ordered,
    })
  }

  pub fn from_settings(settings: &RetrySettings) -> Result<Self, TaskError> {
    Self::new(
      settings.max_attempts,
      settings.backoff_rate,
      settings.interval_seconds,
      settings.errors.iter().copied(),
    )
  }

  pub fn max_attempts(&self) -> u32 {
    self.max_attempts
  }

  pub fn backoff_rate(&self) -> f64 {
    self.backoff_rate
  }

  pub fn interval_seconds(&self) -> u64 {
    self.interval_seconds
  }

  pub fn errors(&self) -> &[TransientErrorKind] {
    &self.errors
  }

  /// Whether `error` is retried by this policy.
  pub fn matches(&self, error: &InvocationError) -> bool {
    error.kind().is_some_and(|kind| self.errors.contains(&kind))
  }

  /// Delay before the `retry`-th retry (1-based): `interval * rate^(retry - 1)`.
  pub fn delay_for_retry(&self, retry: u32) -> Duration {
    if retry == 0 {
      return Duration::ZERO;
    }
    let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
    let seconds = self.interval_seconds as f64 * self.backoff_rate.powi(exponent);
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
  }

  /// Delays of every retry the policy allows, in order.
  pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
    (1..self.max_attempts).map(|retry| self.delay_for_retry(retry))
  }

  /// The engine's retrier for this policy.
  ///
  /// The engine counts retries, not attempts, so `MaxAttempts` is one less
  /// than [`RetryPolicy::max_attempts`].
  pub fn to_state(&self) -> serde_json::Value {
    serde_json::json!({
      "ErrorEquals": self.errors.iter().map(|e| e.code()).collect::<Vec<_>>(),
      "IntervalSeconds": self.interval_seconds,
      "MaxAttempts": self.max_attempts - 1,
      "BackoffRate": self.backoff_rate,
    })
  }

  /// Run `attempt` until it succeeds, fails terminally or runs out of attempts.
  ///
  /// `attempt` receives the 1-based attempt number.
  pub async fn run<T, F, Fut>(&self, node_id: &str, mut attempt: F) -> Result<T, RetryError>
  where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, InvocationError>>,
  {
    let mut attempt_number = 1;
    loop {
      match attempt(attempt_number).await {
        Ok(value) => return Ok(value),
        Err(e) if !self.matches(&e) => {
          warn!(
            node_id = %node_id,
            attempt = attempt_number,
            error = %e,
            "invocation_failed"
          );
          return Err(RetryError::Terminal(e));
        }
        Err(e) if attempt_number >= self.max_attempts => {
          error!(
            node_id = %node_id,
            attempts = attempt_number,
            error = %e,
            "invocation_retries_exhausted"
          );
          return Err(RetryError::RetriesExhausted {
            attempts: attempt_number,
            last: e,
          });
        }
        Err(e) => {
          let delay = self.delay_for_retry(attempt_number);
          info!(
            node_id = %node_id,
            attempt = attempt_number,
            delay_ms = delay.as_millis() as u64,
            error = %e,
            "invocation_retry_scheduled"
          );
          tokio::time::sleep(delay).await;
          attempt_number += 1;
        }
      }
    }
  }
}
