use docflow_config::LogFormat;
use tracing_subscriber::{
  EnvFilter,
  fmt::{self, format::FmtSpan},
  layer::SubscriberExt,
  util::SubscriberInitExt,
};

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Logs go to stderr so rendered output on stdout stays parseable.
pub fn init_logging(level: &str, format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  match format {
    LogFormat::Json => {
      tracing_subscriber::registry()
        .with(filter)
        .with(
          fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE),
        )
        .init();
    }
    LogFormat::Pretty => {
      tracing_subscriber::registry()
        .with(filter)
        .with(
          fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE),
        )
        .init();
    }
  }

  tracing::debug!(level = level, "logging_initialized");
}
