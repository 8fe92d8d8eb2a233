use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};

use docflow_config::{ConfigDefaults, FragmentDef, LogFormat, TransientErrorKind};
use docflow_resolver::{Resolver, StandardResolver};
use docflow_task::RetryPolicy;

mod logging;

/// Docflow - task building blocks for document processing workflows
#[derive(Parser)]
#[command(name = "docflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Partition used when a definition does not name one
  #[arg(long, global = true)]
  partition: Option<String>,

  /// Log filter, overridden by RUST_LOG [default: the configured log level]
  #[arg(long, global = true)]
  log_level: Option<String>,

  /// Log output: pretty or json
  #[arg(long, global = true, default_value = "pretty", value_parser = parse_log_format)]
  log_format: LogFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Render a fragment definition into engine states and access policies
  Render {
    /// Path to the fragment definition (JSON)
    definition_file: PathBuf,
  },

  /// Print the delays a retry policy waits between attempts
  Schedule {
    #[arg(long, default_value_t = 6)]
    max_attempts: u32,

    #[arg(long, default_value_t = 2.0)]
    backoff_rate: f64,

    /// First delay in seconds
    #[arg(long, default_value_t = 2)]
    interval: u64,
  },
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
  serde_json::from_value(Value::String(s.to_ascii_lowercase()))
    .map_err(|_| format!("unknown log format '{}', expected pretty or json", s))
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let mut defaults = ConfigDefaults::default();
  if let Some(partition) = cli.partition {
    defaults = defaults.with_partition(partition);
  }
  if let Some(level) = cli.log_level {
    defaults.log_level = level;
  }
  logging::init_logging(&defaults.log_level.to_ascii_lowercase(), cli.log_format);

  match cli.command {
    Some(Commands::Render { definition_file }) => {
      let content = std::fs::read_to_string(&definition_file).with_context(|| {
        format!("failed to read definition file: {}", definition_file.display())
      })?;

      let def: FragmentDef = serde_json::from_str(&content).with_context(|| {
        format!("failed to parse definition file: {}", definition_file.display())
      })?;

      let output = render_fragment(def, defaults)?;
      println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Some(Commands::Schedule {
      max_attempts,
      backoff_rate,
      interval,
    }) => {
      let policy = RetryPolicy::new(
        max_attempts,
        backoff_rate,
        interval,
        TransientErrorKind::FUNCTION_DEFAULTS.to_vec(),
      )
      .context("invalid retry policy")?;

      for (retry, delay) in policy.schedule().enumerate() {
        println!("retry {}: {:.3}s", retry + 1, delay.as_secs_f64());
      }
    }
    None => {
      println!("docflow - use --help to see available commands");
    }
  }

  Ok(())
}

/// Resolve `def` and collect its states and each task's access policy.
fn render_fragment(def: FragmentDef, defaults: ConfigDefaults) -> Result<Value> {
  let resolver = StandardResolver::new(defaults);
  let fragment = resolver
    .resolve(def)
    .context("failed to resolve fragment")?;

  let mut policies = Map::new();
  for node in fragment.nodes() {
    policies.insert(
      node.id().to_string(),
      serde_json::to_value(node.access_policy())?,
    );
  }

  Ok(json!({
    "definition": fragment.to_states(),
    "policies": policies,
  }))
}
