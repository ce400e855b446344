//! Line-oriented bridge around the aggregation pipeline.
//!
//! Reads one JSON record per line from stdin (or `--input`), writes one
//! encoded aggregate per line to stdout (or `--output`). Logs go to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use iotagg::config::{AggregationMode, AggregatorConfig, WindowBoundary};
use iotagg::consumers::LineConsumer;
use iotagg::decoder::MissingValuesPolicy;
use iotagg::pipeline::run_job;
use iotagg::producers::LineProducer;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
  name = "iotagg",
  version,
  about = "Windowed min/max and keyed sum/max/min over IoT sensor readings"
)]
struct Cli {
  /// JSON job configuration; defaults to the preset of the chosen mode
  #[arg(short, long, global = true, env = "IOTAGG_CONFIG", value_name = "FILE")]
  config: Option<PathBuf>,

  /// Read records from a file instead of stdin
  #[arg(short, long, global = true, env = "IOTAGG_INPUT", value_name = "FILE")]
  input: Option<PathBuf>,

  /// Write records to a file instead of stdout
  #[arg(short, long, global = true, env = "IOTAGG_OUTPUT", value_name = "FILE")]
  output: Option<PathBuf>,

  /// Handling of records without a `data` field
  #[arg(long, global = true, env = "IOTAGG_MISSING_VALUES", value_enum)]
  missing_values: Option<MissingValues>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Min/max per window over all readings
  MinMax {
    /// Seal every N seconds of processing time
    #[arg(long, env = "IOTAGG_WINDOW_SECS", conflicts_with = "count")]
    window_secs: Option<u64>,

    /// Seal after N readings
    #[arg(long, env = "IOTAGG_COUNT")]
    count: Option<usize>,
  },
  /// Sum/max/min per sensor code every N arrivals of that code
  KeyedStats {
    /// Arrivals per window
    #[arg(long, env = "IOTAGG_COUNT")]
    count: Option<usize>,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum MissingValues {
  TreatAsEmpty,
  Reject,
}

impl From<MissingValues> for MissingValuesPolicy {
  fn from(value: MissingValues) -> Self {
    match value {
      MissingValues::TreatAsEmpty => MissingValuesPolicy::TreatAsEmpty,
      MissingValues::Reject => MissingValuesPolicy::Reject,
    }
  }
}

impl Cli {
  /// Loads the config file or the mode's preset and overlays flags on it.
  fn resolve_config(&self) -> Result<AggregatorConfig, iotagg::error::ConfigError> {
    let mut config = match (&self.config, &self.command) {
      (Some(path), _) => AggregatorConfig::load(path)?,
      (None, Some(Commands::KeyedStats { .. })) => AggregatorConfig::keyed_stats(),
      (None, _) => AggregatorConfig::min_max(),
    };

    match self.command {
      Some(Commands::MinMax { window_secs, count }) => {
        let boundary = match (window_secs, count, config.mode) {
          (Some(secs), _, _) => WindowBoundary::time(Duration::from_secs(secs)),
          (None, Some(size), _) => WindowBoundary::count(size),
          (None, None, AggregationMode::MinMax { boundary }) => boundary,
          (None, None, AggregationMode::KeyedStats { .. }) => WindowBoundary::default(),
        };
        config.mode = AggregationMode::MinMax { boundary };
      }
      Some(Commands::KeyedStats { count }) => {
        let count = match (count, config.mode) {
          (Some(count), _) => count,
          (None, AggregationMode::KeyedStats { count }) => count,
          (None, AggregationMode::MinMax { .. }) => iotagg::config::DEFAULT_COUNT,
        };
        config.mode = AggregationMode::KeyedStats { count };
      }
      None => {}
    }

    if let Some(policy) = self.missing_values {
      config.missing_values = policy.into();
    }

    config.validate()?;
    Ok(config)
  }
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("iotagg=debug")
    } else {
      EnvFilter::new("iotagg=info")
    }
  });

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr),
    )
    .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = cli.resolve_config()?;
  tracing::info!(
    brokers = %config.transport.brokers,
    group_id = %config.transport.group_id,
    source_topic = %config.transport.source_topic,
    sink_topic = %config.transport.sink_topic,
    delivery = ?config.transport.delivery,
    "Transport settings"
  );

  let producer = match &cli.input {
    Some(path) => LineProducer::open(path).await?,
    None => LineProducer::stdin(),
  };

  let written = match &cli.output {
    Some(path) => {
      let consumer = LineConsumer::create(path).await?;
      run_job(&config, producer, consumer).await?.written()
    }
    None => run_job(&config, producer, LineConsumer::stdout())
      .await?
      .written(),
  };

  tracing::info!(written, "Aggregation job finished");
  Ok(())
}
