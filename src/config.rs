//! Aggregator configuration.
//!
//! Everything a job needs to know is carried in one [`AggregatorConfig`]
//! value handed to the pipeline at construction: where records come from and
//! go to, which aggregation runs, and how records without values are treated.
//! Configs are plain serde structs and can be loaded from a JSON file:
//!
//! ```json
//! {
//!   "transport": {
//!     "brokers": "127.0.0.1:9092",
//!     "group_id": "iotagg",
//!     "source_topic": "agg.in.abc1",
//!     "sink_topic": "agg.out.abc1",
//!     "delivery": "at_least_once"
//!   },
//!   "mode": { "min_max": { "boundary": { "time": { "secs": 60 } } } },
//!   "missing_values": "treat_as_empty"
//! }
//! ```

use crate::decoder::MissingValuesPolicy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default broker address handed to the stream engine.
pub const DEFAULT_BROKERS: &str = "127.0.0.1:9092";
/// Default consumer group.
pub const DEFAULT_GROUP_ID: &str = "iotagg";
/// Default min/max window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;
/// Default number of arrivals per keyed count window.
pub const DEFAULT_COUNT: usize = 2;

/// Delivery guarantee requested from the outbound sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryGuarantee {
  /// Records may be written more than once after a failure.
  AtLeastOnce,
  /// Records are written exactly once.
  ExactlyOnce,
}

/// Broker-side settings for the external stream engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
  /// Bootstrap broker list.
  pub brokers: String,
  /// Consumer group id.
  pub group_id: String,
  /// Topic readings are read from.
  pub source_topic: String,
  /// Topic aggregates are written to.
  pub sink_topic: String,
  /// Sink delivery guarantee.
  pub delivery: DeliveryGuarantee,
}

/// When a min/max window seals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowBoundary {
  /// Every fixed processing-time interval.
  Time {
    /// Interval length in seconds.
    secs: u64,
  },
  /// After a fixed number of readings.
  Count {
    /// Readings per window.
    size: usize,
  },
}

impl WindowBoundary {
  /// Time boundary of the given length.
  pub fn time(interval: Duration) -> Self {
    WindowBoundary::Time {
      secs: interval.as_secs(),
    }
  }

  /// Count boundary of the given size.
  pub fn count(size: usize) -> Self {
    WindowBoundary::Count { size }
  }

  /// Rejects boundaries that would never seal.
  pub fn validate(&self) -> Result<(), ConfigError> {
    match self {
      WindowBoundary::Time { secs: 0 } => Err(ConfigError::InvalidWindow(
        "time window must be at least one second".to_string(),
      )),
      WindowBoundary::Count { size: 0 } => Err(ConfigError::InvalidWindow(
        "count window must hold at least one reading".to_string(),
      )),
      _ => Ok(()),
    }
  }
}

impl Default for WindowBoundary {
  fn default() -> Self {
    WindowBoundary::Time {
      secs: DEFAULT_WINDOW_SECS,
    }
  }
}

/// Which aggregation the job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
  /// One min/max aggregate per window over all readings.
  MinMax {
    /// When each window seals.
    boundary: WindowBoundary,
  },
  /// One sum/max/min record per sensor code every `count` arrivals of that code.
  KeyedStats {
    /// Arrivals per window.
    count: usize,
  },
}

/// Complete configuration of one aggregation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
  /// External stream engine settings.
  pub transport: TransportConfig,
  /// Aggregation to run.
  pub mode: AggregationMode,
  /// Handling of records without a `data` field.
  #[serde(default)]
  pub missing_values: MissingValuesPolicy,
}

impl AggregatorConfig {
  /// Min/max over 60 second windows, `agg.in.abc1` to `agg.out.abc1`, at-least-once.
  pub fn min_max() -> Self {
    Self {
      transport: TransportConfig {
        brokers: DEFAULT_BROKERS.to_string(),
        group_id: DEFAULT_GROUP_ID.to_string(),
        source_topic: "agg.in.abc1".to_string(),
        sink_topic: "agg.out.abc1".to_string(),
        delivery: DeliveryGuarantee::AtLeastOnce,
      },
      mode: AggregationMode::MinMax {
        boundary: WindowBoundary::default(),
      },
      missing_values: MissingValuesPolicy::default(),
    }
  }

  /// Keyed sum/max/min over two arrivals, `acc.in.a2` to `acc.out.a2`, exactly-once.
  pub fn keyed_stats() -> Self {
    Self {
      transport: TransportConfig {
        brokers: DEFAULT_BROKERS.to_string(),
        group_id: DEFAULT_GROUP_ID.to_string(),
        source_topic: "acc.in.a2".to_string(),
        sink_topic: "acc.out.a2".to_string(),
        delivery: DeliveryGuarantee::ExactlyOnce,
      },
      mode: AggregationMode::KeyedStats {
        count: DEFAULT_COUNT,
      },
      missing_values: MissingValuesPolicy::default(),
    }
  }

  /// Parses and validates a JSON config.
  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    let config: Self = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a JSON config file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_json_str(&text)
  }

  /// Rejects windows that would never close.
  pub fn validate(&self) -> Result<(), ConfigError> {
    match self.mode {
      AggregationMode::MinMax { boundary } => boundary.validate(),
      AggregationMode::KeyedStats { count: 0 } => Err(ConfigError::InvalidWindow(
        "keyed count window must hold at least one arrival".to_string(),
      )),
      AggregationMode::KeyedStats { .. } => Ok(()),
    }
  }
}

impl Default for AggregatorConfig {
  fn default() -> Self {
    Self::min_max()
  }
}
