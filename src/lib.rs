//! # iotagg
//!
//! Windowed aggregation of IoT sensor readings.
//!
//! Readings arrive as JSON text records, are decoded into [`reading::Reading`]s,
//! folded into tumbling windows and sealed windows are encoded back to JSON
//! text. Two aggregations are provided:
//!
//! - **Min/max**: one [`aggregate::Aggregate`] per window with the smallest and
//!   largest value of every sensor code, sealed on a processing-time interval
//!   or after a fixed number of readings.
//! - **Keyed stats**: readings are fanned out per sensor code and every code
//!   emits one [`keyed_stat::KeyedStat`] (sum, max, min) every N arrivals.
//!
//! Stages are [`Producer`]s, [`Transformer`]s and [`Consumer`]s over async
//! streams, wired together with [`pipeline::PipelineBuilder`].
//!
//! ```rust,no_run
//! use iotagg::config::AggregatorConfig;
//! use iotagg::consumers::LineConsumer;
//! use iotagg::pipeline::run_job;
//! use iotagg::producers::LineProducer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AggregatorConfig::keyed_stats();
//! run_job(&config, LineProducer::stdin(), LineConsumer::stdout()).await?;
//! # Ok(())
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Min/max window state and fold.
pub mod aggregate;
/// Job configuration.
pub mod config;
/// Consumer trait.
pub mod consumer;
/// Built-in consumers.
pub mod consumers;
/// Transport record decoding.
pub mod decoder;
/// Transport record encoding.
pub mod encoder;
/// Error types and strategies.
pub mod error;
/// Input side of a stage.
pub mod input;
/// Per-sensor count windows.
pub mod keyed_stat;
/// Output side of a stage.
pub mod output;
/// Pipeline builder and job assembly.
pub mod pipeline;
/// Producer trait.
pub mod producer;
/// Built-in producers.
pub mod producers;
/// Decoded sensor readings.
pub mod reading;
/// Transformer trait.
pub mod transformer;
/// Built-in transformers.
pub mod transformers;

#[cfg(test)]
mod decoder_test;
#[cfg(test)]
mod encoder_test;
#[cfg(test)]
mod pipeline_test;
#[cfg(test)]
mod reading_test;

pub use consumer::{Consumer, ConsumerConfig};
pub use error::{ErrorAction, ErrorStrategy, StreamError};
pub use input::Input;
pub use output::Output;
pub use producer::{Producer, ProducerConfig};
pub use transformer::{Transformer, TransformerConfig};
