//! # Pipeline
//!
//! A typestate builder that wires a producer, any number of transformers and
//! a consumer into one runnable [`Pipeline`]. Each step checks at compile time
//! that the upstream stream converts into the downstream stage's input.
//!
//! ```rust
//! use iotagg::consumers::LineConsumer;
//! use iotagg::keyed_stat::KeyedStat;
//! use iotagg::pipeline::PipelineBuilder;
//! use iotagg::producers::LineProducer;
//! use iotagg::transformers::{DecodeTransformer, EncodeTransformer, KeyedStatsTransformer};
//! use std::io::Cursor;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = "{\"data\":{\"T1\":1}}\n{\"data\":{\"T1\":22}}\n";
//! let consumer = PipelineBuilder::new()
//!   .producer(LineProducer::new(Cursor::new(input.as_bytes().to_vec())))
//!   .transformer(DecodeTransformer::new())
//!   .transformer(KeyedStatsTransformer::new(2)?)
//!   .transformer(EncodeTransformer::<KeyedStat>::new())
//!   .consumer(LineConsumer::new(Vec::<u8>::new()))
//!   .run()
//!   .await;
//! assert_eq!(consumer.written(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! [`run_job`] assembles the full decode, window, encode chain from an
//! [`AggregatorConfig`].

use crate::aggregate::Aggregate;
use crate::config::{AggregationMode, AggregatorConfig};
use crate::error::ConfigError;
use crate::keyed_stat::KeyedStat;
use crate::transformers::{
  DecodeTransformer, EncodeTransformer, KeyedStatsTransformer, MinMaxWindowTransformer,
};
use crate::{consumer::Consumer, producer::Producer, transformer::Transformer};
use futures::Stream;
use std::pin::Pin;

/// Boxed stream of raw transport records.
pub type RecordStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Builder state before a producer is attached.
pub struct Empty;

/// Builder state holding the stream produced so far.
pub struct HasStream<S>(S);

/// Builds a [`Pipeline`] one stage at a time.
pub struct PipelineBuilder<State> {
  state: State,
}

impl PipelineBuilder<Empty> {
  /// Creates an empty builder.
  pub fn new() -> Self {
    PipelineBuilder { state: Empty }
  }

  /// Attaches the source of the pipeline.
  pub fn producer<P>(self, mut producer: P) -> PipelineBuilder<HasStream<P::OutputStream>>
  where
    P: Producer,
  {
    PipelineBuilder {
      state: HasStream(producer.produce()),
    }
  }
}

impl Default for PipelineBuilder<Empty> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S> PipelineBuilder<HasStream<S>> {
  /// Appends a transformer fed by the current stream.
  pub fn transformer<T>(self, mut transformer: T) -> PipelineBuilder<HasStream<T::OutputStream>>
  where
    T: Transformer,
    T::InputStream: From<S>,
  {
    let HasStream(stream) = self.state;
    PipelineBuilder {
      state: HasStream(transformer.transform(stream.into())),
    }
  }

  /// Attaches the sink, completing the pipeline.
  pub fn consumer<C>(self, consumer: C) -> Pipeline<S, C>
  where
    C: Consumer,
    C::InputStream: From<S>,
  {
    let HasStream(stream) = self.state;
    Pipeline { stream, consumer }
  }
}

/// A fully wired pipeline, ready to run.
pub struct Pipeline<S, C> {
  stream: S,
  consumer: C,
}

impl<S, C> Pipeline<S, C>
where
  C: Consumer,
  C::InputStream: From<S>,
{
  /// Drives the stream into the consumer until it ends, then hands the
  /// consumer back.
  pub async fn run(self) -> C {
    let Pipeline {
      stream,
      mut consumer,
    } = self;
    let component = consumer.component_info().name;

    tracing::debug!(component = %component, "Running pipeline");
    consumer.consume(stream.into()).await;
    tracing::debug!(component = %component, "Pipeline finished");

    consumer
  }
}

/// Runs the aggregation described by `config` from `producer` into `consumer`.
///
/// Records are decoded with the configured missing-values policy, folded by
/// the configured aggregation mode and encoded back to JSON text. Returns the
/// consumer once the input ends.
pub async fn run_job<P, C>(
  config: &AggregatorConfig,
  producer: P,
  consumer: C,
) -> Result<C, ConfigError>
where
  P: Producer<Output = String, OutputStream = RecordStream>,
  C: Consumer<Input = String, InputStream = RecordStream>,
{
  config.validate()?;

  tracing::info!(
    mode = ?config.mode,
    missing_values = ?config.missing_values,
    "Starting aggregation job"
  );

  let decoded = PipelineBuilder::new()
    .producer(producer)
    .transformer(DecodeTransformer::new().with_missing_values(config.missing_values));

  let consumer = match config.mode {
    AggregationMode::MinMax { boundary } => {
      decoded
        .transformer(MinMaxWindowTransformer::new(boundary)?)
        .transformer(EncodeTransformer::<Aggregate>::new())
        .consumer(consumer)
        .run()
        .await
    }
    AggregationMode::KeyedStats { count } => {
      decoded
        .transformer(KeyedStatsTransformer::new(count)?)
        .transformer(EncodeTransformer::<KeyedStat>::new())
        .consumer(consumer)
        .run()
        .await
    }
  };

  Ok(consumer)
}
