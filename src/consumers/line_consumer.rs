//! Line-delimited record consumer.
//!
//! [`LineConsumer`] writes each encoded record followed by a newline to an
//! async writer, usually stdout feeding a broker CLI or a file. The writer is
//! flushed once the stream ends.
//!
//! A failed write is logged and handed to the configured [`ErrorStrategy`]:
//! `Retry(n)` rewrites the same record up to `n` times, `Skip` drops it and
//! `Stop` (the default) ends consumption.

use crate::error::{ComponentInfo, ErrorAction, ErrorStrategy, StreamError};
use crate::{Consumer, ConsumerConfig, Input};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::path::Path;
use std::pin::Pin;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A consumer that writes one record per line.
pub struct LineConsumer<W>
where
  W: AsyncWrite + Send + Unpin,
{
  writer: W,
  written: usize,
  /// Configuration for the consumer.
  pub config: ConsumerConfig<String>,
}

impl LineConsumer<tokio::io::Stdout> {
  /// Writes records to standard output.
  pub fn stdout() -> Self {
    Self::new(tokio::io::stdout()).with_name("stdout".to_string())
  }
}

impl LineConsumer<tokio::fs::File> {
  /// Creates (or truncates) the file at `path` and writes records to it.
  pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
    let path = path.as_ref();
    let file = tokio::fs::File::create(path).await?;
    Ok(Self::new(file).with_name(path.display().to_string()))
  }
}

impl<W> LineConsumer<W>
where
  W: AsyncWrite + Send + Unpin,
{
  /// Writes records to `writer`.
  pub fn new(writer: W) -> Self {
    Self {
      writer,
      written: 0,
      config: ConsumerConfig::default(),
    }
  }

  /// Sets the error handling strategy for this consumer.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<String>) -> Self {
    self.config.error_strategy = strategy;
    self
  }

  /// Sets the name for this consumer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = name;
    self
  }

  /// Records written so far.
  pub fn written(&self) -> usize {
    self.written
  }

  /// Returns the underlying writer.
  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<W> Input for LineConsumer<W>
where
  W: AsyncWrite + Send + Unpin,
{
  type Input = String;
  type InputStream = Pin<Box<dyn Stream<Item = String> + Send>>;
}

#[async_trait]
impl<W> Consumer for LineConsumer<W>
where
  W: AsyncWrite + Send + Unpin,
{
  async fn consume(&mut self, mut stream: Self::InputStream) {
    let component = self.component_info().name;

    'records: while let Some(record) = stream.next().await {
      let line = format!("{record}\n");
      let mut retries = 0;

      loop {
        let Err(e) = self.writer.write_all(line.as_bytes()).await else {
          self.written += 1;
          break;
        };

        tracing::warn!(
          component = %component,
          error = %e,
          retries,
          "Failed to write record"
        );
        let mut error = StreamError::new(
          Box::new(e),
          self.create_error_context(Some(record.clone())),
          self.component_info(),
        );
        error.retries = retries;

        match self.handle_error(&error) {
          ErrorAction::Retry => retries += 1,
          ErrorAction::Skip => break,
          ErrorAction::Stop => break 'records,
        }
      }
    }

    if let Err(e) = self.writer.flush().await {
      tracing::warn!(
        component = %component,
        error = %e,
        "Failed to flush output"
      );
    }
  }

  fn set_config_impl(&mut self, config: ConsumerConfig<String>) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &ConsumerConfig<String> {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut ConsumerConfig<String> {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: if self.config.name.is_empty() {
        "line_consumer".to_string()
      } else {
        self.config.name.clone()
      },
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
