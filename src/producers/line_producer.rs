//! Line-delimited record producer.
//!
//! [`LineProducer`] reads transport records one per line from any async
//! reader: stdin when the aggregator sits behind a broker CLI, a file when
//! replaying captured traffic. Blank lines are skipped and a trailing `\r` is
//! stripped.
//!
//! A line that is not valid UTF-8 is logged and handed to the configured
//! [`ErrorStrategy`]; the default is [`ErrorStrategy::Skip`], so one corrupt
//! record never ends the stream. A read error on the underlying reader always
//! ends it.
//!
//! ```rust,no_run
//! use iotagg::producers::LineProducer;
//!
//! # async fn example() -> std::io::Result<()> {
//! let from_stdin = LineProducer::stdin();
//! let from_file = LineProducer::open("captured.jsonl").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use crate::{Output, Producer, ProducerConfig};
use futures::{Stream, stream};
use std::path::Path;
use std::pin::Pin;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

type LineSource = Box<dyn AsyncRead + Send + Unpin>;

/// A producer that yields each non-blank line of a reader.
pub struct LineProducer {
  reader: Option<LineSource>,
  /// Configuration for the producer.
  pub config: ProducerConfig<String>,
}

impl LineProducer {
  /// Reads lines from `reader`, skipping lines that are not UTF-8.
  pub fn new<R>(reader: R) -> Self
  where
    R: AsyncRead + Send + Unpin + 'static,
  {
    Self {
      reader: Some(Box::new(reader)),
      config: ProducerConfig::default().with_error_strategy(ErrorStrategy::Skip),
    }
  }

  /// Reads lines from standard input.
  pub fn stdin() -> Self {
    Self::new(tokio::io::stdin()).with_name("stdin".to_string())
  }

  /// Reads lines from the file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    Ok(Self::new(file).with_name(path.display().to_string()))
  }

  /// Sets how lines that are not UTF-8 are handled.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<String>) -> Self {
    self.config.error_strategy = strategy;
    self
  }

  /// Sets the name for this producer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }
}

impl Output for LineProducer {
  type Output = String;
  type OutputStream = Pin<Box<dyn Stream<Item = String> + Send>>;
}

impl Producer for LineProducer {
  fn produce(&mut self) -> Self::OutputStream {
    let component = self.component_info();
    let strategy = self.config.error_strategy();

    let Some(reader) = self.reader.take() else {
      tracing::warn!(
        component = %component.name,
        "Reader already consumed, producing nothing"
      );
      return Box::pin(stream::empty());
    };

    Box::pin(async_stream::stream! {
      let mut segments = BufReader::new(reader).split(b'\n');

      loop {
        let mut bytes = match segments.next_segment().await {
          Ok(Some(bytes)) => bytes,
          Ok(None) => break,
          Err(e) => {
            tracing::warn!(
              component = %component.name,
              error = %e,
              "Failed to read line, stopping"
            );
            break;
          }
        };
        if bytes.last() == Some(&b'\r') {
          bytes.pop();
        }

        let line = match String::from_utf8(bytes) {
          Ok(line) => line,
          Err(e) => {
            let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
            tracing::warn!(
              component = %component.name,
              error = %e,
              input = %lossy,
              "Line is not valid UTF-8"
            );
            let error = StreamError::new(
              Box::new(e),
              ErrorContext {
                timestamp: chrono::Utc::now(),
                item: Some(lossy),
                component_name: component.name.clone(),
                component_type: component.type_name.clone(),
              },
              component.clone(),
            );
            match strategy.action_for(&error) {
              ErrorAction::Stop => break,
              ErrorAction::Skip | ErrorAction::Retry => continue,
            }
          }
        };

        if line.trim().is_empty() {
          continue;
        }
        yield line;
      }
    })
  }

  fn set_config_impl(&mut self, config: ProducerConfig<String>) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &ProducerConfig<String> {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut ProducerConfig<String> {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config
        .name()
        .unwrap_or_else(|| "line_producer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
