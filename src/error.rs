//! # Error Handling
//!
//! Error types for the aggregation stages and the strategy machinery that
//! decides what a stage does when a single record goes wrong.
//!
//! ## Overview
//!
//! Two layers of errors exist:
//!
//! - **Domain errors** ([`DecodeError`], [`ConfigError`], [`WindowError`]) describe
//!   what went wrong with one record or one configuration value.
//! - **Stage errors** ([`StreamError`]) wrap a domain error together with an
//!   [`ErrorContext`] (when, which item) and a [`ComponentInfo`] (which stage).
//!
//! An [`ErrorStrategy`] configured on each stage maps a [`StreamError`] to an
//! [`ErrorAction`]:
//!
//! - **Stop**: end the stage's output stream
//! - **Skip**: drop the offending item and keep going
//! - **Retry(n)**: retry up to `n` times (only meaningful for fallible sinks)
//! - **Custom**: user-defined handler
//!
//! ## Example
//!
//! ```rust
//! use iotagg::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
//! use iotagg::decoder::decode;
//!
//! let strategy: ErrorStrategy<String> = ErrorStrategy::Skip;
//! let raw = "not json".to_string();
//! let source = decode(&raw).unwrap_err();
//! let error = StreamError::new(
//!   Box::new(source),
//!   ErrorContext {
//!     timestamp: chrono::Utc::now(),
//!     item: Some(raw),
//!     component_name: "decode".to_string(),
//!     component_type: "DecodeTransformer".to_string(),
//!   },
//!   ComponentInfo::new("decode".to_string(), "DecodeTransformer".to_string()),
//! );
//! assert_eq!(strategy.action_for(&error), ErrorAction::Skip);
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure to turn one transport record into a [`Reading`](crate::reading::Reading).
#[derive(Error, Debug)]
pub enum DecodeError {
  /// The record is not JSON, not an object, or a field has the wrong type.
  #[error("malformed record: {0}")]
  Malformed(#[from] serde_json::Error),
  /// The record parsed but carries no `data` object.
  #[error("record has no `data` field")]
  MissingValues,
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
  /// The configuration file could not be read.
  #[error("failed to read config {path}: {source}")]
  Io {
    /// Path that was being read.
    path: String,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },
  /// The configuration text is not valid JSON for [`AggregatorConfig`](crate::config::AggregatorConfig).
  #[error("failed to parse config: {0}")]
  Parse(#[from] serde_json::Error),
  /// A window would never close.
  #[error("invalid window: {0}")]
  InvalidWindow(String),
  /// A window stage rejected its boundary.
  #[error(transparent)]
  Window(#[from] WindowError),
}

/// Errors raised while constructing window stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
  /// Count windows need at least one arrival to close.
  #[error("window count must be greater than 0")]
  ZeroCount,
  /// Time windows need a non-zero interval.
  #[error("window interval must be greater than 0")]
  ZeroInterval,
}

/// Action to take when an error occurs in a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
  /// Stop processing immediately.
  Stop,
  /// Drop the item that caused the error and continue.
  Skip,
  /// Retry the operation that caused the error.
  Retry,
}

type CustomErrorHandler<T> = Arc<dyn Fn(&StreamError<T>) -> ErrorAction + Send + Sync>;

/// Strategy for handling errors in a stage.
pub enum ErrorStrategy<T> {
  /// Stop processing at the first error.
  Stop,
  /// Skip items that cause errors.
  Skip,
  /// Retry failed operations up to the given number of times, then stop.
  Retry(usize),
  /// Custom error handling logic.
  Custom(CustomErrorHandler<T>),
}

impl<T> Clone for ErrorStrategy<T> {
  fn clone(&self) -> Self {
    match self {
      ErrorStrategy::Stop => ErrorStrategy::Stop,
      ErrorStrategy::Skip => ErrorStrategy::Skip,
      ErrorStrategy::Retry(n) => ErrorStrategy::Retry(*n),
      ErrorStrategy::Custom(handler) => ErrorStrategy::Custom(handler.clone()),
    }
  }
}

impl<T> fmt::Debug for ErrorStrategy<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorStrategy::Stop => write!(f, "ErrorStrategy::Stop"),
      ErrorStrategy::Skip => write!(f, "ErrorStrategy::Skip"),
      ErrorStrategy::Retry(n) => write!(f, "ErrorStrategy::Retry({})", n),
      ErrorStrategy::Custom(_) => write!(f, "ErrorStrategy::Custom"),
    }
  }
}

impl<T> PartialEq for ErrorStrategy<T> {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (ErrorStrategy::Stop, ErrorStrategy::Stop) => true,
      (ErrorStrategy::Skip, ErrorStrategy::Skip) => true,
      (ErrorStrategy::Retry(n1), ErrorStrategy::Retry(n2)) => n1 == n2,
      (ErrorStrategy::Custom(_), ErrorStrategy::Custom(_)) => true,
      _ => false,
    }
  }
}

impl<T> ErrorStrategy<T> {
  /// Creates a custom error handling strategy.
  pub fn new_custom<F>(f: F) -> Self
  where
    F: Fn(&StreamError<T>) -> ErrorAction + Send + Sync + 'static,
  {
    Self::Custom(Arc::new(f))
  }

  /// Decides the action for `error` under this strategy.
  pub fn action_for(&self, error: &StreamError<T>) -> ErrorAction {
    match self {
      ErrorStrategy::Stop => ErrorAction::Stop,
      ErrorStrategy::Skip => ErrorAction::Skip,
      ErrorStrategy::Retry(n) if error.retries < *n => ErrorAction::Retry,
      ErrorStrategy::Retry(_) => ErrorAction::Stop,
      ErrorStrategy::Custom(handler) => handler(error),
    }
  }
}

/// Error that occurred while a stage processed one item.
///
/// # Fields
///
/// * `source` - The domain error
/// * `context` - When it happened and which item triggered it
/// * `component` - The stage that hit it
/// * `retries` - How many times the operation has been retried
#[derive(Debug)]
pub struct StreamError<T> {
  /// The original error that occurred.
  pub source: Box<dyn Error + Send + Sync>,
  /// Context about when and where the error occurred.
  pub context: ErrorContext<T>,
  /// Information about the component that encountered the error.
  pub component: ComponentInfo,
  /// Number of times this error has been retried.
  pub retries: usize,
}

impl<T: Clone> Clone for StreamError<T> {
  fn clone(&self) -> Self {
    Self {
      source: Box::new(StringError(self.source.to_string())),
      context: self.context.clone(),
      component: self.component.clone(),
      retries: self.retries,
    }
  }
}

/// An error that is only a message, used when cloning a [`StreamError`].
#[derive(Debug)]
pub struct StringError(pub String);

impl fmt::Display for StringError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Error for StringError {}

impl<T> StreamError<T> {
  /// Creates a new `StreamError` with `retries` set to 0.
  pub fn new(
    source: Box<dyn Error + Send + Sync>,
    context: ErrorContext<T>,
    component: ComponentInfo,
  ) -> Self {
    Self {
      source,
      context,
      component,
      retries: 0,
    }
  }
}

impl<T> fmt::Display for StreamError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Error in {} ({}): {}",
      self.component.name, self.component.type_name, self.source
    )
  }
}

impl<T: fmt::Debug> Error for StreamError<T> {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.source.as_ref())
  }
}

/// When and on which item an error occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext<T> {
  /// When the error occurred.
  pub timestamp: chrono::DateTime<chrono::Utc>,
  /// The item being processed, if any.
  pub item: Option<T>,
  /// Name of the stage.
  pub component_name: String,
  /// Type name of the stage.
  pub component_type: String,
}

impl<T> Default for ErrorContext<T> {
  fn default() -> Self {
    Self {
      timestamp: chrono::Utc::now(),
      item: None,
      component_name: "default".to_string(),
      component_type: "default".to_string(),
    }
  }
}

/// Name and type of a stage, for error reports and log fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
  /// Configured stage name.
  pub name: String,
  /// Rust type name of the stage.
  pub type_name: String,
}

impl Default for ComponentInfo {
  fn default() -> Self {
    Self {
      name: "default".to_string(),
      type_name: "default".to_string(),
    }
  }
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo`.
  pub fn new(name: String, type_name: String) -> Self {
    Self { name, type_name }
  }
}
