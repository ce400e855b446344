//! # Transformer Trait
//!
//! A [`Transformer`] turns one stream into another. Every aggregation stage is
//! a transformer: decoding text into readings, folding readings into windows,
//! encoding sealed windows back into text.
//!
//! ## Example
//!
//! ```rust
//! use futures::{StreamExt, stream};
//! use iotagg::transformer::Transformer;
//! use iotagg::transformers::DecodeTransformer;
//!
//! # async fn example() {
//! let mut decode = DecodeTransformer::new();
//! let input = Box::pin(stream::iter(vec![
//!   r#"{"deviceid":"d1","chainid":"c1","data":{"T1":35}}"#.to_string(),
//! ]));
//! let readings: Vec<_> = decode.transform(input).collect().await;
//! assert_eq!(readings[0].values["T1"], 35);
//! # }
//! ```
//!
//! The stream returned by `transform` is lazy: no work happens until the
//! downstream consumer polls it, so building a pipeline never blocks.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use crate::{input::Input, output::Output};

/// Configuration for transformers, including error handling strategy and naming.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformerConfig<M> {
  /// The error handling strategy to use when errors occur.
  pub error_strategy: ErrorStrategy<M>,
  /// Optional name for identifying this transformer in logs.
  pub name: Option<String>,
}

impl<M> Default for TransformerConfig<M> {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: None,
    }
  }
}

impl<M> TransformerConfig<M> {
  /// Sets the error handling strategy.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<M>) -> Self {
    self.error_strategy = strategy;
    self
  }

  /// Sets the name.
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Returns the current error handling strategy.
  pub fn error_strategy(&self) -> ErrorStrategy<M> {
    self.error_strategy.clone()
  }

  /// Returns the current name, if set.
  pub fn name(&self) -> Option<String> {
    self.name.clone()
  }
}

/// A component that transforms one stream into another.
pub trait Transformer: Input + Output {
  /// Wraps `input` into this stage's output stream.
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream;

  /// Replaces the configuration.
  fn set_config(&mut self, config: TransformerConfig<Self::Input>) {
    self.set_config_impl(config);
  }

  /// Returns the configuration.
  fn config(&self) -> &TransformerConfig<Self::Input> {
    self.get_config_impl()
  }

  /// Returns the configuration mutably.
  fn config_mut(&mut self) -> &mut TransformerConfig<Self::Input> {
    self.get_config_mut_impl()
  }

  /// Decides what to do about `error` according to the configured strategy.
  fn handle_error(&self, error: &StreamError<Self::Input>) -> ErrorAction {
    self.config().error_strategy.action_for(error)
  }

  /// Builds an error context for `item`.
  fn create_error_context(&self, item: Option<Self::Input>) -> ErrorContext<Self::Input> {
    let info = self.component_info();
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item,
      component_name: info.name,
      component_type: info.type_name,
    }
  }

  /// Name and type of this transformer.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config()
        .name()
        .unwrap_or_else(|| "transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  #[doc(hidden)]
  fn set_config_impl(&mut self, config: TransformerConfig<Self::Input>);

  #[doc(hidden)]
  fn get_config_impl(&self) -> &TransformerConfig<Self::Input>;

  #[doc(hidden)]
  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig<Self::Input>;
}
