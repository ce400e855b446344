//! # Consumer Trait
//!
//! A [`Consumer`] drains the final stream of a pipeline into a sink: the
//! outbound record stream, a file, or a `Vec` in tests.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use crate::input::Input;
use async_trait::async_trait;

/// Configuration for consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerConfig<M> {
  /// The error handling strategy to use when a write fails.
  pub error_strategy: ErrorStrategy<M>,
  /// Name for identifying this consumer in logs.
  pub name: String,
}

impl<M> Default for ConsumerConfig<M> {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: String::new(),
    }
  }
}

impl<M> ConsumerConfig<M> {
  /// Sets the error handling strategy.
  #[must_use]
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<M>) -> Self {
    self.error_strategy = strategy;
    self
  }

  /// Sets the name.
  #[must_use]
  pub fn with_name(mut self, name: String) -> Self {
    self.name = name;
    self
  }

  /// Returns the current error handling strategy.
  pub fn error_strategy(&self) -> ErrorStrategy<M> {
    self.error_strategy.clone()
  }

  /// Returns the name.
  pub fn name(&self) -> &str {
    &self.name
  }
}

/// A component that drains a stream.
#[async_trait]
pub trait Consumer: Input {
  /// Consumes the whole stream.
  async fn consume(&mut self, stream: Self::InputStream);

  /// Replaces the configuration.
  fn set_config(&mut self, config: ConsumerConfig<Self::Input>) {
    self.set_config_impl(config);
  }

  /// Returns the configuration.
  fn config(&self) -> &ConsumerConfig<Self::Input> {
    self.get_config_impl()
  }

  /// Returns the configuration mutably.
  fn config_mut(&mut self) -> &mut ConsumerConfig<Self::Input> {
    self.get_config_mut_impl()
  }

  /// Decides what to do about `error` according to the configured strategy.
  fn handle_error(&self, error: &StreamError<Self::Input>) -> ErrorAction {
    self.config().error_strategy.action_for(error)
  }

  /// Name and type of this consumer.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self.config().name.clone(),
      type_name: std::any::type_name::<Self>().to_string(),
    }
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

  #[doc(hidden)]
  fn set_config_impl(&mut self, config: ConsumerConfig<Self::Input>);
  #[doc(hidden)]
  fn get_config_impl(&self) -> &ConsumerConfig<Self::Input>;
  #[doc(hidden)]
  fn get_config_mut_impl(&mut self) -> &mut ConsumerConfig<Self::Input>;
}
