//! # Producer Trait
//!
//! A [`Producer`] is the head of a pipeline: it yields the raw transport
//! records (one text line per message) that the decode stage consumes.
//! Producers carry a [`ProducerConfig`] with a name and an error strategy.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use crate::output::Output;

/// Configuration for producers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerConfig<M> {
  /// The error handling strategy to use when errors occur.
  pub error_strategy: ErrorStrategy<M>,
  /// Optional name for identifying this producer in logs.
  pub name: Option<String>,
}

impl<M> Default for ProducerConfig<M> {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: None,
    }
  }
}

impl<M> ProducerConfig<M> {
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

/// A component that yields a stream of items.
pub trait Producer: Output {
  /// Starts producing. Called once per pipeline run.
  fn produce(&mut self) -> Self::OutputStream;

  /// Replaces the configuration.
  fn set_config(&mut self, config: ProducerConfig<Self::Output>) {
    self.set_config_impl(config);
  }

  /// Returns the configuration.
  fn config(&self) -> &ProducerConfig<Self::Output> {
    self.get_config_impl()
  }

  /// Returns the configuration mutably.
  fn config_mut(&mut self) -> &mut ProducerConfig<Self::Output> {
    self.get_config_mut_impl()
  }

  /// Decides what to do about `error` according to the configured strategy.
  fn handle_error(&self, error: &StreamError<Self::Output>) -> ErrorAction {
    self.config().error_strategy.action_for(error)
  }

  /// Builds an error context for `item`.
  fn create_error_context(&self, item: Option<Self::Output>) -> ErrorContext<Self::Output> {
    let info = self.component_info();
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item,
      component_name: info.name,
      component_type: info.type_name,
    }
  }

  /// Name and type of this producer.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config()
        .name()
        .unwrap_or_else(|| "producer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  #[doc(hidden)]
  fn set_config_impl(&mut self, config: ProducerConfig<Self::Output>);

  #[doc(hidden)]
  fn get_config_impl(&self) -> &ProducerConfig<Self::Output>;

  #[doc(hidden)]
  fn get_config_mut_impl(&mut self) -> &mut ProducerConfig<Self::Output>;
}
