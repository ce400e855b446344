//! Decode stage: raw transport records in, [`Reading`]s out.
//!
//! A record that cannot be decoded is logged and handed to the configured
//! [`ErrorStrategy`]. The default is [`ErrorStrategy::Skip`], so one corrupt
//! message never stalls or ends the window downstream.

use crate::decoder::{MissingValuesPolicy, decode_with};
use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use crate::reading::Reading;
use crate::{Input, Output, Transformer, TransformerConfig};
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Decodes JSON text records into readings.
#[derive(Debug, Clone)]
pub struct DecodeTransformer {
  config: TransformerConfig<String>,
  missing_values: MissingValuesPolicy,
}

impl DecodeTransformer {
  /// Creates a decode stage that skips bad records and folds records without
  /// `data` as empty readings.
  pub fn new() -> Self {
    Self {
      config: TransformerConfig::default().with_error_strategy(ErrorStrategy::Skip),
      missing_values: MissingValuesPolicy::default(),
    }
  }

  /// Sets how records without a `data` field are handled.
  pub fn with_missing_values(mut self, policy: MissingValuesPolicy) -> Self {
    self.missing_values = policy;
    self
  }

  /// Sets the error handling strategy for this transformer.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<String>) -> Self {
    self.config.error_strategy = strategy;
    self
  }

  /// Sets the name for this transformer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }

  /// Returns the missing-values policy.
  pub fn missing_values(&self) -> MissingValuesPolicy {
    self.missing_values
  }
}

impl Default for DecodeTransformer {
  fn default() -> Self {
    Self::new()
  }
}

impl Input for DecodeTransformer {
  type Input = String;
  type InputStream = Pin<Box<dyn Stream<Item = String> + Send>>;
}

impl Output for DecodeTransformer {
  type Output = Reading;
  type OutputStream = Pin<Box<dyn Stream<Item = Reading> + Send>>;
}

impl Transformer for DecodeTransformer {
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let component = self.component_info();
    let strategy = self.config.error_strategy();
    let policy = self.missing_values;

    Box::pin(async_stream::stream! {
      let mut input = input;

      while let Some(raw) = input.next().await {
        match decode_with(&raw, policy) {
          Ok(reading) => yield reading,
          Err(e) => {
            tracing::warn!(
              component = %component.name,
              error = %e,
              input = %raw,
              "Failed to decode record"
            );
            let error = StreamError::new(
              Box::new(e),
              ErrorContext {
                timestamp: chrono::Utc::now(),
                item: Some(raw),
                component_name: component.name.clone(),
                component_type: component.type_name.clone(),
              },
              component.clone(),
            );
            match strategy.action_for(&error) {
              ErrorAction::Stop => {
                tracing::warn!(
                  component = %component.name,
                  "Stopping decode stage after bad record"
                );
                break;
              }
              // Decoding is deterministic, so a retry is a skip.
              ErrorAction::Skip | ErrorAction::Retry => continue,
            }
          }
        }
      }
    })
  }

  fn set_config_impl(&mut self, config: TransformerConfig<String>) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig<String> {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig<String> {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config
        .name()
        .unwrap_or_else(|| "decode_transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
