//! Encode stage: sealed window results in, one JSON text record each out.
//!
//! Works for any [`Encode`] type, so the same stage closes both the min/max
//! and the keyed stats pipelines.

use crate::encoder::Encode;
use crate::error::ComponentInfo;
use crate::{Input, Output, Transformer, TransformerConfig};
use futures::{Stream, StreamExt};
use std::marker::PhantomData;
use std::pin::Pin;

/// Encodes sealed window results into transport records, one per item.
#[derive(Debug, Clone)]
pub struct EncodeTransformer<T>
where
  T: Encode + std::fmt::Debug + Clone + Send + Sync + 'static,
{
  config: TransformerConfig<T>,
  _phantom: PhantomData<T>,
}

impl<T> EncodeTransformer<T>
where
  T: Encode + std::fmt::Debug + Clone + Send + Sync + 'static,
{
  /// Creates a new `EncodeTransformer`.
  pub fn new() -> Self {
    Self {
      config: TransformerConfig::default(),
      _phantom: PhantomData,
    }
  }

  /// Sets the name for this transformer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }
}

impl<T> Default for EncodeTransformer<T>
where
  T: Encode + std::fmt::Debug + Clone + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Input for EncodeTransformer<T>
where
  T: Encode + std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;
  type InputStream = Pin<Box<dyn Stream<Item = T> + Send>>;
}

impl<T> Output for EncodeTransformer<T>
where
  T: Encode + std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = String;
  type OutputStream = Pin<Box<dyn Stream<Item = String> + Send>>;
}

impl<T> Transformer for EncodeTransformer<T>
where
  T: Encode + std::fmt::Debug + Clone + Send + Sync + 'static,
{
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    Box::pin(input.map(|record| record.encode()))
  }

  fn set_config_impl(&mut self, config: TransformerConfig<T>) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig<T> {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig<T> {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config
        .name()
        .unwrap_or_else(|| "encode_transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
