//! Keyed count window stage: readings in, one [`KeyedStat`] per sensor code
//! per filled window out.

use crate::error::{ComponentInfo, WindowError};
use crate::keyed_stat::{CountWindows, KeyedStat};
use crate::reading::{Reading, explode};
use crate::{Input, Output, Transformer, TransformerConfig};
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Fans readings out per sensor code and emits sum/max/min every `size`
/// arrivals of each code.
///
/// Partially filled windows are dropped when the input ends.
#[derive(Debug, Clone)]
pub struct KeyedStatsTransformer {
  windows: CountWindows,
  config: TransformerConfig<Reading>,
}

impl KeyedStatsTransformer {
  /// Creates a stage whose windows close after `size` arrivals per code.
  pub fn new(size: usize) -> Result<Self, WindowError> {
    Ok(Self {
      windows: CountWindows::new(size)?,
      config: TransformerConfig::default(),
    })
  }

  /// Arrivals per window.
  pub fn size(&self) -> usize {
    self.windows.size()
  }

  /// Sets the name for this transformer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }
}

impl Input for KeyedStatsTransformer {
  type Input = Reading;
  type InputStream = Pin<Box<dyn Stream<Item = Reading> + Send>>;
}

impl Output for KeyedStatsTransformer {
  type Output = KeyedStat;
  type OutputStream = Pin<Box<dyn Stream<Item = KeyedStat> + Send>>;
}

impl Transformer for KeyedStatsTransformer {
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let mut windows = self.windows.clone();
    let component = self.component_info().name;

    Box::pin(async_stream::stream! {
      let mut input = input;

      while let Some(reading) = input.next().await {
        for sample in explode(reading) {
          if let Some(stat) = windows.push(sample) {
            tracing::debug!(
              component = %component,
              sensor_code = %stat.sensor_code,
              "Sealing count window"
            );
            yield stat;
          }
        }
      }

      let dropped = windows.discard();
      if dropped > 0 {
        tracing::debug!(
          component = %component,
          dropped,
          "Discarding partially filled count windows at end of input"
        );
      }
    })
  }

  fn set_config_impl(&mut self, config: TransformerConfig<Reading>) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig<Reading> {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig<Reading> {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config
        .name()
        .unwrap_or_else(|| "keyed_stats_transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
