//! Min/max window stage: readings in, one [`Aggregate`] per window out.
//!
//! Windows are tumbling and seal either on a processing-time interval or after
//! a fixed number of readings. Time windows are aligned to the epoch: with a
//! 60 second interval every seal falls on a whole minute of the clock, however
//! mid-minute the stage was started. Each reading is folded into the open window as
//! it arrives; nothing is buffered. A window that saw no readings emits
//! nothing, and the open window is sealed when the input ends.

use crate::aggregate::{Aggregate, WindowState};
use crate::config::WindowBoundary;
use crate::error::{ComponentInfo, WindowError};
use crate::reading::Reading;
use crate::{Input, Output, Transformer, TransformerConfig};
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Source of the processing time stamped on every fold, in ms since the epoch.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

fn wall_clock() -> Clock {
  Arc::new(|| chrono::Utc::now().timestamp_millis())
}

/// Time from `now_ms` (ms since the epoch) to the next multiple of `period`.
///
/// A `now_ms` exactly on a boundary waits a full period.
pub(crate) fn until_next_boundary(now_ms: i64, period: Duration) -> Duration {
  let period_ms = period.as_millis();
  if period_ms == 0 {
    return period;
  }
  let into = i128::from(now_ms).rem_euclid(period_ms as i128) as u128;
  let remaining = period_ms - into;
  Duration::from_millis(u64::try_from(remaining).unwrap_or(u64::MAX))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seal {
  Every(Duration),
  After(usize),
}

enum Event {
  Tick,
  Item(Option<Reading>),
}

/// Folds readings into tumbling min/max windows.
#[derive(Clone)]
pub struct MinMaxWindowTransformer {
  seal: Seal,
  clock: Clock,
  config: TransformerConfig<Reading>,
}

impl fmt::Debug for MinMaxWindowTransformer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MinMaxWindowTransformer")
      .field("seal", &self.seal)
      .field("config", &self.config)
      .finish()
  }
}

impl MinMaxWindowTransformer {
  /// Windows that seal every `period` of processing time, on multiples of
  /// `period` since the epoch as read from the clock.
  pub fn time(period: Duration) -> Result<Self, WindowError> {
    if period.is_zero() {
      return Err(WindowError::ZeroInterval);
    }
    Ok(Self::with_seal(Seal::Every(period)))
  }

  /// Windows that seal after `size` readings.
  pub fn count(size: usize) -> Result<Self, WindowError> {
    if size == 0 {
      return Err(WindowError::ZeroCount);
    }
    Ok(Self::with_seal(Seal::After(size)))
  }

  /// Windows per a configured boundary.
  pub fn new(boundary: WindowBoundary) -> Result<Self, WindowError> {
    match boundary {
      WindowBoundary::Time { secs } => Self::time(Duration::from_secs(secs)),
      WindowBoundary::Count { size } => Self::count(size),
    }
  }

  fn with_seal(seal: Seal) -> Self {
    Self {
      seal,
      clock: wall_clock(),
      config: TransformerConfig::default(),
    }
  }

  /// Replaces the processing-time clock.
  pub fn with_clock<F>(mut self, clock: F) -> Self
  where
    F: Fn() -> i64 + Send + Sync + 'static,
  {
    self.clock = Arc::new(clock);
    self
  }

  /// Sets the name for this transformer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }
}

impl Input for MinMaxWindowTransformer {
  type Input = Reading;
  type InputStream = Pin<Box<dyn Stream<Item = Reading> + Send>>;
}

impl Output for MinMaxWindowTransformer {
  type Output = Aggregate;
  type OutputStream = Pin<Box<dyn Stream<Item = Aggregate> + Send>>;
}

impl Transformer for MinMaxWindowTransformer {
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let clock = self.clock.clone();
    let component = self.component_info().name;

    match self.seal {
      Seal::Every(period) => Box::pin(async_stream::stream! {
        let mut input = input;
        let mut window = WindowState::Empty;
        let first_seal = Instant::now() + until_next_boundary(clock(), period);
        let mut ticker = interval_at(first_seal, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
          let event = tokio::select! {
            _ = ticker.tick() => Event::Tick,
            item = input.next() => Event::Item(item),
          };

          match event {
            Event::Tick => {
              let folds = window.folds();
              if let Some(aggregate) = std::mem::take(&mut window).seal() {
                tracing::debug!(component = %component, folds, "Sealing min/max window");
                yield aggregate;
              }
            }
            Event::Item(Some(reading)) => {
              window = std::mem::take(&mut window).fold(&reading, clock());
            }
            Event::Item(None) => {
              if let Some(aggregate) = std::mem::take(&mut window).seal() {
                tracing::debug!(component = %component, "Sealing final min/max window at end of input");
                yield aggregate;
              }
              break;
            }
          }
        }
      }),
      Seal::After(size) => Box::pin(async_stream::stream! {
        let mut input = input;
        let mut window = WindowState::Empty;

        while let Some(reading) = input.next().await {
          window = std::mem::take(&mut window).fold(&reading, clock());
          if window.folds() >= size {
            if let Some(aggregate) = std::mem::take(&mut window).seal() {
              tracing::debug!(component = %component, folds = size, "Sealing min/max window");
              yield aggregate;
            }
          }
        }

        if let Some(aggregate) = window.seal() {
          tracing::debug!(component = %component, "Sealing final min/max window at end of input");
          yield aggregate;
        }
      }),
    }
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
        .unwrap_or_else(|| "min_max_window_transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
