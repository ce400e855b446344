//! Per-sensor count windows.
//!
//! Readings are fanned out into [`SensorSample`]s, samples are grouped by
//! sensor code, and each code keeps its own tumbling window of a fixed number
//! of arrivals. When a code's window fills, its [`KeyedStat`] is emitted and
//! the code starts over with no memory of the previous window. Codes close
//! independently of each other.

use crate::error::WindowError;
use crate::reading::SensorSample;
use std::collections::HashMap;

/// Running sum and extremes of one sensor code within one count window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedStat {
  /// Sensor code this window belongs to.
  pub sensor_code: String,
  /// Sum of the values seen. Wraps on `i64` overflow.
  pub sum: i64,
  /// Largest value seen.
  pub max: i64,
  /// Smallest value seen.
  pub min: i64,
  /// Number of values seen.
  pub count: usize,
}

impl KeyedStat {
  /// Opens a window from the first sample of a code.
  pub fn open(sample: SensorSample) -> Self {
    Self {
      sensor_code: sample.sensor_code,
      sum: sample.value,
      max: sample.value,
      min: sample.value,
      count: 1,
    }
  }

  /// Folds one more value in. Ties with an extremum keep it unchanged.
  #[must_use]
  pub fn fold(mut self, value: i64) -> Self {
    self.sum = self.sum.wrapping_add(value);
    if value > self.max {
      self.max = value;
    } else if value < self.min {
      self.min = value;
    }
    self.count += 1;
    self
  }

  /// Integer mean of the values seen, rounded toward zero.
  pub fn mean(&self) -> i64 {
    // count is at least 1 for every constructed stat
    self.sum / self.count.max(1) as i64
  }
}

/// Open count windows for every sensor code currently accumulating.
#[derive(Debug, Clone)]
pub struct CountWindows {
  size: usize,
  open: HashMap<String, KeyedStat>,
}

impl CountWindows {
  /// Creates windows that close after `size` arrivals per code.
  pub fn new(size: usize) -> Result<Self, WindowError> {
    if size == 0 {
      return Err(WindowError::ZeroCount);
    }
    Ok(Self {
      size,
      open: HashMap::new(),
    })
  }

  /// Arrivals per window.
  pub fn size(&self) -> usize {
    self.size
  }

  /// Adds a sample, returning the code's stat if this arrival closed its window.
  pub fn push(&mut self, sample: SensorSample) -> Option<KeyedStat> {
    let stat = match self.open.remove(&sample.sensor_code) {
      Some(stat) => stat.fold(sample.value),
      None => KeyedStat::open(sample),
    };
    if stat.count >= self.size {
      Some(stat)
    } else {
      self.open.insert(stat.sensor_code.clone(), stat);
      None
    }
  }

  /// Number of codes with a partially filled window.
  pub fn pending(&self) -> usize {
    self.open.len()
  }

  /// Drops every partially filled window, returning how many were dropped.
  pub fn discard(&mut self) -> usize {
    let dropped = self.open.len();
    self.open.clear();
    dropped
  }
}
