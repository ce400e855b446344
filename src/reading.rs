//! Sensor readings as decoded from the inbound stream.

use std::collections::{BTreeMap, BTreeSet};

/// One device's sensor values at one tick.
///
/// Readings are immutable once decoded and are folded exactly once into a
/// window. `values` is ordered by sensor code so fan-out and encoding are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reading {
  /// Reporting device.
  pub device_id: String,
  /// Processing chain the device belongs to.
  pub chain_id: String,
  /// Aggregate functions requested by the device (e.g. `min`, `max`).
  pub functions: BTreeSet<String>,
  /// Sensor code to measured value.
  pub values: BTreeMap<String, i64>,
  /// Device-side timestamp.
  pub timestamp: Option<i64>,
}

impl Reading {
  /// Creates a reading for `device_id` / `chain_id` with the given values.
  pub fn new<I, K>(device_id: impl Into<String>, chain_id: impl Into<String>, values: I) -> Self
  where
    I: IntoIterator<Item = (K, i64)>,
    K: Into<String>,
  {
    Self {
      device_id: device_id.into(),
      chain_id: chain_id.into(),
      functions: BTreeSet::new(),
      values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
      timestamp: None,
    }
  }

  /// Sets the device-side timestamp.
  pub fn with_timestamp(mut self, timestamp: i64) -> Self {
    self.timestamp = Some(timestamp);
    self
  }

  /// Returns true if the reading carries no sensor values.
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// One `(sensor_code, value)` pair fanned out of a [`Reading`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSample {
  /// Sensor code the value was reported under.
  pub sensor_code: String,
  /// Measured value.
  pub value: i64,
}

impl SensorSample {
  /// Creates a sample.
  pub fn new(sensor_code: impl Into<String>, value: i64) -> Self {
    Self {
      sensor_code: sensor_code.into(),
      value,
    }
  }
}

/// Expands a reading into one sample per sensor value, in sensor code order.
///
/// Device, chain and timestamp context does not survive the fan-out.
pub fn explode(reading: Reading) -> impl Iterator<Item = SensorSample> {
  reading
    .values
    .into_iter()
    .map(|(sensor_code, value)| SensorSample { sensor_code, value })
}
