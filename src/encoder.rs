//! Transport record encoding.
//!
//! Min/max windows encode as
//!
//! ```text
//! {"chainid":"c1","deviceid":"d1","newts":1556450160000,"result":{"max_T1":40,"min_T1":35}}
//! ```
//!
//! and keyed count windows as one record per sensor code:
//!
//! ```text
//! {"MAX_T1":22,"MIN_T1":1,"SUM_T1":23}
//! ```

use crate::aggregate::Aggregate;
use crate::keyed_stat::KeyedStat;
use serde_json::{Map, Value, json};

/// Prefix of the per-code minimum in a min/max record.
pub const MIN_PREFIX: &str = "min_";
/// Prefix of the per-code maximum in a min/max record.
pub const MAX_PREFIX: &str = "max_";
/// Prefix of the per-code sum in a keyed stat record.
pub const SUM_KEY_PREFIX: &str = "SUM_";
/// Prefix of the per-code maximum in a keyed stat record.
pub const MAX_KEY_PREFIX: &str = "MAX_";
/// Prefix of the per-code minimum in a keyed stat record.
pub const MIN_KEY_PREFIX: &str = "MIN_";

/// A sealed window result that can be written as one transport record.
pub trait Encode {
  /// Encodes `self` as one JSON text record.
  fn encode(&self) -> String;
}

impl Encode for Aggregate {
  fn encode(&self) -> String {
    let mut result = Map::new();
    for (code, extremes) in &self.results {
      debug_assert!(
        extremes.min <= extremes.max,
        "min above max for sensor {code}"
      );
      result.insert(format!("{MIN_PREFIX}{code}"), Value::from(extremes.min));
      result.insert(format!("{MAX_PREFIX}{code}"), Value::from(extremes.max));
    }
    json!({
      "deviceid": self.device_id,
      "chainid": self.chain_id,
      "newts": self.emitted_at,
      "result": result,
    })
    .to_string()
  }
}

impl Encode for KeyedStat {
  fn encode(&self) -> String {
    debug_assert!(
      self.min <= self.max,
      "min above max for sensor {}",
      self.sensor_code
    );
    let code = &self.sensor_code;
    let mut record = Map::new();
    record.insert(format!("{SUM_KEY_PREFIX}{code}"), Value::from(self.sum));
    record.insert(format!("{MAX_KEY_PREFIX}{code}"), Value::from(self.max));
    record.insert(format!("{MIN_KEY_PREFIX}{code}"), Value::from(self.min));
    Value::Object(record).to_string()
  }
}

/// Encodes any sealed window result.
pub fn encode<T: Encode + ?Sized>(record: &T) -> String {
  record.encode()
}
