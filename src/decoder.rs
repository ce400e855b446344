//! Transport record decoding.
//!
//! Inbound records are single JSON objects:
//!
//! ```text
//! {"deviceid":"xxx","chainid":"yyy","func":["min","max"],"data":{"T1031":35,"T1032":55},"ts":234843}
//! ```
//!
//! A null `deviceid`, `chainid` or `func` reads the same as an absent one.
//!
//! [`decode`] is strict: a record without `data` is a [`DecodeError::MissingValues`].
//! Whether such a record is dropped or folded as an empty reading is decided by
//! the decode stage's [`MissingValuesPolicy`].

use crate::error::DecodeError;
use crate::reading::Reading;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What the decode stage does with records that have no `data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuesPolicy {
  /// Fold the record as a reading with no values.
  #[default]
  TreatAsEmpty,
  /// Drop the record as a decode failure.
  Reject,
}

#[derive(Deserialize)]
struct WireReading {
  #[serde(rename = "deviceid", default)]
  device_id: Option<String>,
  #[serde(rename = "chainid", default)]
  chain_id: Option<String>,
  #[serde(rename = "func", default)]
  functions: Option<BTreeSet<String>>,
  #[serde(rename = "data", default)]
  values: Option<BTreeMap<String, i64>>,
  #[serde(rename = "ts", default)]
  timestamp: Option<i64>,
}

impl WireReading {
  fn into_reading(self, policy: MissingValuesPolicy) -> Result<Reading, DecodeError> {
    let values = match (self.values, policy) {
      (Some(values), _) => values,
      (None, MissingValuesPolicy::TreatAsEmpty) => BTreeMap::new(),
      (None, MissingValuesPolicy::Reject) => return Err(DecodeError::MissingValues),
    };
    Ok(Reading {
      device_id: self.device_id.unwrap_or_default(),
      chain_id: self.chain_id.unwrap_or_default(),
      functions: self.functions.unwrap_or_default(),
      values,
      timestamp: self.timestamp,
    })
  }
}

/// Parses one transport record into a [`Reading`].
///
/// # Errors
///
/// [`DecodeError::Malformed`] if `raw` is not a JSON object of the expected
/// shape, [`DecodeError::MissingValues`] if `data` is absent or null.
pub fn decode(raw: &str) -> Result<Reading, DecodeError> {
  decode_with(raw, MissingValuesPolicy::Reject)
}

/// Parses one record, applying `policy` to records without `data`.
pub fn decode_with(raw: &str, policy: MissingValuesPolicy) -> Result<Reading, DecodeError> {
  let wire: WireReading = serde_json::from_str(raw)?;
  wire.into_reading(policy)
}
