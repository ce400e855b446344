//! Tests for transport record decoding.

use crate::decoder::{MissingValuesPolicy, decode, decode_with};
use crate::error::DecodeError;

#[test]
fn test_decode_full_record() {
  let reading = decode(
    r#"{"deviceid":"xxx","chainid":"yyy","func":["min","max"],"data":{"T1031":35,"T1032":55},"ts":234843}"#,
  )
  .unwrap();

  assert_eq!(reading.device_id, "xxx");
  assert_eq!(reading.chain_id, "yyy");
  assert!(reading.functions.contains("min"));
  assert!(reading.functions.contains("max"));
  assert_eq!(reading.values["T1031"], 35);
  assert_eq!(reading.values["T1032"], 55);
  assert_eq!(reading.timestamp, Some(234843));
}

#[test]
fn test_decode_without_optional_fields() {
  let reading = decode(r#"{"deviceid":"d1","chainid":"c1","data":{"T1":-2}}"#).unwrap();

  assert!(reading.functions.is_empty());
  assert_eq!(reading.timestamp, None);
  assert_eq!(reading.values["T1"], -2);
}

#[test]
fn test_decode_ignores_unknown_fields() {
  let reading = decode(r#"{"deviceid":"d1","extra":true,"data":{"T1":1}}"#).unwrap();
  assert_eq!(reading.chain_id, "");
  assert_eq!(reading.values.len(), 1);
}

#[test]
fn test_decode_null_ids_and_functions_read_as_absent() {
  let reading =
    decode(r#"{"deviceid":null,"chainid":null,"func":null,"data":{"T1":1}}"#).unwrap();

  assert_eq!(reading.device_id, "");
  assert_eq!(reading.chain_id, "");
  assert!(reading.functions.is_empty());
  assert_eq!(reading.values["T1"], 1);

  let reading = decode(r#"{"deviceid":null,"chainid":"c1","data":{"T1":2}}"#).unwrap();
  assert_eq!(reading.device_id, "");
  assert_eq!(reading.chain_id, "c1");
}

#[test]
fn test_decode_empty_data_is_valid() {
  let reading = decode(r#"{"deviceid":"d1","chainid":"c1","data":{}}"#).unwrap();
  assert!(reading.is_empty());
}

#[test]
fn test_decode_missing_data_is_strict() {
  let err = decode(r#"{"deviceid":"d1","chainid":"c1"}"#).unwrap_err();
  assert!(matches!(err, DecodeError::MissingValues));

  let err = decode(r#"{"deviceid":"d1","chainid":"c1","data":null}"#).unwrap_err();
  assert!(matches!(err, DecodeError::MissingValues));
}

#[test]
fn test_missing_data_treated_as_empty_under_policy() {
  let reading = decode_with(
    r#"{"deviceid":"d1","chainid":"c1"}"#,
    MissingValuesPolicy::TreatAsEmpty,
  )
  .unwrap();
  assert!(reading.is_empty());
  assert_eq!(reading.device_id, "d1");
}

#[test]
fn test_decode_malformed() {
  for raw in ["not json", "[1,2]", r#"{"data":{"T1":"hot"}}"#, r#"{"data":{"T1":1.5}}"#, ""] {
    let err = decode(raw).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)), "{raw}");
  }
}

#[test]
fn test_policy_default_and_serde() {
  assert_eq!(MissingValuesPolicy::default(), MissingValuesPolicy::TreatAsEmpty);
  let policy: MissingValuesPolicy = serde_json::from_str(r#""reject""#).unwrap();
  assert_eq!(policy, MissingValuesPolicy::Reject);
}
