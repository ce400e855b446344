//! Tests for transport record encoding.

use crate::aggregate::WindowState;
use crate::encoder::{Encode, encode};
use crate::keyed_stat::KeyedStat;
use crate::reading::{Reading, SensorSample};
use serde_json::{Value, json};

fn parse(text: &str) -> Value {
  serde_json::from_str(text).unwrap()
}

#[test]
fn test_encode_aggregate() {
  let aggregate = WindowState::Empty
    .fold(&Reading::new("d1", "c1", [("T1", 35), ("T2", 55)]), 1_556_450_100_000)
    .fold(&Reading::new("d1", "c1", [("T1", 40), ("T2", 50)]), 1_556_450_160_000)
    .seal()
    .unwrap();

  assert_eq!(
    parse(&aggregate.encode()),
    json!({
      "deviceid": "d1",
      "chainid": "c1",
      "newts": 1_556_450_160_000_i64,
      "result": {"min_T1": 35, "max_T1": 40, "min_T2": 50, "max_T2": 55},
    })
  );
}

#[test]
fn test_encode_aggregate_without_values() {
  let aggregate = WindowState::Empty
    .fold(&Reading::new("d1", "c1", Vec::<(&str, i64)>::new()), 5)
    .seal()
    .unwrap();

  assert_eq!(
    parse(&encode(&aggregate)),
    json!({"deviceid": "d1", "chainid": "c1", "newts": 5, "result": {}})
  );
}

#[test]
fn test_encode_keyed_stat() {
  let stat = KeyedStat::open(SensorSample::new("T1", 1)).fold(22);

  assert_eq!(
    parse(&stat.encode()),
    json!({"SUM_T1": 23, "MAX_T1": 22, "MIN_T1": 1})
  );
}

#[test]
fn test_encode_is_single_line() {
  let stat = KeyedStat::open(SensorSample::new("T1", 1));
  assert!(!encode(&stat).contains('\n'));
}
