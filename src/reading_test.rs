//! Tests for readings and fan-out.

use crate::reading::{Reading, SensorSample, explode};

#[test]
fn test_explode_yields_one_sample_per_value_in_code_order() {
  let reading = Reading::new("d1", "c1", [("T2", 55), ("T1", 35)]).with_timestamp(7);

  let samples: Vec<_> = explode(reading).collect();

  assert_eq!(
    samples,
    vec![SensorSample::new("T1", 35), SensorSample::new("T2", 55)]
  );
}

#[test]
fn test_explode_empty_reading() {
  let reading = Reading::new("d1", "c1", Vec::<(&str, i64)>::new());
  assert!(reading.is_empty());
  assert_eq!(explode(reading).count(), 0);
}
