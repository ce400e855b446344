//! Tests for EncodeTransformer

use crate::keyed_stat::KeyedStat;
use crate::reading::SensorSample;
use crate::transformers::EncodeTransformer;
use crate::Transformer;
use futures::{StreamExt, stream};

#[tokio::test]
async fn test_encodes_each_record() {
  let mut transformer = EncodeTransformer::<KeyedStat>::new();
  let input = Box::pin(stream::iter(vec![
    KeyedStat::open(SensorSample::new("T1", 1)).fold(22),
    KeyedStat::open(SensorSample::new("T2", 4)),
  ]));

  let lines: Vec<String> = transformer.transform(input).collect().await;

  assert_eq!(lines.len(), 2);
  let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
  assert_eq!(first["SUM_T1"], 23);
  let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
  assert_eq!(second["MIN_T2"], 4);
}

#[test]
fn test_with_name() {
  let transformer = EncodeTransformer::<KeyedStat>::new().with_name("out".to_string());
  assert_eq!(transformer.component_info().name, "out");
}
