//! Tests for the pipeline builder and job assembly.

use crate::config::{AggregationMode, AggregatorConfig, WindowBoundary};
use crate::consumers::LineConsumer;
use crate::decoder::MissingValuesPolicy;
use crate::error::ConfigError;
use crate::keyed_stat::KeyedStat;
use crate::pipeline::{PipelineBuilder, run_job};
use crate::producers::LineProducer;
use crate::transformers::{DecodeTransformer, EncodeTransformer, KeyedStatsTransformer};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::io::Cursor;

fn source(records: &[&str]) -> LineProducer {
  let mut text = records.join("\n");
  text.push('\n');
  LineProducer::new(Cursor::new(text.into_bytes()))
}

fn sink() -> LineConsumer<Vec<u8>> {
  LineConsumer::new(Vec::new())
}

fn parse_all(consumer: LineConsumer<Vec<u8>>) -> Vec<Value> {
  let text = String::from_utf8(consumer.into_inner()).unwrap();
  text
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect()
}

fn count_window(size: usize) -> AggregatorConfig {
  let mut config = AggregatorConfig::min_max();
  config.mode = AggregationMode::MinMax {
    boundary: WindowBoundary::count(size),
  };
  config
}

#[tokio::test]
async fn test_builder_chains_transformers() {
  let consumer = PipelineBuilder::new()
    .producer(source(&[r#"{"data":{"T1":1}}"#, r#"{"data":{"T1":22}}"#]))
    .transformer(DecodeTransformer::new())
    .transformer(KeyedStatsTransformer::new(2).unwrap())
    .transformer(EncodeTransformer::<KeyedStat>::new())
    .consumer(sink())
    .run()
    .await;

  assert_eq!(
    parse_all(consumer),
    vec![json!({"SUM_T1": 23, "MAX_T1": 22, "MIN_T1": 1})]
  );
}

#[tokio::test]
async fn test_builder_without_transformers() {
  let consumer = PipelineBuilder::default()
    .producer(source(&["a", "b"]))
    .consumer(sink())
    .run()
    .await;

  assert_eq!(consumer.written(), 2);
  assert_eq!(consumer.into_inner(), b"a\nb\n".to_vec());
}

#[tokio::test]
async fn test_run_job_min_max_count_boundary() {
  let producer = source(&[
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":35,"T2":55}}"#,
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":40,"T2":50}}"#,
  ]);

  let consumer = run_job(&count_window(2), producer, sink()).await.unwrap();
  let records = parse_all(consumer);

  assert_eq!(records.len(), 1);
  assert_eq!(
    records[0]["result"],
    json!({"min_T1": 35, "max_T1": 40, "min_T2": 50, "max_T2": 55})
  );
  assert_eq!(records[0]["deviceid"], "d1");
  assert_eq!(records[0]["chainid"], "c1");
  assert!(records[0]["newts"].is_i64());
}

#[tokio::test]
async fn test_run_job_bad_record_leaves_window_intact() {
  let producer = source(&[
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":35}}"#,
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":"#,
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":40}}"#,
  ]);

  let consumer = run_job(&count_window(2), producer, sink()).await.unwrap();
  let records = parse_all(consumer);

  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["result"], json!({"min_T1": 35, "max_T1": 40}));
}

#[tokio::test]
async fn test_run_job_missing_values_policy() {
  let input = [
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":3}}"#,
    r#"{"deviceid":"d1","chainid":"c1"}"#,
    r#"{"deviceid":"d1","chainid":"c1","data":{"T1":8}}"#,
  ];
  let mut config = count_window(2);

  // Treated as empty, the record without data counts toward the window.
  let consumer = run_job(&config, source(&input), sink()).await.unwrap();
  let records = parse_all(consumer);
  assert_eq!(records.len(), 2);
  assert_eq!(records[0]["result"], json!({"min_T1": 3, "max_T1": 3}));

  config.missing_values = MissingValuesPolicy::Reject;
  let consumer = run_job(&config, source(&input), sink()).await.unwrap();
  let records = parse_all(consumer);
  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["result"], json!({"min_T1": 3, "max_T1": 8}));
}

#[tokio::test]
async fn test_run_job_rejects_invalid_config() {
  let mut config = AggregatorConfig::keyed_stats();
  config.mode = AggregationMode::KeyedStats { count: 0 };

  let result = run_job(&config, source(&[]), sink()).await;
  assert!(matches!(result, Err(ConfigError::InvalidWindow(_))));
}

proptest! {
  #[test]
  fn test_keyed_stats_sums_every_pair(values in prop::collection::vec(-1_000_i64..1_000, 0..40)) {
    let input: Vec<String> = values
      .iter()
      .map(|v| format!(r#"{{"data":{{"T1":{v}}}}}"#))
      .collect();
    let input: Vec<&str> = input.iter().map(String::as_str).collect();

    let consumer = tokio_test::block_on(run_job(
      &AggregatorConfig::keyed_stats(),
      source(&input),
      sink(),
    ))
    .unwrap();
    let records = parse_all(consumer);

    prop_assert_eq!(records.len(), values.len() / 2);
    for (record, pair) in records.iter().zip(values.chunks_exact(2)) {
      prop_assert_eq!(&record["SUM_T1"], &json!(pair[0] + pair[1]));
      prop_assert_eq!(&record["MAX_T1"], &json!(pair[0].max(pair[1])));
      prop_assert_eq!(&record["MIN_T1"], &json!(pair[0].min(pair[1])));
    }
  }
}
