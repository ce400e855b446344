//! Tests for MinMaxWindowTransformer

use crate::aggregate::MinMax;
use crate::config::WindowBoundary;
use crate::error::WindowError;
use crate::reading::Reading;
use crate::transformers::MinMaxWindowTransformer;
use crate::transformers::min_max_window_transformer::until_next_boundary;
use crate::Transformer;
use futures::channel::mpsc;
use futures::{StreamExt, stream};
use std::time::Duration;

fn reading(t1: i64) -> Reading {
  Reading::new("d1", "c1", [("T1", t1)])
}

#[test]
fn test_zero_boundaries_rejected() {
  assert_eq!(
    MinMaxWindowTransformer::time(Duration::ZERO).unwrap_err(),
    WindowError::ZeroInterval
  );
  assert_eq!(
    MinMaxWindowTransformer::count(0).unwrap_err(),
    WindowError::ZeroCount
  );
  assert!(MinMaxWindowTransformer::new(WindowBoundary::count(0)).is_err());
}

#[tokio::test]
async fn test_count_window_seals_every_n_and_at_end() {
  let mut transformer = MinMaxWindowTransformer::count(2).unwrap().with_clock(|| 7);
  let input = Box::pin(stream::iter(vec![
    reading(5),
    reading(1),
    reading(9),
    reading(12),
    reading(3),
  ]));

  let results: Vec<_> = transformer.transform(input).collect().await;

  assert_eq!(results.len(), 3);
  assert_eq!(results[0].results["T1"], MinMax { min: 1, max: 5 });
  assert_eq!(results[1].results["T1"], MinMax { min: 9, max: 12 });
  assert_eq!(results[2].results["T1"], MinMax { min: 3, max: 3 });
  assert!(results.iter().all(|a| a.emitted_at == 7));
}

#[tokio::test]
async fn test_count_window_empty_input() {
  let mut transformer = MinMaxWindowTransformer::count(3).unwrap();
  let input = Box::pin(stream::iter(Vec::<Reading>::new()));

  let results: Vec<_> = transformer.transform(input).collect().await;
  assert!(results.is_empty());
}

#[tokio::test]
async fn test_emitted_at_is_last_fold_time() {
  let ticks = std::sync::atomic::AtomicI64::new(0);
  let mut transformer = MinMaxWindowTransformer::count(3)
    .unwrap()
    .with_clock(move || ticks.fetch_add(100, std::sync::atomic::Ordering::SeqCst));
  let input = Box::pin(stream::iter(vec![reading(1), reading(2), reading(3)]));

  let results: Vec<_> = transformer.transform(input).collect().await;
  assert_eq!(results[0].emitted_at, 200);
}

#[tokio::test(start_paused = true)]
async fn test_time_window_seals_on_interval() {
  let (tx, rx) = mpsc::unbounded();
  let mut transformer = MinMaxWindowTransformer::time(Duration::from_secs(60))
    .unwrap()
    .with_clock(|| 1_000);
  let mut output = transformer.transform(Box::pin(rx));

  tx.unbounded_send(Reading::new("d1", "c1", [("T1", 35), ("T2", 55)]))
    .unwrap();
  tx.unbounded_send(Reading::new("d1", "c1", [("T1", 40), ("T2", 50)]))
    .unwrap();

  let first = output.next().await.unwrap();
  assert_eq!(first.results["T1"], MinMax { min: 35, max: 40 });
  assert_eq!(first.results["T2"], MinMax { min: 50, max: 55 });

  tx.unbounded_send(reading(99)).unwrap();
  drop(tx);

  let last = output.next().await.unwrap();
  assert_eq!(last.results["T1"], MinMax { min: 99, max: 99 });
  assert_eq!(last.results.len(), 1);
  assert!(output.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_time_window_without_readings_emits_nothing() {
  let (tx, rx) = mpsc::unbounded();
  let mut transformer = MinMaxWindowTransformer::time(Duration::from_secs(60)).unwrap();
  let output = transformer.transform(Box::pin(rx));

  tokio::spawn(async move {
    // Two empty windows pass first.
    tokio::time::sleep(Duration::from_secs(150)).await;
    tx.unbounded_send(reading(4)).unwrap();
  });

  let results: Vec<_> = output.collect().await;
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].results["T1"], MinMax { min: 4, max: 4 });
}

#[test]
fn test_until_next_boundary() {
  let minute = Duration::from_secs(60);
  assert_eq!(until_next_boundary(45_000, minute), Duration::from_secs(15));
  assert_eq!(until_next_boundary(60_000, minute), minute);
  assert_eq!(until_next_boundary(0, minute), minute);
  assert_eq!(until_next_boundary(1_556_450_159_999, minute), Duration::from_millis(1));
  assert_eq!(until_next_boundary(-1_000, minute), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_time_window_seals_on_clock_boundaries() {
  // The stage starts 45 seconds into a minute.
  let started = tokio::time::Instant::now();
  let clock = move || 45_000 + started.elapsed().as_millis() as i64;

  let (tx, rx) = mpsc::unbounded();
  let mut transformer = MinMaxWindowTransformer::time(Duration::from_secs(60))
    .unwrap()
    .with_clock(clock);
  let output = transformer.transform(Box::pin(rx));

  tokio::spawn(async move {
    // 00:50, then 01:10 on the clock: either side of the minute.
    tokio::time::sleep(Duration::from_secs(5)).await;
    tx.unbounded_send(reading(1)).unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;
    tx.unbounded_send(reading(2)).unwrap();
  });

  let results: Vec<_> = output.collect().await;

  assert_eq!(results.len(), 2);
  assert_eq!(results[0].results["T1"], MinMax { min: 1, max: 1 });
  assert_eq!(results[0].emitted_at, 50_000);
  assert_eq!(results[1].results["T1"], MinMax { min: 2, max: 2 });
  assert_eq!(results[1].emitted_at, 70_000);
}

#[test]
fn test_with_name() {
  let transformer = MinMaxWindowTransformer::count(1)
    .unwrap()
    .with_name("window".to_string());
  assert_eq!(transformer.component_info().name, "window");
  assert_eq!(
    MinMaxWindowTransformer::count(1).unwrap().component_info().name,
    "min_max_window_transformer"
  );
}
