//! Min/max window aggregation.
//!
//! A window moves through `Empty -> Accumulating -> sealed`. Folding is a pure
//! value transition: [`WindowState::fold`] takes the current state and one
//! reading and returns the next state, and [`WindowState::seal`] hands out the
//! finished [`Aggregate`]. Memory is proportional to the number of distinct
//! sensor codes seen in the window, never to the number of readings.
//!
//! ```rust
//! use iotagg::aggregate::WindowState;
//! use iotagg::reading::Reading;
//!
//! let state = WindowState::Empty
//!   .fold(&Reading::new("d1", "c1", [("T1", 35), ("T2", 55)]), 1_000)
//!   .fold(&Reading::new("d1", "c1", [("T1", 40), ("T2", 50)]), 2_000);
//!
//! let aggregate = state.seal().unwrap();
//! assert_eq!((aggregate.results["T1"].min, aggregate.results["T1"].max), (35, 40));
//! assert_eq!((aggregate.results["T2"].min, aggregate.results["T2"].max), (50, 55));
//! assert_eq!(aggregate.emitted_at, 2_000);
//! ```

use crate::reading::Reading;
use std::collections::BTreeMap;

/// Running extremes of one sensor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinMax {
  /// Smallest value seen.
  pub min: i64,
  /// Largest value seen.
  pub max: i64,
}

impl MinMax {
  /// Starts tracking from a first value.
  pub fn new(value: i64) -> Self {
    Self {
      min: value,
      max: value,
    }
  }

  /// Folds one value in.
  ///
  /// Max is checked first and min only if max did not move; a value equal to
  /// either extremum changes nothing.
  #[must_use]
  pub fn fold(self, value: i64) -> Self {
    if value > self.max {
      Self { max: value, ..self }
    } else if value < self.min {
      Self { min: value, ..self }
    } else {
      self
    }
  }
}

/// The min/max result of one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
  /// Device id of the first reading folded into the window.
  pub device_id: String,
  /// Chain id of the first reading folded into the window.
  pub chain_id: String,
  /// Processing time (ms since the epoch) of the most recent fold.
  pub emitted_at: i64,
  /// Extremes per sensor code.
  pub results: BTreeMap<String, MinMax>,
}

impl Aggregate {
  fn open(reading: &Reading, now: i64) -> Self {
    let results = reading
      .values
      .iter()
      .map(|(code, value)| (code.clone(), MinMax::new(*value)))
      .collect();
    Self {
      device_id: reading.device_id.clone(),
      chain_id: reading.chain_id.clone(),
      emitted_at: now,
      results,
    }
  }

  fn fold(mut self, reading: &Reading, now: i64) -> Self {
    for (code, value) in &reading.values {
      match self.results.get_mut(code) {
        Some(extremes) => *extremes = extremes.fold(*value),
        None => {
          self.results.insert(code.clone(), MinMax::new(*value));
        }
      }
    }
    self.emitted_at = now;
    self
  }
}

/// State of one min/max window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WindowState {
  /// Nothing folded yet.
  #[default]
  Empty,
  /// At least one reading folded.
  Accumulating {
    /// Running aggregate.
    aggregate: Aggregate,
    /// Number of readings folded so far.
    folds: usize,
  },
}

impl WindowState {
  /// Folds `reading` in at processing time `now`.
  ///
  /// The first fold copies device and chain ids from the reading. Every fold
  /// restamps `emitted_at`, even when the reading has no values.
  #[must_use]
  pub fn fold(self, reading: &Reading, now: i64) -> Self {
    match self {
      WindowState::Empty => WindowState::Accumulating {
        aggregate: Aggregate::open(reading, now),
        folds: 1,
      },
      WindowState::Accumulating { aggregate, folds } => WindowState::Accumulating {
        aggregate: aggregate.fold(reading, now),
        folds: folds + 1,
      },
    }
  }

  /// Seals the window, returning its aggregate if anything was folded.
  pub fn seal(self) -> Option<Aggregate> {
    match self {
      WindowState::Empty => None,
      WindowState::Accumulating { aggregate, .. } => Some(aggregate),
    }
  }

  /// Number of readings folded into this window.
  pub fn folds(&self) -> usize {
    match self {
      WindowState::Empty => 0,
      WindowState::Accumulating { folds, .. } => *folds,
    }
  }

  /// Returns true if nothing has been folded.
  pub fn is_empty(&self) -> bool {
    matches!(self, WindowState::Empty)
  }
}
