//! # Transformers
//!
//! The aggregation stages, in pipeline order:
//!
//! - [`DecodeTransformer`]: transport text to [`Reading`](crate::reading::Reading)
//! - [`MinMaxWindowTransformer`]: readings to one min/max [`Aggregate`](crate::aggregate::Aggregate) per window
//! - [`KeyedStatsTransformer`]: readings to one [`KeyedStat`](crate::keyed_stat::KeyedStat) per sensor code per count window
//! - [`EncodeTransformer`]: sealed results back to transport text

/// Transport text to readings.
pub mod decode_transformer;
/// Sealed results to transport text.
pub mod encode_transformer;
/// Per-sensor count windows.
pub mod keyed_stats_transformer;
/// Tumbling min/max windows.
pub mod min_max_window_transformer;

pub use decode_transformer::DecodeTransformer;
pub use encode_transformer::EncodeTransformer;
pub use keyed_stats_transformer::KeyedStatsTransformer;
pub use min_max_window_transformer::{Clock, MinMaxWindowTransformer};

#[cfg(test)]
mod encode_transformer_test;
#[cfg(test)]
mod min_max_window_transformer_test;
