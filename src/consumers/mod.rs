//! # Consumers
//!
//! Sinks for encoded aggregates.

/// Line-delimited sink over any async writer.
pub mod line_consumer;

pub use line_consumer::LineConsumer;
