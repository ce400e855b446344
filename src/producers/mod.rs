//! # Producers
//!
//! Sources of raw transport records.

/// Line-delimited source over any async reader.
pub mod line_producer;

pub use line_producer::LineProducer;
