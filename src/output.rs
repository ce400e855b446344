//! Output side of a stage.
//!
//! [`Output`] is implemented by producers and transformers: anything that
//! hands a stream to a downstream [`Input`].

// Import for rustdoc links
#[allow(unused_imports)]
use crate::input::Input;

use futures::Stream;

/// A stage that yields items to a downstream [`Input`].
pub trait Output
where
  Self::Output: Send + 'static,
{
  /// Item type yielded.
  type Output;
  /// Stream of items yielded.
  type OutputStream: Stream<Item = Self::Output> + Send + 'static;
}
