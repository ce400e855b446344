//! Input side of a stage.
//!
//! [`Input`] is implemented by transformers and consumers: anything that
//! receives a stream from upstream. The stream type is an associated type so
//! each stage can name its own boxed stream.

use futures::Stream;
// Import for rustdoc link
#[allow(unused_imports)]
use crate::output::Output;

/// A stage that receives items from an upstream [`Output`].
pub trait Input
where
  Self::Input: Send + 'static,
{
  /// Item type received.
  type Input;
  /// Stream of items received.
  type InputStream: Stream<Item = Self::Input> + Send + 'static;
}
