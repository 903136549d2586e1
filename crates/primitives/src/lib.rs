//! Position-space primitives shared by the decoration engine and its hosts.

/// Edit changesets and position mapping across document changes.
pub mod changeset;
/// Character index and range types.
pub mod range;

pub use changeset::{Bias, ChangeSet, Operation};
pub use range::{CharIdx, CharLen, Range};
pub use ropey::{Rope, RopeSlice};
