//! # tbwz BWT
//!
//! The Burrows-Wheeler layer: suffix-array construction, the forward and
//! inverse transform with a primary index, and the run index used by the
//! tunneling machinery.
//!
//! ## Indexed vs. logical positions
//!
//! The transform of an `n`-byte string is stored *indexed*: `n` bytes plus a
//! primary index `bwt_idx` recording where the sentinel row fell out. The
//! *logical* BWT is the `n + 1`-row view with the sentinel put back:
//! `bwt[0..bwt_idx) · $ · bwt[bwt_idx..n)`. The run index works in logical
//! positions and converts at the edges.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod runs;
pub mod suffix;
pub mod transform;

pub use runs::BwtRunIndex;
pub use suffix::suffix_array;
pub use transform::{bw_transform, inverse_bw_transform};
