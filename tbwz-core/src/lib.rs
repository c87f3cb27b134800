//! # tbwz Core
//!
//! Core components shared by the tbwz compressor crates:
//!
//! - [`error`]: the common error type and `Result` alias
//! - [`twobit`]: a packed vector of 2-bit values (the tunneling aux alphabet)
//! - [`lheap`]: a lazy max-heap whose element scores may decrease or vanish
//!   between pops
//!
//! The tbwz stack is layered: this crate sits at the bottom, the entropy and
//! codec crates build the byte-level second stage, `tbwz-bwt` and
//! `tbwz-tunnel` implement the transform layer, and `tbwz-compress` ties the
//! block framework together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod lheap;
pub mod twobit;

// Re-exports for convenience
pub use error::{Result, TbwzError};
pub use lheap::{ValueState, make_lheap, pop_lheap, pop_lheap_nomove};
pub use twobit::TwoBitVec;

/// Maximum size of a single input block (1.5 GiB).
///
/// All index types on the wire are `u32`; this bound keeps every position
/// representable and matches the block framing header contract.
pub const MAX_BLOCK_SIZE: usize = (1024 + 512) * 1024 * 1024;
