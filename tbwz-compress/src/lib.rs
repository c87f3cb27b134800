//! # tbwz Compress
//!
//! The block compressor framework and the two shipped pipelines:
//!
//! - [`BwtCompressor`]: BWT → MTF → RLE0 → range coding (`.bwz`)
//! - [`TbwtCompressor`]: BWT → tunneling → MTF → RLE0 → range coding, with
//!   the run-folded aux structure alongside (`.tbwz`)
//!
//! The framework splits input into fixed-size blocks, compresses each one
//! independently, and frames them with a header of `b + 1` little-endian
//! `u64` cumulative end offsets (`end_offset[0]` is the header size).
//! Decompression validates strict monotonicity of the offsets and that every
//! block decoder consumed its slice exactly.
//!
//! There are no checksums: a corrupted payload usually surfaces as
//! `InvalidAux` or `CodecFailure`, but silent corruption cannot always be
//! detected.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bwt;
mod framework;
mod tbwt;

pub use bwt::BwtCompressor;
pub use framework::BlockCompressor;
pub use tbwt::TbwtCompressor;

#[cfg(feature = "parallel")]
pub use framework::compress_parallel;

pub use tbwz_core::MAX_BLOCK_SIZE;

/// Default block size: whole-file blocks up to the maximum.
pub const DEFAULT_BLOCK_SIZE: usize = MAX_BLOCK_SIZE;
