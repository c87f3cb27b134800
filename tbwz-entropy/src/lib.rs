//! # tbwz Entropy
//!
//! Entropy coding for the tbwz second stage: a carry-less range coder over
//! 64-bit state with byte-stream I/O, and an adaptive order-0 model driving
//! it.
//!
//! The range coder follows Subbotin's carry-less construction: instead of
//! propagating carries, the range is clipped to the next byte boundary
//! whenever it drops below [`range_coder::BOTTOM`] without the top byte being
//! settled. Encoder and decoder renormalize in lockstep, so a decoder
//! consumes exactly as many bytes as the encoder produced (eight priming
//! bytes against the eight flush bytes included) — the block framework relies
//! on that to detect trailing garbage.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod order0;
pub mod range_coder;

pub use order0::{Order0Decoder, Order0Encoder};
pub use range_coder::{MAX_RANGE, RangeDecoder, RangeEncoder};
