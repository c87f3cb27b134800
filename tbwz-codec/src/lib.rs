//! # tbwz Codec
//!
//! The second-stage byte codec used behind the BWT/TBWT transforms:
//! move-to-front over a first-occurrence alphabet, zero-run-length coding,
//! and the adaptive order-0 range coder from `tbwz-entropy`.
//!
//! The pipeline is a strategy: anything implementing [`ByteCodec`] can stand
//! behind the transform layer. The shipped implementation is [`RleCodec`].
//!
//! Wire shape of one encoded stream:
//!
//! ```text
//! u8 sigma            alphabet size, 0 meaning the full 256
//! sigma bytes         the alphabet in first-occurrence order
//! range-coded body    MTF ranks, zero runs folded into {0,1} bit symbols
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mtf;
pub mod rle0;
pub mod stage;

pub use mtf::MtfCoder;
pub use rle0::{Rle0Decoder, Rle0Encoder};
pub use stage::{ByteCodec, RleCodec};
