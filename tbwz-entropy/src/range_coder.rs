//! Carry-less range coder on 64-bit state.
//!
//! Derived from Subbotin's public-domain construction. The coder keeps a
//! `low`/`range` pair; a byte is emitted whenever the top byte of `low` can
//! no longer change. Carries never propagate: when `range` falls below
//! [`BOTTOM`] before the top byte settles, the range is clipped to the
//! distance up to the next [`BOTTOM`] boundary.

use std::io::{Read, Write};
use tbwz_core::Result;

/// Renormalization threshold for the top byte.
pub const TOP: u64 = 1 << 56;

/// Lower bound on `range`; also the clipping granularity.
pub const BOTTOM: u64 = 1 << 48;

/// Largest cumulative frequency total the coder accepts losslessly.
pub const MAX_RANGE: u64 = BOTTOM;

/// Range encoder writing to a byte sink.
#[derive(Debug)]
pub struct RangeEncoder<W: Write> {
    out: W,
    low: u64,
    range: u64,
    flushed: bool,
}

impl<W: Write> RangeEncoder<W> {
    /// Create an encoder over `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            low: 0,
            range: u64::MAX,
            flushed: false,
        }
    }

    /// Encode one symbol occupying `[low, high)` of a `total`-wide scale.
    pub fn encode_range(&mut self, low: u64, high: u64, total: u64) -> Result<()> {
        debug_assert!(low < high && high <= total && total <= MAX_RANGE);
        self.range /= total;
        self.low = self.low.wrapping_add(low * self.range);
        self.range *= high - low;

        loop {
            if (self.low ^ self.low.wrapping_add(self.range)) < TOP {
                // top byte settled
            } else if self.range < BOTTOM {
                self.range = self.low.wrapping_neg() & (BOTTOM - 1);
            } else {
                break;
            }
            self.out.write_all(&[(self.low >> 56) as u8])?;
            self.range <<= 8;
            self.low <<= 8;
        }
        Ok(())
    }

    /// Write out the remaining state. Must be called once after the last
    /// symbol; encoding after a flush is a logic error.
    pub fn flush(&mut self) -> Result<()> {
        if !self.flushed {
            for _ in 0..8 {
                self.out.write_all(&[(self.low >> 56) as u8])?;
                self.low <<= 8;
            }
            self.flushed = true;
        }
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.out)
    }
}

/// Range decoder reading from a byte source.
#[derive(Debug)]
pub struct RangeDecoder<R: Read> {
    input: R,
    low: u64,
    range: u64,
    code: u64,
}

impl<R: Read> RangeDecoder<R> {
    /// Create a decoder, priming eight bytes from `input`.
    pub fn new(mut input: R) -> Result<Self> {
        let mut code = 0u64;
        let mut buf = [0u8; 1];
        for _ in 0..8 {
            input.read_exact(&mut buf)?;
            code = (code << 8) | u64::from(buf[0]);
        }
        Ok(Self {
            input,
            low: 0,
            range: u64::MAX,
            code,
        })
    }

    /// Return the scaled position of the code within a `total`-wide scale.
    ///
    /// Narrows `range` as a side effect; must be followed by exactly one
    /// [`Self::remove_range`] for the symbol found at that position.
    pub fn decode_count(&mut self, total: u64) -> u64 {
        self.range /= total;
        self.code.wrapping_sub(self.low) / self.range
    }

    /// Consume the symbol occupying `[low, high)` on the scale last passed to
    /// [`Self::decode_count`].
    pub fn remove_range(&mut self, low: u64, high: u64) -> Result<()> {
        self.low = self.low.wrapping_add(low * self.range);
        self.range *= high - low;

        let mut buf = [0u8; 1];
        loop {
            if (self.low ^ self.low.wrapping_add(self.range)) < TOP {
                // top byte settled
            } else if self.range < BOTTOM {
                self.range = self.low.wrapping_neg() & (BOTTOM - 1);
            } else {
                break;
            }
            self.input.read_exact(&mut buf)?;
            self.code = (self.code << 8) | u64::from(buf[0]);
            self.range <<= 8;
            self.low <<= 8;
        }
        Ok(())
    }
}
