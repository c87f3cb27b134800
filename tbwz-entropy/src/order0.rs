//! Adaptive order-0 model over the range coder.
//!
//! The model keeps a cumulative frequency table `freq[0..=sigma]` with
//! `freq[0] = 0`. Every coded symbol bumps the cumulative counts above it by
//! one; when the total reaches [`MAX_RANGE`] the counts are halved with a
//! monotonicity fix so every symbol keeps a nonzero width.

use std::io::{Read, Write};
use tbwz_core::{Result, TbwzError};

use crate::range_coder::{MAX_RANGE, RangeDecoder, RangeEncoder};

fn reset_freq(freq: &mut Vec<u64>, sigma: usize) {
    freq.clear();
    freq.extend(0..=sigma as u64);
}

fn rescale_freq(freq: &mut [u64]) {
    for i in 1..freq.len() {
        freq[i] /= 2;
        if freq[i] <= freq[i - 1] {
            freq[i] = freq[i - 1] + 1;
        }
    }
}

/// Adaptive order-0 encoder.
#[derive(Debug)]
pub struct Order0Encoder<W: Write> {
    coder: RangeEncoder<W>,
    freq: Vec<u64>,
}

impl<W: Write> Order0Encoder<W> {
    /// Create an encoder for an alphabet of `sigma` symbols.
    pub fn new(out: W, sigma: usize) -> Self {
        let mut freq = Vec::new();
        reset_freq(&mut freq, sigma);
        Self {
            coder: RangeEncoder::new(out),
            freq,
        }
    }

    /// Alphabet size of this coder.
    pub fn sigma(&self) -> usize {
        self.freq.len() - 1
    }

    /// Reset the model to a uniform table over `sigma` symbols.
    ///
    /// The range-coder state is kept, so several logical streams can share
    /// one coded byte stream.
    pub fn reset(&mut self, sigma: usize) {
        reset_freq(&mut self.freq, sigma);
    }

    /// Encode one symbol in `0..sigma`.
    pub fn encode(&mut self, c: usize) -> Result<()> {
        debug_assert!(c < self.sigma());
        let total = *self.freq.last().expect("frequency table is never empty");
        self.coder.encode_range(self.freq[c], self.freq[c + 1], total)?;

        for f in &mut self.freq[c + 1..] {
            *f += 1;
        }
        if *self.freq.last().expect("frequency table is never empty") >= MAX_RANGE {
            rescale_freq(&mut self.freq);
        }
        Ok(())
    }

    /// Flush the underlying range coder. Must be called after the last
    /// symbol.
    pub fn flush(&mut self) -> Result<()> {
        self.coder.flush()
    }

    /// Flush and return the sink.
    pub fn finish(self) -> Result<W> {
        self.coder.finish()
    }
}

/// Adaptive order-0 decoder.
#[derive(Debug)]
pub struct Order0Decoder<R: Read> {
    coder: RangeDecoder<R>,
    freq: Vec<u64>,
}

impl<R: Read> Order0Decoder<R> {
    /// Create a decoder for an alphabet of `sigma` symbols, priming the range
    /// coder from `input`.
    pub fn new(input: R, sigma: usize) -> Result<Self> {
        let mut freq = Vec::new();
        reset_freq(&mut freq, sigma);
        Ok(Self {
            coder: RangeDecoder::new(input)?,
            freq,
        })
    }

    /// Alphabet size of this coder.
    pub fn sigma(&self) -> usize {
        self.freq.len() - 1
    }

    /// Reset the model to a uniform table over `sigma` symbols.
    pub fn reset(&mut self, sigma: usize) {
        reset_freq(&mut self.freq, sigma);
    }

    /// Decode one symbol.
    pub fn decode(&mut self) -> Result<usize> {
        let sigma = self.sigma();
        let total = self.freq[sigma];
        let cnt = self.coder.decode_count(total);
        if cnt >= total {
            return Err(TbwzError::codec_failure("range count outside model total"));
        }

        // Walk down to the symbol while applying the same increments the
        // encoder performs for everything above it.
        let mut c = sigma;
        while self.freq[c] > cnt {
            self.freq[c] += 1;
            c -= 1;
        }
        // freq[c + 1] was just incremented, so undo it for the bounds.
        self.coder.remove_range(self.freq[c], self.freq[c + 1] - 1)?;

        if self.freq[sigma] >= MAX_RANGE {
            rescale_freq(&mut self.freq);
        }
        Ok(c)
    }
}
