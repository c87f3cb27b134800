//! Move-to-front coder over an explicit alphabet.
//!
//! The alphabet is listed in first-occurrence order of the underlying text,
//! which both sides reconstruct from the stream preamble. Encoding walks the
//! symbol to the front with adjacent swaps, so the rank it reports is the
//! number of swaps taken.

use tbwz_core::{Result, TbwzError};

/// Stateful MTF coder.
#[derive(Debug, Clone)]
pub struct MtfCoder {
    alph: Vec<u8>,
}

impl MtfCoder {
    /// Create a coder over `alph` (one entry per distinct symbol).
    pub fn new(alph: Vec<u8>) -> Self {
        Self { alph }
    }

    /// Alphabet size.
    pub fn sigma(&self) -> usize {
        self.alph.len()
    }

    /// Encode one character, returning its current rank.
    pub fn encode_char(&mut self, c: u8) -> usize {
        let mut r = 0;
        while self.alph[0] != c {
            r += 1;
            self.alph.swap(0, r);
        }
        r
    }

    /// Decode one rank back to its character.
    pub fn decode_char(&mut self, r: usize) -> Result<u8> {
        if r >= self.alph.len() {
            return Err(TbwzError::codec_failure("MTF rank outside alphabet"));
        }
        let mut r = r;
        while r > 0 {
            self.alph.swap(r - 1, r);
            r -= 1;
        }
        Ok(self.alph[0])
    }

    /// Compute the alphabet of `s` in first-occurrence order.
    pub fn compute_alph(s: &[u8]) -> Vec<u8> {
        let mut used = [false; 256];
        let mut alph = Vec::new();
        for &c in s {
            if !used[c as usize] {
                used[c as usize] = true;
                alph.push(c);
            }
        }
        alph
    }
}
