//! The second-stage byte codec.
//!
//! [`ByteCodec`] is the seam between the transform layer (BWT / tunneled
//! BWT) and the entropy layer: the transforms hand over plain byte strings
//! and get them back verbatim, with the stream length always known to the
//! caller from the block header.

use std::io::{Read, Write};
use tbwz_core::{Result, TbwzError};
use tbwz_entropy::{Order0Decoder, Order0Encoder};

use crate::mtf::MtfCoder;
use crate::rle0::{Rle0Decoder, Rle0Encoder};

/// Strategy interface for the second stage.
pub trait ByteCodec {
    /// Encode `t` into `out`.
    fn encode<W: Write>(&self, t: &[u8], out: &mut W) -> Result<()>;

    /// Decode exactly `t.len()` bytes from `input` into `t`.
    fn decode<R: Read>(&self, input: &mut R, t: &mut [u8]) -> Result<()>;
}

/// The default second stage: MTF over a first-occurrence alphabet, zero-run
/// folding, adaptive order-0 range coding.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCodec;

impl RleCodec {
    fn read_alphabet<R: Read>(input: &mut R, max_len: usize) -> Result<Vec<u8>> {
        let mut sigma_byte = [0u8; 1];
        input.read_exact(&mut sigma_byte)?;
        let sigma = if sigma_byte[0] == 0 {
            256
        } else {
            sigma_byte[0] as usize
        };
        if sigma > max_len {
            return Err(TbwzError::invalid_arg(format!(
                "alphabet of {sigma} symbols cannot occur in {max_len} bytes"
            )));
        }
        let mut alph = vec![0u8; sigma];
        input.read_exact(&mut alph)?;
        Ok(alph)
    }
}

impl ByteCodec for RleCodec {
    fn encode<W: Write>(&self, t: &[u8], out: &mut W) -> Result<()> {
        if t.is_empty() {
            return Ok(());
        }

        let alph = MtfCoder::compute_alph(t);
        // A full 256-symbol alphabet is stored as 0.
        out.write_all(&[alph.len() as u8])?;
        out.write_all(&alph)?;

        let mut mtf = MtfCoder::new(alph.clone());
        let mut rle0 = Rle0Encoder::new();
        // RLE0 shifts literals up by one, so the entropy alphabet is one
        // wider than the MTF one.
        let mut ent = Order0Encoder::new(out, alph.len() + 1);

        let mut i = 0;
        while i < t.len() {
            loop {
                if i >= t.len() {
                    break;
                }
                let more = rle0.encode_char(mtf.encode_char(t[i]));
                i += 1;
                if !more {
                    break;
                }
            }
            while rle0.has_next_enc_char() {
                ent.encode(rle0.next_enc_char())?;
            }
        }
        ent.flush()
    }

    fn decode<R: Read>(&self, input: &mut R, t: &mut [u8]) -> Result<()> {
        if t.is_empty() {
            return Ok(());
        }

        let alph = Self::read_alphabet(input, t.len())?;
        let mut mtf = MtfCoder::new(alph.clone());
        let mut rle0 = Rle0Decoder::new();
        let mut ent = Order0Decoder::new(input, alph.len() + 1)?;

        let mut i = 0;
        while i < t.len() {
            rle0.decode_char(ent.decode()?);
            while i < t.len() && rle0.has_next_char() {
                t[i] = mtf.decode_char(rle0.next_char())?;
                i += 1;
            }
        }
        if rle0.has_next_char() {
            return Err(TbwzError::codec_failure(
                "RLE0 stream longer than declared output",
            ));
        }
        Ok(())
    }
}
