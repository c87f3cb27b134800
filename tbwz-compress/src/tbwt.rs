//! The tunneled-BWT pipeline (`.tbwz`).

use std::io::Cursor;
use std::time::Instant;

use tbwz_bwt::{BwtRunIndex, bw_transform};
use tbwz_codec::{ByteCodec, RleCodec};
use tbwz_core::{MAX_BLOCK_SIZE, Result, TbwzError, TwoBitVec};
use tbwz_tunnel::{REM, Tunneler, invert_tunneled_bwt, retransform_aux, transform_aux};

use crate::bwt::read_u32;
use crate::framework::{BlockCompressor, clamp_block_size};

/// BWT → tunneling → second-stage codec, block by block.
///
/// Per-block payload:
///
/// ```text
/// u32 n | u32 m | u32 aux_folded_len | u32 tbwt_idx
/// codec(tbwt)        m bytes
/// codec(aux_folded)  aux_folded_len code bytes
/// ```
#[derive(Debug)]
pub struct TbwtCompressor {
    block_size: usize,
    quiet: bool,
    codec: RleCodec,
}

impl TbwtCompressor {
    /// Create a compressor with the given block size (clamped to
    /// `1..=MAX_BLOCK_SIZE`).
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size: clamp_block_size(block_size),
            quiet: true,
            codec: RleCodec,
        }
    }

    /// Enable or disable telemetry lines on stdout (disabled by default).
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    fn print_info(&self, key: &str, value: impl std::fmt::Display) {
        if !self.quiet {
            println!("> {key}\t\t{value}");
        }
    }
}

impl Default for TbwtCompressor {
    fn default() -> Self {
        Self::new(crate::DEFAULT_BLOCK_SIZE)
    }
}

impl BlockCompressor for TbwtCompressor {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn compress_block(&self, block: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let n = block.len();
        debug_assert!(n <= MAX_BLOCK_SIZE);
        self.print_info("block size", n);

        let start = Instant::now();
        let (mut bwt, bwt_idx) = bw_transform(block);
        self.print_info("bwt index", bwt_idx);
        self.print_info("bwt construction ms", start.elapsed().as_millis());

        let start = Instant::now();
        let bwtrs = BwtRunIndex::new(&bwt, bwt_idx);
        let mut tunneler = Tunneler::new(&bwtrs);
        self.print_info("runs", bwtrs.runs());
        self.print_info("block computation ms", start.elapsed().as_millis());

        let start = Instant::now();
        let (chosen, stats) = tunneler.select();
        self.print_info("candidate blocks", stats.candidate_blocks);
        self.print_info("tunneled blocks", stats.tunneled_blocks);
        self.print_info("expected benefit bits", stats.benefit_bits);
        self.print_info("expected aux bits", stats.tax_bits);
        self.print_info("block choice ms", start.elapsed().as_millis());

        let start = Instant::now();
        let (tbwt_idx, aux) = tunneler.tunnel_bwt(&mut bwt, &chosen);
        let folded = transform_aux(&bwt, tbwt_idx, &aux);
        self.print_info("tbwt size", bwt.len());
        self.print_info("aux folded size", folded.len());
        self.print_info("tunneling ms", start.elapsed().as_millis());

        let start = Instant::now();
        out.extend_from_slice(&(n as u32).to_le_bytes());
        out.extend_from_slice(&(bwt.len() as u32).to_le_bytes());
        out.extend_from_slice(&(folded.len() as u32).to_le_bytes());
        out.extend_from_slice(&(tbwt_idx as u32).to_le_bytes());
        self.codec.encode(&bwt, out)?;
        let folded_bytes: Vec<u8> = (0..folded.len()).map(|i| folded.get(i)).collect();
        self.codec.encode(&folded_bytes, out)?;
        self.print_info("encoding ms", start.elapsed().as_millis());
        self.print_info("block payload", out.len());
        Ok(())
    }

    fn decompress_block(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut cur = Cursor::new(data);
        let n = read_u32(&mut cur)? as usize;
        let m = read_u32(&mut cur)? as usize;
        let folded_len = read_u32(&mut cur)? as usize;
        let tbwt_idx = read_u32(&mut cur)? as usize;

        if n > MAX_BLOCK_SIZE || m > n || folded_len > m {
            return Err(TbwzError::invalid_arg("tbwt block sizes out of range"));
        }
        if n > 0 && (m == 0 || tbwt_idx == 0 || tbwt_idx > m) {
            return Err(TbwzError::invalid_arg("tbwt index outside its block"));
        }

        let mut tbwt = vec![0u8; m];
        self.codec.decode(&mut cur, &mut tbwt)?;

        let mut folded_bytes = vec![0u8; folded_len];
        self.codec.decode(&mut cur, &mut folded_bytes)?;
        let mut folded = TwoBitVec::with_len(folded_len);
        for (i, &v) in folded_bytes.iter().enumerate() {
            if v >= REM {
                return Err(TbwzError::invalid_aux("folded aux code out of range"));
            }
            folded.set(i, v);
        }

        if cur.position() as usize != data.len() {
            return Err(TbwzError::block_decode_mismatch(
                cur.position() as usize,
                data.len(),
            ));
        }

        let aux = retransform_aux(&tbwt, tbwt_idx, &folded)?;
        invert_tunneled_bwt(&tbwt, &aux, tbwt_idx, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_basic() {
        let c = TbwtCompressor::new(1 << 20);
        for text in [
            b"".as_slice(),
            b"a",
            b"ba",
            b"aaaa",
            b"abcabcabcabc",
            b"mississippi",
            b"the quick brown fox jumps over the lazy dog",
        ] {
            let enc = c.compress(text).unwrap();
            assert_eq!(c.decompress(&enc).unwrap(), text, "failed for {text:?}");
        }
    }

    #[test]
    fn test_roundtrip_tunneled_input() {
        let c = TbwtCompressor::new(1 << 22);
        let text = b"abcdefghij".repeat(400);
        let enc = c.compress(&text).unwrap();
        assert_eq!(c.decompress(&enc).unwrap(), text);
    }

    #[test]
    fn test_roundtrip_multi_block() {
        let c = TbwtCompressor::new(128);
        let text = b"small blocks force several frames ".repeat(30);
        let enc = c.compress(&text).unwrap();
        assert_eq!(c.decompress(&enc).unwrap(), text);
    }

    #[test]
    fn test_rejects_bad_tbwt_index() {
        let c = TbwtCompressor::new(1 << 20);
        let mut enc = c.compress(b"hello world").unwrap();
        // Header is 16 bytes; tbwt_idx sits at payload offset 12.
        enc[16 + 12..16 + 16].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            c.decompress(&enc),
            Err(TbwzError::InvalidArg { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_folded_aux() {
        let c = TbwtCompressor::new(1 << 20);
        let mut enc = c.compress(b"hello world").unwrap();
        enc[16 + 8..16 + 12].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            c.decompress(&enc),
            Err(TbwzError::InvalidArg { .. })
        ));
    }
}
