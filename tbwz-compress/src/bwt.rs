//! The plain BWT pipeline (`.bwz`).

use std::io::Cursor;
use std::time::Instant;

use tbwz_bwt::{bw_transform, inverse_bw_transform};
use tbwz_codec::{ByteCodec, RleCodec};
use tbwz_core::{MAX_BLOCK_SIZE, Result, TbwzError};

use crate::framework::{BlockCompressor, clamp_block_size};

/// BWT → second-stage codec, block by block.
#[derive(Debug)]
pub struct BwtCompressor {
    block_size: usize,
    quiet: bool,
    codec: RleCodec,
}

impl BwtCompressor {
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

impl Default for BwtCompressor {
    fn default() -> Self {
        Self::new(crate::DEFAULT_BLOCK_SIZE)
    }
}

impl BlockCompressor for BwtCompressor {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn compress_block(&self, block: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let n = block.len();
        debug_assert!(n <= MAX_BLOCK_SIZE);
        self.print_info("block size", n);

        let start = Instant::now();
        let (bwt, bwt_idx) = bw_transform(block);
        self.print_info("bwt index", bwt_idx);
        self.print_info("bwt construction ms", start.elapsed().as_millis());

        let start = Instant::now();
        out.extend_from_slice(&(n as u32).to_le_bytes());
        out.extend_from_slice(&(bwt_idx as u32).to_le_bytes());
        self.codec.encode(&bwt, out)?;
        self.print_info("encoding ms", start.elapsed().as_millis());
        self.print_info("block payload", out.len());
        Ok(())
    }

    fn decompress_block(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut cur = Cursor::new(data);
        let n = read_u32(&mut cur)? as usize;
        let bwt_idx = read_u32(&mut cur)? as usize;
        if n > MAX_BLOCK_SIZE {
            return Err(TbwzError::invalid_arg("block longer than the maximum"));
        }
        if n > 0 && (bwt_idx == 0 || bwt_idx > n) {
            return Err(TbwzError::invalid_arg("bwt index outside its block"));
        }

        let mut bwt = vec![0u8; n];
        self.codec.decode(&mut cur, &mut bwt)?;
        if cur.position() as usize != data.len() {
            return Err(TbwzError::block_decode_mismatch(
                cur.position() as usize,
                data.len(),
            ));
        }
        inverse_bw_transform(&bwt, bwt_idx)
    }
}

pub(crate) fn read_u32(cur: &mut Cursor<&[u8]>) -> Result<u32> {
    use std::io::Read;
    let mut buf = [0u8; 4];
    cur.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
