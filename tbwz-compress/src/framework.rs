//! Block framing: the offsets header and per-block dispatch.

use tbwz_core::{MAX_BLOCK_SIZE, Result, TbwzError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A compressor that works block by block.
///
/// Implementations provide the per-block transforms; the framing (splitting,
/// the offsets header, dispatch and consumption checks) is shared.
pub trait BlockCompressor {
    /// Current block size; always in `1..=MAX_BLOCK_SIZE`.
    fn block_size(&self) -> usize;

    /// Compress one nonempty block of at most [`MAX_BLOCK_SIZE`] bytes.
    fn compress_block(&self, block: &[u8], out: &mut Vec<u8>) -> Result<()>;

    /// Decompress one block from exactly `data`; implementations fail with
    /// `BlockDecodeMismatch` when the slice is not consumed exactly.
    fn decompress_block(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Compress `input` into a framed stream.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut payloads = Vec::new();
        for chunk in input.chunks(self.block_size()) {
            let mut payload = Vec::new();
            self.compress_block(chunk, &mut payload)?;
            payloads.push(payload);
        }
        Ok(assemble(&payloads))
    }

    /// Decompress a framed stream.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut prev = read_offset(data, 0)?;
        if prev < 8 || prev % 8 != 0 || prev > data.len() {
            return Err(TbwzError::invalid_header(format!(
                "header size {prev} does not fit the stream"
            )));
        }
        let blocks = prev / 8 - 1;
        for i in 1..=blocks {
            let end = read_offset(data, i * 8)?;
            if end <= prev || end > data.len() {
                return Err(TbwzError::invalid_header(format!(
                    "block {i} ends at {end}, after {prev}"
                )));
            }
            out.extend_from_slice(&self.decompress_block(&data[prev..end])?);
            prev = end;
        }
        Ok(out)
    }
}

fn read_offset(data: &[u8], at: usize) -> Result<usize> {
    let bytes: [u8; 8] = data
        .get(at..at + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| TbwzError::invalid_header("truncated offset table"))?;
    let v = u64::from_le_bytes(bytes);
    usize::try_from(v).map_err(|_| TbwzError::invalid_header("offset beyond address space"))
}

fn assemble(payloads: &[Vec<u8>]) -> Vec<u8> {
    let header_size = 8 * (payloads.len() + 1);
    let total: usize = payloads.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(header_size + total);

    let mut end = header_size as u64;
    out.extend_from_slice(&end.to_le_bytes());
    for p in payloads {
        end += p.len() as u64;
        out.extend_from_slice(&end.to_le_bytes());
    }
    for p in payloads {
        out.extend_from_slice(p);
    }
    out
}

/// Validate a block size before use.
pub(crate) fn clamp_block_size(bs: usize) -> usize {
    bs.clamp(1, MAX_BLOCK_SIZE)
}

/// Compress `input` with per-block parallelism (requires the `parallel`
/// feature). Output is byte-identical to the sequential path.
#[cfg(feature = "parallel")]
pub fn compress_parallel<C>(compressor: &C, input: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCompressor + Sync,
{
    let chunks: Vec<&[u8]> = input.chunks(compressor.block_size()).collect();
    let payloads: Vec<Vec<u8>> = chunks
        .par_iter()
        .map(|chunk| {
            let mut payload = Vec::new();
            compressor.compress_block(chunk, &mut payload)?;
            Ok(payload)
        })
        .collect::<Result<_>>()?;
    Ok(assemble(&payloads))
}
