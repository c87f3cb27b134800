//! End-to-end roundtrips for both pipelines.

use tbwz_compress::{BlockCompressor, BwtCompressor, TbwtCompressor};

fn xorshift_bytes(seed: u32, len: usize) -> Vec<u8> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 13) as u8
        })
        .collect()
}

fn check_both(data: &[u8], block_size: usize) {
    let bwz = BwtCompressor::new(block_size);
    let enc = bwz.compress(data).unwrap();
    assert_eq!(bwz.decompress(&enc).unwrap(), data, "bwz roundtrip");

    let tbwz = TbwtCompressor::new(block_size);
    let enc = tbwz.compress(data).unwrap();
    assert_eq!(tbwz.decompress(&enc).unwrap(), data, "tbwz roundtrip");
}

#[test]
fn empty_input() {
    let c = TbwtCompressor::new(1 << 20);
    let enc = c.compress(b"").unwrap();
    // Header only: one offset pointing right past itself.
    assert_eq!(enc.len(), 8);
    assert_eq!(c.decompress(&enc).unwrap(), b"");
    check_both(b"", 1 << 20);
}

#[test]
fn singleton() {
    check_both(b"a", 1 << 20);
}

#[test]
fn pure_run() {
    check_both(b"aaaa", 1 << 20);
    check_both(&vec![b'z'; 5000], 1 << 20);
}

#[test]
fn periodic() {
    check_both(b"abcabcabcabc", 1 << 20);
    check_both(&b"abcdefghij".repeat(500), 1 << 20);
}

#[test]
fn mississippi() {
    check_both(b"mississippi", 1 << 20);
}

#[test]
fn tunneling_shrinks_wide_repeats() {
    // Wide repeated phrase: the rate model clears its aux tax, so at least
    // one block tunnels and the stored tbwt is shorter than the input. The
    // single-block payload starts at offset 16 with n and m.
    let data = b"abcdefghij".repeat(500);
    let enc = TbwtCompressor::new(1 << 20).compress(&data).unwrap();
    let n = u32::from_le_bytes(enc[16..20].try_into().unwrap()) as usize;
    let m = u32::from_le_bytes(enc[20..24].try_into().unwrap()) as usize;
    assert_eq!(n, data.len());
    assert!(m < n, "tbwt {m} not shorter than input {n}");
}

#[test]
fn random_64k() {
    let data = xorshift_bytes(0xdecafbad, 64 * 1024);
    check_both(&data, 1 << 20);
}

#[test]
#[ignore = "heavy: 1 MiB random block, slow without --release"]
fn random_1m() {
    let data = xorshift_bytes(0x1d872b41, 1 << 20);
    check_both(&data, 1 << 21);
    // Output stays within the incompressible bound plus codec margin.
    let enc = TbwtCompressor::new(1 << 21).compress(&data).unwrap();
    assert!(enc.len() <= data.len() + 2_000_000);
}

#[test]
fn multi_block_boundaries() {
    let data = b"mississippi river mississippi delta ".repeat(100);
    for bs in [1, 7, 64, 1000, data.len()] {
        check_both(&data, bs);
    }
}

#[test]
fn recompression_is_stable() {
    let c = TbwtCompressor::new(4096);
    let data = b"what gets compressed twice decompresses twice ".repeat(64);
    let once = c.compress(&data).unwrap();
    let back = c.decompress(&once).unwrap();
    let twice = c.compress(&back).unwrap();
    assert_eq!(once, twice, "compressor kept state between runs");
    assert_eq!(c.decompress(&twice).unwrap(), data);
}

#[test]
fn determinism() {
    let data = xorshift_bytes(0x5eed, 10_000);
    let c = TbwtCompressor::new(4096);
    assert_eq!(c.compress(&data).unwrap(), c.compress(&data).unwrap());
}

#[test]
fn binary_alphabet_and_all_bytes() {
    let data: Vec<u8> = (0..4096).map(|i| (i % 2) as u8).collect();
    check_both(&data, 1 << 20);
    let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
    check_both(&data, 1 << 20);
}

#[test]
fn truncated_stream_fails_cleanly() {
    let c = TbwtCompressor::new(1 << 20);
    let enc = c.compress(&b"some data that spans a real payload ".repeat(20)).unwrap();
    for cut in [0, 4, 12, enc.len() / 2, enc.len() - 1] {
        assert!(c.decompress(&enc[..cut]).is_err(), "cut at {cut} passed");
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_matches_serial() {
    let data = b"parallel blocks must frame identically ".repeat(200);
    let c = TbwtCompressor::new(512);
    let serial = c.compress(&data).unwrap();
    let parallel = tbwz_compress::compress_parallel(&c, &data).unwrap();
    assert_eq!(serial, parallel);
    assert_eq!(c.decompress(&parallel).unwrap(), data);
}
