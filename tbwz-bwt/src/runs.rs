//! Run index over an indexed BWT.
//!
//! Runs are maximal equal-character stretches of the *logical* BWT; the
//! sentinel row always forms its own height-1 run, so the sweep restarts at
//! the primary index. Each border region is closed with a terminator run,
//! which keeps `end(r) = start(r + 1)` valid for every real run.

/// Navigation structure over the runs of an indexed BWT.
#[derive(Debug)]
pub struct BwtRunIndex {
    runs: usize,
    idx_runs: usize,
    bwt_idx: usize,
    n: usize,
    idx_n: usize,
    /// LF at the start of each run.
    lfr: Vec<u32>,
    /// Start positions of all runs, ascending; `rs[runs]` holds `n`.
    rs: Vec<u32>,
}

impl BwtRunIndex {
    /// Build the index for `bwt` with primary index `bwt_idx`.
    pub fn new(bwt: &[u8], bwt_idx: usize) -> Self {
        let idx_n = bwt.len();
        debug_assert!(bwt_idx <= idx_n);
        let borders = [bwt_idx, idx_n];

        // Cumulative first-column histogram; logical slot 0 belongs to the
        // sentinel row.
        let mut c = [0usize; 256];
        for &b in bwt {
            c[b as usize] += 1;
        }
        let mut acc = 1usize;
        for cell in c.iter_mut() {
            let cnt = *cell;
            *cell = acc;
            acc += cnt;
        }

        let mut idx_runs = 0usize;
        let mut rs = Vec::new();
        let mut lfr = Vec::new();

        let mut i = 0usize;
        let mut i_log = 0usize;
        for &border in &borders {
            let mut lastchar: u16 = u16::MAX;
            while i < border {
                let ch = bwt[i];
                if lastchar != u16::from(ch) {
                    lastchar = u16::from(ch);
                    idx_runs += 1;
                    rs.push(i_log as u32);
                    lfr.push(c[ch as usize] as u32);
                }
                c[ch as usize] += 1;
                i += 1;
                i_log += 1;
            }
            // Terminator for this region; after the first border it doubles
            // as the sentinel run.
            rs.push(i_log as u32);
            lfr.push(0);
            i_log += 1;
        }

        Self {
            runs: idx_runs + 1,
            idx_runs,
            bwt_idx,
            n: idx_n + 1,
            idx_n,
            lfr,
            rs,
        }
    }

    /// Number of logical runs (the sentinel run included).
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Number of runs in the indexed BWT.
    pub fn idx_runs(&self) -> usize {
        self.idx_runs
    }

    /// Primary index.
    pub fn bwt_idx(&self) -> usize {
        self.bwt_idx
    }

    /// Logical text length (indexed length plus the sentinel).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Indexed BWT length.
    pub fn idx_n(&self) -> usize {
        self.idx_n
    }

    /// LF at the start of run `r`.
    #[inline]
    pub fn run_lf(&self, r: usize) -> usize {
        self.lfr[r] as usize
    }

    /// Logical start of run `r`.
    #[inline]
    pub fn start(&self, r: usize) -> usize {
        self.rs[r] as usize
    }

    /// Exclusive logical end of run `r`.
    #[inline]
    pub fn end(&self, r: usize) -> usize {
        self.rs[r + 1] as usize
    }

    /// Height of run `r`.
    #[inline]
    pub fn height(&self, r: usize) -> usize {
        self.end(r) - self.start(r)
    }

    /// Run containing logical position `i`; a value `>= runs()` when `i` is
    /// past the end.
    pub fn run_of(&self, i: usize) -> usize {
        self.rs.partition_point(|&s| s as usize <= i) - 1
    }

    /// Convert an indexed position to its logical position.
    #[inline]
    pub fn idx_to_log(&self, p: usize) -> usize {
        if p < self.bwt_idx { p } else { p + 1 }
    }

    /// Convert a logical position to its indexed position.
    #[inline]
    pub fn log_to_idx(&self, p: usize) -> usize {
        if p <= self.bwt_idx { p } else { p - 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::bw_transform;

    #[test]
    fn test_periodic_runs() {
        // bwt("abcabcabcabc") = "ccccaaaabbbb", idx 4; logical runs are the
        // c-run, the sentinel, the a-run and the b-run.
        let (bwt, idx) = bw_transform(b"abcabcabcabc");
        assert_eq!(bwt, b"ccccaaaabbbb");
        assert_eq!(idx, 4);

        let ri = BwtRunIndex::new(&bwt, idx);
        assert_eq!(ri.runs(), 4);
        assert_eq!(ri.idx_runs(), 3);
        assert_eq!(ri.n(), 13);

        assert_eq!(
            (0..ri.runs()).map(|r| ri.start(r)).collect::<Vec<_>>(),
            vec![0, 4, 5, 9]
        );
        assert_eq!(
            (0..ri.runs()).map(|r| ri.height(r)).collect::<Vec<_>>(),
            vec![4, 1, 4, 4]
        );
        // First-column slots: sentinel 0, a's from 1, b's from 5, c's from 9.
        assert_eq!(
            (0..ri.runs()).map(|r| ri.run_lf(r)).collect::<Vec<_>>(),
            vec![9, 0, 1, 5]
        );
    }

    #[test]
    fn test_run_of() {
        let (bwt, idx) = bw_transform(b"abcabcabcabc");
        let ri = BwtRunIndex::new(&bwt, idx);
        assert_eq!(ri.run_of(0), 0);
        assert_eq!(ri.run_of(3), 0);
        assert_eq!(ri.run_of(4), 1);
        assert_eq!(ri.run_of(5), 2);
        assert_eq!(ri.run_of(12), 3);
        assert!(ri.run_of(13) >= ri.runs());
    }

    #[test]
    fn test_position_conversions() {
        let ri = BwtRunIndex::new(b"ccccaaaabbbb", 4);
        assert_eq!(ri.idx_to_log(3), 3);
        assert_eq!(ri.idx_to_log(4), 5);
        assert_eq!(ri.log_to_idx(3), 3);
        assert_eq!(ri.log_to_idx(4), 4);
        assert_eq!(ri.log_to_idx(5), 4);
        for p in 0..ri.idx_n() {
            assert_eq!(ri.log_to_idx(ri.idx_to_log(p)), p);
        }
    }

    #[test]
    fn test_sentinel_run_is_height_one() {
        for text in [b"mississippi".as_slice(), b"banana", b"ba", b"abcabc"] {
            let (bwt, idx) = bw_transform(text);
            let ri = BwtRunIndex::new(&bwt, idx);
            let sentinel = ri.run_of(idx);
            assert_eq!(ri.start(sentinel), idx);
            assert_eq!(ri.height(sentinel), 1);
            assert_eq!(ri.run_lf(sentinel), 0);
        }
    }

    #[test]
    fn test_terminator_run() {
        let (bwt, idx) = bw_transform(b"banana");
        let ri = BwtRunIndex::new(&bwt, idx);
        assert_eq!(ri.start(ri.runs()), ri.n());
    }
}
