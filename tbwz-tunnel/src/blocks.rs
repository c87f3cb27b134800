//! Blocks and block collisions in a BWT.
//!
//! A *block* is anchored at a run of height ≥ 2 and extended column by
//! column through LF as long as every image lands inside a single run. Only
//! *perfect* extensions survive — merges happen when the image run has
//! exactly the anchor's height, so every column of a surviving block covers
//! a whole run. `end(b)` is the LF image of the start after the full width,
//! i.e. one column past the block.
//!
//! Collisions between blocks are kept in one dense array of `n / 2` cells.
//! Every block with height ≥ 2 pre-reserves the cell stride between its
//! first and last row-pair as a landing zone; `add_collision(inner, outer)`
//! fills the zone back-to-front, and a cell still holding the sentinel value
//! (the total block count) means "free".

use tbwz_bwt::BwtRunIndex;

/// Minimum height of a tunnelable block.
pub const MIN_BLOCK_HEIGHT: usize = 2;

/// Block table plus the collision map.
#[derive(Debug)]
pub struct BlockNav {
    /// One block per run; `end[b]` is the exclusive end column position.
    end: Vec<u32>,
    /// Dense collision storage, sentinel-initialized.
    collisions: Vec<u32>,
    blocks: usize,
}

impl BlockNav {
    /// Compute all blocks of `bwtrs` and set up an empty collision map.
    pub fn new(bwtrs: &BwtRunIndex) -> Self {
        let blocks = bwtrs.runs();
        let mut nav = Self {
            end: Vec::new(),
            collisions: Vec::new(),
            blocks,
        };
        nav.compute_blocks(bwtrs);
        nav.init_empty_collision_map(bwtrs);
        nav
    }

    fn compute_blocks(&mut self, bwtrs: &BwtRunIndex) {
        let blocks = self.blocks;
        let mut bend: Vec<u32> = (0..blocks).map(|b| bwtrs.run_lf(b) as u32).collect();
        let pbend = &mut self.end;
        *pbend = bend.clone();

        let mut stack: Vec<usize> = Vec::new();
        for b in 0..blocks {
            if bwtrs.height(b) < MIN_BLOCK_HEIGHT {
                continue;
            }
            stack.push(b);
            while let Some(&top) = stack.last() {
                let landing = bwtrs.run_of(bend[top] as usize);
                if bend[top] as usize + bwtrs.height(top) <= bwtrs.end(landing) {
                    // Next column fits inside the landing run, extend.
                    stack.push(landing);
                } else {
                    // Top block is maximal; carry its advance over to the
                    // enclosing block.
                    let done = stack.pop().expect("stack is nonempty here");
                    if let Some(&t) = stack.last() {
                        bend[t] = bend[done] + (bend[t] - bwtrs.start(done) as u32);
                        if bwtrs.height(done) == bwtrs.height(t) {
                            // Equal heights merge into one perfect block;
                            // the absorbed inner collapses to width 1.
                            pbend[t] = pbend[done];
                            pbend[done] = bwtrs.run_lf(done) as u32;
                        }
                    }
                }
            }
        }
    }

    fn init_empty_collision_map(&mut self, bwtrs: &BwtRunIndex) {
        self.collisions = vec![self.blocks as u32; bwtrs.n() / MIN_BLOCK_HEIGHT];
        for b in 0..self.blocks {
            if bwtrs.height(b) >= MIN_BLOCK_HEIGHT {
                let last_col = bwtrs.end(b) / MIN_BLOCK_HEIGHT - 1;
                self.collisions[last_col] +=
                    (last_col - bwtrs.start(b) / MIN_BLOCK_HEIGHT) as u32;
            }
        }
    }

    /// Number of blocks (one per run).
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Exclusive end position of block `b`.
    #[inline]
    pub fn end_of(&self, b: usize) -> usize {
        self.end[b] as usize
    }

    /// Move the end of block `b` (used while physically tunneling).
    pub fn set_end(&mut self, b: usize, e: usize) {
        self.end[b] = e as u32;
    }

    /// Record that `outer` runs a column through the run anchoring `inner`.
    pub fn add_collision(&mut self, bwtrs: &BwtRunIndex, inner: usize, outer: usize) {
        let last_col = bwtrs.end(inner) / MIN_BLOCK_HEIGHT - 1;
        let new_col = last_col - (self.collisions[last_col] - self.blocks as u32) as usize;
        self.collisions[last_col] -= 1;
        self.collisions[new_col] = outer as u32;
    }

    /// All blocks whose anchor run lies under a column of `b`, in column
    /// order. The first entry is `b` itself.
    pub fn inner_collisions(&self, bwtrs: &BwtRunIndex, b: usize) -> Vec<u32> {
        let mut cols = vec![b as u32];
        let mut i = bwtrs.run_lf(b);
        while i != self.end_of(b) {
            let b_ = bwtrs.run_of(i);
            if self.collisions[bwtrs.start(b_) / MIN_BLOCK_HEIGHT] == self.blocks as u32 {
                // Nothing recorded against b_, hop over its block.
                i = self.end_of(b_) + (i - bwtrs.start(b_));
            } else {
                cols.push(b_ as u32);
                i = bwtrs.run_lf(b_) + (i - bwtrs.start(b_));
            }
        }
        cols
    }

    /// All blocks that run a column through `b` or, transitively, through
    /// one of those. The first entry is `b` itself.
    pub fn outer_collisions(&self, bwtrs: &BwtRunIndex, b: usize) -> Vec<u32> {
        let mut cols = vec![b as u32];
        let mut i = 0;
        while i < cols.len() {
            let b_ = cols[i] as usize;
            let mut j = bwtrs.start(b_) / MIN_BLOCK_HEIGHT;
            let end = bwtrs.end(b_) / MIN_BLOCK_HEIGHT;
            while j < end && self.collisions[j] != self.blocks as u32 {
                cols.push(self.collisions[j]);
                j += 1;
            }
            i += 1;
        }
        cols
    }

    /// Sever all collision lookups through `b`.
    pub fn remove_inner_outer_collisions(&mut self, bwtrs: &BwtRunIndex, b: usize) {
        self.collisions[bwtrs.start(b) / MIN_BLOCK_HEIGHT] = self.blocks as u32;
    }

    /// Whether block `b` never grew past a single column.
    pub fn is_width_one(&self, bwtrs: &BwtRunIndex, b: usize) -> bool {
        self.end_of(b) == bwtrs.run_lf(b)
    }
}
