//! The tunneling engine.
//!
//! Ties the pieces together for one block of input:
//!
//! 1. [`Tunneler::new`] walks every block once, filling the scoring model
//!    and recording collisions.
//! 2. [`Tunneler::select`] runs the symbolic rate-distortion loop over a
//!    lazy heap and returns the chosen blocks in pop order.
//! 3. [`Tunneler::tunnel_bwt`] rewrites the BWT into the tunneled BWT and
//!    the aux vector.
//! 4. [`invert_tunneled_bwt`] walks Φ over the tunneled BWT and emits the
//!    original text front to back.

use tbwz_bwt::BwtRunIndex;
use tbwz_core::lheap::{self, ValueState};
use tbwz_core::{Result, TbwzError, TwoBitVec};

use crate::aux::{IGN_L, REG, REM, SKP_F};
use crate::blocks::BlockNav;
use crate::score::RleScoreModel;

const STATE_UNCHANGED: u8 = 0;
const STATE_DECREASED: u8 = 1;
const STATE_CLEARED: u8 = 2;

/// Figures reported to the caller after selection, for telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TunnelStats {
    /// Blocks that entered the heap.
    pub candidate_blocks: usize,
    /// Blocks chosen for physical tunneling.
    pub tunneled_blocks: usize,
    /// Estimated TBWT benefit of the choice, in bits.
    pub benefit_bits: i64,
    /// Estimated aux cost of the choice, in bits.
    pub tax_bits: i64,
}

/// Tunneling driver for one BWT.
#[derive(Debug)]
pub struct Tunneler<'a> {
    bwtrs: &'a BwtRunIndex,
    nav: BlockNav,
    model: RleScoreModel,
    bstate: TwoBitVec,
}

impl<'a> Tunneler<'a> {
    /// Set up block navigation, scores and collisions for `bwtrs`.
    pub fn new(bwtrs: &'a BwtRunIndex) -> Self {
        let mut nav = BlockNav::new(bwtrs);
        let mut model = RleScoreModel::new(bwtrs);
        let mut bstate = TwoBitVec::with_len(nav.blocks());

        for b in 0..nav.blocks() {
            if nav.is_width_one(bwtrs, b) {
                bstate.set(b, STATE_CLEARED);
                continue;
            }

            // Walk the block's columns: score each one and record this block
            // as an outer collider wherever the relative offsets shift.
            model.add_block_column(bwtrs, b, b);
            let mut lc_soffset = bwtrs.n();
            let mut lc_eoffset = bwtrs.n();
            let mut i = bwtrs.run_lf(b);
            loop {
                let col = bwtrs.run_of(i);
                let ds = i - bwtrs.start(col);
                model.add_block_column(bwtrs, b, col);
                if !nav.is_width_one(bwtrs, col) {
                    let de = bwtrs.end(col) - (i + bwtrs.height(b));
                    if ds < lc_soffset || de < lc_eoffset {
                        lc_soffset = ds;
                        lc_eoffset = de;
                        nav.add_collision(bwtrs, col, b);
                    }
                }
                i = bwtrs.run_lf(col) + ds;
                if i == nav.end_of(b) {
                    break;
                }
            }
        }

        Self {
            bwtrs,
            nav,
            model,
            bstate,
        }
    }

    /// Query and reset the score state of block `b`.
    fn blockstate(&mut self, b: usize) -> u8 {
        let s = self.bstate.get(b);
        self.bstate.set(b, STATE_UNCHANGED);
        s
    }

    /// Symbolically tunnel `b`: update the model and depress every collider.
    pub fn tunnel_block_symbolic(&mut self, b: usize) {
        self.model.tunnel_block_symbolic(b);

        for &ic in self.nav.inner_collisions(self.bwtrs, b).iter().skip(1) {
            self.model.reduce_score_of_inner_block(b, ic as usize);
            self.bstate.set(ic as usize, STATE_DECREASED);
        }
        for &oc in self.nav.outer_collisions(self.bwtrs, b).iter().skip(1) {
            self.model.reduce_score_of_outer_block(b, oc as usize);
            self.bstate.set(oc as usize, STATE_DECREASED);
        }
        self.nav.remove_inner_outer_collisions(self.bwtrs, b);
    }

    /// Run the symbolic selection loop.
    ///
    /// Returns the chosen blocks, best score first, plus the stats of the
    /// choice. The returned set is collision-free: every collider of a
    /// chosen block had its score reduced before it could be popped.
    pub fn select(&mut self) -> (Vec<u32>, TunnelStats) {
        let mut heap: Vec<u32> = Vec::with_capacity(self.nav.blocks());
        for b in 0..self.nav.blocks() {
            if self.blockstate(b) != STATE_CLEARED {
                heap.push(b as u32);
            }
        }
        let candidates = heap.len();

        {
            let model = &self.model;
            lheap::make_lheap(&mut heap, &mut |a: &u32, b: &u32| {
                model.blockscore(*a as usize) < model.blockscore(*b as usize)
            });
        }

        let mut best = TunnelStats {
            candidate_blocks: candidates,
            ..TunnelStats::default()
        };
        let mut benefit = 0i64;
        let mut tax = 0i64;

        let mut len = heap.len();
        let mut sorted = Vec::with_capacity(heap.len());
        while len > 0 {
            let b = heap[0] as usize;
            self.tunnel_block_symbolic(b);

            // Split borrows so the two heap callbacks can coexist.
            let model = &self.model;
            let bstate = &mut self.bstate;
            len = lheap::pop_lheap_nomove(
                &mut heap,
                len,
                &mut |id: &u32| {
                    let s = bstate.get(*id as usize);
                    bstate.set(*id as usize, STATE_UNCHANGED);
                    match s {
                        STATE_DECREASED => ValueState::Decreased,
                        STATE_CLEARED => ValueState::Empty,
                        _ => ValueState::Unchanged,
                    }
                },
                &mut |a: &u32, b: &u32| {
                    model.blockscore(*a as usize) < model.blockscore(*b as usize)
                },
            );
            sorted.push(b as u32);

            let new_benefit = self.model.gross_benefit();
            let new_tax = self.model.aux_tax();
            if new_benefit - benefit >= new_tax - tax {
                benefit = new_benefit;
                tax = new_tax;
                best.tunneled_blocks = sorted.len();
                best.benefit_bits = new_benefit;
                best.tax_bits = new_tax;
            }
        }

        sorted.truncate(best.tunneled_blocks);
        (sorted, best)
    }

    /// Physically tunnel `chosen` blocks (best score first) out of `bwt`.
    ///
    /// `bwt` is rewritten in place into the tunneled BWT; returns the new
    /// primary index and the aux vector (one entry longer than the TBWT,
    /// terminated with [`REG`]).
    pub fn tunnel_bwt(mut self, bwt: &mut Vec<u8>, chosen: &[u32]) -> (usize, TwoBitVec) {
        let bwtrs = self.bwtrs;
        let mut aux = TwoBitVec::with_len(bwtrs.idx_n() + 1);

        let mut intervals: Vec<usize> = Vec::new();
        for &b in chosen {
            let b = b as usize;

            // Row intervals of b not yet claimed by an earlier tunnel.
            intervals.clear();
            let mut lastaux = REM;
            let base = bwtrs.log_to_idx(bwtrs.start(b));
            for i in bwtrs.log_to_idx(bwtrs.start(b) + 1)..bwtrs.log_to_idx(bwtrs.end(b)) {
                if aux.get(i) != lastaux {
                    lastaux = aux.get(i);
                    intervals.push(i - base);
                }
            }
            intervals.push(bwtrs.height(b));

            let mut cur = bwtrs.run_lf(b);
            let mut prev = bwtrs.start(b);
            while cur != self.nav.end_of(b) {
                // The previous column keeps only its head on the L side.
                for k in (1..intervals.len()).step_by(2) {
                    let i_s = bwtrs.log_to_idx(prev + intervals[k - 1]);
                    let i_e = bwtrs.log_to_idx(prev + intervals[k]);
                    for i in i_s..i_e {
                        aux.or_assign(i, IGN_L);
                    }
                }

                prev = cur;
                let cur_r = bwtrs.run_of(cur);
                cur = if aux.get(bwtrs.log_to_idx(cur + intervals[0])) == IGN_L {
                    // That run's block is tunneled already: jump across it.
                    self.nav.end_of(cur_r) + (cur - bwtrs.start(cur_r))
                } else {
                    bwtrs.run_lf(cur_r) + (cur - bwtrs.start(cur_r))
                };

                // The advanced column loses its body on the F side.
                for k in (1..intervals.len()).step_by(2) {
                    let i_s = bwtrs.log_to_idx(prev + intervals[k - 1]);
                    let i_e = bwtrs.log_to_idx(prev + intervals[k]);
                    for i in i_s..i_e {
                        aux.or_assign(i, SKP_F);
                    }
                }
            }
            // Park the end on the last column so later jumps land right.
            self.nav.set_end(b, prev);
        }

        // Drop rows marked on both sides; recompute the primary index at the
        // old sentinel border.
        let borders = [bwtrs.bwt_idx(), bwtrs.idx_n()];
        let mut p = 0usize;
        let mut i = 0usize;
        let mut tbwt_idx = 0usize;
        for &border in &borders {
            tbwt_idx = p;
            while i < border {
                if aux.get(i) != REM {
                    bwt[p] = bwt[i];
                    let v = aux.get(i);
                    aux.set(p, v);
                    p += 1;
                }
                i += 1;
            }
        }
        bwt.truncate(p);
        aux.set(p, REG);
        aux.resize(p + 1);
        (tbwt_idx, aux)
    }
}

/// Invert a tunneled BWT straight to the original text of length `n`.
pub fn invert_tunneled_bwt(
    tbwt: &[u8],
    aux: &TwoBitVec,
    tbwt_idx: usize,
    n: usize,
) -> Result<Vec<u8>> {
    let m = tbwt.len();
    if n == 0 {
        return if m == 0 {
            Ok(Vec::new())
        } else {
            Err(TbwzError::invalid_arg("nonempty tbwt for empty text"))
        };
    }
    if m == 0 || tbwt_idx == 0 || tbwt_idx > m {
        return Err(TbwzError::invalid_arg("tbwt index is invalid"));
    }
    if aux.len() != m + 1 || aux.get(m) != REG {
        return Err(TbwzError::invalid_aux("aux terminator missing"));
    }

    // Character frequencies over the rows that own a first-column slot.
    let mut c = [0usize; 256];
    for (i, &b) in tbwt.iter().enumerate() {
        if aux.get(i) != IGN_L {
            c[b as usize] += 1;
        }
    }

    // First-column start cursors, threading around SKP_F holes. The cursor
    // before the first consumed slot is kept, mirroring the sentinel slot.
    let mut j = 0usize;
    for cell in c.iter_mut() {
        let mut cnt = *cell;
        *cell = j;
        while cnt > 0 {
            j += 1;
            if j >= aux.len() {
                return Err(TbwzError::invalid_aux("first-column slots overflow"));
            }
            if aux.get(j) != SKP_F {
                cnt -= 1;
            }
        }
    }

    let mut phi = vec![0u32; m];

    // Distance entries: a skipped slot points back at the head of its
    // skip-run, which is the topmost row of the tunnel's last column.
    let mut l = 0usize;
    for jj in 0..m {
        if aux.get(jj) == SKP_F {
            phi[jj] = (jj - l) as u32;
        } else {
            l = jj;
        }
    }

    // Regular entries: each slot receives the row it is the LF image of.
    // Exactly one row's slot crosses the sentinel boundary; it seeds the
    // walk at slot 0.
    for (i, &b) in tbwt.iter().enumerate() {
        if aux.get(i) == IGN_L {
            continue;
        }
        let cursor = &mut c[b as usize];
        let mut j = *cursor;
        if j < tbwt_idx {
            loop {
                j += 1;
                if j >= aux.len() {
                    return Err(TbwzError::invalid_aux("first-column slots overflow"));
                }
                if aux.get(j) != SKP_F {
                    break;
                }
            }
            if j >= tbwt_idx {
                phi[0] = i as u32;
            } else {
                phi[j] = i as u32;
            }
        } else {
            if j >= m {
                return Err(TbwzError::invalid_aux("first-column slots overflow"));
            }
            phi[j] = i as u32;
            loop {
                j += 1;
                if j >= aux.len() {
                    break;
                }
                if aux.get(j) != SKP_F {
                    break;
                }
            }
        }
        *cursor = j;
    }

    // Φ-walk, front to back, with a stack carrying the row offset while the
    // walk is inside a tunnel.
    let mut s = vec![0u8; n];
    let mut stack: Vec<u32> = Vec::new();
    let mut j = 0usize;
    for out in s.iter_mut() {
        j = phi[j] as usize;
        *out = tbwt[j];
        if aux.get(j + 1) == IGN_L {
            // Bottom of a tunnel's first column: resume at the stored row.
            let d = stack
                .pop()
                .ok_or_else(|| TbwzError::invalid_aux("missing start of a tunnel"))?;
            j += d as usize;
            if j >= m {
                return Err(TbwzError::invalid_aux("tunnel offset out of range"));
            }
        } else if aux.get(j) == SKP_F {
            // Interior row of a last column: remember the offset, move to
            // the top row.
            let d = phi[j] as usize;
            stack.push(d as u32);
            j = j
                .checked_sub(d)
                .ok_or_else(|| TbwzError::invalid_aux("tunnel offset out of range"))?;
        } else if aux.get(j + 1) == SKP_F {
            // Top row of a last column.
            stack.push(0);
        }
    }
    if !stack.is_empty() {
        return Err(TbwzError::invalid_aux("missing end of a tunnel"));
    }
    Ok(s)
}
