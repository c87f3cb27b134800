//! The auxiliary tunnel structure and its run-folded wire form.
//!
//! Every position of a tunneled BWT carries a 2-bit code:
//!
//! - [`REG`]: a regular row
//! - [`SKP_F`]: skip this row on the first-column side of LF (interior rows
//!   of a tunnel's last column)
//! - [`IGN_L`]: ignore this row on the last-column side (interior rows of a
//!   tunnel's first column)
//! - [`REM`]: both marks; such rows are erased during tunneling and never
//!   survive into the final structure
//!
//! Non-`REG` codes only ever sit on run-*body* positions (a tunnel column
//! always covers a whole run, and marks start one row below the run head),
//! and all body rows of one run carry the same code. The wire form exploits
//! that: per TBWT run with at least two characters, keep just the code of
//! the first body character. Run heads are implicitly `REG`.

use tbwz_core::{Result, TbwzError, TwoBitVec};

/// Regular entry.
pub const REG: u8 = 0;
/// Row skipped on the first-column side.
pub const SKP_F: u8 = 1;
/// Row ignored on the last-column side.
pub const IGN_L: u8 = 2;
/// Row marked for removal.
pub const REM: u8 = SKP_F | IGN_L;
/// Number of live aux codes (REM never reaches the wire).
pub const AUX_SIGMA: usize = 3;

/// Fold `aux` onto the run structure of `tbwt` (split at `tbwt_idx`).
///
/// Returns one code per run with height at least two, in text order of the
/// two regions below and above the primary index.
pub fn transform_aux(tbwt: &[u8], tbwt_idx: usize, aux: &TwoBitVec) -> TwoBitVec {
    let m = tbwt.len();
    if m == 0 {
        return TwoBitVec::new();
    }
    debug_assert!(tbwt_idx >= 1 && tbwt_idx <= m);
    debug_assert!(aux.len() == m + 1);

    let mut folded = TwoBitVec::with_len(m);
    let mut j = 0usize;

    let bounds = [0usize, tbwt_idx, m];
    for r in 0..2 {
        let mut newrun = true;
        for i in bounds[r] + 1..bounds[r + 1] {
            if tbwt[i] != tbwt[i - 1] {
                newrun = true;
            } else if newrun {
                folded.set(j, aux.get(i));
                j += 1;
                newrun = false;
            }
        }
    }
    folded.resize(j);
    folded
}

/// Unfold a run-based aux back to its positional form.
///
/// The result has `tbwt.len() + 1` entries, terminated with [`REG`]. Fails
/// with `InvalidAux` when the folded stream does not match the run structure
/// of `tbwt` exactly.
pub fn retransform_aux(tbwt: &[u8], tbwt_idx: usize, folded: &TwoBitVec) -> Result<TwoBitVec> {
    let m = tbwt.len();
    let mut aux = TwoBitVec::with_len(m + 1);
    if m == 0 {
        if !folded.is_empty() {
            return Err(TbwzError::invalid_aux("folded aux for an empty tbwt"));
        }
        aux.set(0, REG);
        return Ok(aux);
    }
    if tbwt_idx == 0 || tbwt_idx > m {
        return Err(TbwzError::invalid_aux("primary index outside the tbwt"));
    }

    let mut j = 0usize;
    let bounds = [0usize, tbwt_idx, m];
    for r in 0..2 {
        let mut newrun = true;
        let mut code = REG;
        aux.set(bounds[r], REG);
        for i in bounds[r] + 1..bounds[r + 1] {
            if tbwt[i] != tbwt[i - 1] {
                newrun = true;
                aux.set(i, REG);
            } else {
                if newrun {
                    if j >= folded.len() {
                        return Err(TbwzError::invalid_aux("folded aux shorter than tbwt runs"));
                    }
                    code = folded.get(j);
                    j += 1;
                    newrun = false;
                }
                aux.set(i, code);
            }
        }
    }
    if j != folded.len() {
        return Err(TbwzError::invalid_aux("folded aux longer than tbwt runs"));
    }
    aux.set(m, REG);
    Ok(aux)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aux_from(codes: &[u8]) -> TwoBitVec {
        let mut v = TwoBitVec::with_len(codes.len());
        for (i, &c) in codes.iter().enumerate() {
            v.set(i, c);
        }
        v
    }

    #[test]
    fn test_fold_keeps_one_code_per_run_body() {
        // tbwt "ccccaaaab", idx 4: runs cccc | aaaa | b.
        let tbwt = b"ccccaaaab";
        let aux = aux_from(&[REG, IGN_L, IGN_L, IGN_L, REG, SKP_F, SKP_F, SKP_F, REG, REG]);
        let folded = transform_aux(tbwt, 4, &aux);
        assert_eq!(folded.len(), 2);
        assert_eq!(folded.get(0), IGN_L);
        assert_eq!(folded.get(1), SKP_F);
    }

    #[test]
    fn test_unfold_restores_positional_aux() {
        let tbwt = b"ccccaaaab";
        let folded = aux_from(&[IGN_L, SKP_F]);
        let aux = retransform_aux(tbwt, 4, &folded).unwrap();
        let expect = [REG, IGN_L, IGN_L, IGN_L, REG, SKP_F, SKP_F, SKP_F, REG, REG];
        assert_eq!(aux.len(), expect.len());
        for (i, &e) in expect.iter().enumerate() {
            assert_eq!(aux.get(i), e, "position {i}");
        }
    }

    #[test]
    fn test_fold_unfold_roundtrip() {
        // Runs split at the primary index even when the characters match.
        let tbwt = b"aabbaabbcc";
        let aux = aux_from(&[
            REG, SKP_F, REG, IGN_L, REG, REG, REG, SKP_F, REG, IGN_L, REG,
        ]);
        for idx in [2usize, 4, 5, 8] {
            let folded = transform_aux(tbwt, idx, &aux);
            let back = retransform_aux(tbwt, idx, &folded).unwrap();
            for i in 0..tbwt.len() {
                assert_eq!(back.get(i), aux.get(i), "idx {idx} position {i}");
            }
            assert_eq!(back.get(tbwt.len()), REG);
        }
    }

    #[test]
    fn test_unfold_length_mismatch() {
        let tbwt = b"ccccaaaab";
        assert!(matches!(
            retransform_aux(tbwt, 4, &aux_from(&[IGN_L])),
            Err(TbwzError::InvalidAux { .. })
        ));
        assert!(matches!(
            retransform_aux(tbwt, 4, &aux_from(&[IGN_L, SKP_F, REG])),
            Err(TbwzError::InvalidAux { .. })
        ));
    }

    #[test]
    fn test_empty_tbwt() {
        let folded = transform_aux(b"", 0, &TwoBitVec::with_len(1));
        assert!(folded.is_empty());
        let aux = retransform_aux(b"", 0, &folded).unwrap();
        assert_eq!(aux.len(), 1);
        assert_eq!(aux.get(0), REG);
    }
}
