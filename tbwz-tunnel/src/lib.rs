//! # tbwz Tunnel
//!
//! BWT tunneling: detect rectangular blocks of aligned equal-character runs
//! in a BWT, pick the most profitable non-colliding subset under a
//! rate-distortion model, collapse their interior columns into a shorter
//! tunneled BWT plus a 2-bit aux vector, and invert the result straight back
//! to the original text.
//!
//! Module map:
//!
//! - [`aux`]: the 2-bit aux alphabet and its run-folded wire form
//! - [`blocks`]: block computation and the block-collision map
//! - [`score`]: the run-length scoring model behind block selection
//! - [`engine`]: symbolic selection, the physical rewrite and the Φ-walk
//!   inversion

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aux;
pub mod blocks;
pub mod engine;
pub mod score;

pub use aux::{AUX_SIGMA, IGN_L, REG, REM, SKP_F, retransform_aux, transform_aux};
pub use blocks::BlockNav;
pub use engine::{TunnelStats, Tunneler, invert_tunneled_bwt};
pub use score::RleScoreModel;
