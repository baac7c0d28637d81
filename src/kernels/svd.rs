//! This module contains the pure kernel for truncated-SVD reconstruction of a
//! single channel matrix.
//!
//! The decomposition is computed with `nalgebra` (thin SVD: `U` is rows x m,
//! `Vt` is m x cols, `m = min(rows, cols)`), re-ordered so the singular values
//! are descending, and then truncated to the effective rank.
//!
//! Correctness contract: `U[:, :k]`, `S[:k]` and `Vt[:k, :]` are always sliced
//! with the same effective `k`, the requested rank after clamping to `m`.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};

use crate::error::{Result, SvdPressError};
use crate::kernels::rank::recommended_rank;
use crate::types::RankSpec;

//==================================================================================
// 1. Decomposition
//==================================================================================

/// The `(U, S, Vt)` factors of one channel, with `S` sorted descending.
#[derive(Debug, Clone)]
pub struct SingularTriple {
    u: DMatrix<f64>,
    singular_values: Vec<f64>,
    v_t: DMatrix<f64>,
}

impl SingularTriple {
    /// Decomposes `channel`. Fails on a zero-sized matrix or if the SVD does not converge.
    pub fn decompose(channel: ArrayView2<'_, f64>) -> Result<Self> {
        let (rows, cols) = channel.dim();
        if rows == 0 || cols == 0 {
            return Err(SvdPressError::Decomposition(format!(
                "cannot decompose a {}x{} matrix",
                rows, cols
            )));
        }

        let matrix = DMatrix::from_fn(rows, cols, |i, j| channel[[i, j]]);
        let svd = matrix
            .try_svd(true, true, f64::EPSILON, 0)
            .ok_or_else(|| SvdPressError::Decomposition("SVD did not converge".to_string()))?;
        let u = svd
            .u
            .ok_or_else(|| SvdPressError::Decomposition("left singular vectors missing".into()))?;
        let v_t = svd
            .v_t
            .ok_or_else(|| SvdPressError::Decomposition("right singular vectors missing".into()))?;
        let s = svd.singular_values;

        // Re-order all three factors by descending singular value.
        let m = s.len();
        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&a, &b| s[b].total_cmp(&s[a]));

        Ok(Self {
            u: DMatrix::from_fn(rows, m, |i, j| u[(i, order[j])]),
            singular_values: order.iter().map(|&j| s[j]).collect(),
            v_t: DMatrix::from_fn(m, cols, |i, j| v_t[(order[i], j)]),
        })
    }

    /// Singular values, descending. Length is `min(rows, cols)`.
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// The largest usable rank, `min(rows, cols)`.
    pub fn max_rank(&self) -> usize {
        self.singular_values.len()
    }

    /// Computes `U[:, :k] * diag(S[:k]) * Vt[:k, :]` with `k` clamped to `max_rank()`.
    pub fn reconstruct(&self, k: usize) -> Array2<f64> {
        let k = k.min(self.max_rank());

        // U_k * diag(S_k): scale each kept column of U by its singular value.
        let mut scaled = self.u.columns(0, k).into_owned();
        for (j, mut column) in scaled.column_iter_mut().enumerate() {
            column *= self.singular_values[j];
        }
        let v_t_k = self.v_t.rows(0, k);
        let product = &scaled * &v_t_k;

        Array2::from_shape_fn((product.nrows(), product.ncols()), |(i, j)| product[(i, j)])
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// The output of reconstructing one channel.
#[derive(Debug, Clone)]
pub struct ChannelReconstruction {
    /// Real-valued reconstruction, not yet clipped to the sample range.
    pub matrix: Array2<f64>,
    /// The rank actually used: the explicit request clamped to `min(rows, cols)`,
    /// or the recommended rank in `Auto` mode.
    pub k_used: usize,
    /// The energy-retention rank, computed in every mode.
    pub recommended_k: usize,
}

/// Reconstructs a channel from its top singular components.
pub fn reconstruct_channel(
    channel: ArrayView2<'_, f64>,
    rank: RankSpec,
    retention: f64,
) -> Result<ChannelReconstruction> {
    let triple = SingularTriple::decompose(channel)?;
    let recommended_k = recommended_rank(triple.singular_values(), retention);
    let k_used = match rank {
        RankSpec::Explicit(k) => k.get().min(triple.max_rank()),
        RankSpec::Auto => recommended_k,
    };

    log::debug!(
        "channel {}x{}: k_used={} recommended_k={} (max {})",
        channel.nrows(),
        channel.ncols(),
        k_used,
        recommended_k,
        triple.max_rank()
    );

    Ok(ChannelReconstruction {
        matrix: triple.reconstruct(k_used),
        k_used,
        recommended_k,
    })
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
