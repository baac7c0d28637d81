//! This module serves as the public API for the collection of pure, stateless
//! numeric kernels used by the compression pipeline.
//!
//! None of these kernels touch the filesystem or a codec. They operate on
//! `ndarray` views and return owned results, so they can be tested and
//! benchmarked in isolation.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Stage 1: Rank Selection
pub mod rank;

/// Stage 2: Low-Rank Reconstruction
pub mod svd;

/// Stage 3: Fidelity Measurement
pub mod fidelity;

//==================================================================================
// 2. Re-exports
//==================================================================================

pub use fidelity::frobenius_error;
pub use rank::{recommended_rank, DEFAULT_RETENTION};
pub use svd::{reconstruct_channel, ChannelReconstruction};
