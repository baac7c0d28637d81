//! The summary record produced by one compression run.

use serde::Serialize;

use crate::types::{OutputFormat, RankSpec};
use crate::utils::round2;

/// The outcome of a single compression run.
///
/// Built once by the orchestrator and handed to the caller; nothing in the crate
/// holds on to it afterwards.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompressionResult {
    /// The rank the caller asked for (`auto` or an explicit count).
    pub requested_rank: RankSpec,
    /// Effective rank used. For RGB this is the maximum over the three channels.
    pub k: usize,
    /// Energy-retention rank. For RGB this is the maximum over the three channels.
    pub recommended_k: usize,
    pub original_size: u64,
    pub compressed_size: u64,
    /// `(original - compressed) / original * 100`, two decimals. Negative when the
    /// output grew, which only happens once the quality floor was reached.
    pub compression_percentage: f64,
    /// Frobenius norm of `original - reconstruction`, two decimals.
    pub frobenius_error: f64,
    /// Codec quality of the persisted file; 100 for lossless formats.
    pub quality_used: u8,
    pub format: OutputFormat,
    /// Number of in-memory encodes the quality search performed (0 for lossless).
    pub search_trials: usize,
    /// False when the final write failed and `compressed_size` fell back to the
    /// original size.
    pub saved: bool,
}

/// Percentage size reduction, rounded to two decimals.
pub fn compression_percentage(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let reduction = (original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0;
    round2(reduction)
}
