// In: src/pipeline/quality_search.rs

//! The adaptive quality search for lossy outputs.
//!
//! The search walks a descending quality ladder (`start`, `start - step`, ...,
//! `floor`), encoding the reconstruction in memory at each visited rung and
//! measuring the encoded length. It stops at the first rung whose encode is
//! smaller than the original file, or at the floor. Only the winning quality is
//! returned; the orchestrator performs the one persistent write.
//!
//! Encoding is abstracted behind `QualityEncoder`, so the search is independent
//! of any concrete codec. A failed encode is logged and counted as a trial that
//! did not beat the original; it never aborts the search.

use std::time::Instant;

use crate::codec::{encode_to_vec, QuantizedImage};
use crate::config::{QualitySearchConfig, SearchStrategy};
use crate::error::Result;
use crate::types::OutputFormat;

//==================================================================================
// 1. Encoder Seam
//==================================================================================

/// Anything that can encode a fixed image at a requested quality.
pub trait QualityEncoder {
    fn encode_at(&self, quality: u8) -> Result<Vec<u8>>;
}

/// The production encoder: a quantized image bound to an output format.
pub struct CodecEncoder<'a> {
    image: &'a QuantizedImage,
    format: OutputFormat,
}

impl<'a> CodecEncoder<'a> {
    pub fn new(image: &'a QuantizedImage, format: OutputFormat) -> Self {
        Self { image, format }
    }
}

impl QualityEncoder for CodecEncoder<'_> {
    fn encode_at(&self, quality: u8) -> Result<Vec<u8>> {
        encode_to_vec(self.image, self.format, quality)
    }
}

//==================================================================================
// 2. Trial Records
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The encode succeeded with this many bytes.
    Encoded(u64),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub quality: u8,
    pub outcome: TrialOutcome,
}

impl Trial {
    fn beats(&self, original_size: u64) -> bool {
        matches!(self.outcome, TrialOutcome::Encoded(size) if size < original_size)
    }
}

/// Result of a search: the quality to persist with and every trial that led there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub quality: u8,
    /// True if `quality` produced an encode smaller than the original; false if the
    /// search gave up at the floor.
    pub reached_target: bool,
    pub trials: Vec<Trial>,
}

//==================================================================================
// 3. Search Strategies
//==================================================================================

/// Encodes once at `quality`. The encoded buffer is dropped before returning.
fn run_trial<E: QualityEncoder + ?Sized>(encoder: &E, quality: u8) -> Trial {
    let start = Instant::now();
    let outcome = match encoder.encode_at(quality) {
        Ok(encoded) => TrialOutcome::Encoded(encoded.len() as u64),
        Err(e) => {
            log::warn!("  - Quality: {:>3} | FAILED TO ENCODE: {}", quality, e);
            TrialOutcome::Failed
        }
    };
    if let TrialOutcome::Encoded(size) = outcome {
        log::info!(
            "  - Quality: {:>3} | Size: {} | Time: {:.2?}",
            quality,
            size,
            start.elapsed()
        );
        log_metric!("event" = "quality_trial", "quality" = quality, "size" = size);
    }
    Trial { quality, outcome }
}

/// Steps down the ladder one rung at a time.
fn linear_search<E: QualityEncoder + ?Sized>(
    encoder: &E,
    original_size: u64,
    ladder: &[u8],
    floor: u8,
) -> SearchOutcome {
    let mut trials = Vec::with_capacity(ladder.len());
    for &quality in ladder {
        let trial = run_trial(encoder, quality);
        trials.push(trial);
        if trial.beats(original_size) {
            return SearchOutcome {
                quality,
                reached_target: true,
                trials,
            };
        }
    }
    SearchOutcome {
        quality: floor,
        reached_target: false,
        trials,
    }
}

/// Finds the highest rung that beats the original by bisection.
///
/// Rungs are ordered by descending quality, so "beats the original" is assumed
/// to flip from false to true exactly once along the ladder.
fn bisect_search<E: QualityEncoder + ?Sized>(
    encoder: &E,
    original_size: u64,
    ladder: &[u8],
    floor: u8,
) -> SearchOutcome {
    let mut trials = Vec::new();
    let (mut lo, mut hi) = (0, ladder.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let trial = run_trial(encoder, ladder[mid]);
        trials.push(trial);
        if trial.beats(original_size) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    // `hi` only ever moves onto a rung that was tried and won.
    match ladder.get(lo) {
        Some(&quality) => SearchOutcome {
            quality,
            reached_target: true,
            trials,
        },
        None => SearchOutcome {
            quality: floor,
            reached_target: false,
            trials,
        },
    }
}

//==================================================================================
// 4. Public API
//==================================================================================

/// Searches for the highest ladder quality whose encode is smaller than
/// `original_size`, falling back to the floor.
pub fn search_quality<E: QualityEncoder + ?Sized>(
    encoder: &E,
    original_size: u64,
    config: &QualitySearchConfig,
) -> SearchOutcome {
    let ladder = config.ladder();
    log::info!(
        "--- QUALITY SEARCH ({:?}) over {:?}, target < {} bytes ---",
        config.strategy,
        ladder,
        original_size
    );

    let outcome = match config.strategy {
        SearchStrategy::Linear => linear_search(encoder, original_size, &ladder, config.floor),
        SearchStrategy::Bisect => bisect_search(encoder, original_size, &ladder, config.floor),
    };

    log::info!(
        "--- Chosen quality {} after {} trial(s), target reached: {} ---",
        outcome.quality,
        outcome.trials.len(),
        outcome.reached_target
    );
    outcome
}

//==================================================================================
// 5. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SvdPressError;
    use std::cell::RefCell;

    /// Size falls linearly with quality: `quality * bytes_per_step`.
    struct LinearSizeEncoder {
        bytes_per_quality: u64,
        fail_at: Vec<u8>,
        calls: RefCell<Vec<u8>>,
    }

    impl LinearSizeEncoder {
        fn new(bytes_per_quality: u64) -> Self {
            Self {
                bytes_per_quality,
                fail_at: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing_at(mut self, qualities: &[u8]) -> Self {
            self.fail_at = qualities.to_vec();
            self
        }
    }

    impl QualityEncoder for LinearSizeEncoder {
        fn encode_at(&self, quality: u8) -> Result<Vec<u8>> {
            self.calls.borrow_mut().push(quality);
            if self.fail_at.contains(&quality) {
                return Err(SvdPressError::encode("mock", "corrupted buffer"));
            }
            Ok(vec![0u8; quality as usize * self.bytes_per_quality as usize])
        }
    }

    fn linear() -> QualitySearchConfig {
        QualitySearchConfig::default()
    }

    fn bisect() -> QualitySearchConfig {
        QualitySearchConfig {
            strategy: SearchStrategy::Bisect,
            ..QualitySearchConfig::default()
        }
    }

    #[test]
    fn test_first_rung_wins_when_already_smaller() {
        let encoder = LinearSizeEncoder::new(10);
        let outcome = search_quality(&encoder, 10_000, &linear());
        assert_eq!(outcome.quality, 85);
        assert!(outcome.reached_target);
        assert_eq!(outcome.trials.len(), 1);
    }

    #[test]
    fn test_linear_steps_down_until_smaller() {
        // Sizes: 850, 800, 750, 700, ... ; original 720 -> 700 at quality 70 wins.
        let encoder = LinearSizeEncoder::new(10);
        let outcome = search_quality(&encoder, 720, &linear());
        assert_eq!(outcome.quality, 70);
        assert!(outcome.reached_target);
        assert_eq!(*encoder.calls.borrow(), vec![85, 80, 75, 70]);
    }

    #[test]
    fn test_linear_never_increases_quality() {
        let encoder = LinearSizeEncoder::new(10);
        search_quality(&encoder, 1, &linear());
        let calls = encoder.calls.borrow();
        assert!(calls.windows(2).all(|w| w[0] > w[1]));
        assert!(calls.iter().all(|q| (50..=85).contains(q) && q % 5 == 0));
    }

    #[test]
    fn test_floor_is_terminal_even_if_still_larger() {
        let encoder = LinearSizeEncoder::new(10);
        let outcome = search_quality(&encoder, 100, &linear());
        assert_eq!(outcome.quality, 50);
        assert!(!outcome.reached_target);
        assert_eq!(outcome.trials.len(), 8);
    }

    #[test]
    fn test_failed_first_trial_moves_to_next_rung() {
        let encoder = LinearSizeEncoder::new(10).failing_at(&[85]);
        let outcome = search_quality(&encoder, 10_000, &linear());
        assert_eq!(outcome.quality, 80);
        assert_eq!(outcome.trials[0].outcome, TrialOutcome::Failed);
        assert_eq!(outcome.trials[1].outcome, TrialOutcome::Encoded(800));
    }

    #[test]
    fn test_every_trial_failing_ends_at_floor() {
        let all: Vec<u8> = QualitySearchConfig::default().ladder();
        let encoder = LinearSizeEncoder::new(10).failing_at(&all);
        let outcome = search_quality(&encoder, 10_000, &linear());
        assert_eq!(outcome.quality, 50);
        assert!(!outcome.reached_target);
        assert!(outcome.trials.iter().all(|t| t.outcome == TrialOutcome::Failed));
    }

    #[test]
    fn test_bisect_agrees_with_linear_on_monotone_sizes() {
        for original in [1, 100, 505, 555, 600, 720, 801, 851, 10_000] {
            let lin = search_quality(&LinearSizeEncoder::new(10), original, &linear());
            let bis = search_quality(&LinearSizeEncoder::new(10), original, &bisect());
            assert_eq!(lin.quality, bis.quality, "original size {}", original);
            assert_eq!(lin.reached_target, bis.reached_target);
        }
    }

    #[test]
    fn test_bisect_uses_fewer_trials() {
        let encoder = LinearSizeEncoder::new(10);
        let outcome = search_quality(&encoder, 100, &bisect());
        assert_eq!(outcome.quality, 50);
        assert!(outcome.trials.len() <= 4);
    }
}
