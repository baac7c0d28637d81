//! This module contains the pure kernel for choosing how many singular
//! components to keep from an energy-retention target.
//!
//! The energy of a component is the square of its singular value. The
//! recommended rank is the smallest count of leading components whose
//! cumulative energy reaches `retention * total_energy`.

/// Retention fraction used when no configuration overrides it.
pub const DEFAULT_RETENTION: f64 = 0.95;

/// Returns the smallest `k` (1-based component count) such that the top `k`
/// singular values hold at least `retention` of the total squared energy.
///
/// `singular_values` must be sorted in descending order. An empty slice yields 0;
/// callers only pass decompositions of non-empty matrices. A `retention` above 1.0
/// is treated as 1.0, so the result never exceeds `singular_values.len()`.
pub fn recommended_rank(singular_values: &[f64], retention: f64) -> usize {
    if singular_values.is_empty() {
        return 0;
    }

    let total: f64 = singular_values.iter().map(|s| s * s).sum();
    let target = retention.min(1.0) * total;

    // The running sum uses the same order of additions as `total`, so the final
    // cumulative value equals `total` exactly and the search always terminates.
    let mut cumulative = 0.0;
    for (i, s) in singular_values.iter().enumerate() {
        cumulative += s * s;
        if cumulative >= target {
            return i + 1;
        }
    }
    singular_values.len()
}

/// Fraction of total energy held by the first `k` components.
pub fn retained_energy(singular_values: &[f64], k: usize) -> f64 {
    let total: f64 = singular_values.iter().map(|s| s * s).sum();
    if total == 0.0 {
        return 1.0;
    }
    let kept: f64 = singular_values.iter().take(k).map(|s| s * s).sum();
    kept / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dominant_component() {
        // 10^2 = 100 out of 100 + 1 + 1 = 102 -> 98% in the first component.
        let s = [10.0, 1.0, 1.0];
        assert_eq!(recommended_rank(&s, 0.95), 1);
        assert_eq!(recommended_rank(&s, 0.99), 2);
        assert_eq!(recommended_rank(&s, 1.0), 3);
    }

    #[test]
    fn test_flat_spectrum_needs_most_components() {
        let s = vec![1.0; 20];
        // 19/20 = 0.95 exactly
        assert_eq!(recommended_rank(&s, 0.95), 19);
    }

    #[test]
    fn test_all_zero_spectrum_keeps_one_component() {
        assert_eq!(recommended_rank(&[0.0, 0.0, 0.0], 0.95), 1);
    }

    #[test]
    fn test_empty_spectrum() {
        assert_eq!(recommended_rank(&[], 0.95), 0);
    }

    #[test]
    fn test_retention_above_one_is_capped() {
        let s = [3.0, 2.0, 1.0];
        assert_eq!(recommended_rank(&s, 1.5), 3);
    }

    #[test]
    fn test_retained_energy_agrees_with_rank() {
        let s = [8.0, 4.0, 2.0, 1.0];
        let k = recommended_rank(&s, DEFAULT_RETENTION);
        assert!(retained_energy(&s, k) >= DEFAULT_RETENTION);
        assert!(retained_energy(&s, k - 1) < DEFAULT_RETENTION);
    }
}
