//! Frobenius-norm reconstruction error.

use ndarray::{ArrayView, Dimension, Zip};

use crate::error::{Result, SvdPressError};

/// Returns `sqrt(sum((original - reconstructed)^2))` over every element.
///
/// Samples are promoted to `f64` before subtracting, so there is no unsigned
/// underflow. Works for a single channel or a full `(h, w, c)` stack; a stack
/// yields one global score, not a per-channel sum.
pub fn frobenius_error<D: Dimension>(
    original: ArrayView<'_, u8, D>,
    reconstructed: ArrayView<'_, f64, D>,
) -> Result<f64> {
    if original.shape() != reconstructed.shape() {
        return Err(SvdPressError::ShapeMismatch {
            expected: original.shape().to_vec(),
            actual: reconstructed.shape().to_vec(),
        });
    }

    let sum_sq = Zip::from(&original)
        .and(&reconstructed)
        .fold(0.0, |acc, &o, &r| {
            let d = f64::from(o) - r;
            acc + d * d
        });
    Ok(sum_sq.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_identical_data_has_zero_error() {
        let original = array![[1u8, 2], [3, 4]];
        let reconstructed = original.mapv(f64::from);
        assert_eq!(frobenius_error(original.view(), reconstructed.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_no_underflow_when_reconstruction_exceeds_original() {
        // 0 - 3 must be -3, not a wrapped u8.
        let original = array![[0u8, 0], [0, 0]];
        let reconstructed = array![[3.0, 0.0], [0.0, 4.0]];
        assert_eq!(frobenius_error(original.view(), reconstructed.view()).unwrap(), 5.0);
    }

    #[test]
    fn test_stack_error_is_global_not_summed() {
        let original = Array3::<u8>::zeros((2, 2, 3));
        let mut reconstructed = Array3::<f64>::zeros((2, 2, 3));
        reconstructed[[0, 0, 0]] = 3.0;
        reconstructed[[1, 1, 2]] = 4.0;
        // sqrt(9 + 16) = 5, whereas a per-channel sum would give 3 + 4 = 7.
        assert_eq!(frobenius_error(original.view(), reconstructed.view()).unwrap(), 5.0);
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let original = Array3::<u8>::zeros((2, 2, 3));
        let reconstructed = Array3::<f64>::zeros((2, 3, 3));
        assert!(matches!(
            frobenius_error(original.view(), reconstructed.view()),
            Err(SvdPressError::ShapeMismatch { .. })
        ));
    }
}
