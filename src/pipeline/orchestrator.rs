// In: src/pipeline/orchestrator.rs

//! The top-level compression orchestrator.
//!
//! Load -> (grayscale | RGB) reconstruction -> fidelity -> quality search or
//! direct lossless save -> `CompressionResult`. The function is synchronous and
//! keeps no state between calls; concurrent callers must use distinct
//! destination paths.

use std::path::Path;

use ndarray::{stack, Array3, ArrayView3, Axis};

use crate::codec::{encode_into, load_image, Destination, QuantizedImage, SourceImage};
use crate::config::{CompressionConfig, LOSSLESS_QUALITY};
use crate::error::{Result, SvdPressError};
use crate::kernels::{frobenius_error, reconstruct_channel, ChannelReconstruction};
use crate::pipeline::quality_search::{search_quality, CodecEncoder};
use crate::pipeline::result::{compression_percentage, CompressionResult};
use crate::types::{ColorMode, OutputFormat, RankSpec};
use crate::utils::round2;

//==================================================================================
// 1. Reconstruction
//==================================================================================

/// A full-image reconstruction with its scalar rank summary.
#[derive(Debug, Clone)]
pub struct ImageReconstruction {
    /// Real-valued `(h, w, c)` reconstruction, unclipped.
    pub data: Array3<f64>,
    /// Effective rank; the maximum over channels for RGB.
    pub k: usize,
    /// Recommended rank; the maximum over channels for RGB.
    pub recommended_k: usize,
}

/// Reconstructs every channel of `samples` independently and restacks them.
pub fn reconstruct_image(
    samples: ArrayView3<'_, u8>,
    mode: ColorMode,
    rank: RankSpec,
    retention: f64,
) -> Result<ImageReconstruction> {
    let channels = samples.dim().2;
    if channels != mode.channels() {
        return Err(SvdPressError::UnsupportedFormat {
            channels: u8::try_from(channels).unwrap_or(u8::MAX),
        });
    }
    let real = samples.mapv(f64::from);
    let channel = |c: usize| reconstruct_channel(real.index_axis(Axis(2), c), rank, retention);

    match mode {
        ColorMode::Luma => {
            let gray = channel(0)?;
            Ok(ImageReconstruction {
                data: gray.matrix.insert_axis(Axis(2)),
                k: gray.k_used,
                recommended_k: gray.recommended_k,
            })
        }
        ColorMode::Rgb => {
            let [r, g, b] = [0, 1, 2].map(channel);
            let planes: [ChannelReconstruction; 3] = [r?, g?, b?];
            let data = stack(
                Axis(2),
                &[planes[0].matrix.view(), planes[1].matrix.view(), planes[2].matrix.view()],
            )
            .map_err(|e| SvdPressError::Decomposition(format!("restacking channels: {}", e)))?;

            let k = planes.iter().map(|p| p.k_used).max().unwrap_or(0);
            let recommended_k = planes.iter().map(|p| p.recommended_k).max().unwrap_or(0);
            log::debug!(
                "per-channel k_used={:?} recommended={:?}",
                planes.iter().map(|p| p.k_used).collect::<Vec<_>>(),
                planes.iter().map(|p| p.recommended_k).collect::<Vec<_>>()
            );
            Ok(ImageReconstruction {
                data,
                k,
                recommended_k,
            })
        }
    }
}

//==================================================================================
// 2. Persisting
//==================================================================================

/// What was written to the destination.
struct SaveOutcome {
    quality: u8,
    compressed_size: u64,
    search_trials: usize,
    saved: bool,
}

/// Runs the search for lossy formats (or skips it for lossless ones) and writes
/// the output once. A failed final write degrades to the original size.
fn persist(
    image: &QuantizedImage,
    format: OutputFormat,
    output_path: &Path,
    original_size: u64,
    config: &CompressionConfig,
) -> SaveOutcome {
    let (quality, search_trials) = if format.is_lossy() {
        let outcome = search_quality(&CodecEncoder::new(image, format), original_size, &config.quality);
        (outcome.quality, outcome.trials.len())
    } else {
        (LOSSLESS_QUALITY, 0)
    };

    match encode_into(image, format, quality, Destination::File(output_path)) {
        Ok(compressed_size) => SaveOutcome {
            quality,
            compressed_size,
            search_trials,
            saved: true,
        },
        Err(e) => {
            log::warn!(
                "final save to '{}' failed, reporting original size: {}",
                output_path.display(),
                e
            );
            SaveOutcome {
                quality,
                compressed_size: original_size,
                search_trials,
                saved: false,
            }
        }
    }
}

//==================================================================================
// 3. Public Orchestration API
//==================================================================================

/// Compresses the image at `input_path` into `output_path`.
///
/// The output codec is chosen from `output_path`'s extension. Fails with
/// `Load` if the input cannot be decoded, `UnsupportedFormat` if it is not
/// grayscale or RGB, and `UnsupportedOutputFormat` for an unknown extension.
/// Encoding problems never fail the call; they show up in the result instead.
pub fn compress_image(
    input_path: &Path,
    rank: RankSpec,
    output_path: &Path,
    config: &CompressionConfig,
) -> Result<CompressionResult> {
    config.validate()?;
    let format = OutputFormat::from_path(output_path)?;

    // 1. Load.
    let SourceImage {
        samples,
        mode,
        file_size: original_size,
    } = load_image(input_path)?;

    // 2. Per-channel reconstruction.
    let reconstruction = reconstruct_image(samples.view(), mode, rank, config.retention)?;

    // 3. One global fidelity score over the full stack.
    let error = frobenius_error(samples.view(), reconstruction.data.view())?;

    // 4. Quantize once, then search / save.
    let quantized = QuantizedImage::from_reconstruction(reconstruction.data.view(), mode)?;
    let saved = persist(&quantized, format, output_path, original_size, config);

    // 5. Assemble.
    let result = CompressionResult {
        requested_rank: rank,
        k: reconstruction.k,
        recommended_k: reconstruction.recommended_k,
        original_size,
        compressed_size: saved.compressed_size,
        compression_percentage: compression_percentage(original_size, saved.compressed_size),
        frobenius_error: round2(error),
        quality_used: saved.quality,
        format,
        search_trials: saved.search_trials,
        saved: saved.saved,
    };

    log::info!(
        "compressed '{}' -> '{}': k={} (recommended {}), {} -> {} bytes ({}%), quality {}",
        input_path.display(),
        output_path.display(),
        result.k,
        result.recommended_k,
        result.original_size,
        result.compressed_size,
        result.compression_percentage,
        result.quality_used
    );
    log_metric!(
        "event" = "compress_image",
        "k" = result.k,
        "recommended_k" = result.recommended_k,
        "quality" = result.quality_used,
        "percentage" = result.compression_percentage
    );

    Ok(result)
}

/// `compress_image` with the default configuration.
pub fn compress_image_default(
    input_path: &Path,
    rank: RankSpec,
    output_path: &Path,
) -> Result<CompressionResult> {
    compress_image(input_path, rank, output_path, &CompressionConfig::default())
}
