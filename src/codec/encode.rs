//! This module contains the encoding half of the codec adapter.
//!
//! A reconstruction is first quantized once (clip to [0, 255], convert to u8)
//! into a `QuantizedImage`, which can then be encoded any number of times at
//! different quality levels. PNG and BMP go through the `image` crate. JPEG
//! goes through `jpeg-encoder` with optimized Huffman tables, which `image`'s
//! baseline encoder cannot produce. Lossy WebP goes through `webp` (libwebp),
//! since `image` only writes lossless WebP.

use std::fs;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::ImageEncoder;
use ndarray::ArrayView3;

use crate::error::{Result, SvdPressError};
use crate::types::{ColorMode, OutputFormat};

//==================================================================================
// 1. Quantized Pixel Buffer
//==================================================================================

/// Interleaved 8-bit samples ready for an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedImage {
    width: u32,
    height: u32,
    mode: ColorMode,
    samples: Vec<u8>,
}

impl QuantizedImage {
    /// Clips a real-valued `(h, w, c)` reconstruction into 8-bit samples.
    ///
    /// Values are clamped to [0, 255] and then truncated toward zero.
    pub fn from_reconstruction(reconstruction: ArrayView3<'_, f64>, mode: ColorMode) -> Result<Self> {
        let (height, width, channels) = reconstruction.dim();
        if channels != mode.channels() {
            return Err(SvdPressError::ShapeMismatch {
                expected: vec![height, width, mode.channels()],
                actual: vec![height, width, channels],
            });
        }
        let samples = reconstruction
            .iter()
            .map(|&v| num_traits::clamp(v, 0.0, 255.0) as u8)
            .collect();
        Ok(Self {
            width: dimension(width)?,
            height: dimension(height)?,
            mode,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Samples as RGB triplets, expanding grayscale when needed.
    fn rgb_samples(&self) -> Vec<u8> {
        match self.mode {
            ColorMode::Rgb => self.samples.clone(),
            ColorMode::Luma => self.samples.iter().flat_map(|&v| [v, v, v]).collect(),
        }
    }
}

fn dimension(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| SvdPressError::encode("image", format!("dimension {} too large", len)))
}

//==================================================================================
// 2. Encoders
//==================================================================================

/// Where an encode should land.
pub enum Destination<'a> {
    /// An in-memory buffer, used for search trials. Any previous contents are replaced.
    Memory(&'a mut Vec<u8>),
    /// A file, written once.
    File(&'a Path),
}

/// Encodes `image` to `format` in memory. `quality` (1-100) only affects lossy formats.
pub fn encode_to_vec(image: &QuantizedImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let quality = quality.clamp(1, 100);
    let color_type = image.mode.color_type();
    let mut out = Vec::new();

    match format {
        OutputFormat::Jpeg => encode_jpeg(image, quality, true, &mut out)?,
        OutputFormat::Png => {
            // Best compression with adaptive filtering is the size-optimizing setting.
            let encoder =
                PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilterType::Adaptive);
            encoder
                .write_image(&image.samples, image.width, image.height, color_type)
                .map_err(|e| SvdPressError::encode(format, e))?;
        }
        OutputFormat::Bmp => {
            let mut encoder = BmpEncoder::new(&mut out);
            encoder
                .encode(&image.samples, image.width, image.height, color_type)
                .map_err(|e| SvdPressError::encode(format, e))?;
        }
        OutputFormat::WebP => {
            let rgb = image.rgb_samples();
            let memory = webp::Encoder::from_rgb(&rgb, image.width, image.height)
                .encode_simple(false, f32::from(quality))
                .map_err(|e| SvdPressError::encode(format, format!("{:?}", e)))?;
            out.extend_from_slice(&memory);
        }
    }

    if out.is_empty() {
        return Err(SvdPressError::encode(format, "encoder produced no output"));
    }
    Ok(out)
}

/// Writes a JFIF stream. With `optimize_huffman` the entropy tables are built
/// from the image's own symbol statistics instead of the Annex K defaults.
fn encode_jpeg(image: &QuantizedImage, quality: u8, optimize_huffman: bool, out: &mut Vec<u8>) -> Result<()> {
    let too_large = |_| SvdPressError::encode(OutputFormat::Jpeg, "dimensions exceed 65535");
    let width = u16::try_from(image.width).map_err(too_large)?;
    let height = u16::try_from(image.height).map_err(too_large)?;
    let color_type = match image.mode {
        ColorMode::Luma => jpeg_encoder::ColorType::Luma,
        ColorMode::Rgb => jpeg_encoder::ColorType::Rgb,
    };

    let mut encoder = jpeg_encoder::Encoder::new(out, quality);
    encoder.set_optimized_huffman_tables(optimize_huffman);
    encoder
        .encode(&image.samples, width, height, color_type)
        .map_err(|e| SvdPressError::encode(OutputFormat::Jpeg, e))
}

/// Encodes `image` into `destination` and returns the number of bytes produced.
pub fn encode_into(
    image: &QuantizedImage,
    format: OutputFormat,
    quality: u8,
    destination: Destination<'_>,
) -> Result<u64> {
    let encoded = encode_to_vec(image, format, quality)?;
    let len = encoded.len() as u64;
    match destination {
        Destination::Memory(buf) => *buf = encoded,
        Destination::File(path) => fs::write(path, &encoded)?,
    }
    Ok(len)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use ndarray::Array3;
    use tempfile::tempdir;

    fn gradient(h: usize, w: usize, c: usize) -> Array3<f64> {
        Array3::from_shape_fn((h, w, c), |(y, x, ch)| (x * 4 + y * 2 + ch * 30) as f64)
    }

    #[test]
    fn test_quantize_clips_and_truncates() {
        let mut recon = Array3::<f64>::zeros((1, 4, 1));
        recon[[0, 0, 0]] = -12.5;
        recon[[0, 1, 0]] = 300.0;
        recon[[0, 2, 0]] = 127.9;
        recon[[0, 3, 0]] = 255.0;
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Luma).unwrap();
        assert_eq!(image.samples(), &[0, 255, 127, 255]);
        assert_eq!((image.width(), image.height()), (4, 1));
    }

    #[test]
    fn test_quantize_rejects_wrong_channel_count() {
        let recon = Array3::<f64>::zeros((2, 2, 3));
        assert!(matches!(
            QuantizedImage::from_reconstruction(recon.view(), ColorMode::Luma),
            Err(SvdPressError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_every_format_roundtrips_through_decoder() {
        let recon = gradient(16, 24, 3);
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Rgb).unwrap();
        for format in [OutputFormat::Jpeg, OutputFormat::WebP, OutputFormat::Png, OutputFormat::Bmp] {
            let bytes = encode_to_vec(&image, format, 80).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (24, 16), "{}", format);
        }
    }

    #[test]
    fn test_png_is_lossless() {
        let recon = gradient(10, 10, 1);
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Luma).unwrap();
        let bytes = encode_to_vec(&image, OutputFormat::Png, 1).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded.as_raw().as_slice(), image.samples());
    }

    #[test]
    fn test_grayscale_webp_is_encoded() {
        let recon = gradient(12, 12, 1);
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Luma).unwrap();
        assert!(!encode_to_vec(&image, OutputFormat::WebP, 75).unwrap().is_empty());
    }

    #[test]
    fn test_lower_jpeg_quality_is_not_larger_on_noisy_input() {
        let recon = Array3::from_shape_fn((64, 64, 3), |(y, x, c)| ((x * 7919 + y * 104729 + c * 31) % 256) as f64);
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Rgb).unwrap();
        let high = encode_to_vec(&image, OutputFormat::Jpeg, 95).unwrap();
        let low = encode_to_vec(&image, OutputFormat::Jpeg, 30).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_optimized_huffman_tables_are_not_larger() {
        let recon = Array3::from_shape_fn((64, 64, 1), |(y, x, _)| ((x * 7919 + y * 104729) % 256) as f64);
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Luma).unwrap();
        for quality in [85, 50] {
            let mut baseline = Vec::new();
            encode_jpeg(&image, quality, false, &mut baseline).unwrap();
            let optimized = encode_to_vec(&image, OutputFormat::Jpeg, quality).unwrap();
            assert!(
                optimized.len() <= baseline.len(),
                "q{}: optimized {} > baseline {}",
                quality,
                optimized.len(),
                baseline.len()
            );
        }
    }

    #[test]
    fn test_encode_into_memory_and_file_agree() {
        let recon = gradient(8, 8, 3);
        let image = QuantizedImage::from_reconstruction(recon.view(), ColorMode::Rgb).unwrap();
        let mut buf = vec![1, 2, 3];
        let mem_len = encode_into(&image, OutputFormat::Jpeg, 70, Destination::Memory(&mut buf)).unwrap();
        assert_eq!(mem_len as usize, buf.len());

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let file_len = encode_into(&image, OutputFormat::Jpeg, 70, Destination::File(&path)).unwrap();
        assert_eq!(file_len, mem_len);
        assert_eq!(fs::read(&path).unwrap(), buf);
    }
}
