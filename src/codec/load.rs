//! Decoding a source file into the pipeline's 8-bit sample array.

use std::fs;
use std::path::Path;

use image::io::Reader as ImageReader;
use ndarray::Array3;

use crate::error::{Result, SvdPressError};
use crate::types::ColorMode;

/// A decoded source image together with its on-disk size.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Samples laid out as `(height, width, channels)`.
    pub samples: Array3<u8>,
    pub mode: ColorMode,
    /// Size of the source file in bytes, the baseline the search must beat.
    pub file_size: u64,
}

impl SourceImage {
    pub fn height(&self) -> usize {
        self.samples.dim().0
    }

    pub fn width(&self) -> usize {
        self.samples.dim().1
    }
}

/// Loads `path`, sniffing the format from the file contents.
///
/// Grayscale and RGB of any bit depth are normalised to 8-bit samples of the same
/// channel count. Any other channel count (alpha, CMYK-like layouts) yields
/// `UnsupportedFormat`; unreadable or undecodable files yield `Load`.
pub fn load_image(path: &Path) -> Result<SourceImage> {
    let file_size = fs::metadata(path)
        .map_err(|e| SvdPressError::load(path, e))?
        .len();

    let decoded = ImageReader::open(path)
        .map_err(|e| SvdPressError::load(path, e))?
        .with_guessed_format()
        .map_err(|e| SvdPressError::load(path, e))?
        .decode()
        .map_err(|e| SvdPressError::load(path, e))?;

    let channels = decoded.color().channel_count();
    let (mode, width, height, raw) = match channels {
        1 => {
            let buf = decoded.to_luma8();
            (ColorMode::Luma, buf.width(), buf.height(), buf.into_raw())
        }
        3 => {
            let buf = decoded.to_rgb8();
            (ColorMode::Rgb, buf.width(), buf.height(), buf.into_raw())
        }
        other => return Err(SvdPressError::UnsupportedFormat { channels: other }),
    };

    let shape = (height as usize, width as usize, mode.channels());
    let samples = Array3::from_shape_vec(shape, raw)
        .map_err(|e| SvdPressError::load(path, e))?;

    log::debug!(
        "loaded '{}': {}x{} {:?}, {} bytes on disk",
        path.display(),
        width,
        height,
        mode,
        file_size
    );

    Ok(SourceImage {
        samples,
        mode,
        file_size,
    })
}
