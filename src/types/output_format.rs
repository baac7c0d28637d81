//! The closed set of output codecs, selected from the destination extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SvdPressError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Jpeg,
    WebP,
    Png,
    Bmp,
}

impl OutputFormat {
    /// Maps a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, SvdPressError> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::WebP),
            "png" => Ok(Self::Png),
            "bmp" => Ok(Self::Bmp),
            other => Err(SvdPressError::UnsupportedOutputFormat(format!(
                "no encoder for extension '{}'",
                other
            ))),
        }
    }

    /// Derives the format from a destination path's extension.
    pub fn from_path(path: &Path) -> Result<Self, SvdPressError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            SvdPressError::UnsupportedOutputFormat(format!(
                "destination '{}' has no extension",
                path.display()
            ))
        })?;
        Self::from_extension(ext)
    }

    /// Lossy formats accept a 1-100 quality level; lossless ones ignore it.
    pub fn is_lossy(&self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    /// The canonical extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
