use serde::{Deserialize, Serialize};

/// The channel layout of a working image buffer.
///
/// Only single-channel grayscale and three-channel RGB are modelled; every other
/// layout is rejected at load time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Luma,
    Rgb,
}

impl ColorMode {
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Luma => 1,
            ColorMode::Rgb => 3,
        }
    }

    pub(crate) fn color_type(self) -> image::ColorType {
        match self {
            ColorMode::Luma => image::ColorType::L8,
            ColorMode::Rgb => image::ColorType::Rgb8,
        }
    }
}
