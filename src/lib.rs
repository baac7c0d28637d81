//! This file is the root of the `svdpress` Rust crate.
//!
//! svdpress compresses raster images by replacing each color channel with a
//! truncated-SVD (low-rank) approximation, then searches lossy-codec quality
//! until the encoded file is smaller than the original or a quality floor is
//! reached.
//!
//! Its responsibilities here are strictly limited to:
//! 1.  Declaring the top-level modules (`kernels`, `codec`, `pipeline`, etc.).
//! 2.  Re-exporting the entry points most callers need.
//!
//! ```no_run
//! use std::path::Path;
//! use svdpress::{compress_image, CompressionConfig, RankSpec};
//!
//! let result = compress_image(
//!     Path::new("static/uploads/cat.png"),
//!     RankSpec::Auto,
//!     Path::new("static/outputs/compressed_kauto_cat.jpg"),
//!     &CompressionConfig::default(),
//! )?;
//! println!("k={} quality={} saved {}%", result.k, result.quality_used, result.compression_percentage);
//! # Ok::<(), svdpress::SvdPressError>(())
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod codec;
pub mod config;
pub mod error;
pub mod kernels;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod types;
pub mod utils;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use config::{CompressionConfig, QualitySearchConfig, SearchStrategy, LOSSLESS_QUALITY};
pub use error::SvdPressError;
pub use pipeline::orchestrator::compress_image_default;
pub use pipeline::{compress_image, CompressionResult};
pub use types::{ColorMode, OutputFormat, RankSpec};
