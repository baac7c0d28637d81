//! This module defines the core, strongly-typed representations used
//! throughout the svdpress pipeline: how a rank is requested, which codec the
//! destination selects, and how many channels the working buffer carries.

pub mod color_mode;
pub mod output_format;
pub mod rank_spec;

// Re-export the main types for easier access.
pub use color_mode::ColorMode;
pub use output_format::OutputFormat;
pub use rank_spec::RankSpec;
