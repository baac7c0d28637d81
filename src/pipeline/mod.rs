//! The compression pipeline: per-channel reconstruction, fidelity scoring, the
//! adaptive quality search, and the single persistent write.

pub mod orchestrator;
pub mod quality_search;
pub mod result;

pub use orchestrator::compress_image;
pub use quality_search::{search_quality, CodecEncoder, QualityEncoder, SearchOutcome, Trial, TrialOutcome};
pub use result::CompressionResult;
