//! Thin filesystem glue around the core pipeline: upload acceptance and the
//! retention sweep that keeps upload/output directories from growing forever.
//! Neither is needed to call `compress_image` directly.

pub mod sweep;
pub mod upload;

pub use sweep::{sweep_stale_files, SweepReport, DEFAULT_MAX_AGE};
pub use upload::{accept_upload, is_allowed_file, output_file_name, secure_filename, StoredUpload};
