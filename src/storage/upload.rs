//! Accepting an input file into upload storage, and naming outputs.
//!
//! These are the boundary helpers that sit in front of the core pipeline: they
//! make sure the file has an allowed extension, give it a sanitised and
//! collision-free name, and derive the output file name for a run.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, SvdPressError};
use crate::types::{OutputFormat, RankSpec};

/// Extensions accepted for input images, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

/// Returns true if `filename` has an extension in `ALLOWED_EXTENSIONS`.
pub fn is_allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduces a user-supplied file name to a safe, flat ASCII name.
///
/// The name is NFKD-decomposed first so accented letters keep their ASCII base
/// (`café` becomes `cafe`). Path components are dropped, whitespace becomes `_`,
/// anything other than ASCII letters, digits, `.`, `_` and `-` is removed, and
/// leading dots and underscores are stripped. Returns `None` if nothing usable
/// is left.
pub fn secure_filename(filename: &str) -> Option<String> {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let decomposed: String = base.nfkd().filter(char::is_ascii).collect();

    let cleaned: String = decomposed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Prefixes `name` with a random 32-hex-digit token.
fn unique_name(name: &str) -> String {
    let token: u128 = rand::rng().random();
    format!("{:032x}_{}", token, name)
}

/// An input file that has been copied into upload storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// The collision-free file name inside the upload directory.
    pub stored_name: String,
    pub path: PathBuf,
}

impl StoredUpload {
    /// The stored name without its extension.
    pub fn stem(&self) -> &str {
        self.stored_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.stored_name)
    }
}

/// Copies `source` into `upload_dir` under a sanitised, unique name.
///
/// `original_name` is the name the user gave the file; it decides both the
/// allow-list check and the stored name.
pub fn accept_upload(source: &Path, original_name: &str, upload_dir: &Path) -> Result<StoredUpload> {
    if !is_allowed_file(original_name) {
        return Err(SvdPressError::UploadRejected(format!(
            "file type not allowed: '{}'",
            original_name
        )));
    }
    let safe = secure_filename(original_name).ok_or_else(|| {
        SvdPressError::UploadRejected(format!("unusable file name: '{}'", original_name))
    })?;

    fs::create_dir_all(upload_dir)?;
    let stored_name = unique_name(&safe);
    let path = upload_dir.join(&stored_name);
    fs::copy(source, &path)?;

    log::debug!("accepted upload '{}' as '{}'", original_name, path.display());
    Ok(StoredUpload { stored_name, path })
}

/// Output file name for a run: `compressed_k{rank}_{stem}.{ext}`.
pub fn output_file_name(stem: &str, rank: RankSpec, format: OutputFormat) -> String {
    format!("compressed_k{}_{}.{}", rank, stem, format.extension())
}
