//! Small shared helpers for presenting results.

/// Formats a byte count the way the result summary shows it:
/// `512 B`, `1.50 KB`, `2.25 MB`.
pub fn format_size(size_bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if size_bytes < KIB {
        format!("{} B", size_bytes)
    } else if size_bytes < MIB {
        format!("{:.2} KB", size_bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", size_bytes as f64 / MIB as f64)
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
