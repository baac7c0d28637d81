//! This module provides observability hooks for the quality search and the
//! orchestrator.
//!
//! An adaptive search needs visibility into its decisions. The `log_metric!`
//! macro emits one structured key-value line per event through the `log`
//! facade at debug level. The `#[cfg(debug_assertions)]` guard compiles every
//! call out of release builds.

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use svdpress::log_metric;
/// let quality = 80;
/// log_metric!("event" = "quality_trial", "quality" = &quality, "size" = 1234);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("SVDPRESS_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
