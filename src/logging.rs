//! One-time `env_logger` setup for the binary and for embedders.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::Result;

static INIT_LOGGER: Once = Once::new();

/// Installs the global logger with a `[LEVEL] message` format.
///
/// When `log_file` is given, records are appended to it instead of stderr.
/// Only the first call has any effect; later calls return `Ok(())` untouched.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    // Open the file up front so a bad path surfaces as an error, not a panic.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
