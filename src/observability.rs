// In: src/observability.rs

//! Logging setup for arrowlist.
//!
//! The library itself only emits `log` records (`debug!` at the bridge,
//! `trace!` inside the kernels). Binaries and tests decide where they go.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Once;

use log::LevelFilter;

static INIT_LOGGER: Once = Once::new();

/// Every record arrowlist emits is `debug!` or finer.
pub const VERBOSE_LEVEL: LevelFilter = LevelFilter::Debug;

/// Turns on `[LEVEL] message` logging at `Debug` level, to stderr or appended
/// to `log_file`. Only the first call has any effect.
///
/// If `log_file` cannot be opened, logging falls back to stderr.
pub fn enable_verbose_logging(log_file: Option<String>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(VERBOSE_LEVEL);

        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(&filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => eprintln!("arrowlist: could not open log file {}: {}", filename, e),
            }
        }

        let _ = builder.try_init();
    });
}

/// Routes log records through the test harness, honoring `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
