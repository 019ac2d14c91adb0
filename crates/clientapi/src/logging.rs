//! Logging bootstrap for the server process.
//!
//! Lines go to stdout as `YYYY-MM-DD HH:MM:SS LEVEL    [target] message`.
//! The configured spec is used unless `RUST_LOG` is set. HTTP stack internals
//! are held at `warn` so request noise stays out of the log.

use flexi_logger::{DeferredNow, FlexiLoggerError, Logger, LoggerHandle};
use log::{info, Record};
use std::io::Write;

const QUIET_MODULES: &[&str] = &["hyper", "tower", "axum", "mio"];

/// Start the logger. Keep the returned handle alive for the life of the process.
pub fn init(level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    let handle = Logger::try_with_env_or_str(log_spec(level))?
        .log_to_stdout()
        .format(line_format)
        .start()?;

    info!(
        "event=app_start module=clientapi status=ok platform={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

pub fn log_spec(level: &str) -> String {
    let mut spec = level.trim().to_string();
    for module in QUIET_MODULES {
        spec.push_str(&format!(", {}=warn", module));
    }
    spec
}

pub fn line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} {:<8} [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.target(),
        record.args()
    )
}
