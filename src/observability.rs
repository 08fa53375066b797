//! Diagnostics hooks for the executor and planner.
//!
//! The codec itself never installs a logger; it only emits through the `log`
//! facade. `enable_verbose_logging` is a convenience for binaries and notebooks
//! that want to see the planner's decisions without wiring up their own logger.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::sync::Once;

/// Logs a structured key-value metric line at `debug` level.
///
/// # Example
/// ```
/// use bincol::log_metric;
/// let size = 42;
/// log_metric!("event"="plan_candidate", "steps"="Delta>IntegerPacking>ByteArray", "bytes"=&size);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if log::log_enabled!(log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("BINCOL_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `Info` level printing `[LEVEL] message` lines.
///
/// With `log_file`, output is appended to that file instead of stderr. Only the
/// first call has any effect. If the file cannot be opened, logging stays on
/// stderr and a warning is emitted.
pub fn enable_verbose_logging(log_file: Option<String>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        let mut open_error = None;
        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(&filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => open_error = Some((filename, e)),
            }
        }

        let _ = builder.try_init();
        if let Some((filename, e)) = open_error {
            log::warn!("could not open log file '{}': {}", filename, e);
        }
    });
}
