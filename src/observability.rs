//! This module provides observability and diagnostics for the selective
//! decode engine.
//!
//! Dispatch decisions go through the `log` facade at `debug` level, once per
//! decode call and never per row. The `log_metric!` macro adds structured
//! key-value metrics that are compiled out of release builds entirely.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;

/// Logs a structured key-value metric line at `debug` level, only in debug
/// builds.
///
/// # Example
/// ```
/// use tambak_select::log_metric;
/// let survivors = 4;
/// log_metric!("event"="read_common", "mode"="ToOutput", "survivors"=&survivors);
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
            $crate::__log::debug!(
                target: "tambak::metric",
                "TAMBAK_METRIC: {{ {} }}",
                parts.join(", ")
            );
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `Debug` level, writing to `log_file` (append)
/// when given and to stderr otherwise. Later calls are no-ops.
pub fn enable_verbose_logging(log_file: Option<&str>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Debug);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(err) => {
                    eprintln!("tambak: cannot open log file {}: {}", filename, err);
                }
            }
        }

        let _ = builder.try_init();
    });
}
