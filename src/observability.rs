//! Observability hooks for the extraction pipeline.
//!
//! Library code logs through the `log` facade; `init_logging` wires that facade
//! to `env_logger` once per process. The `log_metric!` macro emits structured
//! key-value lines for per-chunk diagnostics and compiles to nothing in release
//! builds.

use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Once;

use colored::Colorize;
use log::{Level, LevelFilter};

use crate::config::LoggingConfig;
use crate::error::CollectError;

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use gx_assets::log_metric;
/// let rows = 4;
/// log_metric!("event"="chunk_written", "rows"=&rows);
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
            log::debug!("GX_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

fn paint_level(level: Level) -> String {
    let label = level.to_string();
    match level {
        Level::Error => label.red().bold().to_string(),
        Level::Warn => label.yellow().to_string(),
        Level::Info => label.green().to_string(),
        Level::Debug | Level::Trace => label.dimmed().to_string(),
    }
}

/// Installs the process-wide logger. Later calls are no-ops, as is a call made
/// after some other logger has already been registered.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CollectError> {
    let level = LevelFilter::from_str(&config.level).map_err(|_| {
        CollectError::Config(format!("unknown log level '{}'", config.level))
    })?;

    // Opened outside the `Once` so a bad path surfaces as an error.
    let file = match &config.log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        match file {
            Some(file) => {
                builder.format(|buf, record| {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                });
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None => {
                builder.format(|buf, record| {
                    writeln!(buf, "[{}] {}", paint_level(record.level()), record.args())
                });
            }
        }

        let _ = builder.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_is_a_config_error() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            log_file: None,
        };
        assert!(matches!(init_logging(&config), Err(CollectError::Config(_))));
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        init_logging(&config).unwrap();
        init_logging(&config).unwrap();
        log_metric!("event" = "test", "value" = &1);
    }
}
