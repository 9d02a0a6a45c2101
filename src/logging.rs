use crate::error::Result;
use env_logger::{Builder, Env};
use log::{self, LevelFilter};
use chrono::Local;
use std::io::Write;
use yansi::Paint;

/// Initializes the application's logging system with the specified log level
///
/// `RUST_LOG` takes precedence over `log_level` when it is set.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(log_level: &str) -> Result<()> {
    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "auto");

    let _ = Builder::from_env(env)
        .format(|buf, record| {
            writeln!(buf, "{}", format_log(record))
        })
        .try_init();

    Ok(())
}

/// Maps the CLI verbosity flag onto a level string for [`init`]
pub fn level_for(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Formats a log record into a structured string
///
/// Returns a formatted string with timestamp, level, target and message
pub fn format_log(record: &log::Record) -> String {
    let level = match record.level() {
        log::Level::Error => Paint::red("ERROR").bold(),
        log::Level::Warn => Paint::yellow("WARN ").bold(),
        log::Level::Info => Paint::cyan("INFO ").bold(),
        log::Level::Debug => Paint::blue("DEBUG").bold(),
        log::Level::Trace => Paint::new("TRACE"),
    };

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let target = if !record.target().is_empty() {
        record.target()
    } else {
        record.module_path().unwrap_or("unknown")
    };

    format!(
        "[{}] {} [{}] {}",
        timestamp,
        level,
        target,
        record.args()
    )
}

/// Parses a log level string into a LevelFilter, defaulting to Info
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("error"), LevelFilter::Error);
        assert_eq!(parse_log_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_log_level("info"), LevelFilter::Info);
        assert_eq!(parse_log_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_log_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_log_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn test_level_for_verbose_flag() {
        assert_eq!(parse_log_level(level_for(true)), LevelFilter::Debug);
        assert_eq!(parse_log_level(level_for(false)), LevelFilter::Info);
    }

    #[test]
    fn test_format_log_contains_target_and_message() {
        let line = format_log(
            &log::Record::builder()
                .args(format_args!("cloned {} files", 12))
                .level(log::Level::Info)
                .target("contentmonetizer::repository")
                .build(),
        );
        assert!(line.contains("[contentmonetizer::repository]"));
        assert!(line.ends_with("cloned 12 files"));
    }
}
