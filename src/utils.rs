// file: utils.rs
// Purpose: Logging setup.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::cfg::Settings;
use crate::errors::ClosingsError;

const FILE_LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)(local)} {i} [{l}] - {m}{n}";
const CONSOLE_LOG_PATTERN: &str = "[{l}] {m}{n}";

pub fn parse_log_level(loglevel_str: &str) -> Option<LevelFilter> {
    match loglevel_str.trim().to_uppercase().as_str() {
        "TRACE" => Some(LevelFilter::Trace),
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARN" => Some(LevelFilter::Warn),
        "ERROR" => Some(LevelFilter::Error),
        "OFF" => Some(LevelFilter::Off),
        _ => None,
    }
}

/// Initialise logging: always to stderr, and to the configured log file when there is one.
/// Stdout is left to the user-facing output.
///
/// # Arguments
///
/// * `settings`: The application settings, for the log level and log file
/// * `verbose`: Forces the DEBUG level
///
pub fn init_logging(settings: &Settings, verbose: bool) -> Result<(), ClosingsError> {
    let app_loglevel = if verbose {
        LevelFilter::Debug
    } else {
        parse_log_level(&settings.log_level).unwrap_or_else(|| {
            eprintln!("Unknown log level configured: {}, using WARN", settings.log_level);
            LevelFilter::Warn
        })
    };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_LOG_PATTERN)))
        .build();

    let mut config_builder =
        log4rs::config::Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root_builder = Root::builder().appender("console");

    if let Some(logfile) = &settings.log_file {
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_LOG_PATTERN)))
            .build(logfile)
            .map_err(|source| ClosingsError::ConfigIo {
                path: logfile.into(),
                source,
            })?;
        config_builder = config_builder.appender(Appender::builder().build("logfile", Box::new(file_appender)));
        root_builder = root_builder.appender("logfile");
    }

    let logconfig = config_builder
        .build(root_builder.build(app_loglevel))
        .map_err(|e| ClosingsError::Config(format!("could not build a logging config: {}", e)))?;

    if let Err(e) = log4rs::init_config(logconfig) {
        eprintln!("Could not initialize logging: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_log_level(" info "), Some(LevelFilter::Info));
        assert_eq!(parse_log_level("warn"), Some(LevelFilter::Warn));
        assert_eq!(parse_log_level("loud"), None);
    }
}
