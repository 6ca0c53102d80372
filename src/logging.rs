use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};
use log::SetLoggerError;
use thiserror::Error;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} [{M}] {m}{n}";

/// Sets up the global logger and returns a handle to it
///
/// # Arguments
///
/// * 'log_path' - file to append log lines to, console only if None
/// * 'log_level' - maximum level to log
pub fn setup_logger(log_path: Option<&str>, log_level: LevelFilter) -> Result<Handle, LoggerError> {
    let config = build_config(log_path, log_level)?;
    let handle = log4rs::init_config(config)?;

    Ok(handle)
}

/// Builds the log4rs configuration with a console appender and an optional file appender
///
/// # Arguments
///
/// * 'log_path' - file to append log lines to, console only if None
/// * 'log_level' - maximum level to log
fn build_config(log_path: Option<&str>, log_level: LevelFilter) -> Result<Config, LoggerError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let mut builder = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)));
    let mut root = Root::builder().appender("stdout");

    if let Some(path) = log_path {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build(path)?;

        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    Ok(builder.build(root.build(log_level))?)
}

/// Error depicting errors that occur while setting up the logger
///
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("FileError: {0}")]
    FileError(#[from] std::io::Error),
    #[error("ConfigError: {0}")]
    ConfigError(#[from] ConfigErrors),
    #[error("SetLoggerError: {0}")]
    SetLoggerError(#[from] SetLoggerError),
}
