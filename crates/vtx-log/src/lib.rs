use std::path::Path;

use chrono::{Datelike, Timelike};
// Re-export logging functions for convenience.
pub use log::*;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("unable to open log file `{path}`: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("unable to create logging configuration: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("a logger was already installed: {0}")]
    AlreadyInitialized(#[from] SetLoggerError),
}

/// Initializes logging. Should be called before any other logging functions. Provided
/// `LevelFilter` will remove all logs below the provided level.
///
/// Console output goes to stderr so diagnostics never mix with generated text on stdout. When
/// `log_dir` is provided, logs are also written to a file in that directory named after the
/// current time.
pub fn init(filter: LevelFilter, log_dir: Option<&Path>) -> Result<(), LogInitError> {
    // Output to console
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})}: {m}{n}")))
        .build();

    let mut config =
        Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if let Some(log_dir) = log_dir {
        // Output to log file. Name of the file is based on the current time.
        let now = chrono::Utc::now();
        let path = log_dir.join(format!(
            "{} {} {} {} {} {}.txt",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        ));

        let log_file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} - {l} - {m}{n}")))
            .build(&path)
            .map_err(|source| LogInitError::File {
                path: path.display().to_string(),
                source,
            })?;

        config = config.appender(Appender::builder().build("log_file", Box::new(log_file)));
        root = root.appender("log_file");
    }

    let config = config.build(root.build(filter))?;
    log4rs::init_config(config)?;

    log_panics::init();

    Ok(())
}
