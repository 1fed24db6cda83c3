// Logging - simplelog backend for the `log` facade
// Debug and above to a file in the user's data directory, warnings to the terminal

use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No data directory available for log files")]
    NoDataDir,

    #[error("Cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// `<local data dir>/metromono/logs`
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("metromono").join("logs"))
}

pub fn init_logger() -> Result<PathBuf, LoggingError> {
    let log_dir = log_dir().ok_or(LoggingError::NoDataDir)?;
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("metromono.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ];
    CombinedLogger::init(loggers)?;

    Ok(log_path)
}
