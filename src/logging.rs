use simplelog::*;
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::PathBuf;
use std::sync::OnceLock;

static LOGGER: OnceLock<Result<PathBuf, String>> = OnceLock::new();

/// `$HOME/.local/share/songposrs/logs`
pub fn log_dir() -> Result<PathBuf, Error> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not set"))?;

    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("songposrs")
        .join("logs"))
}

/// Routes the `log` macros into `app.log`. Only the first call configures the logger;
/// later calls report the outcome of the first one.
pub fn init_logger(level: LevelFilter) -> Result<PathBuf, Error> {
    let outcome = LOGGER.get_or_init(|| open_log_file(level).map_err(|e| e.to_string()));

    outcome
        .clone()
        .map_err(|msg| Error::new(ErrorKind::Other, msg))
}

fn open_log_file(level: LevelFilter) -> Result<PathBuf, Error> {
    let log_dir = log_dir()?;
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("app.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    CombinedLogger::init(vec![WriteLogger::new(level, config, log_file)])
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    Ok(log_path)
}
