// config.rs

use crate::cli::Args;
use ::config::ConfigError;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ENV_PREFIX: &str = "SONGPOSRS";

/// Runtime settings, layered as settings file < environment < command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub device: Option<String>,
    pub list_devices: bool,
    pub show_clock: bool,
    pub display: bool,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: None,
            list_devices: false,
            show_clock: false,
            display: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Loads settings from `--config` (or the default settings file) and the environment,
    /// then applies command line overrides.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let path = args.config.clone().or_else(default_settings_path);
        Self::from_sources(
            args,
            path.as_deref(),
            ::config::Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Builds the layered settings. A settings file named by `--config` must exist;
    /// any other path is optional.
    pub fn from_sources(
        args: &Args,
        settings_path: Option<&Path>,
        environment: ::config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = settings_path {
            let required = args.config.as_deref() == Some(path);
            log::debug!("Reading settings from {} (required={})", path.display(), required);
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            );
        }
        let settings = builder.add_source(environment).build()?;

        let device = args
            .device
            .clone()
            .or_else(|| settings.get_string("device").ok());

        let show_clock = args.show_clock || settings.get_bool("show_clock").unwrap_or(false);
        let display = args.display || settings.get_bool("display").unwrap_or(false);

        let log_level = match args
            .log_level
            .clone()
            .or_else(|| settings.get_string("log_level").ok())
        {
            Some(level) => parse_log_level(&level)?,
            None => LevelFilter::Info,
        };

        Ok(Config {
            device,
            list_devices: args.device_list,
            show_clock,
            display,
            log_level,
        })
    }
}

fn parse_log_level(level: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(level)
        .map_err(|_| ConfigError::Message(format!("invalid log level '{}'", level)))
}

/// `$HOME/.config/songposrs/settings.toml`
pub fn default_settings_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("songposrs")
            .join("settings.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn settings_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "songposrs-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    /// Environment layer fed from a fixed map instead of the process environment
    fn environment(vars: &[(&str, &str)]) -> ::config::Environment {
        let map: ::config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ::config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let args = Args::parse_from(["test"]);
        let config = Config::from_sources(&args, None, environment(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_settings_file_values() {
        let path = settings_file(
            "values",
            "device = \"Reaper\"\nshow_clock = true\nlog_level = \"debug\"\n",
        );
        let args = Args::parse_from(["test"]);
        let config = Config::from_sources(&args, Some(&path), environment(&[])).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.device.as_deref(), Some("Reaper"));
        assert!(config.show_clock);
        assert!(!config.display);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_settings_file_without_extension() {
        let path = std::env::temp_dir().join(format!("songposrs-plain-{}", std::process::id()));
        fs::write(&path, "device = \"Bitwig\"\ndisplay = true\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from(["test", "--config", path_arg.as_str()]);
        let config = Config::from_sources(&args, Some(&path), environment(&[])).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.device.as_deref(), Some("Bitwig"));
        assert!(config.display);
    }

    #[test]
    fn test_environment_overrides_settings_file() {
        let path = settings_file("env", "device = \"Reaper\"\nlog_level = \"debug\"\n");
        let args = Args::parse_from(["test"]);
        let env = environment(&[
            ("SONGPOSRS_DEVICE", "Ableton"),
            ("SONGPOSRS_SHOW_CLOCK", "true"),
        ]);
        let config = Config::from_sources(&args, Some(&path), env).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.device.as_deref(), Some("Ableton"));
        assert!(config.show_clock);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_command_line_wins() {
        let path = settings_file("override", "device = \"Reaper\"\nlog_level = \"debug\"\n");
        let args = Args::parse_from(["test", "--device", "2", "--log-level", "warn", "--display"]);
        let env = environment(&[
            ("SONGPOSRS_DEVICE", "Ableton"),
            ("SONGPOSRS_LOG_LEVEL", "trace"),
        ]);
        let config = Config::from_sources(&args, Some(&path), env).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.device.as_deref(), Some("2"));
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert!(config.display);
    }

    #[test]
    fn test_missing_default_settings_file_is_not_an_error() {
        let args = Args::parse_from(["test"]);
        let path = std::env::temp_dir().join("songposrs-does-not-exist.toml");
        assert!(Config::from_sources(&args, Some(&path), environment(&[])).is_ok());
    }

    #[test]
    fn test_missing_explicit_settings_file_is_an_error() {
        let path = std::env::temp_dir().join("songposrs-missing-explicit.toml");
        let path_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from(["test", "--config", path_arg.as_str()]);
        assert!(Config::from_sources(&args, Some(&path), environment(&[])).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let args = Args::parse_from(["test", "--log-level", "loud"]);
        assert!(Config::from_sources(&args, None, environment(&[])).is_err());
    }

    #[test]
    fn test_invalid_log_level_from_environment() {
        let args = Args::parse_from(["test"]);
        let env = environment(&[("SONGPOSRS_LOG_LEVEL", "loud")]);
        assert!(Config::from_sources(&args, None, env).is_err());
    }
}
