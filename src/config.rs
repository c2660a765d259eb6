use std::{env, path::PathBuf, str::FromStr};

use rtmp::DEFAULT_CHUNK_SIZE;
use thiserror::Error;

const LOGGER_LEVEL_ENV: &str = "CHUNKDUMP_LOGGER_LEVEL";
const LOGGER_FILE_LEVEL_ENV: &str = "CHUNKDUMP_LOGGER_FILE_LEVEL";
const LOGGER_FORMAT_ENV: &str = "CHUNKDUMP_LOGGER_FORMAT";
const LOG_FILE_ENV: &str = "CHUNKDUMP_LOG_FILE";
const CHUNK_SIZE_ENV: &str = "CHUNKDUMP_CHUNK_SIZE";

// Largest chunk size a peer may announce, the top bit of SetChunkSize is reserved.
pub const MAX_CHUNK_SIZE: usize = 0x7FFF_FFFF;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub logger: LoggerConfig,
    /// Chunk size assumed until the stream carries a SetChunkSize message.
    pub chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub stdio_level: String,
    pub file_level: String,
    pub format: LoggerFormat,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    Pretty,
    Json,
    Compact,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value of CHUNKDUMP_LOGGER_FORMAT: \"{0}\", expected pretty, json or compact")]
    InvalidLoggerFormat(String),

    #[error("Invalid value of CHUNKDUMP_CHUNK_SIZE: \"{0}\", expected a number in range 1-2147483647")]
    InvalidChunkSize(String),
}

impl FromStr for LoggerFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LoggerFormat::Pretty),
            "json" => Ok(LoggerFormat::Json),
            "compact" => Ok(LoggerFormat::Compact),
            _ => Err(ConfigError::InvalidLoggerFormat(s.to_string())),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger: LoggerConfig {
                stdio_level: "info,rtmp=debug".to_string(),
                file_level: "info,rtmp=debug".to_string(),
                format: LoggerFormat::Compact,
                log_file: None,
            },
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Reads configuration from environment variables. Invalid values are
/// reported on stderr and replaced with defaults, logging is not set up
/// yet at this point.
pub fn read_config() -> Config {
    let (config, errors) = config_from(|name| env::var(name).ok());
    for err in errors {
        eprintln!("{err}. Using default value.");
    }
    config
}

fn config_from(get: impl Fn(&str) -> Option<String>) -> (Config, Vec<ConfigError>) {
    let mut config = Config::default();
    let mut errors = Vec::new();

    if let Some(level) = get(LOGGER_LEVEL_ENV) {
        config.logger.stdio_level = level;
    }
    config.logger.file_level = get(LOGGER_FILE_LEVEL_ENV)
        .unwrap_or_else(|| config.logger.stdio_level.clone());

    if let Some(format) = get(LOGGER_FORMAT_ENV) {
        match format.parse() {
            Ok(format) => config.logger.format = format,
            Err(err) => errors.push(err),
        }
    }

    config.logger.log_file = get(LOG_FILE_ENV)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    if let Some(chunk_size) = get(CHUNK_SIZE_ENV) {
        match chunk_size.parse::<usize>() {
            Ok(size) if (1..=MAX_CHUNK_SIZE).contains(&size) => config.chunk_size = size,
            _ => errors.push(ConfigError::InvalidChunkSize(chunk_size)),
        }
    }

    (config, errors)
}
