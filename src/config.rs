//! Runtime configuration
//!
//! Command-line flags, each with an environment fallback, read once at
//! startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Terminal client for the bank REST API
#[derive(Parser, Debug, Clone)]
#[command(name = "bankdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the bank API gateway
    #[arg(long, env = "BANKDESK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where the session token is kept between runs
    #[arg(long, env = "BANKDESK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds; no timeout when unset
    #[arg(long, env = "BANKDESK_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Directory for history exports (default: Downloads)
    #[arg(long, env = "BANKDESK_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("API URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    /// `None` keeps the session in memory only
    pub session_file: Option<PathBuf>,
    /// `None` means requests never time out
    pub timeout: Option<Duration>,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: Some(default_session_path()),
            timeout: None,
            export_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let config = Self {
            api_url: parse_url(&cli.api_url)?,
            session_file: Some(
                cli.session_file
                    .clone()
                    .unwrap_or_else(default_session_path),
            ),
            timeout: cli.timeout_secs.map(Duration::from_secs),
            export_dir: cli.export_dir.clone(),
        };

        Ok(if cli.ephemeral {
            config.ephemeral()
        } else {
            config
        })
    }

    /// Drop persistence; the session lives for this process only
    pub fn ephemeral(mut self) -> Self {
        self.session_file = None;
        self
    }
}

/// Default session file location
pub fn default_session_path() -> PathBuf {
    let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("bankdesk").join("session.json")
}

fn parse_url(value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidUrl(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bankdesk").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_cli(&parse(&[]).unwrap()).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert!(config.timeout.is_none());
        assert!(config.export_dir.is_none());
        assert!(config.session_file.unwrap().ends_with("bankdesk/session.json"));
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "--api-url",
            "https://bank.example.com/",
            "--session-file",
            "/tmp/s.json",
            "--timeout-secs",
            "30",
            "--export-dir",
            "/tmp/out",
        ])
        .unwrap();
        let config = AppConfig::from_cli(&cli).unwrap();

        assert_eq!(config.api_url, "https://bank.example.com");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_ephemeral_flag_drops_session_file() {
        let cli = parse(&["--ephemeral", "--session-file", "/tmp/s.json"]).unwrap();
        assert!(AppConfig::from_cli(&cli).unwrap().session_file.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let cli = parse(&["--api-url", "localhost:5000"]).unwrap();
        assert_eq!(
            AppConfig::from_cli(&cli),
            Err(ConfigError::InvalidUrl("localhost:5000".to_string()))
        );

        for bad in ["0", "-3", "soon"] {
            assert!(parse(&["--timeout-secs", bad]).is_err());
        }
        assert!(parse(&["--verbose"]).is_err());
    }
}
