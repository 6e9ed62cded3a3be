use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Invalid bind address '{0}'")]
    InvalidAddress(String),
}

/// Interpret the common truthy spellings used in environment variables.
///
/// `"true"`, `"1"`, `"t"`, `"yes"` and `"y"` (any case) are true, everything
/// else is false.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "yes" | "y"
    )
}

/// Settings for the speech engine and the per-request staging area.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub binary: String,
    pub language: String,
    pub rate: Option<u32>,
    pub male_voice: Option<String>,
    pub female_voice: Option<String>,
    pub staging_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let debug = var("IS_DEBUG").map(|v| is_truthy(&v)).unwrap_or(false);
        let host = var("FLASK_RUN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        // Numbers skip the empty-value filter: a blank port is an error, not a default
        let port = match lookup("FLASK_RUN_PORT") {
            Some(value) => parse_number("FLASK_RUN_PORT", &value)?,
            None => DEFAULT_PORT,
        };
        let rate: Option<u32> = lookup("TTS_RATE")
            .map(|value| parse_number("TTS_RATE", &value))
            .transpose()?;

        Ok(Self {
            debug,
            host,
            port,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            engine: EngineConfig {
                binary: var("TTS_BINARY").unwrap_or_else(|| "espeak-ng".to_string()),
                language: var("TTS_LANGUAGE").unwrap_or_else(|| "en".to_string()),
                rate,
                male_voice: var("TTS_MALE_VOICE"),
                female_voice: var("TTS_FEMALE_VOICE"),
                staging_dir: var("TTS_STAGING_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(std::env::temp_dir),
            },
        })
    }

    /// Resolve the bind address. Hostnames such as `localhost` are looked up;
    /// the first resolved address wins.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = || ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port));
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}
