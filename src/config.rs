use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound accepted for `max_input_bytes`.
pub const MAX_INPUT_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Which decoder the input is handed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Dns,
    Dot11,
    Ipv6,
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dns" => Ok(Protocol::Dns),
            "dot11" | "802.11" | "wifi" => Ok(Protocol::Dot11),
            "ipv6" => Ok(Protocol::Ipv6),
            _ => Err(ConfigError::InvalidProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Dns => write!(f, "dns"),
            Protocol::Dot11 => write!(f, "dot11"),
            Protocol::Ipv6 => write!(f, "ipv6"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,

    pub output: OutputFormat,

    /// Decoder applied to input when the command line does not pick one
    pub protocol: Protocol,

    /// Inputs longer than this are refused before decoding
    pub max_input_bytes: usize,

    /// Include the raw bytes as hex alongside the decoded view
    pub show_raw: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            output: OutputFormat::Text,
            protocol: Protocol::Dns,
            max_input_bytes: 65535,
            show_raw: false,
        }
    }
}

impl InspectConfig {
    /// Create an InspectConfig from the defaults and environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a TOML file. Keys it leaves out keep their defaults, and
    /// environment variables still take precedence.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: InspectConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `NETFRAME_*` overrides looked up through `lookup`, then
    /// validates the result.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = lookup("NETFRAME_LOG") {
            self.log_filter = filter;
        }

        if let Some(output) = lookup("NETFRAME_OUTPUT") {
            self.output = output.parse()?;
        }

        if let Some(protocol) = lookup("NETFRAME_PROTOCOL") {
            self.protocol = protocol.parse()?;
        }

        if let Some(max_input) = lookup("NETFRAME_MAX_INPUT") {
            self.max_input_bytes = max_input
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidMaxInput(max_input.clone()))?;
        }

        if let Some(show_raw) = lookup("NETFRAME_SHOW_RAW") {
            self.show_raw = parse_bool(&show_raw, self.show_raw);
        }

        self.validate()?;

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 {
            return Err(ConfigError::InvalidMaxInput(
                "Max input must be greater than 0".to_string(),
            ));
        }

        if self.max_input_bytes > MAX_INPUT_LIMIT {
            return Err(ConfigError::InvalidMaxInput(format!(
                "Max input too large (max {} bytes)",
                MAX_INPUT_LIMIT
            )));
        }

        Ok(())
    }
}

/// Parse a boolean from a string, with a default value for invalid input
pub fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}
