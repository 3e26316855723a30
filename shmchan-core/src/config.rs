// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML channel configuration with strict validation.
//!
//! Channels are declared once and opened by name. Any invalid field rejects
//! the whole file.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::channel::Channel;
use crate::error::{ChannelError, ConfigError, IpcError, IpcResult};
use crate::transport::Transport;
use crate::types::{ChannelName, ChannelType, Mode, Timeout};

/// Timeout as written in YAML: milliseconds or the word `forever`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Millis(u64),
    Word(String),
}

/// Raw channel entry as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawChannelConfig {
    name: String,
    mode: String,
    #[serde(default)]
    channel_type: Option<String>,
    #[serde(default)]
    send_timeout_ms: Option<RawTimeout>,
    #[serde(default)]
    recv_timeout_ms: Option<RawTimeout>,
}

/// Raw defaults section.
#[derive(Debug, Deserialize)]
struct RawDefaults {
    #[serde(default = "default_channel_type")]
    channel_type: String,
    #[serde(default = "default_send_timeout")]
    send_timeout_ms: RawTimeout,
    #[serde(default = "default_recv_timeout")]
    recv_timeout_ms: RawTimeout,
}

fn default_channel_type() -> String {
    "channel".to_string()
}

fn default_send_timeout() -> RawTimeout {
    RawTimeout::Millis(0) // transport default
}

fn default_recv_timeout() -> RawTimeout {
    RawTimeout::Millis(0) // transport default
}

impl Default for RawDefaults {
    fn default() -> Self {
        Self {
            channel_type: default_channel_type(),
            send_timeout_ms: default_send_timeout(),
            recv_timeout_ms: default_recv_timeout(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    defaults: RawDefaults,
    #[serde(default)]
    channels: Vec<RawChannelConfig>,
}

/// Validated defaults applied to every channel entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDefaults {
    pub channel_type: ChannelType,
    pub send_timeout: Timeout,
    pub recv_timeout: Timeout,
}

impl Default for ChannelDefaults {
    fn default() -> Self {
        Self {
            channel_type: ChannelType::Channel,
            send_timeout: Timeout::TransportDefault,
            recv_timeout: Timeout::TransportDefault,
        }
    }
}

/// Validated channel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub name: ChannelName,
    pub channel_type: ChannelType,
    pub mode: Mode,
    pub send_timeout: Timeout,
    pub recv_timeout: Timeout,
}

impl ChannelConfig {
    /// Configuration for an undeclared channel, using `defaults`.
    pub fn with_defaults(name: ChannelName, mode: Mode, defaults: &ChannelDefaults) -> Self {
        Self {
            name,
            channel_type: defaults.channel_type,
            mode,
            send_timeout: defaults.send_timeout,
            recv_timeout: defaults.recv_timeout,
        }
    }

    /// Open this channel on `transport`.
    pub fn open(&self, transport: Arc<dyn Transport>) -> Result<Channel, ChannelError> {
        Channel::open(transport, self.channel_type, self.name.as_str(), self.mode)
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub defaults: ChannelDefaults,
    pub channels: Vec<ChannelConfig>,
}

impl Config {
    /// Look up a declared channel.
    pub fn channel(&self, name: &str) -> Result<&ChannelConfig, ConfigError> {
        self.channels
            .iter()
            .find(|c| c.name.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownChannel {
                name: name.to_string(),
            })
    }

    /// A declared channel, or one built from the defaults with `mode`.
    pub fn channel_or_default(&self, name: ChannelName, mode: Mode) -> ChannelConfig {
        match self.channel(name.as_str()) {
            Ok(declared) => declared.clone(),
            Err(_) => ChannelConfig::with_defaults(name, mode, &self.defaults),
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> IpcResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| IpcError::Io {
            context: "reading config file",
            source: e,
        })?;

        Ok(Self::load_string(&content)?)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Config, ConfigError> {
        let defaults = Self::validate_defaults(raw.defaults)?;

        let mut channels = Vec::with_capacity(raw.channels.len());
        let mut seen = HashSet::new();

        for raw_channel in raw.channels {
            let channel = Self::validate_channel(raw_channel, &defaults)?;

            if !seen.insert(channel.name.as_str().to_string()) {
                return Err(ConfigError::DuplicateChannel {
                    name: channel.name.to_string(),
                });
            }

            channels.push(channel);
        }

        tracing::debug!(channels = channels.len(), "Loaded channel configuration");

        Ok(Config { defaults, channels })
    }

    fn validate_defaults(raw: RawDefaults) -> Result<ChannelDefaults, ConfigError> {
        Ok(ChannelDefaults {
            channel_type: Self::parse_channel_type(&raw.channel_type)?,
            send_timeout: Self::parse_timeout("send_timeout_ms", raw.send_timeout_ms)?,
            recv_timeout: Self::parse_timeout("recv_timeout_ms", raw.recv_timeout_ms)?,
        })
    }

    fn validate_channel(
        raw: RawChannelConfig,
        defaults: &ChannelDefaults,
    ) -> Result<ChannelConfig, ConfigError> {
        let name = ChannelName::new(raw.name.clone()).map_err(|e| ConfigError::InvalidField {
            field: "name",
            value: raw.name.clone(),
            reason: e.to_string(),
        })?;

        let mode = raw
            .mode
            .parse::<Mode>()
            .map_err(|e| ConfigError::InvalidField {
                field: "mode",
                value: raw.mode.clone(),
                reason: e.to_string(),
            })?;

        let channel_type = match raw.channel_type {
            Some(value) => Self::parse_channel_type(&value)?,
            None => defaults.channel_type,
        };

        let send_timeout = match raw.send_timeout_ms {
            Some(value) => Self::parse_timeout("send_timeout_ms", value)?,
            None => defaults.send_timeout,
        };

        let recv_timeout = match raw.recv_timeout_ms {
            Some(value) => Self::parse_timeout("recv_timeout_ms", value)?,
            None => defaults.recv_timeout,
        };

        Ok(ChannelConfig {
            name,
            channel_type,
            mode,
            send_timeout,
            recv_timeout,
        })
    }

    fn parse_channel_type(value: &str) -> Result<ChannelType, ConfigError> {
        value
            .parse::<ChannelType>()
            .map_err(|e| ConfigError::InvalidField {
                field: "channel_type",
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    fn parse_timeout(field: &'static str, raw: RawTimeout) -> Result<Timeout, ConfigError> {
        match raw {
            RawTimeout::Millis(ms) => Ok(Timeout::from_millis(ms)),
            RawTimeout::Word(word) => match word.to_ascii_lowercase().as_str() {
                "forever" => Ok(Timeout::Forever),
                "default" => Ok(Timeout::TransportDefault),
                _ => Err(ConfigError::InvalidField {
                    field,
                    value: word,
                    reason: "expected milliseconds, 'default' or 'forever'".to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let yaml = r#"
defaults:
  channel_type: route
  send_timeout_ms: 100
  recv_timeout_ms: forever

channels:
  - name: telemetry
    mode: sender
  - name: commands
    mode: duplex
    channel_type: channel
    recv_timeout_ms: 250
"#;

        let config = ConfigLoader::load_string(yaml).unwrap();
        assert_eq!(config.channels.len(), 2);

        let telemetry = config.channel("telemetry").unwrap();
        assert_eq!(telemetry.channel_type, ChannelType::Route);
        assert_eq!(telemetry.mode, Mode::SENDER);
        assert_eq!(telemetry.send_timeout, Timeout::Millis(100));
        assert_eq!(telemetry.recv_timeout, Timeout::Forever);

        let commands = config.channel("commands").unwrap();
        assert_eq!(commands.channel_type, ChannelType::Channel);
        assert_eq!(commands.mode, Mode::DUPLEX);
        assert_eq!(commands.recv_timeout, Timeout::Millis(250));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConfigLoader::load_string("{}").unwrap();
        assert!(config.channels.is_empty());
        assert_eq!(config.defaults, ChannelDefaults::default());
    }

    #[test]
    fn test_invalid_mode() {
        let yaml = r#"
channels:
  - name: bad
    mode: writer
"#;
        let err = ConfigLoader::load_string(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { field: "mode", .. }));
    }

    #[test]
    fn test_empty_name() {
        let yaml = r#"
channels:
  - name: ""
    mode: sender
"#;
        let err = ConfigLoader::load_string(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { field: "name", .. }));
    }

    #[test]
    fn test_duplicate_channel() {
        let yaml = r#"
channels:
  - name: dup
    mode: sender
  - name: dup
    mode: receiver
"#;
        let err = ConfigLoader::load_string(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateChannel { .. }));
    }

    #[test]
    fn test_bad_timeout_word() {
        let yaml = r#"
defaults:
  send_timeout_ms: soon
"#;
        let err = ConfigLoader::load_string(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "send_timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_channel_or_default() {
        let config = ConfigLoader::load_string("defaults:\n  send_timeout_ms: 42\n").unwrap();
        let name = ChannelName::new("adhoc").unwrap();
        let channel = config.channel_or_default(name, Mode::RECEIVER);
        assert_eq!(channel.mode, Mode::RECEIVER);
        assert_eq!(channel.send_timeout, Timeout::Millis(42));
        assert!(matches!(
            config.channel("adhoc"),
            Err(ConfigError::UnknownChannel { .. })
        ));
    }
}
