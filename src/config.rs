//! Configuration management for the RAX FTP client
//!
//! Loads `config.toml` with `RAX_FTP_*` environment overrides. Library users
//! that build a [`ClientConfig`] by hand start from `Default`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

use crate::transfer::DataChannelType;

/// Complete client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    // ═══ CONTROL CONNECTION ═══
    /// Server host name or IP address
    /// Environment: RAX_FTP_HOST
    pub host: String,

    /// Server control port
    /// Environment: RAX_FTP_CONTROL_PORT
    pub control_port: u16,

    pub username: String,
    pub password: String,

    /// Seconds allowed for the control TCP connect
    pub connect_timeout_secs: u64,

    /// Seconds to wait for a reply line (0 = wait forever)
    pub reply_timeout_secs: u64,

    // ═══ DATA CHANNEL ═══
    /// `extended_active` (EPRT, PORT fallback) or `active` (PORT only)
    pub channel_type: DataChannelType,

    /// Seconds to wait for the server's data connection (0 = wait forever)
    pub accept_timeout_secs: u64,

    /// Release the control lock before waiting for the data connection
    pub accept_outside_lock: bool,

    /// Listen backlog of the data socket
    pub listen_backlog: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            control_port: 21,
            username: "anonymous".to_string(),
            password: "anonymous@".to_string(),
            connect_timeout_secs: 10,
            reply_timeout_secs: 30,
            channel_type: DataChannelType::ExtendedActive,
            accept_timeout_secs: 0,
            accept_outside_lock: false,
            listen_backlog: 1,
        }
    }
}

impl ClientConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = [
            "rax-ftp-client/config", // Container layout: /app/rax-ftp-client/config.toml
            "config",                // Local development: ./config.toml
        ];

        let mut last_error = None;

        for config_path in &config_paths {
            match Self::with_defaults()?
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("RAX_FTP").try_parsing(true))
                .build()
            {
                Ok(settings) => return Self::finish(settings),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ConfigError::Message(format!("no config file found in {:?}", config_paths))
        }))
    }

    /// Parses TOML text on top of the defaults. Keys left out keep their
    /// default values.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Self::with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let d = Self::default();
        Config::builder()
            .set_default("host", d.host)?
            .set_default("control_port", i64::from(d.control_port))?
            .set_default("username", d.username)?
            .set_default("password", d.password)?
            .set_default("connect_timeout_secs", d.connect_timeout_secs as i64)?
            .set_default("reply_timeout_secs", d.reply_timeout_secs as i64)?
            .set_default("channel_type", "extended_active")?
            .set_default("accept_timeout_secs", d.accept_timeout_secs as i64)?
            .set_default("accept_outside_lock", d.accept_outside_lock)?
            .set_default("listen_backlog", i64::from(d.listen_backlog))
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Message("host cannot be empty".into()));
        }

        if self.control_port == 0 {
            return Err(ConfigError::Message("control_port cannot be 0".into()));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if !self.channel_type.is_active() {
            return Err(ConfigError::Message(format!(
                "channel_type {} is not an active mode",
                self.channel_type
            )));
        }

        if self.listen_backlog < 1 {
            return Err(ConfigError::Message(
                "listen_backlog must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Get host and control port as a connectable address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.host, self.control_port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn reply_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.reply_timeout_secs)
    }

    pub fn accept_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.accept_timeout_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
