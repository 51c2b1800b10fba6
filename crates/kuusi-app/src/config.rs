//! Session configuration
//!
//! Loaded from TOML, then overridden by `KUUSI_*` environment variables,
//! then validated. Every field has a default, so an empty file (or no file)
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default inactivity window before a forced sign-out (3 minutes)
pub const DEFAULT_INACTIVITY_THRESHOLD_MS: u64 = 3 * 60 * 1000;
/// Default splash display interval
pub const DEFAULT_SPLASH_DELAY_MS: u64 = 2_000;
/// Default email-verification poll interval
pub const DEFAULT_VERIFICATION_POLL_INTERVAL_MS: u64 = 3_000;
/// Default invitation code
pub const DEFAULT_INVITATION_CODE: &str = "Helsinki";
/// Upper bound on the splash delay; it is cosmetic and must stay short
pub const MAX_SPLASH_DELAY_MS: u64 = 10_000;

const ENV_PREFIX: &str = "KUUSI_";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config file {path}: {message}")]
    Io {
        /// File path
        path: String,
        /// OS error
        message: String,
    },
    /// File or variable could not be parsed
    #[error("Invalid config syntax: {0}")]
    Parse(String),
    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Tunables for the session core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time hidden/closed after which the next launch forces sign-out
    pub inactivity_threshold_ms: u64,
    /// Splash display interval before the first routing decision
    pub splash_delay_ms: u64,
    /// Interval between email-verification reloads
    pub verification_poll_interval_ms: u64,
    /// Code that opens the invitation gate
    pub invitation_code: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold_ms: DEFAULT_INACTIVITY_THRESHOLD_MS,
            splash_delay_ms: DEFAULT_SPLASH_DELAY_MS,
            verification_poll_interval_ms: DEFAULT_VERIFICATION_POLL_INTERVAL_MS,
            invitation_code: DEFAULT_INVITATION_CODE.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Merge with `KUUSI_*` environment variables
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge with `KUUSI_*` entries from an arbitrary variable set.
    ///
    /// Unknown `KUUSI_*` names are ignored.
    pub fn merge_with_vars(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "INACTIVITY_THRESHOLD_MS" => {
                    self.inactivity_threshold_ms = parse_ms("inactivity_threshold_ms", &value)?;
                }
                "SPLASH_DELAY_MS" => {
                    self.splash_delay_ms = parse_ms("splash_delay_ms", &value)?;
                }
                "VERIFICATION_POLL_INTERVAL_MS" => {
                    self.verification_poll_interval_ms =
                        parse_ms("verification_poll_interval_ms", &value)?;
                }
                "INVITATION_CODE" => self.invitation_code = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inactivity_threshold_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "inactivity_threshold_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.splash_delay_ms > MAX_SPLASH_DELAY_MS {
            return Err(ConfigError::Invalid {
                field: "splash_delay_ms",
                reason: format!("must be at most {MAX_SPLASH_DELAY_MS}ms"),
            });
        }
        if self.verification_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "verification_poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.invitation_code.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "invitation_code",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Inactivity threshold as a duration
    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_millis(self.inactivity_threshold_ms)
    }

    /// Splash delay as a duration
    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_delay_ms)
    }

    /// Verification poll interval as a duration
    pub fn verification_poll_interval(&self) -> Duration {
        Duration::from_millis(self.verification_poll_interval_ms)
    }
}

fn parse_ms(field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("expected milliseconds, got {value:?}: {e}"),
    })
}
