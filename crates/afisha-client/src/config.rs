//! Client configuration.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. command-line flags (`--api-key`, `--calendar-id`, `--admin-ids`) and
//!    their `AFISHA_*` environment variables
//! 2. `VITE_API_KEY`/`API_KEY`, `VITE_CALENDAR_ID`/`CALENDAR_ID`,
//!    `VITE_ADMIN_IDS`/`ADMIN_IDS`
//! 3. `config.toml`, by default at `~/.config/afisha/config.toml`
//!
//! Blank values count as absent. Values in the file support secret
//! references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use afisha_core::FormatOptions;
use afisha_providers::{CalendarProvider, ErrorProvider, ProviderError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::access::AdminAllowList;
use crate::secret;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to resolve {field}: {message}")]
    Secret { field: &'static str, message: String },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Google Calendar settings.
    pub google: GoogleSettings,

    /// Admin allow-list settings.
    pub admin: AdminSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

/// `[google]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// API key (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Public calendar id (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `[admin]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Comma-separated user ids and usernames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<String>,
}

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum name length in event rows (truncated with ellipsis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_name_length: Option<usize>,

    /// Render links as terminal hyperlinks.
    pub hyperlinks: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let defaults = FormatOptions::default();
        Self {
            max_name_length: defaults.max_name_length,
            hyperlinks: defaults.hyperlinks,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration file.
    ///
    /// An explicit `path` must exist; a missing file at the default location
    /// yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("afisha")
    }

    /// Returns a copy safe to print: literal API keys are masked, secret
    /// references are kept.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(key) = config.google.api_key.as_mut()
            && !key.trim().is_empty()
            && !secret::is_reference(key)
        {
            *key = "[redacted]".to_string();
        }
        config
    }

    /// Serializes to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// AppConfig (resolved)
// ---------------------------------------------------------------------------

/// Values given on the command line (or their `AFISHA_*` variables).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub calendar_id: Option<String>,
    pub admin_ids: Option<String>,
    pub timeout: Option<u64>,
}

/// The effective configuration after applying precedence.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub calendar_id: Option<String>,
    pub admins: AdminAllowList,
    pub timeout: Duration,
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Resolves the configuration against the process environment.
    pub fn resolve(file: &ClientConfig, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve_with(file, overrides, |name| std::env::var(name).ok())
    }

    /// Resolves the configuration, reading environment variables through `env`.
    pub fn resolve_with<F>(
        file: &ClientConfig,
        overrides: &Overrides,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = pick(
            "api_key",
            overrides.api_key.as_deref(),
            "API_KEY",
            file.google.api_key.as_deref(),
            &env,
        )?;
        let calendar_id = pick(
            "calendar_id",
            overrides.calendar_id.as_deref(),
            "CALENDAR_ID",
            file.google.calendar_id.as_deref(),
            &env,
        )?;
        let admin_ids = pick(
            "admin ids",
            overrides.admin_ids.as_deref(),
            "ADMIN_IDS",
            file.admin.ids.as_deref(),
            &env,
        )?;

        let timeout_secs = overrides
            .timeout
            .or(file.google.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            calendar_id,
            admins: admin_ids
                .as_deref()
                .map(AdminAllowList::parse)
                .unwrap_or_default(),
            timeout: Duration::from_secs(timeout_secs),
            display: file.display.clone(),
        })
    }

    /// Names of the required settings that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("api_key");
        }
        if self.calendar_id.is_none() {
            missing.push("calendar_id");
        }
        missing
    }

    /// Formatting options derived from the display settings.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            max_name_length: self.display.max_name_length,
            hyperlinks: self.display.hyperlinks,
        }
    }

    /// Builds the Google provider configuration.
    #[cfg(feature = "google")]
    pub fn google_config(&self) -> afisha_providers::google::GoogleConfig {
        afisha_providers::google::GoogleConfig::new(
            self.api_key.clone().unwrap_or_default(),
            self.calendar_id.clone().unwrap_or_default(),
        )
        .with_timeout(self.timeout)
    }

    /// Builds the calendar provider.
    ///
    /// A provider that cannot be built is replaced by one that fails every
    /// fetch with the reason, so the failure shows up as a load error.
    pub fn provider(&self) -> Arc<dyn CalendarProvider> {
        match self.build_provider() {
            Ok(provider) => provider,
            Err(err) => {
                debug!(error = %err, "provider unavailable");
                Arc::new(ErrorProvider::new("google", err))
            }
        }
    }

    #[cfg(feature = "google")]
    fn build_provider(&self) -> Result<Arc<dyn CalendarProvider>, ProviderError> {
        let provider = afisha_providers::google::GoogleProvider::new(self.google_config())?;
        Ok(Arc::new(provider))
    }

    #[cfg(not(feature = "google"))]
    fn build_provider(&self) -> Result<Arc<dyn CalendarProvider>, ProviderError> {
        Err(ProviderError::configuration(
            "built without Google Calendar support",
        ))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("calendar_id", &self.calendar_id)
            .field("admins", &self.admins)
            .field("timeout", &self.timeout)
            .field("display", &self.display)
            .finish()
    }
}

/// Picks the first non-blank value: override, `VITE_<name>`, `<name>`, file.
fn pick<F>(
    field: &'static str,
    override_value: Option<&str>,
    env_name: &str,
    file_value: Option<&str>,
    env: &F,
) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = non_blank(override_value) {
        return Ok(Some(value));
    }

    for name in [format!("VITE_{env_name}"), env_name.to_string()] {
        if let Some(value) = non_blank(env(&name).as_deref()) {
            debug!(field, source = %name, "using environment value");
            return Ok(Some(value));
        }
    }

    match non_blank(file_value) {
        Some(raw) => {
            let resolved = secret::resolve(&raw)
                .map_err(|message| ConfigError::Secret { field, message })?;
            Ok(non_blank(Some(resolved.as_str())))
        }
        None => Ok(None),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
