//! Configuration commands.

use std::path::{Path, PathBuf};

use crate::config::{AppConfig, ClientConfig, ConfigError};
use crate::error::ClientResult;

/// Dumps the configuration file, API key masked, to stdout.
pub fn dump(file: &ClientConfig, path: Option<&Path>) -> ClientResult<()> {
    let toml_str = file.redacted().to_toml()?;
    println!("# config.toml ({})", config_path(path).display());
    println!("{}", toml_str);
    Ok(())
}

/// Validates the effective configuration.
pub fn validate(config: &AppConfig) -> ClientResult<()> {
    check(config)?;
    if config.admins.is_empty() {
        println!("No administrators configured.");
    } else {
        println!("Administrators: {}", config.admins.entries().join(", "));
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Shows the configuration file path.
pub fn path(path: Option<&Path>) -> ClientResult<()> {
    println!("config: {}", config_path(path).display());
    Ok(())
}

/// Checks that the calendar can be queried with this configuration.
pub fn check(config: &AppConfig) -> Result<(), ConfigError> {
    let missing = config.missing();
    if !missing.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "missing {} (set it in {}, pass it as a flag or export AFISHA_{})",
            missing.join(" and "),
            ClientConfig::default_path().display(),
            missing[0].to_uppercase()
        )));
    }

    #[cfg(feature = "google")]
    config.google_config().validate().map_err(ConfigError::Invalid)?;

    Ok(())
}

fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(ClientConfig::default_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    fn resolve(overrides: Overrides) -> AppConfig {
        AppConfig::resolve_with(&ClientConfig::default(), &overrides, |_| None).unwrap()
    }

    #[test]
    fn missing_values_reported() {
        let err = check(&resolve(Overrides::default())).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("missing api_key and calendar_id"));
        assert!(message.contains("AFISHA_API_KEY"));
    }

    #[test]
    fn complete_configuration_passes() {
        let config = resolve(Overrides {
            api_key: Some("AIzaSyKey".into()),
            calendar_id: Some("cal@group.calendar.google.com".into()),
            ..Overrides::default()
        });
        assert!(check(&config).is_ok());
        assert!(validate(&config).is_ok());
    }

    #[cfg(feature = "google")]
    #[test]
    fn zero_timeout_rejected() {
        let config = resolve(Overrides {
            api_key: Some("AIzaSyKey".into()),
            calendar_id: Some("cal".into()),
            timeout: Some(0),
            ..Overrides::default()
        });
        assert!(matches!(check(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn explicit_path_wins() {
        assert_eq!(
            config_path(Some(Path::new("/tmp/afisha.toml"))),
            PathBuf::from("/tmp/afisha.toml")
        );
        assert!(config_path(None).ends_with("afisha/config.toml"));
    }
}
