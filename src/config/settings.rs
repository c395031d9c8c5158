use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// File-based configuration: the CI server address and API token.
///
/// Flags and env vars (handled by clap) take precedence over the file;
/// the file is the fallback for values not given on the command line.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "cictl").context("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load the config file; a missing file yields the empty default.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Server address: flag/env value first, then the config file.
    pub fn resolve_address(&self, flag: Option<String>) -> Result<String> {
        match resolve(flag, self.server.address.clone()) {
            Some(address) => Ok(address),
            None => bail!(
                "No CI server address configured. Pass --addr, set CICTL_ADDR, or add [server].address to {}.",
                Self::config_path()?.display()
            ),
        }
    }

    /// API token: flag/env value first, then the config file.
    pub fn resolve_token(&self, flag: Option<String>) -> Result<String> {
        match resolve(flag, self.server.token.clone()) {
            Some(token) => Ok(token),
            None => bail!(
                "No API token configured. Pass --token, set CICTL_TOKEN, or add [server].token to {}.",
                Self::config_path()?.display()
            ),
        }
    }
}

/// Pick the first non-blank candidate, trimmed.
fn resolve(flag: Option<String>, file: Option<String>) -> Option<String> {
    for candidate in [flag, file].into_iter().flatten() {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(address: Option<&str>, token: Option<&str>) -> Config {
        Config {
            server: ServerConfig {
                address: address.map(|s| s.to_string()),
                token: token.map(|s| s.to_string()),
            },
        }
    }

    #[test]
    fn test_flag_overrides_file() {
        let config = config(Some("https://ci.example.com"), None);
        let address = config
            .resolve_address(Some("https://other.example.com".to_string()))
            .unwrap();
        assert_eq!(address, "https://other.example.com");
    }

    #[test]
    fn test_file_fallback() {
        let config = config(Some("https://ci.example.com"), Some("file-token"));
        assert_eq!(
            config.resolve_address(None).unwrap(),
            "https://ci.example.com"
        );
        assert_eq!(config.resolve_token(None).unwrap(), "file-token");
    }

    #[test]
    fn test_blank_flag_falls_through() {
        let config = config(Some("https://ci.example.com"), None);
        let address = config.resolve_address(Some("   ".to_string())).unwrap();
        assert_eq!(address, "https://ci.example.com");
    }

    #[test]
    fn test_missing_values_error() {
        let config = config(None, None);
        assert!(config.resolve_address(None).is_err());
        assert!(config.resolve_token(None).is_err());
    }

    #[test]
    fn test_values_are_trimmed() {
        let config = config(Some("  https://ci.example.com  "), None);
        assert_eq!(
            config.resolve_address(None).unwrap(),
            "https://ci.example.com"
        );
    }

    #[test]
    fn test_parse_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [server]
            address = "https://ci.example.com"
            token = "abc123"
            "#,
        )
        .unwrap();
        assert_eq!(
            parsed.server.address.as_deref(),
            Some("https://ci.example.com")
        );
        assert_eq!(parsed.server.token.as_deref(), Some("abc123"));
    }
}
