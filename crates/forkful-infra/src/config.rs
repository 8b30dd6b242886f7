//! Client configuration loader for Forkful.
//!
//! Reads `config.toml` from the data directory (`~/.forkful/` by default),
//! then applies environment overrides. Falls back to defaults when the file
//! is missing or malformed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use forkful_types::location::Coordinates;

/// Default backend origin.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default path prefix every operation is joined under.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Fixed timeout applied to every backend request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding `api_url`.
pub const ENV_API_URL: &str = "FORKFUL_API_URL";

/// Environment variable overriding `maps_api_key`.
pub const ENV_MAPS_API_KEY: &str = "FORKFUL_MAPS_API_KEY";

/// Environment variable overriding the data directory.
pub const ENV_HOME: &str = "FORKFUL_HOME";

/// Everything the client needs to reach the backend and locate the user.
///
/// `maps_api_key` is a [`SecretString`]; its `Debug` output is redacted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_prefix: String,
    pub maps_api_key: Option<SecretString>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip)]
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            maps_api_key: None,
            latitude: None,
            longitude: None,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Fixed position from configuration, if both coordinates are set.
    pub fn fixed_position(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            tracing::debug!(api_url = %url, "API URL taken from environment");
            self.api_url = url;
        }
        if let Some(key) = non_empty(ENV_MAPS_API_KEY) {
            tracing::debug!("Maps API key taken from environment");
            self.maps_api_key = Some(SecretString::from(key));
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FORKFUL_HOME` environment variable
/// 2. `~/.forkful`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_HOME) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".forkful");
    }

    PathBuf::from(".forkful")
}

/// Load client configuration from `{data_dir}/config.toml`, without
/// environment overrides.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Load client configuration: file, then process environment.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let mut config = load_config_file(data_dir).await;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.api_prefix, "/api/v1");
        assert!(config.maps_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
api_url = "https://food.example.com"
maps_api_key = "maps-key"
latitude = 40.7128
longitude = -74.006
"#,
        )
        .await
        .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.api_url, "https://food.example.com");
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(
            config.maps_api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("maps-key".to_string())
        );
        assert_eq!(config.fixed_position(), Some(Coordinates::new(40.7128, -74.006)));
        assert_eq!(config.request_timeout, REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://10.0.0.5:9000"),
            (ENV_MAPS_API_KEY, "env-key"),
        ]);
        let mut config = ClientConfig {
            api_url: "https://from-file".to_string(),
            ..Default::default()
        };
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_url, "http://10.0.0.5:9000");
        assert_eq!(config.maps_api_key.unwrap().expose_secret(), "env-key");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.maps_api_key.is_none());
    }

    #[test]
    fn fixed_position_needs_both_coordinates() {
        let config = ClientConfig {
            latitude: Some(1.0),
            ..Default::default()
        };
        assert!(config.fixed_position().is_none());
    }

    #[test]
    fn debug_output_redacts_maps_key() {
        let config = ClientConfig {
            maps_api_key: Some(SecretString::from("super-secret")),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
