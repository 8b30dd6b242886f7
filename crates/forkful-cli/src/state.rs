//! Application state shared by every command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use forkful_infra::api::RestClient;
use forkful_infra::config::{ClientConfig, load_client_config, resolve_data_dir};

/// Resolved configuration plus the backend client built from it.
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub client: Arc<RestClient>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration (file, then environment, then the `--api-url`
    /// flag) and build the HTTP client.
    pub async fn init(api_url_override: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = load_client_config(&data_dir).await;
        if let Some(url) = api_url_override {
            config.api_url = url;
        }

        let client = RestClient::new(&config)
            .with_context(|| format!("Invalid backend URL '{}'", config.api_url))?;
        debug!(base_url = %client.base_url(), data_dir = %data_dir.display(), "Backend client ready");

        Ok(Self {
            config,
            client: Arc::new(client),
            data_dir,
        })
    }
}
