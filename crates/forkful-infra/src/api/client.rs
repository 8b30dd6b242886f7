//! RestClient -- concrete [`ChatBackend`] implementation over HTTP.
//!
//! Every backend operation is one request with a declared path and
//! parameters. Responses either decode into a `forkful-types` value or
//! fail with an [`ApiError`]; there are no retries and no caching.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use forkful_core::backend::ChatBackend;
use forkful_types::chat::{ChatRequest, ChatResponse, SessionData};
use forkful_types::error::ApiError;
use forkful_types::health::HealthStatus;
use forkful_types::restaurant::{
    DEFAULT_RADIUS_METERS, DEFAULT_RESULT_LIMIT, Restaurant, RestaurantList, RestaurantSearchParams,
};

use crate::config::ClientConfig;

/// Client for the recommendation backend's REST API.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    /// Origin joined with the API prefix, e.g. `http://localhost:8000/api/v1`.
    base: Url,
}

impl RestClient {
    /// Build a client from configuration.
    ///
    /// Fails if the configured URL is not a valid base URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base = base_url(&config.api_url, &config.api_prefix)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .user_agent(concat!("forkful/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, base })
    }

    /// The resolved base URL (origin plus prefix).
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the URL for a path under the API prefix. Each segment is
    /// percent-encoded, so ids may contain `/` or spaces.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request, check the status, and return the raw response.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Backend responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: error_detail(&body),
            });
        }
        Ok(response)
    }

    // --- Chat ---

    /// POST `/chat`.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = self.endpoint(&["chat"])?;
        self.execute(self.http.post(url).json(request)).await
    }

    /// GET `/chat/session/{id}`.
    pub async fn get_session(&self, session_id: &str) -> Result<SessionData, ApiError> {
        let url = self.endpoint(&["chat", "session", session_id])?;
        self.execute(self.http.get(url)).await
    }

    /// DELETE `/chat/session/{id}`. The acknowledgement body is ignored.
    pub async fn clear_session(&self, session_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["chat", "session", session_id])?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    // --- Restaurants ---

    /// POST `/restaurants/search`.
    pub async fn search_restaurants(
        &self,
        params: &RestaurantSearchParams,
    ) -> Result<RestaurantList, ApiError> {
        let url = self.endpoint(&["restaurants", "search"])?;
        self.execute(self.http.post(url).json(params)).await
    }

    /// GET `/restaurants/{id}?include_reviews=`.
    pub async fn restaurant_details(
        &self,
        restaurant_id: &str,
        include_reviews: bool,
    ) -> Result<Restaurant, ApiError> {
        let url = self.endpoint(&["restaurants", restaurant_id])?;
        self.execute(
            self.http
                .get(url)
                .query(&[("include_reviews", include_reviews)]),
        )
        .await
    }

    /// GET `/restaurants/nearby`. Radius defaults to 5000 m and limit to 20.
    pub async fn nearby_restaurants(
        &self,
        latitude: f64,
        longitude: f64,
        radius: Option<u32>,
        limit: Option<u32>,
    ) -> Result<RestaurantList, ApiError> {
        let url = self.endpoint(&["restaurants", "nearby"])?;
        let radius = radius.unwrap_or(DEFAULT_RADIUS_METERS);
        let limit = limit.unwrap_or(DEFAULT_RESULT_LIMIT);
        self.execute(self.http.get(url).query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("radius", radius.to_string()),
            ("limit", limit.to_string()),
        ]))
        .await
    }

    // --- Health ---

    /// GET `/health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"])?;
        self.execute(self.http.get(url)).await
    }
}

impl ChatBackend for RestClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        RestClient::send_chat(self, request).await
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), ApiError> {
        RestClient::clear_session(self, session_id).await
    }
}

/// Join origin and prefix into a base URL.
fn base_url(api_url: &str, api_prefix: &str) -> Result<Url, ApiError> {
    let prefix = api_prefix.trim_matches('/');
    let joined = if prefix.is_empty() {
        api_url.trim_end_matches('/').to_string()
    } else {
        format!("{}/{prefix}", api_url.trim_end_matches('/'))
    };
    let url = Url::parse(&joined)
        .map_err(|e| ApiError::Transport(format!("invalid API URL {joined}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::Transport(format!("{joined} cannot be a base URL")));
    }
    Ok(url)
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// Prefer the backend's `{"detail": "..."}` message over the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
