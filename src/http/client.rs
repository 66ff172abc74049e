use moka::future::Cache;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::errors::{StudioError, StudioResult};
use crate::config::{BackendConfig, CatalogConfig, CourseStudioConfig};

/// HTTP client for the course service.
///
/// Adds the authorization header to every request and checks the
/// `{ isSuccess, message }` envelope. Lookup lists can be served from a
/// short-lived cache; nothing is retried.
#[derive(Debug, Clone)]
pub struct BackendHttpClient {
    client: reqwest::Client,
    base_url: String,
    authorization: String,
    cache: Cache<String, Value>,
}

impl BackendHttpClient {
    pub fn new(backend: &BackendConfig, catalog: &CatalogConfig) -> StudioResult<Self> {
        let token = backend
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                StudioError::Config(
                    "no API token configured (set backend.token or COURSE_STUDIO_TOKEN)"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(backend.request_timeout_seconds))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(catalog.lookup_cache_capacity)
            .time_to_live(Duration::from_secs(catalog.lookup_cache_ttl_seconds))
            .build();

        Ok(Self {
            client,
            base_url: backend.base_url.trim_end_matches('/').to_string(),
            authorization: authorization_value(token),
            cache,
        })
    }

    pub fn from_config(config: &CourseStudioConfig) -> StudioResult<Self> {
        Self::new(&config.backend, &config.catalog)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        failure: &str,
    ) -> StudioResult<T> {
        let request = self.client.get(self.url(path)).query(query);
        self.execute_typed(request, failure).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B, failure: &str) -> StudioResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute_typed(request, failure).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        failure: &str,
    ) -> StudioResult<T> {
        let request = self.client.post(self.url(path)).multipart(form);
        self.execute_typed(request, failure).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        failure: &str,
    ) -> StudioResult<T> {
        let request = self.client.delete(self.url(path)).query(query);
        self.execute_typed(request, failure).await
    }

    /// POST whose successful payload is cached under `path` + body
    pub async fn post_json_cached<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
        failure: &str,
    ) -> StudioResult<T> {
        let key = format!("{path}:{body}");
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for key: {}", key);
            return Ok(serde_json::from_value(cached)?);
        }

        let request = self.client.post(self.url(path)).json(body);
        let payload = self.execute(request, failure).await?;
        self.cache.insert(key, payload.clone()).await;
        Ok(serde_json::from_value(payload)?)
    }

    /// Drop every cached lookup response
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
        info!("HTTP client cache cleared");
    }

    /// Invalidate cached responses whose key contains `pattern`
    pub async fn invalidate_cache_pattern(&self, pattern: &str) {
        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.contains(pattern))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        for key in keys_to_remove {
            self.cache.invalidate(&key).await;
        }

        debug!("Invalidated cache entries matching pattern: {}", pattern);
    }

    async fn execute_typed<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: &str,
    ) -> StudioResult<T> {
        let payload = self.execute(request, failure).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn execute(&self, request: RequestBuilder, failure: &str) -> StudioResult<Value> {
        let request = request.header(reqwest::header::AUTHORIZATION, &self.authorization);
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        debug!(url = %url, status = status.as_u16(), "Course service responded");
        check_envelope(status, &body, failure)
    }
}

/// Accept a bare token or a full `Scheme value` header
fn authorization_value(token: &str) -> String {
    let token = token.trim();
    if token.contains(' ') {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

/// Turn a raw response into the checked JSON payload.
///
/// Non-2xx is an HTTP failure whatever the body says. A 2xx body without
/// `isSuccess: true` is a server rejection carrying the payload message, or
/// `failure` when the payload has none.
pub fn check_envelope(status: StatusCode, body: &str, failure: &str) -> StudioResult<Value> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string);

    if !status.is_success() {
        return Err(StudioError::Http {
            status: status.as_u16(),
            message: message.unwrap_or_default(),
        });
    }

    let payload = match parsed {
        Some(payload) => payload,
        None => serde_json::from_str::<Value>(body)?,
    };

    let accepted = payload
        .get("isSuccess")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !accepted {
        return Err(StudioError::rejected(
            message.unwrap_or_else(|| failure.to_string()),
        ));
    }

    Ok(payload)
}

/// Read a local file into a multipart part named after the file
pub async fn file_part(path: &Path) -> StudioResult<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}
