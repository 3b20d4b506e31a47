//! HTTP client with retry, exponential backoff, timeout, and gzip compression.

use std::time::Duration;

use arete_core::config::CloudConfig;
use arete_core::errors::{AreteError, AreteResult, CloudError};
use serde::{de::DeserializeOwned, Serialize};

/// Configuration for the HTTP transport layer.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the remote API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl HttpClientConfig {
    pub fn from_cloud_config(config: &CloudConfig) -> Self {
        Self {
            base_url: config
                .endpoint_url
                .as_deref()
                .unwrap_or_default()
                .trim()
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Put,
}

fn net_err(reason: String) -> AreteError {
    CloudError::NetworkError { reason }.into()
}

/// HTTP transport client. Wraps reqwest (when the `cloud` feature is
/// enabled) with retry logic and backoff.
#[derive(Debug)]
pub struct HttpClient {
    config: HttpClientConfig,
    bearer_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            config,
            bearer_token: None,
        }
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Set the bearer token for authenticated requests.
    pub fn set_bearer_token(&mut self, token: String) {
        self.bearer_token = Some(token);
    }

    /// Clear the bearer token.
    pub fn clear_bearer_token(&mut self) {
        self.bearer_token = None;
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// GET a JSON resource. A 404 is `Ok(None)`.
    pub fn get_optional<Resp: DeserializeOwned>(&self, path: &str) -> AreteResult<Option<Resp>> {
        let Some(body) = self.execute(Method::Get, &self.url(path), None)? else {
            return Ok(None);
        };
        let parsed = serde_json::from_str(&body).map_err(|e| CloudError::MalformedPayload {
            reason: e.to_string(),
        })?;
        Ok(Some(parsed))
    }

    /// PUT a JSON body.
    pub fn put<Req: Serialize>(&self, path: &str, payload: &Req) -> AreteResult<()> {
        let body = serde_json::to_string(payload)?;
        match self.execute(Method::Put, &self.url(path), Some(body))? {
            Some(_) => Ok(()),
            None => Err(CloudError::Rejected {
                status: 404,
                reason: format!("{path} not found"),
            }
            .into()),
        }
    }

    #[cfg(not(feature = "cloud"))]
    fn execute(&self, _method: Method, _url: &str, _body: Option<String>) -> AreteResult<Option<String>> {
        Err(net_err("cloud feature not enabled".into()))
    }

    /// Unified retry loop. Returns the response body, or `None` on 404.
    #[cfg(feature = "cloud")]
    fn execute(&self, method: Method, url: &str, body: Option<String>) -> AreteResult<Option<String>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .gzip(true)
            .build()
            .map_err(|e: reqwest::Error| net_err(e.to_string()))?;

        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "cloud: retry attempt {}/{} after {:?}",
                    attempt,
                    self.config.max_retries,
                    backoff
                );
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(self.config.max_backoff);
            }

            let mut req = match method {
                Method::Get => client.get(url),
                Method::Put => client.put(url),
            };
            if let Some(b) = &body {
                req = req
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(b.clone());
            }
            if let Some(ref token) = self.bearer_token {
                req = req.bearer_auth(token);
            }

            match req.send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp
                            .text()
                            .map(Some)
                            .map_err(|e: reqwest::Error| net_err(format!("reading body failed: {e}")));
                    }
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(CloudError::AuthFailed {
                            reason: format!("HTTP {status}"),
                        }
                        .into());
                    }
                    if status.is_client_error() {
                        let body_text = resp.text().unwrap_or_default();
                        return Err(CloudError::Rejected {
                            status: status.as_u16(),
                            reason: body_text,
                        }
                        .into());
                    }
                    last_err = format!("HTTP {status}");
                }
                Err(e) => {
                    last_err = e.to_string();
                }
            }
        }

        Err(net_err(format!(
            "all {} retries exhausted: {last_err}",
            self.config.max_retries
        )))
    }
}
