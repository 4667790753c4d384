//! HTTP(S) retrieval with timeout, bounded retry, and a response size cap
//!
//! Retry policy:
//! - timeout / connection failure → retry
//! - HTTP 429 or 5xx → retry
//! - other HTTP 4xx → fail immediately
//! - oversize body → fail immediately
//!
//! Backoff doubles from `FetchConfig::backoff_base_ms` (1s, 2s, 4s by default).

use super::cancel::CancellationToken;
use super::types::{InputError, InputResult, InputSource, SourceLocator};
use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;

/// Raw response from a single attempt
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Failure of a single attempt
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    Timeout,
    Connect(String),
    TooLarge { size: u64, max: u64 },
}

/// One GET request. Implementations must enforce `config.timeout()` and
/// `config.max_response_bytes`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url, config: &FetchConfig) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn get(&self, url: &Url, config: &FetchConfig) -> Result<HttpResponse, TransportError> {
        (**self).get(url, config).await
    }
}

/// `reqwest`-backed transport with rustls and certificate verification on.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &FetchConfig) -> InputResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| InputError::Network {
                url: String::new(),
                reason: format!("cannot build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

fn classify_reqwest_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connect(e.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url, config: &FetchConfig) -> Result<HttpResponse, TransportError> {
        let max = config.max_response_bytes as u64;
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if !response.status().is_success() {
            return Ok(HttpResponse {
                status,
                content_type,
                body: Vec::new(),
            });
        }

        if let Some(len) = response.content_length() {
            if len > max {
                return Err(TransportError::TooLarge { size: len, max });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_reqwest_error(&e))?
        {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > max {
                return Err(TransportError::TooLarge {
                    size: body.len() as u64,
                    max,
                });
            }
        }

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Parse and check an http(s) URL.
pub fn parse_http_url(raw: &str) -> InputResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| InputError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(InputError::InvalidUrlScheme {
            scheme: other.to_string(),
        }),
    }
}

/// Extract `charset=` from a Content-Type header value.
fn declared_charset(content_type: Option<&str>) -> Option<String> {
    content_type?
        .split(';')
        .map(str::trim)
        .find_map(|part| {
            part.to_ascii_lowercase()
                .strip_prefix("charset=")
                .map(|c| c.trim_matches('"').to_string())
        })
}

/// Fetches a URL into an [`InputSource`] under the configured retry policy.
pub struct UrlFetcher<T: HttpTransport = ReqwestTransport> {
    transport: T,
    config: FetchConfig,
}

impl UrlFetcher<ReqwestTransport> {
    pub fn new(config: FetchConfig) -> InputResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: HttpTransport> UrlFetcher<T> {
    pub fn with_transport(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `raw_url`. Never returns a partial source: any failure or
    /// cancellation yields an error.
    pub async fn fetch(&self, raw_url: &str, cancel: &CancellationToken) -> InputResult<InputSource> {
        let url = parse_http_url(raw_url)?;
        let url_str = url.to_string();
        let attempts = self.config.max_retries + 1;
        let mut timeouts = 0u32;
        let mut last_error: Option<InputError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.config.backoff(attempt);
                debug!(url = %url_str, attempt, delay_ms = delay.as_millis() as u64, "backing off before retry");
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {
                        return Err(InputError::Cancelled { url: url_str });
                    }
                }
            }
            cancel.ensure_active(&url_str)?;

            let attempt_future = tokio::time::timeout(
                self.config.timeout(),
                self.transport.get(&url, &self.config),
            );
            let outcome = tokio::select! {
                result = attempt_future => result.unwrap_or(Err(TransportError::Timeout)),
                _ = cancel.cancelled() => {
                    warn!(url = %url_str, attempt = attempt + 1, "fetch cancelled mid-attempt");
                    return Err(InputError::Cancelled { url: url_str });
                }
            };

            match outcome {
                Ok(response) if (200..300).contains(&response.status) => {
                    info!(url = %url_str, bytes = response.body.len(), attempt = attempt + 1, "fetched document");
                    let charset = declared_charset(response.content_type.as_deref());
                    return Ok(InputSource::from_bytes(
                        SourceLocator::Url(url_str),
                        response.body,
                    )
                    .with_declared_charset(charset));
                }
                Ok(response) if response.status == 429 || response.status >= 500 => {
                    warn!(url = %url_str, status = response.status, attempt = attempt + 1, "retryable HTTP status");
                    last_error = Some(InputError::Http {
                        url: url_str.clone(),
                        status: response.status,
                    });
                }
                Ok(response) => {
                    return Err(InputError::Http {
                        url: url_str,
                        status: response.status,
                    });
                }
                Err(TransportError::TooLarge { size, max }) => {
                    return Err(InputError::ResponseTooLarge {
                        url: url_str,
                        size,
                        max,
                    });
                }
                Err(TransportError::Timeout) => {
                    warn!(url = %url_str, attempt = attempt + 1, "request timed out");
                    timeouts += 1;
                    last_error = None;
                }
                Err(TransportError::Connect(reason)) => {
                    warn!(url = %url_str, attempt = attempt + 1, %reason, "connection failed");
                    last_error = Some(InputError::Network {
                        url: url_str.clone(),
                        reason,
                    });
                }
            }
        }

        Err(match last_error {
            Some(err) => err,
            None => InputError::Timeout {
                url: url_str,
                attempts: timeouts,
            },
        })
    }
}
