//! In-process HTTP transports for exercising URL resolution

use async_trait::async_trait;
use llms_audit::config::FetchConfig;
use llms_audit::input::{HttpResponse, HttpTransport, TransportError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Never answers within the configured timeout.
#[derive(Debug, Default)]
pub struct HangingTransport {
    calls: AtomicUsize,
}

impl HangingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for HangingTransport {
    async fn get(&self, _url: &Url, config: &FetchConfig) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(config.timeout()).await;
        Err(TransportError::Timeout)
    }
}

/// Replays canned responses in order; once exhausted every call times out.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn serving(body: &str) -> Self {
        Self::new(vec![Ok(ok_response(body))])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, _url: &Url, _config: &FetchConfig) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(TransportError::Timeout)
            }
        }
    }
}

pub fn ok_response(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        content_type: Some("text/plain; charset=utf-8".to_string()),
        body: body.as_bytes().to_vec(),
    }
}

pub fn status_response(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        content_type: None,
        body: Vec::new(),
    }
}
