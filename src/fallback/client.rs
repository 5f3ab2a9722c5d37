//! Internal HTTP fetch client.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, Method};
use url::Url;

use crate::config::FallbackConfig;
use crate::fallback::error::TransportError;

/// Status, content type and raw body of a fetched response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Sends the internal fallback request.
pub trait FetchClient: Send + Sync {
    fn send_request(
        &self,
        method: Method,
        uri: &Url,
    ) -> impl Future<Output = Result<FetchResponse, TransportError>> + Send;
}

/// User-Agent sent with internal requests; starts with `signature`.
pub fn user_agent(signature: &str) -> String {
    format!("{}/{}", signature, env!("CARGO_PKG_VERSION"))
}

/// reqwest-backed fetch client.
///
/// Redirects are not followed: a redirect answer is returned as content like
/// any other non-404 response.
#[derive(Debug, Clone)]
pub struct HttpFetchClient {
    client: Client,
}

impl HttpFetchClient {
    pub fn new(config: &FallbackConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent(&config.signature))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }
}

impl FetchClient for HttpFetchClient {
    async fn send_request(&self, method: Method, uri: &Url) -> Result<FetchResponse, TransportError> {
        let response = self.client.request(method, uri.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // Raw bytes: no charset decoding.
        let body = response.bytes().await?;

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}
