use async_trait::async_trait;
use reqwest::{Client, Url, header};
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::error::{Result, VedurError};

/// Browser-like agent string; the station page rejects bare clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Fetches a URL and returns the response body.
///
/// Implementations report every failure through the returned `Result`.
/// Dropping the future cancels the request.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Settings handed to the HTTP transport unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Whole-request timeout. `None` waits as long as the server does.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { user_agent: DEFAULT_USER_AGENT.to_string(), timeout: None }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { http: builder.build()? })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");

        let res = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "text/xml, text/html;q=0.9, */*;q=0.8")
            .send()
            .await
            .map_err(|source| VedurError::Transport { url: url.to_string(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| VedurError::Transport { url: url.to_string(), source })?;

        if !status.is_success() {
            return Err(VedurError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        debug!(%url, bytes = body.len(), "response received");
        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
