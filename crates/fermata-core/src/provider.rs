//! Transit backend client.
//!
//! `GET <base>/stop/<code>` and `GET <base>/line/<code>`, decoded into the
//! records in [`crate::domain`]. Every failure is returned to the caller; none
//! of them is fatal.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{
    config::BackendConfig,
    domain::{LineRecord, StopRecord},
    errors::{Error, ProviderError},
    Result,
};

/// Source of stop and line data.
#[async_trait]
pub trait TransitProvider: Send + Sync {
    async fn fetch_stop(&self, code: &str) -> std::result::Result<StopRecord, ProviderError>;
    async fn fetch_line(&self, code: &str) -> std::result::Result<LineRecord, ProviderError>;
}

/// Longest body excerpt kept in a `Status` error.
const BODY_EXCERPT_LEN: usize = 200;

#[derive(Clone, Debug)]
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpProvider {
    pub fn new(cfg: &BackendConfig) -> Result<Self> {
        let raw = cfg.base_url();
        let base_url = Url::parse(&raw)
            .map_err(|e| Error::Config(format!("invalid backend url `{raw}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "backend url `{raw}` cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// `<base>/<kind>/<code>`, with `code` escaped as a single path segment.
    fn endpoint(&self, kind: &str, code: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind).push(code);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        kind: &str,
        code: &str,
    ) -> std::result::Result<T, ProviderError> {
        let url = self.endpoint(kind, code);
        let url_str = url.to_string();

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&url_str, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| transport_error(&url_str, e))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                url: url_str,
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_LEN).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
            url: url_str,
            message: e.to_string(),
        })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            url: url.to_string(),
        }
    } else {
        ProviderError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl TransitProvider for HttpProvider {
    async fn fetch_stop(&self, code: &str) -> std::result::Result<StopRecord, ProviderError> {
        self.get_json("stop", code).await
    }

    async fn fetch_line(&self, code: &str) -> std::result::Result<LineRecord, ProviderError> {
        self.get_json("line", code).await
    }
}
