//! Network oracle client
//!
//! Sends `[{"name": <path>, "body": <content>}]` as a POST to
//! `<url>/detect` and decodes `{"success", "message", "results"}`.

use super::retry::{AttemptError, RetryPolicy};
use super::{Oracle, normalize};
use crate::config::OracleConfig;
use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{ClassificationResult, OracleRequestItem, OracleResponse};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use std::error::Error as StdError;
use std::time::Duration;

/// HTTP client for the detection service
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
    retry: RetryPolicy,
}

impl HttpOracle {
    pub fn new(config: &OracleConfig, retry: RetryPolicy) -> ClassifyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let token = config.auth_token.trim();
        Ok(Self {
            client,
            endpoint: format!("{}/detect", config.url.trim_end_matches('/')),
            auth_token: (!token.is_empty()).then(|| token.to_string()),
            retry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, payload: &[u8]) -> Result<OracleResponse, AttemptError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_vec());
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(classify_transport_error)?;

        serde_json::from_slice::<OracleResponse>(&bytes).map_err(|e| {
            AttemptError::Fatal(ClassifyError::Protocol(format!(
                "HTTP {status}: {e}"
            )))
        })
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn classify(&self, path: &str, body: &[u8]) -> ClassifyResult<ClassificationResult> {
        let item = OracleRequestItem {
            name: path,
            body: String::from_utf8_lossy(body),
        };
        let payload = serde_json::to_vec(&[item])
            .map_err(|e| ClassifyError::Protocol(format!("failed to encode request: {e}")))?;

        tracing::debug!("Asking oracle at {} about {}", self.endpoint, path);
        let payload = payload.as_slice();
        let response = self.retry.run(move |_| self.attempt(payload)).await?;
        normalize(response)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Connection resets and premature EOFs are retried, everything else is final
fn classify_transport_error(error: reqwest::Error) -> AttemptError {
    if is_transient(&error) {
        AttemptError::Transient(error_chain(&error))
    } else {
        AttemptError::Fatal(ClassifyError::Transport(error))
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        let text = err.to_string();
        if text.contains("connection reset")
            || text.contains("EOF")
            || text.contains("connection closed before message completed")
        {
            return true;
        }
        source = err.source();
    }
    false
}

fn error_chain(error: &dyn StdError) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        text.push_str(": ");
        text.push_str(&err.to_string());
        source = err.source();
    }
    text
}
