//! Classification oracle
//!
//! The oracle is whatever actually knows languages: a remote detection
//! service ([`HttpOracle`]) or an in-process library ([`EmbeddedOracle`]).
//! Both report through [`normalize`] so callers always get the same
//! [`ClassificationResult`] shape.

pub mod embedded;
pub mod http;
pub mod retry;

pub use embedded::{BuiltinLibrary, EmbeddedOracle, LanguageLibrary};
pub use http::HttpOracle;
pub use retry::{AttemptError, RetryPolicy};

use crate::error::{ClassifyError, ClassifyResult};
use crate::types::{ClassificationResult, OracleResponse};
use async_trait::async_trait;

/// Something that can classify a file the cache does not know about
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Classify one file. Errors are terminal; retrying is the
    /// implementation's business.
    async fn classify(&self, path: &str, body: &[u8]) -> ClassifyResult<ClassificationResult>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Turn an oracle response into a [`ClassificationResult`]
///
/// The first detection is the one that counts. Binary, vendored or generated
/// content marks the result as excluded, in which case the detection is
/// dropped.
pub fn normalize(response: OracleResponse) -> ClassifyResult<ClassificationResult> {
    if !response.success {
        let message = response
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "oracle reported failure".to_string());
        return Err(ClassifyError::Rejected(message));
    }

    let detection = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ClassifyError::Protocol("response contained no detections".to_string()))?;

    let is_excluded = detection.is_binary || detection.is_vendored || detection.is_generated;
    Ok(ClassificationResult {
        success: true,
        message: response.message.filter(|m| !m.is_empty()),
        is_binary: detection.is_binary,
        is_large: detection.is_large,
        is_excluded,
        detection: if is_excluded { None } else { Some(detection) },
        from_cache: false,
    })
}
