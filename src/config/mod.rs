//! Configuration management for linguist-gate
//!
//! Settings are layered with figment, see [`core`] for the sources and their
//! priority. Every section has serde defaults matching `default-config.toml`,
//! so a partial file only needs the keys it changes.

pub mod core;

use crate::error::{ClassifyError, ClassifyResult};
use crate::exclusion::ExclusionPolicy;
use crate::filters::Denylist;
use crate::oracle::RetryPolicy;
use crate::rules::MatchRule;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LinguistConfig {
    /// Network oracle settings
    pub oracle: OracleConfig,

    /// Retry discipline for oracle calls
    pub retry: RetryConfig,

    /// Fast-path exclusion settings
    pub exclusion: ExclusionConfig,

    /// Preoptimization cache and batch settings
    pub cache: CacheConfig,
}

/// Network oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL, `/detect` is appended
    pub url: String,

    /// Sent verbatim as the `Authorization` header; empty disables it
    #[serde(deserialize_with = "lenient_string")]
    pub auth_token: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Idle connections kept per host
    pub max_idle_per_host: usize,

    /// Accept self-signed certificates
    pub accept_invalid_certs: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:25032".to_string(),
            auth_token: "1234".to_string(),
            timeout_secs: 30,
            max_idle_per_host: 50,
            accept_invalid_certs: true,
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts before giving up
    pub max_attempts: u32,

    /// Attempt `n` waits `n * base_delay_ms` before the next one
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay_ms: 50,
        }
    }
}

/// A named path rule added on top of the built-in ones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathRuleConfig {
    pub name: String,
    pub pattern: String,
}

/// Exclusion configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Bodies longer than this many bytes are excluded as large
    pub max_buffer_size: usize,

    /// Extensions excluded in addition to the built-in list
    pub extra_extensions: Vec<String>,

    /// Filenames excluded in addition to the built-in list
    pub extra_filenames: Vec<String>,

    /// Path rules added to the built-in ones
    pub extra_path_rules: Vec<PathRuleConfig>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: crate::filters::size::DEFAULT_MAX_BUFFER_SIZE,
            extra_extensions: Vec::new(),
            extra_filenames: Vec::new(),
            extra_path_rules: Vec::new(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Re-sort cache entries every this many hits
    pub resort_interval: u64,

    /// Oracle calls in flight at once during a batch
    pub batch_concurrency: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            resort_interval: 100,
            batch_concurrency: 16,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl ExclusionConfig {
    /// Built-in denylists plus the configured extras
    pub fn denylist(&self) -> ClassifyResult<Denylist> {
        let mut denylist = Denylist::with_defaults()?;
        for ext in &self.extra_extensions {
            let ext = ext.trim();
            if ext.is_empty() {
                continue;
            }
            if ext.starts_with('.') {
                denylist.extensions.insert(ext.to_string());
            } else {
                denylist.extensions.insert(format!(".{ext}"));
            }
        }
        denylist
            .filenames
            .extend(self.extra_filenames.iter().map(|name| name.trim().to_string()).filter(|n| !n.is_empty()));
        for rule in &self.extra_path_rules {
            if rule.name.is_empty() {
                return Err(ClassifyError::Config(format!(
                    "path rule '{}' has no name",
                    rule.pattern
                )));
            }
            denylist.rules.insert(rule.name.clone(), MatchRule::matching(&rule.pattern)?);
        }
        Ok(denylist)
    }

    pub fn policy(&self) -> ClassifyResult<ExclusionPolicy> {
        Ok(ExclusionPolicy::new(self.max_buffer_size, self.denylist()?))
    }
}

/// Accept numbers and booleans where a string is expected
///
/// Environment values such as `PP_LINGUIST_AUTH=1234` arrive as integers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::UInt(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}
