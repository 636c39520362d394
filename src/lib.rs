//! # linguist-gate - Fast file classification in front of a language oracle
//!
//! Decides what a file is without asking the expensive language detector
//! whenever it can.
//!
//! ## Features
//!
//! - **Exclusion policy**: binary, oversized and denylisted files never reach the oracle
//! - **Preoptimization cache**: pattern-keyed canned answers, reordered by popularity
//! - **Oracle client**: network or embedded detector with bounded retry
//! - **Thread-safe**: one service instance shared by any number of tasks
//!
//! ## Quick Start
//!
//! ```no_run
//! use linguist_gate::{ClassificationService, LinguistConfig};
//!
//! # async fn run() -> linguist_gate::Result<()> {
//! let config = LinguistConfig::load()?;
//! let service = ClassificationService::from_config(&config)?;
//! service.warm_up().await;
//!
//! let result = service.classify("src/main.go", b"package main", false).await?;
//! println!("{:?}", result.language_name());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod filters;
pub mod logging;
pub mod oracle;
pub mod rules;
pub mod service;
pub mod static_data;
pub mod types;

pub use cache::PreoptimizationCache;
pub use config::LinguistConfig;
pub use error::{ClassifyError, ClassifyResult};
pub use exclusion::{ExclusionDecision, ExclusionPolicy};
pub use oracle::{BuiltinLibrary, EmbeddedOracle, HttpOracle, LanguageLibrary, Oracle, RetryPolicy};
pub use rules::{MatchRule, RuleSet};
pub use service::{ClassificationService, CounterSnapshot, Counters};
pub use types::{ClassificationResult, Detection, Language};

/// Result type alias for setup and configuration glue
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
