//! Classification façade
//!
//! One [`ClassificationService`] owns the exclusion policy, the
//! preoptimization cache, the oracle and the hit/miss counters. A file goes
//! through exclusion first, then the cache, and only then the oracle.

use crate::cache::PreoptimizationCache;
use crate::config::LinguistConfig;
use crate::error::{ClassifyError, ClassifyResult};
use crate::exclusion::ExclusionPolicy;
use crate::oracle::{HttpOracle, Oracle};
use crate::types::{ClassificationResult, Detection};
use futures_util::{StreamExt, stream};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default number of oracle calls in flight during a batch
pub const DEFAULT_BATCH_CONCURRENCY: usize = 16;

/// Cache hit and miss counters
#[derive(Debug, Default)]
pub struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Point-in-time copy of [`Counters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub hits: u64,
    pub misses: u64,
}

impl Counters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            hits: self.hits(),
            misses: self.misses(),
        }
    }
}

pub struct ClassificationService {
    policy: ExclusionPolicy,
    cache: PreoptimizationCache,
    oracle: Arc<dyn Oracle>,
    counters: Counters,
    batch_concurrency: usize,
}

impl std::fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationService")
            .field("policy", &self.policy)
            .field("cache_entries", &self.cache.entry_count())
            .field("oracle", &self.oracle.name())
            .field("counters", &self.counters)
            .finish()
    }
}

impl ClassificationService {
    pub fn new(policy: ExclusionPolicy, cache: PreoptimizationCache, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            policy,
            cache,
            oracle,
            counters: Counters::default(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Service talking to the network oracle described by `config`
    pub fn from_config(config: &LinguistConfig) -> ClassifyResult<Self> {
        let oracle = HttpOracle::new(&config.oracle, config.retry.policy())?;
        Self::with_oracle(config, Arc::new(oracle))
    }

    /// Service configured by `config` but backed by any oracle
    pub fn with_oracle(config: &LinguistConfig, oracle: Arc<dyn Oracle>) -> ClassifyResult<Self> {
        let service = Self::new(
            config.exclusion.policy()?,
            PreoptimizationCache::new(config.cache.resort_interval),
            oracle,
        );
        Ok(service.with_batch_concurrency(config.cache.batch_concurrency))
    }

    pub fn with_batch_concurrency(mut self, batch_concurrency: usize) -> Self {
        self.batch_concurrency = batch_concurrency.max(1);
        self
    }

    /// Warm the cache, then zero the counters so they reflect real traffic
    ///
    /// Only the call that actually warms the cache resets anything; later
    /// calls return the current entry count and leave the stats alone.
    pub async fn warm_up(&self) -> usize {
        match self.cache.warm_up(self.oracle.as_ref()).await {
            Some(count) => {
                self.cache.reset_stats();
                self.counters.reset();
                count
            }
            None => self.cache.entry_count(),
        }
    }

    /// Classify one file
    pub async fn classify(
        &self,
        path: &str,
        body: &[u8],
        skip_cache: bool,
    ) -> ClassifyResult<ClassificationResult> {
        if let Some(result) = self.resolve_locally(path, body, skip_cache) {
            return Ok(result);
        }
        self.ask_oracle(path, body).await
    }

    /// [`classify`](Self::classify) with a deadline. An elapsed deadline
    /// drops the in-flight oracle attempt and any pending retry.
    pub async fn classify_with_timeout(
        &self,
        path: &str,
        body: &[u8],
        skip_cache: bool,
        timeout: Duration,
    ) -> ClassifyResult<ClassificationResult> {
        tokio::time::timeout(timeout, self.classify(path, body, skip_cache))
            .await
            .map_err(|_| ClassifyError::Cancelled)?
    }

    /// Classify many files, results in request order
    ///
    /// Exclusions and cache hits are answered on the spot; the rest go to the
    /// oracle together, at most `batch_concurrency` at a time.
    pub async fn classify_batch<P, B>(
        &self,
        items: &[(P, B)],
        skip_cache: bool,
    ) -> Vec<ClassifyResult<ClassificationResult>>
    where
        P: AsRef<str> + Sync,
        B: AsRef<[u8]> + Sync,
    {
        let mut results: Vec<Option<ClassifyResult<ClassificationResult>>> =
            items.iter().map(|_| None).collect();
        let mut pending = Vec::new();

        for (index, (path, body)) in items.iter().enumerate() {
            match self.resolve_locally(path.as_ref(), body.as_ref(), skip_cache) {
                Some(result) => results[index] = Some(Ok(result)),
                None => pending.push(index),
            }
        }

        tracing::debug!(
            "Batch of {}: {} resolved locally, {} sent to the oracle",
            items.len(),
            items.len() - pending.len(),
            pending.len()
        );

        let answers: Vec<(usize, ClassifyResult<ClassificationResult>)> = stream::iter(pending)
            .map(|index| async move {
                let (path, body) = &items[index];
                (index, self.ask_oracle(path.as_ref(), body.as_ref()).await)
            })
            .buffer_unordered(self.batch_concurrency)
            .collect()
            .await;

        for (index, answer) in answers {
            results[index] = Some(answer);
        }
        results.into_iter().flatten().collect()
    }

    fn resolve_locally(&self, path: &str, body: &[u8], skip_cache: bool) -> Option<ClassificationResult> {
        if let Some(result) = self.policy.classify_exclusion(path, Some(body)).to_result() {
            tracing::trace!("Excluded {}: {:?}", path, result.message);
            return Some(result);
        }
        if skip_cache {
            return None;
        }
        let result = self.cache.lookup(path)?;
        self.counters.record_hit();
        Some(result)
    }

    async fn ask_oracle(&self, path: &str, body: &[u8]) -> ClassifyResult<ClassificationResult> {
        tracing::debug!("Cache miss for {}, asking {} oracle", path, self.oracle.name());
        let result = self.oracle.classify(path, body).await?;
        self.counters.record_miss();
        Ok(result)
    }

    pub fn cache_hits(&self) -> u64 {
        self.counters.hits()
    }

    pub fn cache_misses(&self) -> u64 {
        self.counters.misses()
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    pub fn most_popular(&self) -> Option<Detection> {
        self.cache.most_popular()
    }

    /// Exclusion policy, for runtime denylist changes
    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &PreoptimizationCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{BuiltinLibrary, EmbeddedOracle};
    use crate::types::Language;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    fn service() -> ClassificationService {
        ClassificationService::new(
            ExclusionPolicy::with_defaults(100_000).unwrap(),
            PreoptimizationCache::default(),
            Arc::new(EmbeddedOracle::new(BuiltinLibrary)),
        )
    }

    /// Never answers before the deadline
    struct SlowOracle {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Oracle for SlowOracle {
        async fn classify(&self, path: &str, _body: &[u8]) -> ClassifyResult<ClassificationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ClassificationResult::detected(Detection {
                path: path.to_string(),
                language: Some(Language::new("Slow", "programming")),
                ..Default::default()
            }))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[test]
    fn test_counters() {
        let counters = Counters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.snapshot(), CounterSnapshot { hits: 2, misses: 1 });
        counters.reset();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[tokio::test]
    async fn test_warm_up_resets_counters() {
        let service = service();
        assert_eq!(service.warm_up().await, 33);
        assert_eq!(service.counters(), CounterSnapshot::default());
        assert_eq!(service.cache().total_hits(), 0);
    }

    #[tokio::test]
    async fn test_second_warm_up_keeps_traffic_stats() {
        let service = service();
        service.warm_up().await;
        for _ in 0..3 {
            service.classify("a.go", b"package a", false).await.unwrap();
        }
        service.classify("a.rs", b"fn a() {}", false).await.unwrap();
        let ranking = service.cache().ranking();

        assert_eq!(service.warm_up().await, 33);
        assert_eq!(service.counters(), CounterSnapshot { hits: 3, misses: 1 });
        assert_eq!(service.cache().total_hits(), 3);
        assert_eq!(service.cache().ranking(), ranking);
        assert_eq!(service.most_popular().unwrap().language_name(), Some("Go"));
    }

    #[tokio::test]
    async fn test_cache_then_oracle() {
        let service = service();
        service.warm_up().await;

        let result = service.classify("src/app.go", b"package app", false).await.unwrap();
        assert!(result.from_cache);
        assert_eq!(result.language_name(), Some("Go"));
        assert_eq!(service.cache_hits(), 1);

        let result = service.classify("src/app.go", b"package app", true).await.unwrap();
        assert!(!result.from_cache);
        assert_eq!(result.language_name(), Some("Go"));
        assert_eq!(service.cache_misses(), 1);

        let result = service.classify("lib/tool.rs", b"fn main() {}", false).await.unwrap();
        assert_eq!(result.language_name(), Some("Rust"));
        assert_eq!(service.counters(), CounterSnapshot { hits: 1, misses: 2 });
    }

    #[tokio::test]
    async fn test_exclusion_skips_counters() {
        let service = service();
        service.warm_up().await;
        let result = service.classify("node_modules/x/index.js", b"var a", false).await.unwrap();
        assert!(result.is_excluded);
        assert_eq!(service.counters(), CounterSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_cancels_the_oracle_call() {
        let oracle = Arc::new(SlowOracle { calls: AtomicUsize::new(0) });
        let service = ClassificationService::new(
            ExclusionPolicy::with_defaults(100_000).unwrap(),
            PreoptimizationCache::default(),
            oracle.clone(),
        );
        let err = service
            .classify_with_timeout("a.go", b"package a", true, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Cancelled));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.cache_misses(), 0);
    }

    #[tokio::test]
    async fn test_batch_keeps_request_order() {
        let service = service().with_batch_concurrency(2);
        service.warm_up().await;

        let items: Vec<(String, Vec<u8>)> = vec![
            ("image.png".to_string(), b"\x89PNG\r\n\x1a\n0000".to_vec()),
            ("main.rs".to_string(), b"fn main() {}".to_vec()),
            ("app.js".to_string(), b"var a".to_vec()),
            ("Cargo.toml".to_string(), b"[package]".to_vec()),
            ("vendor/lib.go".to_string(), b"package lib".to_vec()),
            ("script.pl".to_string(), b"print 1;".to_vec()),
        ];
        let results = service.classify_batch(&items, false).await;
        assert_eq!(results.len(), items.len());

        let results: Vec<ClassificationResult> = results.into_iter().map(Result::unwrap).collect();
        assert!(results[0].is_binary && results[0].is_excluded);
        assert_eq!(results[1].language_name(), Some("Rust"));
        assert!(results[2].from_cache);
        assert_eq!(results[2].language_name(), Some("JavaScript"));
        assert_eq!(results[3].language_name(), Some("TOML"));
        assert!(results[4].is_excluded);
        assert_eq!(results[5].language_name(), Some("Perl"));
        assert_eq!(service.counters(), CounterSnapshot { hits: 1, misses: 3 });
    }
}
