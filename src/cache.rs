//! Self-tuning preoptimization cache
//!
//! At warm-up every catalogue sample is classified once by the oracle and
//! the answer is stored next to the rules it stands for. Lookups scan the
//! entries in order and the first entry whose rules all match wins. Every
//! `resort_interval` hits the entries are re-sorted by popularity so the
//! common file types are found first.

use crate::oracle::Oracle;
use crate::rules::RuleSet;
use crate::static_data::{CatalogueEntry, WELL_KNOWN_SAMPLES};
use crate::types::{ClassificationResult, Detection};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Default number of hits between two resorts
pub const DEFAULT_RESORT_INTERVAL: u64 = 100;

/// One warmed-up catalogue entry
#[derive(Debug)]
pub struct PreoptimizationEntry {
    rules: RuleSet,
    result: ClassificationResult,
    hits: AtomicU64,
}

impl PreoptimizationEntry {
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Owned copy of the stored answer, rewritten for `path`
    fn stamp(&self, path: &str) -> ClassificationResult {
        let mut result = self.result.clone();
        if let Some(detection) = result.detection.as_mut() {
            detection.path = path.to_string();
            detection.loc = 0;
            detection.sloc = 0;
        }
        result.from_cache = true;
        result
    }
}

#[derive(Debug)]
pub struct PreoptimizationCache {
    /// Lookups share the read lock; only a resort takes the write lock.
    /// Fairness is whatever std's `RwLock` gives on the platform (the Linux
    /// futex implementation prefers a waiting writer over new readers).
    entries: RwLock<Vec<Arc<PreoptimizationEntry>>>,
    total_hits: AtomicU64,
    resort_interval: u64,
    catalogue: Vec<CatalogueEntry>,
    warmed: tokio::sync::Mutex<bool>,
    warm_done: AtomicBool,
}

impl Default for PreoptimizationCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESORT_INTERVAL)
    }
}

impl PreoptimizationCache {
    /// Cache over the built-in catalogue
    pub fn new(resort_interval: u64) -> Self {
        Self::with_catalogue(WELL_KNOWN_SAMPLES.to_vec(), resort_interval)
    }

    pub fn with_catalogue(catalogue: Vec<CatalogueEntry>, resort_interval: u64) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            total_hits: AtomicU64::new(0),
            resort_interval,
            catalogue,
            warmed: tokio::sync::Mutex::new(false),
            warm_done: AtomicBool::new(false),
        }
    }

    /// Classify every catalogue sample once and install the answers
    ///
    /// Runs at most once and returns the number of installed entries. Later
    /// and concurrent calls wait for the first one and get `None` without
    /// touching the oracle. Samples the oracle fails on, or answers without a
    /// detection, are skipped.
    pub async fn warm_up(&self, oracle: &dyn Oracle) -> Option<usize> {
        let mut warmed = self.warmed.lock().await;
        if *warmed {
            return None;
        }

        let mut entries = Vec::with_capacity(self.catalogue.len());
        for sample in &self.catalogue {
            let rules = match RuleSet::compile(sample.rules) {
                Ok(rules) => rules,
                Err(e) => {
                    tracing::warn!("Skipping cache sample {}: {}", sample.sample_name, e);
                    continue;
                }
            };

            match oracle.classify(sample.sample_name, sample.sample_body.as_bytes()).await {
                Ok(result) if result.detection.is_some() => {
                    tracing::trace!(
                        "Cached {} as {:?}",
                        sample.sample_name,
                        result.language_name()
                    );
                    entries.push(Arc::new(PreoptimizationEntry {
                        rules,
                        result,
                        hits: AtomicU64::new(0),
                    }));
                }
                Ok(_) => {
                    tracing::warn!("Skipping cache sample {}: no detection", sample.sample_name);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping cache sample {}: {} oracle failed: {}",
                        sample.sample_name,
                        oracle.name(),
                        e
                    );
                }
            }
        }

        let count = entries.len();
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = entries;
        *warmed = true;
        self.warm_done.store(true, Ordering::Release);
        tracing::info!(
            "Preoptimization cache warmed up with {}/{} samples",
            count,
            self.catalogue.len()
        );
        Some(count)
    }

    /// First entry whose rules all match `path`, as an owned result
    pub fn lookup(&self, path: &str) -> Option<ClassificationResult> {
        let (result, total) = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let entry = entries.iter().find(|entry| entry.rules.matches_all(path))?;
            entry.hits.fetch_add(1, Ordering::Relaxed);
            let total = self.total_hits.fetch_add(1, Ordering::Relaxed) + 1;
            (entry.stamp(path), total)
        };

        tracing::trace!("Cache hit for {}", path);
        if self.resort_interval > 0 && total % self.resort_interval == 0 {
            self.resort();
        }
        Some(result)
    }

    /// Order entries by hit count, most popular first. Ties keep their order.
    pub fn resort(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.hits()));
        tracing::debug!(
            "Resorted preoptimization cache after {} hits",
            self.total_hits()
        );
    }

    /// Detection of the most hit entry, after a resort
    pub fn most_popular(&self) -> Option<Detection> {
        self.resort();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.first().and_then(|entry| entry.result.detection.clone())
    }

    /// `(language, hits)` per entry in current scan order
    pub fn ranking(&self) -> Vec<(String, u64)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .map(|entry| {
                let name = entry.result.language_name().unwrap_or_default().to_string();
                (name, entry.hits())
            })
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits.load(Ordering::Relaxed)
    }

    /// Zero all hit counters, keeping the current order
    pub fn reset_stats(&self) {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        for entry in entries.iter() {
            entry.hits.store(0, Ordering::Relaxed);
        }
        self.total_hits.store(0, Ordering::Relaxed);
    }

    /// Whether a warm-up has finished, even one that kept no samples
    pub fn is_warm(&self) -> bool {
        self.warm_done.load(Ordering::Acquire)
    }
}
