//! Filename, extension and path rule denylists
//!
//! The denylists live in one immutable [`Denylist`] snapshot behind a
//! `RwLock<Arc<_>>`. Readers clone the `Arc` and evaluate without holding the
//! lock; writers clone the snapshot, change the copy and swap it in. A reader
//! therefore sees either the state before a mutation or the state after it,
//! never a half-applied change.

use super::{ExclusionReason, Filter, FilterDecision};
use crate::error::ClassifyResult;
use crate::rules::{MatchRule, RuleRegistry};
use crate::static_data::{DEFAULT_PATH_RULES, EXCLUDED_EXTENSIONS, EXCLUDED_FILENAMES};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Last path component, treating both `/` and `\` as separators
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Extension of the base name including the leading dot
///
/// Dot-files are their own extension: `.npmrc` yields `.npmrc`, while a name
/// without a dot yields an empty string.
pub fn extension(path: &str) -> &str {
    let base = base_name(path);
    base.rfind('.').map_or("", |index| &base[index..])
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Immutable denylist snapshot
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    pub extensions: HashSet<String>,
    pub filenames: HashSet<String>,
    pub rules: RuleRegistry,
}

impl Denylist {
    /// Built-in extensions, filenames and path rules
    pub fn with_defaults() -> ClassifyResult<Self> {
        let mut rules = RuleRegistry::new();
        for (name, pattern) in DEFAULT_PATH_RULES {
            rules.insert(*name, MatchRule::matching(pattern)?);
        }
        Ok(Self {
            extensions: EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            filenames: EXCLUDED_FILENAMES.iter().map(|s| s.to_string()).collect(),
            rules,
        })
    }

    fn check(&self, path: &str) -> Option<ExclusionReason> {
        let name = base_name(path);
        if self.filenames.contains(name) {
            return Some(ExclusionReason::Filename(name.to_string()));
        }

        let ext = extension(path);
        if !ext.is_empty() && self.extensions.contains(ext) {
            return Some(ExclusionReason::Extension(ext.to_string()));
        }

        let normalized: Cow<'_, str> = if path.contains('\\') {
            Cow::Owned(path.replace('\\', "/"))
        } else {
            Cow::Borrowed(path)
        };
        self.rules
            .first_match(&normalized)
            .map(|rule| ExclusionReason::PathRule(rule.to_string()))
    }
}

/// Path filter backed by a runtime-mutable denylist
#[derive(Debug)]
pub struct PathFilter {
    denylist: RwLock<Arc<Denylist>>,
}

impl PathFilter {
    pub fn new(denylist: Denylist) -> Self {
        Self {
            denylist: RwLock::new(Arc::new(denylist)),
        }
    }

    /// Current snapshot; cheap, never blocks on evaluation
    pub fn snapshot(&self) -> Arc<Denylist> {
        self.denylist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `change` to a copy of the snapshot and publish it
    fn update<R>(&self, change: impl FnOnce(&mut Denylist) -> R) -> R {
        let mut guard = self.denylist.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Denylist::clone(&guard);
        let outcome = change(&mut next);
        *guard = Arc::new(next);
        outcome
    }

    /// Returns true when the extension was not already excluded
    pub fn add_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        tracing::debug!("Excluding extension {}", ext);
        self.update(|d| d.extensions.insert(ext))
    }

    /// Returns true when the extension was excluded before
    pub fn remove_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        tracing::debug!("No longer excluding extension {}", ext);
        self.update(|d| d.extensions.remove(&ext))
    }

    pub fn add_filename(&self, name: &str) -> bool {
        let name = name.to_string();
        self.update(|d| d.filenames.insert(name))
    }

    pub fn remove_filename(&self, name: &str) -> bool {
        self.update(|d| d.filenames.remove(name))
    }

    /// Register (or replace) a named path rule
    pub fn add_rule(&self, name: &str, rule: MatchRule) {
        tracing::debug!("Adding path rule {}: {:?}", name, rule);
        self.update(|d| d.rules.insert(name, rule));
    }

    /// Compile `pattern` and register it under `name`
    pub fn add_rule_pattern(&self, name: &str, pattern: &str) -> ClassifyResult<()> {
        let rule = MatchRule::matching(pattern)?;
        self.add_rule(name, rule);
        Ok(())
    }

    pub fn remove_rule(&self, name: &str) -> bool {
        self.update(|d| d.rules.remove(name).is_some())
    }
}

impl Filter for PathFilter {
    type Input = str;

    fn filter(&self, path: &str) -> FilterDecision {
        match self.snapshot().check(path) {
            Some(reason) => {
                tracing::trace!("Path {} excluded: {}", path, reason);
                FilterDecision::Skip(reason)
            }
            None => FilterDecision::Process,
        }
    }

    fn name(&self) -> &'static str {
        "PathFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> PathFilter {
        PathFilter::new(Denylist::with_defaults().unwrap())
    }

    #[test]
    fn test_base_name_and_extension() {
        assert_eq!(base_name("foo/bar/baz.js"), "baz.js");
        assert_eq!(base_name("baz.js"), "baz.js");
        assert_eq!(base_name(r"dir\file.txt"), "file.txt");
        assert_eq!(extension("foo/bar.tar.gz"), ".gz");
        assert_eq!(extension(".npmrc"), ".npmrc");
        assert_eq!(extension("a.dir/Makefile"), "");
    }

    #[test]
    fn test_default_denylists() {
        let filter = default_filter();
        assert_eq!(
            filter.filter("foo/LICENSE"),
            FilterDecision::Skip(ExclusionReason::Filename("LICENSE".to_string()))
        );
        assert_eq!(
            filter.filter(".npmrc"),
            FilterDecision::Skip(ExclusionReason::Extension(".npmrc".to_string()))
        );
        assert_eq!(
            filter.filter("vendor/pkg/foo.go"),
            FilterDecision::Skip(ExclusionReason::PathRule("vendor".to_string()))
        );
        assert_eq!(
            filter.filter(r"web\node_modules\react\index.js"),
            FilterDecision::Skip(ExclusionReason::PathRule("node_modules".to_string()))
        );
        assert_eq!(filter.filter("src/main.go"), FilterDecision::Process);
        assert_eq!(filter.filter("Makefile"), FilterDecision::Process);
    }

    #[test]
    fn test_extension_mutation_is_idempotent() {
        let filter = default_filter();
        assert_eq!(filter.filter("foo.jeff"), FilterDecision::Process);

        assert!(filter.add_extension(".jeff"));
        assert!(!filter.add_extension("jeff"));
        assert!(filter.filter("foo.jeff").is_skip());

        assert!(filter.remove_extension(".jeff"));
        assert!(!filter.remove_extension(".jeff"));
        assert_eq!(filter.filter("foo.jeff"), FilterDecision::Process);
    }

    #[test]
    fn test_filename_and_rule_mutation() {
        let filter = default_filter();

        filter.add_filename("CHANGELOG");
        assert!(filter.filter("docs/CHANGELOG").is_skip());
        assert!(filter.remove_filename("CHANGELOG"));
        assert!(!filter.remove_filename("CHANGELOG"));
        assert!(!filter.filter("docs/CHANGELOG").is_skip());

        filter.add_rule_pattern("fixtures", r"(^|/)fixtures/").unwrap();
        assert!(filter.filter("test/fixtures/a.json").is_skip());
        assert!(filter.remove_rule("fixtures"));
        assert!(!filter.remove_rule("fixtures"));
        assert!(!filter.filter("test/fixtures/a.json").is_skip());

        assert!(filter.add_rule_pattern("bad", "(").is_err());
    }

    #[test]
    fn test_snapshot_is_stable_across_mutation() {
        let filter = default_filter();
        let before = filter.snapshot();
        filter.add_extension(".jeff");
        assert!(!before.extensions.contains(".jeff"));
        assert!(filter.snapshot().extensions.contains(".jeff"));
    }

    #[test]
    fn test_concurrent_mutation_and_reads() {
        let filter = Arc::new(default_filter());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let filter = Arc::clone(&filter);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        if i % 2 == 0 {
                            filter.add_extension(".jeff");
                            filter.remove_extension(".jeff");
                        } else {
                            assert!(filter.filter("vendor/x.go").is_skip());
                            let _ = filter.filter("foo.jeff");
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(!filter.filter("foo.jeff").is_skip());
    }
}
