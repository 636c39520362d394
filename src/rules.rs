//! Path match rules
//!
//! A [`MatchRule`] is a compiled regular expression plus an invert flag.
//! Rules are immutable once compiled, so they can be shared freely between
//! threads. [`RuleSet`] ANDs several rules together and [`RuleRegistry`]
//! keeps an ordered, named collection that can grow and shrink at runtime.

use crate::error::{ClassifyError, ClassifyResult};
use regex::Regex;
use std::fmt;

/// A compiled path pattern, optionally inverted
#[derive(Clone)]
pub struct MatchRule {
    regex: Regex,
    invert: bool,
}

impl MatchRule {
    /// Compile a rule. This is the only place a bad pattern can fail.
    pub fn compile(pattern: &str, invert: bool) -> ClassifyResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| ClassifyError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex, invert })
    }

    /// Rule that matches when `pattern` matches
    pub fn matching(pattern: &str) -> ClassifyResult<Self> {
        Self::compile(pattern, false)
    }

    /// Rule that matches when `pattern` does NOT match
    pub fn not_matching(pattern: &str) -> ClassifyResult<Self> {
        Self::compile(pattern, true)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path) != self.invert
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }
}

impl PartialEq for MatchRule {
    fn eq(&self, other: &Self) -> bool {
        self.invert == other.invert && self.pattern() == other.pattern()
    }
}

impl Eq for MatchRule {}

impl fmt::Debug for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            write!(f, "MatchRule(!/{}/)", self.pattern())
        } else {
            write!(f, "MatchRule(/{}/)", self.pattern())
        }
    }
}

/// Non-empty list of rules that must all match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<MatchRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<MatchRule>) -> ClassifyResult<Self> {
        if rules.is_empty() {
            return Err(ClassifyError::Config(
                "a rule set needs at least one rule".to_string(),
            ));
        }
        Ok(Self { rules })
    }

    /// Compile `(pattern, invert)` pairs into a rule set
    pub fn compile(specs: &[(&str, bool)]) -> ClassifyResult<Self> {
        let rules = specs
            .iter()
            .map(|(pattern, invert)| MatchRule::compile(pattern, *invert))
            .collect::<ClassifyResult<Vec<_>>>()?;
        Self::new(rules)
    }

    pub fn matches_all(&self, path: &str) -> bool {
        self.rules.iter().all(|rule| rule.matches(path))
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }
}

/// Ordered collection of named rules
///
/// Insertion and removal are idempotent. The registry itself is not
/// synchronized; owners wrap it in a snapshot (see
/// [`ExclusionPolicy`](crate::exclusion::ExclusionPolicy)).
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    entries: Vec<(String, MatchRule)>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule registered under `name`
    pub fn insert(&mut self, name: impl Into<String>, rule: MatchRule) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rule,
            None => self.entries.push((name, rule)),
        }
    }

    /// Remove the rule registered under `name`, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<MatchRule> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Name of the first rule matching `path`
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, rule)| rule.matches(path))
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
