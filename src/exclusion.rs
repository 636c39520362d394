//! Fast-path exclusion policy
//!
//! Decides, without the oracle, whether a file should be skipped. Checks run
//! in a fixed order and the first one to fire wins:
//! 1. binary content (only when a body is given)
//! 2. oversized content (only when a body is given)
//! 3. denylisted filename, extension or path rule

use crate::error::ClassifyResult;
use crate::filters::{
    BinaryFilter, Denylist, ExclusionReason, Filter, FilterDecision, PathFilter, SizeFilter,
};
use crate::rules::MatchRule;
use crate::types::ClassificationResult;

/// Decision of the exclusion policy for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionDecision {
    /// Not excluded, continue to the cache and oracle
    Process,
    /// Excluded for the given reason
    Exclude(ExclusionReason),
}

impl ExclusionDecision {
    pub fn is_excluded(&self) -> bool {
        matches!(self, ExclusionDecision::Exclude(_))
    }

    /// The result handed to callers for an excluded file
    pub fn to_result(&self) -> Option<ClassificationResult> {
        match self {
            ExclusionDecision::Process => None,
            ExclusionDecision::Exclude(reason) => {
                let mut result = ClassificationResult::excluded(
                    matches!(reason, ExclusionReason::Binary(_)),
                    matches!(reason, ExclusionReason::Large { .. }),
                );
                result.message = Some(reason.to_string());
                Some(result)
            }
        }
    }

    /// `(excluded, result)` pair
    pub fn into_parts(self) -> (bool, Option<ClassificationResult>) {
        let result = self.to_result();
        (result.is_some(), result)
    }
}

impl From<FilterDecision> for ExclusionDecision {
    fn from(decision: FilterDecision) -> Self {
        match decision {
            FilterDecision::Process => ExclusionDecision::Process,
            FilterDecision::Skip(reason) => ExclusionDecision::Exclude(reason),
        }
    }
}

/// Binary, size and denylist checks bundled behind one call
#[derive(Debug)]
pub struct ExclusionPolicy {
    binary: BinaryFilter,
    size: SizeFilter,
    path: PathFilter,
}

impl ExclusionPolicy {
    pub fn new(max_buffer_size: usize, denylist: Denylist) -> Self {
        Self {
            binary: BinaryFilter::new(),
            size: SizeFilter::new(max_buffer_size),
            path: PathFilter::new(denylist),
        }
    }

    /// Policy with the built-in denylists and the given size limit
    pub fn with_defaults(max_buffer_size: usize) -> ClassifyResult<Self> {
        Ok(Self::new(max_buffer_size, Denylist::with_defaults()?))
    }

    pub fn classify_exclusion(&self, path: &str, body: Option<&[u8]>) -> ExclusionDecision {
        if let Some(body) = body {
            let decision = self.binary.filter(body);
            if decision.is_skip() {
                return decision.into();
            }
            let decision = self.size.filter(body);
            if decision.is_skip() {
                return decision.into();
            }
        }
        self.path.filter(path).into()
    }

    pub fn max_buffer_size(&self) -> usize {
        self.size.max_size_bytes()
    }

    pub fn add_extension(&self, ext: &str) -> bool {
        self.path.add_extension(ext)
    }

    pub fn remove_extension(&self, ext: &str) -> bool {
        self.path.remove_extension(ext)
    }

    pub fn add_filename(&self, name: &str) -> bool {
        self.path.add_filename(name)
    }

    pub fn remove_filename(&self, name: &str) -> bool {
        self.path.remove_filename(name)
    }

    pub fn add_rule(&self, name: &str, rule: MatchRule) {
        self.path.add_rule(name, rule)
    }

    pub fn add_rule_pattern(&self, name: &str, pattern: &str) -> ClassifyResult<()> {
        self.path.add_rule_pattern(name, pattern)
    }

    pub fn remove_rule(&self, name: &str) -> bool {
        self.path.remove_rule(name)
    }

    pub fn denylist(&self) -> std::sync::Arc<Denylist> {
        self.path.snapshot()
    }
}
