//! Exclusion filters
//!
//! Each filter answers one question about a file cheaply, without talking to
//! the oracle. They are applied by [`ExclusionPolicy`](crate::exclusion::ExclusionPolicy)
//! in a fixed order:
//! 1. **Binary Filter** - content sniffing on the first 512 bytes
//! 2. **Size Filter** - body length against the configured maximum
//! 3. **Path Filter** - filename, extension and path rule denylists

pub mod binary;
pub mod path;
pub mod size;

pub use binary::{BinaryFilter, sniff_content_type};
pub use path::{Denylist, PathFilter, base_name, extension};
pub use size::SizeFilter;

/// Common trait for all filters
pub trait Filter {
    /// Input type for the filter
    type Input: ?Sized;

    /// Apply the filter to the input
    fn filter(&self, input: &Self::Input) -> FilterDecision;

    /// Get the name of this filter for debugging/logging
    fn name(&self) -> &'static str;
}

/// Decision produced by a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Continue to the cache and oracle
    Process,
    /// Stop here, the file is excluded
    Skip(ExclusionReason),
}

impl FilterDecision {
    pub fn is_skip(&self) -> bool {
        matches!(self, FilterDecision::Skip(_))
    }
}

/// Why a file was excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Content sniffed as binary, carrying the sniffed content type
    Binary(&'static str),
    /// Content longer than the configured maximum
    Large { size: usize, max: usize },
    /// Base filename is denylisted
    Filename(String),
    /// Extension is denylisted
    Extension(String),
    /// Path matched the named path rule
    PathRule(String),
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Binary(content_type) => write!(f, "binary content ({content_type})"),
            ExclusionReason::Large { size, max } => write!(f, "content too large ({size} > {max} bytes)"),
            ExclusionReason::Filename(name) => write!(f, "excluded filename {name}"),
            ExclusionReason::Extension(ext) => write!(f, "excluded extension {ext}"),
            ExclusionReason::PathRule(rule) => write!(f, "path matched rule {rule}"),
        }
    }
}
