//! Content size filtering

use super::{ExclusionReason, Filter, FilterDecision};

/// Default maximum body size in bytes
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 100_000;

/// Filter bodies larger than a configured maximum
#[derive(Debug, Clone, Copy)]
pub struct SizeFilter {
    max_size_bytes: usize,
}

impl SizeFilter {
    pub fn new(max_size_bytes: usize) -> Self {
        Self { max_size_bytes }
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }
}

impl Default for SizeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFER_SIZE)
    }
}

impl Filter for SizeFilter {
    type Input = [u8];

    fn filter(&self, body: &[u8]) -> FilterDecision {
        if body.len() > self.max_size_bytes {
            FilterDecision::Skip(ExclusionReason::Large {
                size: body.len(),
                max: self.max_size_bytes,
            })
        } else {
            FilterDecision::Process
        }
    }

    fn name(&self) -> &'static str {
        "SizeFilter"
    }
}
