//! Translation coverage: which parts of a source tree a leftover consumed.

pub mod engine;
pub mod result;

pub use engine::{coverage, coverage_with_options, CoverageOptions};
pub use result::CoverageEntry;
