//! Generic JSON configuration tree primitives used by higher-level translators.
//!
//! A translation pass reads a source tree, builds a destination tree, and
//! records what it consumed in a parallel [`Leftover`] tree. The coverage
//! engine compares the source against the leftover afterwards.

pub mod builder;
pub mod coverage;
pub mod format;
pub mod leftover;
pub mod parser;
pub mod tree;
pub mod writer;

pub use builder::{ensure_list, ensure_object, ensure_path, get_or_insert_keyed, keyed_entry};
pub use coverage::{coverage, coverage_with_options, CoverageEntry, CoverageOptions};
pub use format::{format_json, format_summary, format_text};
pub use leftover::Leftover;
pub use parser::{parse, parse_file, ParseError};
pub use tree::{Segment, TreeNode, TreePath};
pub use writer::{write, write_file, WriteError};
