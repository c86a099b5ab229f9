//! # Coverage Index
//!
//! Resolves every contract declaration against a flat file catalogue and
//! records, per file, which agents know it, may write it, and may read it.
//!
//! ## Pipeline
//!
//! ```text
//! contracts + catalogue
//!     │
//!     ├──> knowledge declarations ──> known_by (explicit | glob)
//!     ├──> builder Can Touch      ──> writable_by (+ known_by)
//!     ├──> reviewer Can Read      ──> readable_by (+ known_by)
//!     │
//!     └──> CoverageStats + SpecialistCompleteness
//! ```
//!
//! ## Example
//!
//! ```rust
//! use coverage_contract::ContractParser;
//! use coverage_index::CoverageIndexBuilder;
//!
//! let doc = "## Knowledge\n### Primary\n| `content/widget.spec.md` | spec |\n";
//! let contract = ContractParser::default().parse(doc, "widget-builder");
//! let files = vec!["content/widget.spec.md".to_string(), "content/widget.ts".to_string()];
//!
//! let index = CoverageIndexBuilder::default().build(&[contract], &files).unwrap();
//! assert_eq!(index.stats.covered_files, 1);
//! assert_eq!(index.stats.coverage_percent, 50);
//! ```

mod builder;
mod completeness;
mod coverage;
mod error;
mod stats;

pub use builder::CoverageIndexBuilder;
pub use completeness::{
    has_required_reference, MissingReference, RoleCompleteness, SpecialistCompleteness,
};
pub use coverage::{AgentProfile, CoverageIndex, FileCoverage};
pub use error::{IndexError, Result};
pub use stats::{percent, CoverageStats};
