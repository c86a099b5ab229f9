//! # Coverage Analyzer
//!
//! Pure rules over a finished [`coverage_index::CoverageIndex`]. Every
//! finding is sorted so the same inputs always yield the same report.
//!
//! ```text
//! CoverageIndex
//!     ├──> pairing          (reference docs: builder + reviewer?)
//!     ├──> write conflicts  (folders claimed by several builders)
//!     ├──> orphaned folders (no writer anywhere in the ancestry)
//!     ├──> layer coverage   (ordered pattern rules, "Other" last)
//!     └──> recommendations  (fixed rule list, critical → low)
//!                 │
//!                 ▼
//!          CoverageReport (serializable)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use coverage_analyzer::CoverageAnalyzer;
//! use coverage_contract::ContractParser;
//! use coverage_index::CoverageIndexBuilder;
//!
//! let doc = "## Scope\n### Can Touch\n```\nshared/\n```\n";
//! let parser = ContractParser::default();
//! let contracts = vec![
//!     parser.parse(doc, "north-builder"),
//!     parser.parse(doc, "south-builder"),
//! ];
//! let files = vec!["shared/a.ts".to_string()];
//!
//! let index = CoverageIndexBuilder::default().build(&contracts, &files).unwrap();
//! let report = CoverageAnalyzer::default().analyze(index);
//! assert_eq!(report.conflicts.len(), 1);
//! assert_eq!(report.conflicts[0].folder, "shared");
//! ```

mod conflicts;
mod layers;
mod orphans;
mod pairing;
mod recommendations;
mod report;

pub use conflicts::{detect_conflicts, ConflictRisk, WriteConflict};
pub use layers::{
    default_layer_rules, layer_coverage, LayerClassifier, LayerCoverage, LayerRule, OTHER_LAYER,
};
pub use orphans::{detect_orphans, OrphanedFolder};
pub use pairing::{analyze_pairing, PairingEntry, PairingStatus, DEFAULT_REFERENCE_SUFFIX};
pub use recommendations::{
    recommend, Priority, Recommendation, RuleInputs, COORDINATOR_ONLY_LIMIT,
    LAYER_COVERAGE_TARGET,
};
pub use report::{
    AgentReport, AgentSummary, AnalyzerConfig, CoverageAnalyzer, CoverageReport, FileReport,
};
