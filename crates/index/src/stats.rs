use crate::coverage::FileCoverage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate coverage counts over the whole catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Files in the catalogue
    pub total_files: usize,

    /// Files known by at least one agent
    pub covered_files: usize,

    /// Files named by at least one exact declaration
    pub explicitly_covered_files: usize,

    /// Files known only through folder or pattern declarations
    pub glob_only_files: usize,

    /// Files no agent knows
    pub uncovered_files: usize,

    pub coverage_percent: u32,
    pub explicit_percent: u32,
    pub glob_only_percent: u32,
}

impl CoverageStats {
    pub fn from_files(files: &BTreeMap<String, FileCoverage>) -> Self {
        let total_files = files.len();
        let mut stats = Self {
            total_files,
            ..Self::default()
        };

        for coverage in files.values() {
            if !coverage.is_covered() {
                continue;
            }
            stats.covered_files += 1;
            if coverage.explicitly_known_by.is_empty() {
                stats.glob_only_files += 1;
            } else {
                stats.explicitly_covered_files += 1;
            }
        }

        stats.uncovered_files = total_files - stats.covered_files;
        stats.coverage_percent = percent(stats.covered_files, total_files);
        stats.explicit_percent = percent(stats.explicitly_covered_files, total_files);
        stats.glob_only_percent = percent(stats.glob_only_files, total_files);
        stats
    }
}

/// `round(count / total * 100)`, defined as 0 when `total` is 0.
pub fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}
