use crate::conflicts::{ConflictRisk, WriteConflict};
use crate::layers::LayerCoverage;
use crate::orphans::OrphanedFolder;
use crate::pairing::PairingEntry;
use coverage_index::{CoverageStats, SpecialistCompleteness};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Files known only by coordinators before the low-priority rule fires.
pub const COORDINATOR_ONLY_LIMIT: usize = 5;
/// Layers below this percentage are flagged.
pub const LAYER_COVERAGE_TARGET: u32 = 80;

const COMPLETENESS_FLOOR: u32 = 50;
const EXPLICIT_FLOOR: u32 = 30;
const BROAD_COVERAGE: u32 = 80;
const MAX_LISTED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub action: String,
}

impl Recommendation {
    fn new(priority: Priority, title: &str, description: String, action: &str) -> Self {
        Self {
            priority,
            title: title.to_string(),
            description,
            action: action.to_string(),
        }
    }
}

/// Everything the recommendation rules look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInputs<'a> {
    pub stats: &'a CoverageStats,
    pub completeness: &'a SpecialistCompleteness,
    pub pairing: &'a [PairingEntry],
    pub conflicts: &'a [WriteConflict],
    pub orphans: &'a [OrphanedFolder],
    pub layers: &'a [LayerCoverage],
    pub coordinator_only_files: &'a [String],
}

type Rule = fn(&RuleInputs<'_>) -> Option<Recommendation>;

const RULES: &[Rule] = &[
    uncovered_files,
    low_specialist_completeness,
    missing_references,
    pattern_only_coverage,
    missing_reviewers,
    missing_builders,
    high_risk_conflicts,
    orphaned_folders,
    coordinator_only,
    weak_layers,
];

/// Evaluate every rule in order. Rules are independent; each emits at most
/// one recommendation.
pub fn recommend(inputs: &RuleInputs<'_>) -> Vec<Recommendation> {
    RULES.iter().filter_map(|rule| rule(inputs)).collect()
}

fn uncovered_files(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let stats = inputs.stats;
    (stats.uncovered_files > 0).then(|| {
        Recommendation::new(
            Priority::Critical,
            "Uncovered files",
            format!(
                "{} of {} files are not known by any agent",
                stats.uncovered_files, stats.total_files
            ),
            "Add the files, or a folder or pattern containing them, to an agent's Knowledge tables",
        )
    })
}

fn low_specialist_completeness(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let combined = &inputs.completeness.combined;
    (combined.total > 0 && combined.percent < COMPLETENESS_FLOOR).then(|| {
        Recommendation::new(
            Priority::Critical,
            "Specialists lack their domain reference",
            format!(
                "Only {} of {} specialists ({}%) list their reference document as Primary knowledge",
                combined.with_reference, combined.total, combined.percent
            ),
            "Add each specialist's expected reference path to its Primary knowledge table",
        )
    })
}

fn missing_references(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let completeness = inputs.completeness;
    let missing = &completeness.agents_missing_specs;
    (!missing.is_empty() && completeness.combined.percent >= COMPLETENESS_FLOOR).then(|| {
        Recommendation::new(
            Priority::High,
            "Agents missing required references",
            format!(
                "{} specialists do not reference their domain document: {}",
                missing.len(),
                list(missing.iter().map(|m| m.agent.as_str()))
            ),
            "Add the expected reference path to each listed agent's Primary knowledge",
        )
    })
}

fn pattern_only_coverage(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let stats = inputs.stats;
    (stats.explicit_percent < EXPLICIT_FLOOR && stats.coverage_percent > BROAD_COVERAGE).then(|| {
        Recommendation::new(
            Priority::High,
            "Coverage relies on broad patterns",
            format!(
                "{}% of files are covered but only {}% are named explicitly",
                stats.coverage_percent, stats.explicit_percent
            ),
            "List key files explicitly instead of relying on folder or wildcard declarations",
        )
    })
}

fn missing_reviewers(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let paths: Vec<&str> = inputs
        .pairing
        .iter()
        .filter(|p| p.status.lacks_reviewer())
        .map(|p| p.path.as_str())
        .collect();
    (!paths.is_empty()).then(|| {
        Recommendation::new(
            Priority::High,
            "Reference documents without a reviewer",
            format!(
                "{} reference documents are not known by any reviewer: {}",
                paths.len(),
                list(paths.iter().copied())
            ),
            "Add the documents to a reviewer's Knowledge tables",
        )
    })
}

fn missing_builders(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let paths: Vec<&str> = inputs
        .pairing
        .iter()
        .filter(|p| p.status.lacks_builder())
        .map(|p| p.path.as_str())
        .collect();
    (!paths.is_empty()).then(|| {
        Recommendation::new(
            Priority::High,
            "Reference documents without a builder",
            format!(
                "{} reference documents are not known by any builder: {}",
                paths.len(),
                list(paths.iter().copied())
            ),
            "Add the documents to a builder's Knowledge tables",
        )
    })
}

fn high_risk_conflicts(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let folders: Vec<&str> = inputs
        .conflicts
        .iter()
        .filter(|c| c.risk == ConflictRisk::High)
        .map(|c| c.folder.as_str())
        .collect();
    (!folders.is_empty()).then(|| {
        Recommendation::new(
            Priority::Medium,
            "High-risk write conflicts",
            format!(
                "{} folders are writable by more than two unrelated builders: {}",
                folders.len(),
                list(folders.iter().copied())
            ),
            "Narrow the Can Touch scopes so each folder has one owning builder family",
        )
    })
}

fn orphaned_folders(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let orphans = inputs.orphans;
    (!orphans.is_empty()).then(|| {
        Recommendation::new(
            Priority::Medium,
            "Orphaned folders",
            format!(
                "{} folders have no builder that may write them: {}",
                orphans.len(),
                list(orphans.iter().map(|o| o.folder.as_str()))
            ),
            "Assign each folder to a builder's Can Touch scope, or remove it",
        )
    })
}

fn coordinator_only(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let files = inputs.coordinator_only_files;
    (files.len() > COORDINATOR_ONLY_LIMIT).then(|| {
        Recommendation::new(
            Priority::Low,
            "Files known only by coordinators",
            format!(
                "{} files are known only by coordinator agents: {}",
                files.len(),
                list(files.iter().map(String::as_str))
            ),
            "Give a specialist explicit knowledge of these files",
        )
    })
}

fn weak_layers(inputs: &RuleInputs<'_>) -> Option<Recommendation> {
    let weak: Vec<String> = inputs
        .layers
        .iter()
        .filter(|l| l.coverage_percent < LAYER_COVERAGE_TARGET)
        .map(|l| format!("{} ({}%)", l.layer, l.coverage_percent))
        .collect();
    (!weak.is_empty()).then(|| {
        Recommendation::new(
            Priority::Low,
            "Layers below target coverage",
            format!(
                "{} layers are under {LAYER_COVERAGE_TARGET}% coverage: {}",
                weak.len(),
                list(weak.iter().map(String::as_str))
            ),
            "Extend Knowledge declarations into the listed layers",
        )
    })
}

fn list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<&str> = items.collect();
    let shown = items.iter().take(MAX_LISTED).copied().collect::<Vec<_>>().join(", ");
    if items.len() > MAX_LISTED {
        format!("{shown} and {} more", items.len() - MAX_LISTED)
    } else {
        shown
    }
}
