use crate::conflicts::{detect_conflicts, WriteConflict};
use crate::layers::{default_layer_rules, layer_coverage, LayerClassifier, LayerCoverage, LayerRule};
use crate::orphans::{detect_orphans, OrphanedFolder};
use crate::pairing::{analyze_pairing, PairingEntry, DEFAULT_REFERENCE_SUFFIX};
use crate::recommendations::{recommend, Recommendation, RuleInputs};
use coverage_contract::Role;
use coverage_index::{AgentProfile, CoverageIndex, CoverageStats, FileCoverage, SpecialistCompleteness};
use coverage_matcher::{normalize_catalogue_path, PathMatcher};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Knobs the analyzer rules depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Filename suffix of reference documents checked for pairing
    pub reference_suffix: String,
    /// Ordered layer rules, first match wins
    pub layers: Vec<LayerRule>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            reference_suffix: DEFAULT_REFERENCE_SUFFIX.to_string(),
            layers: default_layer_rules(),
        }
    }
}

/// Per-agent rollup over the finished index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    pub role: Role,
    pub domain: Option<String>,
    pub expected_reference_path: Option<String>,
    /// `None` when the agent has no expected reference
    pub has_reference: Option<bool>,
    pub knowledge_count: usize,
    pub explicit_knowledge_count: usize,
    pub files_known: usize,
    pub files_writable: usize,
    pub files_readable: usize,
}

/// The complete audit result handed to renderers and JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub stats: CoverageStats,
    pub completeness: SpecialistCompleteness,
    pub files: BTreeMap<String, FileCoverage>,
    /// Sorted by name
    pub agents: Vec<AgentSummary>,
    pub pairing: Vec<PairingEntry>,
    pub conflicts: Vec<WriteConflict>,
    pub orphans: Vec<OrphanedFolder>,
    pub layers: Vec<LayerCoverage>,
    pub uncovered_files: Vec<String>,
    pub coordinator_only_files: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

impl CoverageReport {
    pub fn file(&self, path: &str) -> Option<&FileCoverage> {
        self.files.get(&normalize_catalogue_path(path))
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSummary> {
        self.agents
            .binary_search_by(|a| a.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.agents[idx])
    }

    /// True when coverage is at least `threshold` percent.
    pub fn meets_threshold(&self, threshold: u32) -> bool {
        self.stats.coverage_percent >= threshold
    }
}

/// Everything known about one catalogue file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub layer: String,
    #[serde(flatten)]
    pub coverage: FileCoverage,
}

/// The files one agent knows, may write, and may read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReport {
    #[serde(flatten)]
    pub summary: AgentSummary,
    pub known: Vec<String>,
    pub writable: Vec<String>,
    pub readable: Vec<String>,
}

/// Derives every secondary finding from a [`CoverageIndex`].
#[derive(Debug, Clone)]
pub struct CoverageAnalyzer {
    reference_suffix: String,
    classifier: LayerClassifier,
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default(), &PathMatcher::default())
    }
}

impl CoverageAnalyzer {
    pub fn new(config: &AnalyzerConfig, matcher: &PathMatcher) -> Self {
        Self {
            reference_suffix: config.reference_suffix.clone(),
            classifier: LayerClassifier::new(&config.layers, matcher),
        }
    }

    /// Layer classification helper shared with renderers.
    pub fn classifier(&self) -> &LayerClassifier {
        &self.classifier
    }

    pub fn analyze(&self, index: CoverageIndex) -> CoverageReport {
        let pairing = analyze_pairing(&index, &self.reference_suffix);
        let conflicts = detect_conflicts(&index);
        let orphans = detect_orphans(&index);
        let layers = layer_coverage(&index, &self.classifier);
        let uncovered_files: Vec<String> = index.uncovered_files().map(str::to_string).collect();
        let coordinator_only_files = coordinator_only_files(&index);

        let recommendations = recommend(&RuleInputs {
            stats: &index.stats,
            completeness: &index.completeness,
            pairing: &pairing,
            conflicts: &conflicts,
            orphans: &orphans,
            layers: &layers,
            coordinator_only_files: &coordinator_only_files,
        });

        log::info!(
            "Analysis: {} conflicts, {} orphaned folders, {} recommendations",
            conflicts.len(),
            orphans.len(),
            recommendations.len()
        );

        let agents = summarize_agents(&index);
        CoverageReport {
            stats: index.stats,
            completeness: index.completeness,
            files: index.files,
            agents,
            pairing,
            conflicts,
            orphans,
            layers,
            uncovered_files,
            coordinator_only_files,
            recommendations,
        }
    }

    pub fn file_report(&self, report: &CoverageReport, path: &str) -> Option<FileReport> {
        let path = normalize_catalogue_path(path);
        let coverage = report.files.get(&path)?.clone();
        Some(FileReport {
            layer: self.classifier.classify(&path).to_string(),
            path,
            coverage,
        })
    }

    pub fn agent_report(&self, report: &CoverageReport, name: &str) -> Option<AgentReport> {
        let summary = report.agent(name)?.clone();
        let collect = |select: fn(&FileCoverage) -> &BTreeSet<String>| -> Vec<String> {
            report
                .files
                .iter()
                .filter(|(_, coverage)| select(coverage).contains(name))
                .map(|(path, _)| path.clone())
                .collect()
        };
        Some(AgentReport {
            known: collect(|c| &c.known_by),
            writable: collect(|c| &c.writable_by),
            readable: collect(|c| &c.readable_by),
            summary,
        })
    }
}

fn coordinator_only_files(index: &CoverageIndex) -> Vec<String> {
    index
        .files
        .iter()
        .filter(|(_, coverage)| {
            coverage.is_covered()
                && coverage
                    .known_by
                    .iter()
                    .all(|agent| index.role_of(agent) == Some(Role::Coordinator))
        })
        .map(|(path, _)| path.clone())
        .collect()
}

fn summarize_agents(index: &CoverageIndex) -> Vec<AgentSummary> {
    let missing: BTreeSet<&str> = index
        .completeness
        .agents_missing_specs
        .iter()
        .map(|m| m.agent.as_str())
        .collect();

    index
        .agents
        .iter()
        .map(|agent| summarize(agent, index, &missing))
        .collect()
}

fn summarize(agent: &AgentProfile, index: &CoverageIndex, missing: &BTreeSet<&str>) -> AgentSummary {
    let name = agent.name.as_str();
    let count = |select: fn(&FileCoverage) -> &BTreeSet<String>| {
        index
            .files
            .values()
            .filter(|coverage| select(coverage).contains(name))
            .count()
    };
    let has_reference = (agent.role.is_specialist() && agent.expected_reference_path.is_some())
        .then(|| !missing.contains(name));

    AgentSummary {
        name: agent.name.clone(),
        role: agent.role,
        domain: agent.domain.clone(),
        expected_reference_path: agent.expected_reference_path.clone(),
        has_reference,
        knowledge_count: agent.knowledge_count,
        explicit_knowledge_count: agent.explicit_knowledge_count,
        files_known: count(|c| &c.known_by),
        files_writable: count(|c| &c.writable_by),
        files_readable: count(|c| &c.readable_by),
    }
}
