use crate::completeness::SpecialistCompleteness;
use crate::stats::CoverageStats;
use coverage_contract::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Agents that know, may write, or may read one catalogue file.
///
/// `known_by` is always the union of the explicit and glob subsets. An agent
/// with both an exact and a pattern declaration for the file appears in both
/// subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub known_by: BTreeSet<String>,
    pub explicitly_known_by: BTreeSet<String>,
    pub glob_known_by: BTreeSet<String>,
    pub writable_by: BTreeSet<String>,
    pub readable_by: BTreeSet<String>,
}

impl FileCoverage {
    pub fn is_covered(&self) -> bool {
        !self.known_by.is_empty()
    }

    pub(crate) fn add_knowledge(&mut self, agent: &str, explicit: bool) {
        self.known_by.insert(agent.to_string());
        if explicit {
            self.explicitly_known_by.insert(agent.to_string());
        } else {
            self.glob_known_by.insert(agent.to_string());
        }
    }
}

/// What the index remembers about each contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub role: Role,
    pub domain: Option<String>,
    pub family: Option<String>,
    pub expected_reference_path: Option<String>,
    pub knowledge_count: usize,
    pub explicit_knowledge_count: usize,

    /// Normalized Can Touch declarations (builders)
    pub output_scope: Vec<String>,

    /// Normalized Can Read declarations (reviewers)
    pub read_scope: Vec<String>,
}

/// Result of [`crate::CoverageIndexBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageIndex {
    pub files: BTreeMap<String, FileCoverage>,
    /// Sorted by name
    pub agents: Vec<AgentProfile>,
    pub stats: CoverageStats,
    pub completeness: SpecialistCompleteness,
}

impl CoverageIndex {
    pub fn file(&self, path: &str) -> Option<&FileCoverage> {
        self.files.get(path)
    }

    pub fn agent(&self, name: &str) -> Option<&AgentProfile> {
        self.agents
            .binary_search_by(|a| a.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.agents[idx])
    }

    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.agent(name).map(|a| a.role)
    }

    pub fn uncovered_files(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(|(_, coverage)| !coverage.is_covered())
            .map(|(path, _)| path.as_str())
    }
}
