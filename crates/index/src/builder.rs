use crate::completeness::SpecialistCompleteness;
use crate::coverage::{AgentProfile, CoverageIndex, FileCoverage};
use crate::error::{IndexError, Result};
use crate::stats::CoverageStats;
use coverage_contract::{AgentContract, Role};
use coverage_matcher::{normalize_catalogue_path, CompiledDeclaration, PathMatcher};
use std::collections::{BTreeMap, BTreeSet};

/// Builds the per-file coverage index from contracts and a file catalogue.
#[derive(Debug, Clone)]
pub struct CoverageIndexBuilder {
    matcher: PathMatcher,
    scope_implies_knowledge: bool,
}

impl Default for CoverageIndexBuilder {
    fn default() -> Self {
        Self::new(PathMatcher::default())
    }
}

impl CoverageIndexBuilder {
    pub fn new(matcher: PathMatcher) -> Self {
        Self {
            matcher,
            scope_implies_knowledge: true,
        }
    }

    /// When enabled (the default), a builder's Can Touch and a reviewer's
    /// Can Read declarations also count as knowledge of the matched files.
    #[must_use]
    pub fn scope_implies_knowledge(mut self, enabled: bool) -> Self {
        self.scope_implies_knowledge = enabled;
        self
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    /// Resolve every declaration against `files`.
    ///
    /// Only catalogue files are indexed; a declaration that would match a
    /// path outside the catalogue has no effect. An empty contract set is
    /// an error, an empty catalogue is not.
    pub fn build(&self, contracts: &[AgentContract], files: &[String]) -> Result<CoverageIndex> {
        if contracts.is_empty() {
            return Err(IndexError::NoContracts);
        }

        let mut coverage: BTreeMap<String, FileCoverage> = files
            .iter()
            .map(|f| (normalize_catalogue_path(f), FileCoverage::default()))
            .collect();

        let mut agents = Vec::with_capacity(contracts.len());
        for contract in contracts {
            self.apply_contract(contract, &mut coverage);
            agents.push(self.profile(contract));
        }
        agents.sort_by(|a, b| a.name.cmp(&b.name));

        let stats = CoverageStats::from_files(&coverage);
        let completeness = SpecialistCompleteness::from_contracts(contracts, &self.matcher);

        log::info!(
            "Indexed {} files against {} contracts: {}% covered ({}% explicit)",
            stats.total_files,
            contracts.len(),
            stats.coverage_percent,
            stats.explicit_percent
        );

        Ok(CoverageIndex {
            files: coverage,
            agents,
            stats,
            completeness,
        })
    }

    fn apply_contract(
        &self,
        contract: &AgentContract,
        coverage: &mut BTreeMap<String, FileCoverage>,
    ) {
        let agent = contract.name.as_str();

        for knowledge in &contract.knowledge {
            let decl = self.matcher.compile(&knowledge.path);
            let hits = for_each_match(&decl, coverage, |file| {
                file.add_knowledge(agent, knowledge.is_explicit);
            });
            log::debug!("{agent}: knowledge `{}` matched {hits} files", knowledge.path);
        }

        let (scope, label, target) = match contract.role {
            Role::Builder => (contract.output_scope.as_slice(), "output", writers as AgentSet),
            Role::Reviewer => (contract.read_scope.as_slice(), "read", readers as AgentSet),
            Role::Coordinator => return,
        };
        let implies_knowledge = self.scope_implies_knowledge;
        for raw in scope {
            let decl = self.matcher.compile(raw);
            let explicit = decl.is_explicit();
            let hits = for_each_match(&decl, coverage, |file| {
                target(file).insert(agent.to_string());
                if implies_knowledge {
                    file.add_knowledge(agent, explicit);
                }
            });
            log::debug!("{agent}: {label} scope `{raw}` matched {hits} files");
        }
    }

    fn profile(&self, contract: &AgentContract) -> AgentProfile {
        let normalize = |paths: &[String]| -> Vec<String> {
            paths.iter().map(|p| self.matcher.normalize(p)).collect()
        };
        AgentProfile {
            name: contract.name.clone(),
            role: contract.role,
            domain: contract.domain.clone(),
            family: contract.family().map(str::to_string),
            expected_reference_path: contract.expected_reference_path.clone(),
            knowledge_count: contract.knowledge.len(),
            explicit_knowledge_count: contract.knowledge.iter().filter(|k| k.is_explicit).count(),
            output_scope: normalize(&contract.output_scope),
            read_scope: normalize(&contract.read_scope),
        }
    }
}

type AgentSet = fn(&mut FileCoverage) -> &mut BTreeSet<String>;

fn writers(file: &mut FileCoverage) -> &mut BTreeSet<String> {
    &mut file.writable_by
}

fn readers(file: &mut FileCoverage) -> &mut BTreeSet<String> {
    &mut file.readable_by
}

fn for_each_match(
    decl: &CompiledDeclaration,
    coverage: &mut BTreeMap<String, FileCoverage>,
    mut apply: impl FnMut(&mut FileCoverage),
) -> usize {
    let mut hits = 0;
    for (path, file) in coverage.iter_mut() {
        if decl.matches(path) {
            apply(file);
            hits += 1;
        }
    }
    hits
}
