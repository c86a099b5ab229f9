use crate::catalogue::FileCatalogue;
use crate::config::AuditConfig;
use anyhow::{Context, Result};
use coverage_analyzer::{CoverageAnalyzer, CoverageReport};
use coverage_contract::{load_contracts_dir, ContractParser};
use coverage_index::CoverageIndexBuilder;
use coverage_matcher::PathMatcher;
use std::path::{Path, PathBuf};

/// One configured audit of a repository root.
pub struct Audit {
    root: PathBuf,
    contracts_dir: PathBuf,
    config: AuditConfig,
    matcher: PathMatcher,
    analyzer: CoverageAnalyzer,
}

impl Audit {
    pub fn prepare(root: &Path, config: Option<&Path>, contracts: Option<&Path>) -> Result<Self> {
        // A missing root still audits, against an empty catalogue.
        let root = match root.canonicalize() {
            Ok(root) => root,
            Err(err) => {
                log::debug!("Cannot resolve project root {}: {err}", root.display());
                root.to_path_buf()
            }
        };
        let config = AuditConfig::load_for_root(&root, config)?;
        let contracts_dir = match contracts {
            Some(dir) => dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf()),
            None => root.join(&config.contracts_dir),
        };
        let matcher = PathMatcher::new(config.alias_table());
        let analyzer = CoverageAnalyzer::new(&config.analyzer_config(), &matcher);

        Ok(Self {
            root,
            contracts_dir,
            config,
            matcher,
            analyzer,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn analyzer(&self) -> &CoverageAnalyzer {
        &self.analyzer
    }

    pub fn run(&self) -> Result<CoverageReport> {
        let parser = ContractParser::new(self.config.conventions(), self.config.domain_table());
        let loaded = load_contracts_dir(&parser, &self.contracts_dir).with_context(|| {
            format!("Failed to load contracts from {}", self.contracts_dir.display())
        })?;
        for failure in &loaded.failures {
            log::warn!("Skipped {}: {}", failure.path.display(), failure.reason);
        }

        let files = FileCatalogue::new(&self.root)
            .with_exclude(self.config.exclude_prefixes(&self.root, &self.contracts_dir))
            .scan();

        let index = CoverageIndexBuilder::new(self.matcher.clone())
            .scope_implies_knowledge(self.config.scope_implies_knowledge)
            .build(&loaded.contracts, &files)
            .with_context(|| {
                format!("No usable contracts in {}", self.contracts_dir.display())
            })?;

        Ok(self.analyzer.analyze(index))
    }
}
