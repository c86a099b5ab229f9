use anyhow::{Context, Result};
use coverage_analyzer::{default_layer_rules, AnalyzerConfig, LayerRule, OTHER_LAYER};
use coverage_contract::{DomainTable, RoleConventions, DEFAULT_REFERENCE_TEMPLATE};
use coverage_matcher::{normalize_catalogue_path, AliasRule, AliasTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the audited root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "agent-coverage.toml";

/// Settings for one audit run, read from `agent-coverage.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Directory holding contract documents, relative to the root
    pub contracts_dir: PathBuf,

    pub builder_suffix: String,
    pub reviewer_suffix: String,

    /// Filename suffix identifying reference documents
    pub reference_suffix: String,

    /// Expected reference path; `{category}` and `{domain}` are substituted
    pub reference_template: String,

    /// Domain → category folder
    pub domains: BTreeMap<String, String>,

    pub aliases: Vec<AliasRule>,

    /// Ordered layer rules (first match wins)
    pub layers: Vec<LayerRule>,

    /// Count Can Touch / Can Read declarations as knowledge
    pub scope_implies_knowledge: bool,

    /// Catalogue prefixes to skip; defaults to the contracts directory
    pub exclude: Option<Vec<String>>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        let conventions = RoleConventions::default();
        let analyzer = AnalyzerConfig::default();
        Self {
            contracts_dir: PathBuf::from(".agents"),
            builder_suffix: conventions.builder_suffix,
            reviewer_suffix: conventions.reviewer_suffix,
            reference_suffix: analyzer.reference_suffix,
            reference_template: DEFAULT_REFERENCE_TEMPLATE.to_string(),
            domains: DomainTable::default().categories,
            aliases: Vec::new(),
            layers: default_layer_rules(),
            scope_implies_knowledge: true,
            exclude: None,
        }
    }
}

impl AuditConfig {
    /// `explicit` must exist; otherwise `<root>/agent-coverage.toml` is used
    /// when present, defaults when not.
    pub fn load_for_root(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    Self::load(&candidate)?
                } else {
                    log::debug!("No {CONFIG_FILE_NAME} in {}, using defaults", root.display());
                    Self::default()
                }
            }
        };
        config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid audit configuration")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.builder_suffix.is_empty() || self.reviewer_suffix.is_empty() {
            return Err("builder_suffix and reviewer_suffix must not be empty".to_string());
        }

        if self.builder_suffix == self.reviewer_suffix {
            return Err(format!(
                "builder_suffix and reviewer_suffix must differ (both are `{}`)",
                self.builder_suffix
            ));
        }

        if !self.reference_template.contains("{domain}")
            && !self.reference_template.contains("{category}")
        {
            return Err(format!(
                "reference_template `{}` must contain {{domain}} or {{category}}",
                self.reference_template
            ));
        }

        for layer in &self.layers {
            let name = layer.name.trim();
            if name.is_empty() {
                return Err("layer names must not be empty".to_string());
            }
            if name == OTHER_LAYER {
                return Err(format!("layer name `{OTHER_LAYER}` is reserved"));
            }
        }

        for alias in &self.aliases {
            if alias.alias.trim().is_empty() || alias.canonical.trim().is_empty() {
                return Err("alias and canonical roots must not be empty".to_string());
            }
        }

        Ok(())
    }

    pub fn conventions(&self) -> RoleConventions {
        RoleConventions {
            builder_suffix: self.builder_suffix.clone(),
            reviewer_suffix: self.reviewer_suffix.clone(),
        }
    }

    pub fn domain_table(&self) -> DomainTable {
        DomainTable {
            categories: self.domains.clone(),
            reference_template: self.reference_template.clone(),
        }
    }

    pub fn alias_table(&self) -> AliasTable {
        AliasTable::new(self.aliases.clone())
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            reference_suffix: self.reference_suffix.clone(),
            layers: self.layers.clone(),
        }
    }

    /// Catalogue prefixes to skip, normalized.
    ///
    /// Without an explicit `exclude` list this is the resolved contracts
    /// directory, when it lies inside `root`.
    pub fn exclude_prefixes(&self, root: &Path, contracts_dir: &Path) -> Vec<String> {
        match &self.exclude {
            Some(prefixes) => prefixes
                .iter()
                .map(|p| normalize_catalogue_path(p))
                .filter(|p| !p.is_empty())
                .collect(),
            None => contracts_prefix(root, contracts_dir).into_iter().collect(),
        }
    }
}

fn contracts_prefix(root: &Path, contracts_dir: &Path) -> Option<String> {
    let resolved = contracts_dir
        .canonicalize()
        .unwrap_or_else(|_| contracts_dir.to_path_buf());
    let relative = resolved.strip_prefix(root).ok()?;
    let prefix = normalize_catalogue_path(&relative.to_string_lossy());
    if prefix.is_empty() {
        None
    } else {
        Some(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = AuditConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.exclude_prefixes(Path::new("/repo"), Path::new("/repo/.agents")),
            vec![".agents"]
        );
        assert_eq!(config.domains.get("widget").map(String::as_str), Some("content"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AuditConfig = toml::from_str(
            r#"
            contracts_dir = "contracts"
            exclude = ["vendor/", "./target"]

            [domains]
            billing = "finance"

            [[aliases]]
            alias = "web"
            canonical = "apps/web"

            [[layers]]
            name = "App"
            patterns = ["apps/**"]
            "#,
        )
        .unwrap();

        assert_eq!(config.builder_suffix, "-builder");
        assert_eq!(config.contracts_dir, PathBuf::from("contracts"));
        assert_eq!(
            config.exclude_prefixes(Path::new("/repo"), Path::new("/repo/contracts")),
            vec!["vendor/", "target"]
        );
        assert_eq!(
            config.domain_table().expected_reference("billing").as_deref(),
            Some("finance/billing.spec.md")
        );
        assert_eq!(config.alias_table().rules().len(), 1);
        assert_eq!(config.analyzer_config().layers.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_exclusion_follows_the_resolved_contracts_dir() {
        let config = AuditConfig::default();
        let root = Path::new("/repo");
        assert_eq!(
            config.exclude_prefixes(root, Path::new("/repo/team/agents/")),
            vec!["team/agents"]
        );
        assert!(config
            .exclude_prefixes(root, Path::new("/elsewhere/agents"))
            .is_empty());
        assert!(config.exclude_prefixes(root, root).is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<AuditConfig>("contract_dir = \"x\"").is_err());
    }

    #[test]
    fn validation_errors() {
        let mut config = AuditConfig {
            reviewer_suffix: "-builder".to_string(),
            ..AuditConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("must differ"));

        config = AuditConfig {
            reference_template: "docs/reference.md".to_string(),
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());

        config = AuditConfig {
            layers: vec![LayerRule::new(OTHER_LAYER, &["**"])],
            ..AuditConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("reserved"));

        config = AuditConfig {
            aliases: vec![AliasRule {
                alias: " ".to_string(),
                canonical: "apps".to_string(),
            }],
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AuditConfig::load_for_root(dir.path(), Some(&missing)).is_err());
        assert_eq!(
            AuditConfig::load_for_root(dir.path(), None).unwrap(),
            AuditConfig::default()
        );
    }
}
