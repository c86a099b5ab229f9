use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Role of a contract, inferred from its name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Builder,
    Reviewer,
    Coordinator,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Builder => "builder",
            Role::Reviewer => "reviewer",
            Role::Coordinator => "coordinator",
        }
    }

    pub const fn is_specialist(self) -> bool {
        matches!(self, Role::Builder | Role::Reviewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One path entry from a contract's Primary or Additional knowledge table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDeclaration {
    /// Path exactly as written in the contract
    pub path: String,

    /// Declared under "Primary" rather than "Additional"
    pub is_primary: bool,

    /// Concrete filename with an extension and no wildcard
    pub is_explicit: bool,
}

/// One parsed contract document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContract {
    pub name: String,
    pub role: Role,
    pub domain: Option<String>,
    pub expected_reference_path: Option<String>,
    pub knowledge: Vec<KnowledgeDeclaration>,

    /// Can Touch paths; only populated for builders
    pub output_scope: Vec<String>,

    /// Can Read paths; only populated for reviewers
    pub read_scope: Vec<String>,
}

impl AgentContract {
    /// Primary knowledge entries that name a concrete file.
    pub fn primary_explicit_paths(&self) -> impl Iterator<Item = &str> {
        self.knowledge
            .iter()
            .filter(|k| k.is_primary && k.is_explicit)
            .map(|k| k.path.as_str())
    }

    /// Leading token of the domain, used to group related agents.
    pub fn family(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .and_then(|domain| domain.split('-').next())
            .filter(|token| !token.is_empty())
    }
}

/// Naming conventions that map contract names to roles and domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConventions {
    pub builder_suffix: String,
    pub reviewer_suffix: String,
}

impl Default for RoleConventions {
    fn default() -> Self {
        Self {
            builder_suffix: "-builder".to_string(),
            reviewer_suffix: "-reviewer".to_string(),
        }
    }
}

impl RoleConventions {
    pub fn role_of(&self, name: &str) -> Role {
        if name.ends_with(&self.builder_suffix) {
            Role::Builder
        } else if name.ends_with(&self.reviewer_suffix) {
            Role::Reviewer
        } else {
            Role::Coordinator
        }
    }

    /// Strip the role suffix; coordinators have no domain.
    pub fn domain_of(&self, name: &str) -> Option<String> {
        let suffix = match self.role_of(name) {
            Role::Builder => &self.builder_suffix,
            Role::Reviewer => &self.reviewer_suffix,
            Role::Coordinator => return None,
        };
        name.strip_suffix(suffix.as_str())
            .filter(|domain| !domain.is_empty())
            .map(str::to_string)
    }
}

/// Fixed domain → category table plus the template for reference paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTable {
    pub categories: BTreeMap<String, String>,

    /// `{category}` and `{domain}` are substituted
    pub reference_template: String,
}

pub const DEFAULT_REFERENCE_TEMPLATE: &str = "{category}/{domain}.spec.md";

impl Default for DomainTable {
    fn default() -> Self {
        let categories = [("widget", "content"), ("driver", "experience")]
            .into_iter()
            .map(|(domain, category)| (domain.to_string(), category.to_string()))
            .collect();
        Self {
            categories,
            reference_template: DEFAULT_REFERENCE_TEMPLATE.to_string(),
        }
    }
}

impl DomainTable {
    pub fn category_of(&self, domain: &str) -> Option<&str> {
        self.categories.get(domain).map(String::as_str)
    }

    pub fn expected_reference(&self, domain: &str) -> Option<String> {
        let category = self.category_of(domain)?;
        Some(
            self.reference_template
                .replace("{category}", category)
                .replace("{domain}", domain),
        )
    }
}
