use crate::extract::{fenced_paths, front_matter_name, table_paths};
use crate::model::{AgentContract, DomainTable, KnowledgeDeclaration, Role, RoleConventions};
use crate::sections::find_subsection;
use coverage_matcher::{is_explicit, normalize_catalogue_path};

const KNOWLEDGE: &str = "knowledge";
const PRIMARY: &str = "primary";
const ADDITIONAL: &str = "additional";
const SCOPE: &str = "scope";
const CAN_TOUCH: &str = "can touch";
const CAN_READ: &str = "can read";

/// Turns contract documents into [`AgentContract`]s.
///
/// Parsing never fails: absent or malformed sections yield empty lists.
#[derive(Debug, Clone, Default)]
pub struct ContractParser {
    conventions: RoleConventions,
    domains: DomainTable,
}

impl ContractParser {
    pub fn new(conventions: RoleConventions, domains: DomainTable) -> Self {
        Self {
            conventions,
            domains,
        }
    }

    /// Parse one document. `fallback_name` (usually the file stem) is used
    /// when the document has no front-matter `name:`.
    pub fn parse(&self, text: &str, fallback_name: &str) -> AgentContract {
        let name = front_matter_name(text).unwrap_or_else(|| fallback_name.trim().to_string());
        let role = self.conventions.role_of(&name);
        let domain = self.conventions.domain_of(&name);
        let expected_reference_path = domain
            .as_deref()
            .and_then(|d| self.domains.expected_reference(d));

        let lines: Vec<&str> = text.lines().collect();

        let mut knowledge = Vec::new();
        for (keyword, is_primary) in [(PRIMARY, true), (ADDITIONAL, false)] {
            let body = find_subsection(&lines, KNOWLEDGE, keyword);
            knowledge.extend(table_paths(body).into_iter().map(|path| {
                let is_explicit = is_explicit(&normalize_catalogue_path(&path));
                KnowledgeDeclaration {
                    path,
                    is_primary,
                    is_explicit,
                }
            }));
        }

        let can_touch = fenced_paths(find_subsection(&lines, SCOPE, CAN_TOUCH));
        let can_read = fenced_paths(find_subsection(&lines, SCOPE, CAN_READ));

        let output_scope = scope_for(&name, role, Role::Builder, CAN_TOUCH, can_touch);
        let read_scope = scope_for(&name, role, Role::Reviewer, CAN_READ, can_read);

        log::debug!(
            "Parsed contract {name} ({role}): {} knowledge, {} output, {} read",
            knowledge.len(),
            output_scope.len(),
            read_scope.len()
        );

        AgentContract {
            name,
            role,
            domain,
            expected_reference_path,
            knowledge,
            output_scope,
            read_scope,
        }
    }
}

fn scope_for(name: &str, role: Role, owner: Role, label: &str, paths: Vec<String>) -> Vec<String> {
    if role == owner {
        return paths;
    }
    if !paths.is_empty() {
        log::debug!(
            "Ignoring {} `{label}` entries on {role} contract {name}",
            paths.len()
        );
    }
    Vec::new()
}
