use crate::stats::percent;
use coverage_contract::{AgentContract, Role};
use coverage_matcher::PathMatcher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCompleteness {
    /// Specialists with an expected reference path
    pub total: usize,
    /// Of those, how many list it as Primary explicit knowledge
    pub with_reference: usize,
    pub percent: u32,
}

impl RoleCompleteness {
    fn record(&mut self, has_reference: bool) {
        self.total += 1;
        if has_reference {
            self.with_reference += 1;
        }
        self.percent = percent(self.with_reference, self.total);
    }
}

/// A specialist whose Primary knowledge lacks its domain reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReference {
    pub agent: String,
    pub role: Role,
    pub expected_reference_path: String,
    /// What the agent lists as Primary explicit knowledge instead
    pub primary_explicit_knowledge: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistCompleteness {
    pub builders: RoleCompleteness,
    pub reviewers: RoleCompleteness,
    pub combined: RoleCompleteness,
    /// Sorted by agent name
    pub agents_missing_specs: Vec<MissingReference>,
}

impl SpecialistCompleteness {
    pub fn from_contracts(contracts: &[AgentContract], matcher: &PathMatcher) -> Self {
        let mut completeness = Self::default();

        for contract in contracts {
            let bucket = match contract.role {
                Role::Builder => &mut completeness.builders,
                Role::Reviewer => &mut completeness.reviewers,
                Role::Coordinator => continue,
            };
            let Some(expected) = contract.expected_reference_path.as_deref() else {
                continue;
            };

            let has_reference = has_required_reference(contract, expected, matcher);
            bucket.record(has_reference);
            completeness.combined.record(has_reference);

            if !has_reference {
                completeness.agents_missing_specs.push(MissingReference {
                    agent: contract.name.clone(),
                    role: contract.role,
                    expected_reference_path: expected.to_string(),
                    primary_explicit_knowledge: contract
                        .primary_explicit_paths()
                        .map(str::to_string)
                        .collect(),
                });
            }
        }

        completeness
            .agents_missing_specs
            .sort_by(|a, b| a.agent.cmp(&b.agent));
        completeness
    }
}

/// Primary explicit knowledge equals the expected path, or shares its final
/// segment. Comparison is ASCII case-insensitive.
pub fn has_required_reference(
    contract: &AgentContract,
    expected: &str,
    matcher: &PathMatcher,
) -> bool {
    let expected = matcher.normalize(expected).to_ascii_lowercase();
    let expected_name = final_segment(&expected);

    contract.primary_explicit_paths().any(|path| {
        let path = matcher.normalize(path).to_ascii_lowercase();
        path == expected || final_segment(&path) == expected_name
    })
}

fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
