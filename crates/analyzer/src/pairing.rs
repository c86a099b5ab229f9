use coverage_contract::Role;
use coverage_index::CoverageIndex;
use serde::{Deserialize, Serialize};

/// Default filename suffix of reference documents.
pub const DEFAULT_REFERENCE_SUFFIX: &str = ".spec.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStatus {
    Complete,
    MissingReviewer,
    MissingBuilder,
    MissingBoth,
}

impl PairingStatus {
    fn from_presence(has_builder: bool, has_reviewer: bool) -> Self {
        match (has_builder, has_reviewer) {
            (true, true) => PairingStatus::Complete,
            (true, false) => PairingStatus::MissingReviewer,
            (false, true) => PairingStatus::MissingBuilder,
            (false, false) => PairingStatus::MissingBoth,
        }
    }

    pub const fn lacks_reviewer(self) -> bool {
        matches!(self, PairingStatus::MissingReviewer | PairingStatus::MissingBoth)
    }

    pub const fn lacks_builder(self) -> bool {
        matches!(self, PairingStatus::MissingBuilder | PairingStatus::MissingBoth)
    }
}

/// Builder/reviewer pairing for one reference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingEntry {
    pub path: String,
    pub builders: Vec<String>,
    pub reviewers: Vec<String>,
    pub status: PairingStatus,
}

/// Pairing status of every catalogue file ending in `reference_suffix`,
/// sorted by path.
pub fn analyze_pairing(index: &CoverageIndex, reference_suffix: &str) -> Vec<PairingEntry> {
    if reference_suffix.is_empty() {
        return Vec::new();
    }

    index
        .files
        .iter()
        .filter(|(path, _)| path.ends_with(reference_suffix))
        .map(|(path, coverage)| {
            let with_role = |role: Role| -> Vec<String> {
                coverage
                    .known_by
                    .iter()
                    .filter(|agent| index.role_of(agent) == Some(role))
                    .cloned()
                    .collect()
            };
            let builders = with_role(Role::Builder);
            let reviewers = with_role(Role::Reviewer);
            let status = PairingStatus::from_presence(!builders.is_empty(), !reviewers.is_empty());
            PairingEntry {
                path: path.clone(),
                builders,
                reviewers,
                status,
            }
        })
        .collect()
}
