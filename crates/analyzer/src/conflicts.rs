use coverage_contract::Role;
use coverage_index::{AgentProfile, CoverageIndex};
use coverage_matcher::scope_folder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictRisk {
    Low,
    Medium,
    High,
}

/// A folder that more than one builder may write to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConflict {
    pub folder: String,
    pub builders: Vec<String>,
    pub risk: ConflictRisk,
}

/// Group builder output scopes by target folder and report every folder
/// claimed by two or more builders, sorted by folder.
pub fn detect_conflicts(index: &CoverageIndex) -> Vec<WriteConflict> {
    let mut by_folder: BTreeMap<String, Builders<'_>> = BTreeMap::new();
    for agent in index.agents.iter().filter(|a| a.role == Role::Builder) {
        for declaration in &agent.output_scope {
            by_folder
                .entry(scope_folder(declaration))
                .or_default()
                .insert(agent.name.as_str(), agent);
        }
    }

    by_folder
        .into_iter()
        .filter(|(_, builders)| builders.len() > 1)
        .map(|(folder, builders)| {
            let risk = classify_risk(&builders);
            log::debug!("Write conflict on {folder}: {} builders ({risk:?})", builders.len());
            WriteConflict {
                folder,
                builders: builders.keys().map(|name| name.to_string()).collect(),
                risk,
            }
        })
        .collect()
}

type Builders<'a> = BTreeMap<&'a str, &'a AgentProfile>;

fn classify_risk(builders: &Builders<'_>) -> ConflictRisk {
    let families: BTreeSet<Option<&str>> =
        builders.values().map(|a| a.family.as_deref()).collect();
    let same_family = families.len() == 1 && !families.contains(&None);

    if same_family {
        ConflictRisk::Low
    } else if builders.len() > 2 {
        ConflictRisk::High
    } else {
        ConflictRisk::Medium
    }
}
