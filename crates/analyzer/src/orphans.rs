use coverage_contract::Role;
use coverage_index::CoverageIndex;
use coverage_matcher::{is_explicit, is_under_prefix, scope_folder, ROOT_FOLDER};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A folder whose files no builder may write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedFolder {
    pub folder: String,
    /// Files directly inside the folder
    pub files: usize,
}

/// Immediate parent folders of catalogue files that no builder scope covers
/// (directly or through an ancestor) and whose files have no writer.
///
/// Only folder and pattern declarations cover folders; an exact file
/// declaration covers just that file. Root-level files have no folder and
/// are never reported.
pub fn detect_orphans(index: &CoverageIndex) -> Vec<OrphanedFolder> {
    let scope_folders: BTreeSet<String> = index
        .agents
        .iter()
        .filter(|a| a.role == Role::Builder)
        .flat_map(|a| a.output_scope.iter())
        .filter(|declaration| !is_explicit(declaration))
        .map(|declaration| scope_folder(declaration))
        .collect();

    // folder -> (direct files, any of them writable)
    let mut folders: BTreeMap<&str, (usize, bool)> = BTreeMap::new();
    for (path, coverage) in &index.files {
        let Some((folder, _)) = path.rsplit_once('/') else {
            continue;
        };
        let entry = folders.entry(folder).or_insert((0, false));
        entry.0 += 1;
        entry.1 |= !coverage.writable_by.is_empty();
    }

    folders
        .into_iter()
        .filter(|(folder, (_, has_writer))| {
            !has_writer && !is_scoped(folder, &scope_folders)
        })
        .map(|(folder, (files, _))| OrphanedFolder {
            folder: folder.to_string(),
            files,
        })
        .collect()
}

fn is_scoped(folder: &str, scope_folders: &BTreeSet<String>) -> bool {
    scope_folders.iter().any(|scope| {
        scope == ROOT_FOLDER || scope == folder || is_under_prefix(scope, folder)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ancestor_scope_covers_nested_folder() {
        let scope = scopes(&["src"]);
        assert!(is_scoped("src", &scope));
        assert!(is_scoped("src/deep/nested", &scope));
        assert!(!is_scoped("srcx", &scope));
        assert!(!is_scoped("legacy", &scope));
    }

    #[test]
    fn root_scope_covers_everything() {
        assert!(is_scoped("legacy", &scopes(&[ROOT_FOLDER])));
    }
}
