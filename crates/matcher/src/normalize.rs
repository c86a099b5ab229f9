use serde::{Deserialize, Serialize};

/// One root rewrite: paths under `alias` are treated as paths under `canonical`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub alias: String,
    pub canonical: String,
}

/// Caller-supplied root alias table, applied once during normalization.
///
/// Rules are tried in declaration order and the first matching alias wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    rules: Vec<AliasRule>,
}

impl AliasTable {
    pub fn new(rules: Vec<AliasRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter_map(|rule| {
                let alias = trim_root(&rule.alias);
                if alias.is_empty() {
                    log::debug!("Ignoring empty alias root -> {}", rule.canonical);
                    return None;
                }
                Some(AliasRule {
                    alias,
                    canonical: trim_root(&rule.canonical),
                })
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[AliasRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite the alias root of an already separator-normalized path.
    fn rewrite(&self, path: &str) -> Option<String> {
        for rule in &self.rules {
            if path == rule.alias {
                return Some(rule.canonical.clone());
            }
            if is_under_prefix(&rule.alias, path) {
                let rest = &path[rule.alias.len() + 1..];
                if rule.canonical.is_empty() {
                    return Some(rest.to_string());
                }
                return Some(format!("{}/{rest}", rule.canonical));
            }
        }
        None
    }
}

/// Normalize a declared or catalogue path.
///
/// Backslashes become `/`, surrounding whitespace and leading `./` are
/// stripped, and the first matching alias root is rewritten. A trailing `/`
/// is preserved because it marks a folder declaration.
pub fn normalize_path(raw: &str, aliases: &AliasTable) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    match aliases.rewrite(&value) {
        Some(rewritten) => rewritten,
        None => value,
    }
}

/// Normalize a catalogue path. Catalogue paths are canonical, so no alias
/// rewrite is applied.
pub fn normalize_catalogue_path(raw: &str) -> String {
    normalize_path(raw, &AliasTable::default())
}

/// True when `path` lies strictly below the folder `prefix`.
pub fn is_under_prefix(prefix: &str, path: &str) -> bool {
    if !path.starts_with(prefix) {
        return false;
    }
    path.as_bytes().get(prefix.len()) == Some(&b'/')
}

fn trim_root(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    value.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> AliasTable {
        AliasTable::new(vec![AliasRule {
            alias: "specs/".to_string(),
            canonical: "./catalogue/specs".to_string(),
        }])
    }

    #[test]
    fn converts_separators_and_strips_dot_prefix() {
        let table = AliasTable::default();
        assert_eq!(normalize_path(".\\src\\lib.rs", &table), "src/lib.rs");
        assert_eq!(normalize_path("././docs/", &table), "docs/");
        assert_eq!(normalize_path("  README.md ", &table), "README.md");
    }

    #[test]
    fn rewrites_alias_root_only_on_segment_boundary() {
        let table = aliases();
        assert_eq!(
            normalize_path("specs/content/widget.spec.md", &table),
            "catalogue/specs/content/widget.spec.md"
        );
        assert_eq!(normalize_path("specs", &table), "catalogue/specs");
        assert_eq!(normalize_path("specs2/a.md", &table), "specs2/a.md");
    }

    #[test]
    fn preserves_trailing_separator_through_alias() {
        assert_eq!(
            normalize_path("./specs/content/", &aliases()),
            "catalogue/specs/content/"
        );
    }

    #[test]
    fn empty_alias_roots_are_dropped() {
        let table = AliasTable::new(vec![AliasRule {
            alias: "./".to_string(),
            canonical: "x".to_string(),
        }]);
        assert!(table.is_empty());
    }

    #[test]
    fn prefix_match_requires_separator() {
        assert!(is_under_prefix("src", "src/lib.rs"));
        assert!(!is_under_prefix("src", "src"));
        assert!(!is_under_prefix("src", "src2/lib.rs"));
    }
}
