use serde::{Deserialize, Serialize};

/// Folder name used for the catalogue root.
pub const ROOT_FOLDER: &str = ".";

const WILDCARDS: &[char] = &['*', '?', '{'];

/// How a declared path is resolved against the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// A concrete filename with an extension.
    Exact,
    /// A folder prefix, with or without a trailing separator.
    Folder,
    /// Contains `*`, `?` or a `{a,b}` alternation.
    Pattern,
}

impl DeclarationKind {
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, DeclarationKind::Exact)
    }
}

#[must_use]
pub fn has_wildcard(path: &str) -> bool {
    path.contains(WILDCARDS)
}

/// Pure classification of a normalized declaration string; no filesystem access.
#[must_use]
pub fn classify(path: &str) -> DeclarationKind {
    if has_wildcard(path) {
        return DeclarationKind::Pattern;
    }
    if path.is_empty() || path.ends_with('/') {
        return DeclarationKind::Folder;
    }
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.find('.') {
        Some(idx) if idx > 0 => DeclarationKind::Exact,
        _ => DeclarationKind::Folder,
    }
}

#[must_use]
pub fn is_explicit(path: &str) -> bool {
    classify(path).is_explicit()
}

/// Folder a declaration targets, used to group write scopes.
///
/// Patterns resolve to their static leading segments, exact files to their
/// parent, folders to themselves. The catalogue root is [`ROOT_FOLDER`].
#[must_use]
pub fn scope_folder(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let folder = if has_wildcard(trimmed) {
        trimmed
            .split('/')
            .take_while(|seg| !seg.contains(WILDCARDS))
            .collect::<Vec<_>>()
            .join("/")
    } else if classify(trimmed) == DeclarationKind::Exact {
        trimmed
            .rsplit_once('/')
            .map(|(parent, _)| parent.to_string())
            .unwrap_or_default()
    } else {
        trimmed.to_string()
    };

    if folder.is_empty() {
        ROOT_FOLDER.to_string()
    } else {
        folder
    }
}
