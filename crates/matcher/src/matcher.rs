use crate::braces::expand_braces;
use crate::classify::{classify, DeclarationKind};
use crate::normalize::{is_under_prefix, normalize_catalogue_path, normalize_path, AliasTable};
use globset::{GlobBuilder, GlobMatcher};

/// Resolves declared paths against catalogue paths.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    aliases: AliasTable,
}

impl PathMatcher {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        normalize_path(raw, &self.aliases)
    }

    /// Normalize and classify a declaration once so it can be tested
    /// against many files.
    pub fn compile(&self, raw: &str) -> CompiledDeclaration {
        let normalized = self.normalize(raw);
        let kind = classify(&normalized);
        let patterns = if kind == DeclarationKind::Pattern {
            compile_patterns(&normalized)
        } else {
            Vec::new()
        };
        CompiledDeclaration {
            normalized,
            kind,
            patterns,
        }
    }

    /// One-shot convenience over [`PathMatcher::compile`].
    pub fn matches(&self, declaration: &str, file: &str) -> bool {
        self.compile(declaration).matches(&normalize_catalogue_path(file))
    }
}

/// A declaration ready for repeated matching.
#[derive(Debug, Clone)]
pub struct CompiledDeclaration {
    normalized: String,
    kind: DeclarationKind,
    patterns: Vec<GlobMatcher>,
}

impl CompiledDeclaration {
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn is_explicit(&self) -> bool {
        self.kind.is_explicit()
    }

    /// Test a normalized catalogue path: exact, then folder, then pattern.
    ///
    /// Pattern declarations only match through their expanded globs, so the
    /// literal pattern text never matches a file of the same name.
    pub fn matches(&self, file: &str) -> bool {
        if self.normalized.is_empty() {
            return false;
        }
        if self.kind == DeclarationKind::Pattern {
            return self.patterns.iter().any(|glob| glob.is_match(file));
        }
        if self.normalized == file {
            return true;
        }

        is_under_prefix(self.normalized.trim_end_matches('/'), file)
    }
}

fn compile_patterns(normalized: &str) -> Vec<GlobMatcher> {
    // "dir/*/" covers everything below each matched folder.
    let source = if normalized.ends_with('/') {
        format!("{normalized}**")
    } else {
        normalized.to_string()
    };

    expand_braces(&source)
        .iter()
        .filter_map(|pattern| compile_glob(pattern))
        .collect()
}

/// Leftover braces and unbalanced classes fall back to a literal match.
fn compile_glob(pattern: &str) -> Option<GlobMatcher> {
    match build_glob(pattern) {
        Ok(glob) => Some(glob),
        Err(err) => {
            log::debug!("Pattern `{pattern}` is not a valid glob ({err}); matching it literally");
            match build_glob(&globset::escape(pattern)) {
                Ok(glob) => Some(glob),
                Err(err) => {
                    log::warn!("Pattern `{pattern}` could not be compiled, matching nothing: {err}");
                    None
                }
            }
        }
    }
}

fn build_glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::AliasRule;

    fn matcher() -> PathMatcher {
        PathMatcher::default()
    }

    #[test]
    fn exact_declaration_matches_only_itself() {
        let decl = matcher().compile("./content/widget.spec.md");
        assert!(decl.is_explicit());
        assert!(decl.matches("content/widget.spec.md"));
        assert!(!decl.matches("content/widget.spec.md.bak"));
    }

    #[test]
    fn folder_declaration_matches_descendants() {
        for raw in ["content/", "content", "./content/"] {
            let decl = matcher().compile(raw);
            assert_eq!(decl.kind(), DeclarationKind::Folder, "{raw}");
            assert!(decl.matches("content/widget.ts"), "{raw}");
            assert!(decl.matches("content/deep/widget.ts"), "{raw}");
            assert!(!decl.matches("contents/widget.ts"), "{raw}");
        }
    }

    #[test]
    fn brace_pattern_matches_exact_alternatives() {
        let decl = matcher().compile("a/{b,c}/x.md");
        assert!(decl.matches("a/b/x.md"));
        assert!(decl.matches("a/c/x.md"));
        assert!(!decl.matches("a/d/x.md"));
        assert!(!decl.matches("a/b/c/x.md"));
        assert!(!decl.matches("a/{b,c}/x.md"));
    }

    #[test]
    fn trailing_separator_pattern_covers_subtree() {
        let decl = matcher().compile("packages/*/");
        assert!(decl.matches("packages/core/src/lib.rs"));
        assert!(!decl.matches("apps/web/index.ts"));
    }

    #[test]
    fn double_star_inside_segment_acts_like_single() {
        let decl = matcher().compile("a**b/x");
        assert!(decl.matches("aZZb/x"));
        assert!(!decl.matches("a/b/x"));
    }

    #[test]
    fn question_mark_is_one_char_within_a_segment() {
        let decl = matcher().compile("v?.md");
        assert!(decl.matches("v1.md"));
        assert!(!decl.matches("v10.md"));
        assert!(!matcher().compile("a?b").matches("a/b"));
    }

    #[test]
    fn nested_braces_match_literally() {
        let decl = matcher().compile("x/{a,{b}}.md");
        assert_eq!(decl.kind(), DeclarationKind::Pattern);
        assert!(decl.matches("x/{a,{b}}.md"));
        assert!(!decl.matches("x/a.md"));
        assert!(!decl.matches("x/b.md"));
    }

    #[test]
    fn unclosed_brace_matches_literally() {
        let decl = matcher().compile("notes/{draft.md");
        assert!(decl.matches("notes/{draft.md"));
        assert!(!decl.matches("notes/draft.md"));
    }

    #[test]
    fn patterns_are_anchored() {
        assert!(!matcher().compile("*.md").matches("dir/a.md"));
        assert!(!matcher().compile("dir/*.md").matches("prefix/dir/a.md"));
        assert!(!matcher().compile("dir/*.md").matches("dir/a.mdx"));
    }

    #[test]
    fn empty_declaration_matches_nothing() {
        let decl = matcher().compile("./");
        assert!(!decl.matches("README.md"));
        assert!(!decl.matches("src/lib.rs"));
    }

    #[test]
    fn alias_roots_are_rewritten_before_matching() {
        let matcher = PathMatcher::new(AliasTable::new(vec![AliasRule {
            alias: "specs".to_string(),
            canonical: "catalogue/specs".to_string(),
        }]));
        assert!(matcher.matches(
            "specs/**/*.spec.md",
            "catalogue/specs/content/widget.spec.md"
        ));
        assert!(!matcher.matches(
            "specs/**/*.spec.md",
            "specs/content/widget.spec.md"
        ));
    }
}
