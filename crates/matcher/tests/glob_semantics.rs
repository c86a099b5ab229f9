use coverage_matcher::{classify, AliasRule, AliasTable, DeclarationKind, PathMatcher};
use proptest::prelude::*;

fn matcher() -> PathMatcher {
    PathMatcher::new(AliasTable::default())
}

#[test]
fn single_star_does_not_cross_folders() {
    let decl = matcher().compile("dir/*.md");
    assert!(decl.matches("dir/a.md"));
    assert!(!decl.matches("dir/sub/a.md"));
}

#[test]
fn double_star_matches_any_depth() {
    let decl = matcher().compile("dir/**/*.md");
    assert!(decl.matches("dir/a.md"));
    assert!(decl.matches("dir/sub/a.md"));
    assert!(!decl.matches("other/a.md"));
}

#[test]
fn brace_expansion_matches_exactly_the_alternatives() {
    let decl = matcher().compile("a/{b,c}/x.md");
    let catalogue = [
        "a/b/x.md",
        "a/c/x.md",
        "a/bc/x.md",
        "a/b/y.md",
        "a/x.md",
        "b/x.md",
    ];
    let hits: Vec<_> = catalogue
        .iter()
        .copied()
        .filter(|f| decl.matches(f))
        .collect();
    assert_eq!(hits, vec!["a/b/x.md", "a/c/x.md"]);
}

#[test]
fn windows_separators_in_declarations_are_normalized() {
    let decl = matcher().compile(".\\docs\\**\\*.md");
    assert!(decl.matches("docs/guide/intro.md"));
}

#[test]
fn unmatched_alias_root_resolves_to_nothing() {
    let matcher = PathMatcher::new(AliasTable::new(vec![AliasRule {
        alias: "kb".to_string(),
        canonical: "knowledge-base".to_string(),
    }]));
    let decl = matcher.compile("kb/content/widget.spec.md");
    assert_eq!(decl.normalized(), "knowledge-base/content/widget.spec.md");
    assert!(!decl.matches("kb/content/widget.spec.md"));
}

proptest! {
    #[test]
    fn proptest_folder_declaration_covers_every_descendant(
        folder in "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        tail in "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.[a-z]{1,3}",
    ) {
        let decl = matcher().compile(&format!("{folder}/"));
        let file = format!("{folder}/{tail}");
        prop_assert!(decl.matches(&file));
        let sibling = format!("{folder}x/{tail}");
        prop_assert!(!decl.matches(&sibling));
    }

    #[test]
    fn proptest_single_star_never_crosses_separator(
        dir in "[a-z]{1,8}",
        sub in "[a-z]{1,8}",
        name in "[a-z]{1,8}",
    ) {
        let decl = matcher().compile(&format!("{dir}/*.md"));
        let direct = format!("{dir}/{name}.md");
        let nested = format!("{dir}/{sub}/{name}.md");
        prop_assert!(decl.matches(&direct));
        prop_assert!(!decl.matches(&nested));
    }

    #[test]
    fn proptest_explicit_declarations_match_only_themselves(
        path in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.[a-z]{1,4}",
        other in "[a-z]{1,8}\\.[a-z]{1,4}",
    ) {
        prop_assert_eq!(classify(&path), DeclarationKind::Exact);
        let decl = matcher().compile(&path);
        prop_assert!(decl.matches(&path));
        prop_assert_eq!(decl.matches(&other), path == other);
    }
}
