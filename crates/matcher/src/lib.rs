//! # Coverage Matcher
//!
//! Decides whether a concrete catalogue path is covered by a path declared in
//! an agent contract.
//!
//! ## Matching order
//!
//! ```text
//! declaration ──> normalize (separators, "./", alias roots)
//!     │
//!     ├──> exact equality
//!     ├──> folder prefix ("dir/" or "dir" + "/")
//!     └──> pattern (brace expansion → globset matchers)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use coverage_matcher::{AliasTable, PathMatcher};
//!
//! let matcher = PathMatcher::new(AliasTable::default());
//! let decl = matcher.compile("docs/**/*.md");
//! assert!(decl.matches("docs/a.md"));
//! assert!(decl.matches("docs/guide/b.md"));
//! assert!(!decl.matches("src/lib.rs"));
//! ```

mod braces;
mod classify;
mod matcher;
mod normalize;

pub use braces::{expand_braces, MAX_BRACE_EXPANSIONS};
pub use classify::{
    classify, has_wildcard, is_explicit, scope_folder, DeclarationKind, ROOT_FOLDER,
};
pub use matcher::{CompiledDeclaration, PathMatcher};
pub use normalize::{
    is_under_prefix, normalize_catalogue_path, normalize_path, AliasRule, AliasTable,
};
