use coverage_matcher::is_under_prefix;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Lists the files an audit runs against
pub struct FileCatalogue {
    root: PathBuf,
    exclude: Vec<String>,
}

impl FileCatalogue {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: Vec::new(),
        }
    }

    /// Skip catalogue paths equal to or below any of `prefixes`.
    #[must_use]
    pub fn with_exclude(mut self, prefixes: Vec<String>) -> Self {
        self.exclude = prefixes
            .into_iter()
            .map(|p| p.trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Root-relative, `/`-separated file paths, sorted (.gitignore aware).
    ///
    /// A missing root yields an empty catalogue.
    pub fn scan(&self) -> Vec<String> {
        if !self.root.is_dir() {
            log::warn!("Catalogue root {} does not exist", self.root.display());
            return Vec::new();
        }

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false);

        let mut files = Vec::new();
        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    let Some(relative) = self.relative(entry.path()) else {
                        continue;
                    };
                    if self.is_excluded(&relative) {
                        log::debug!("Excluding {relative}");
                        continue;
                    }
                    files.push(relative);
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} files under {}", files.len(), self.root.display());
        files
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        (!segments.is_empty()).then(|| segments.join("/"))
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.exclude
            .iter()
            .any(|prefix| path == prefix || is_under_prefix(prefix, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn scan_is_sorted_and_gitignore_aware() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "src/main.rs");
        touch(root, "README.md");
        touch(root, "target/debug/app");
        touch(root, ".hidden/secret.md");
        touch(root, ".agents/widget-builder.md");
        touch(root, "docs/guide.md");
        fs::write(root.join(".gitignore"), "target/\n").unwrap();

        let files = FileCatalogue::new(root)
            .with_exclude(vec!["docs/".to_string()])
            .scan();
        assert_eq!(files, vec!["README.md", "src/main.rs"]);
    }

    #[test]
    fn exclusion_respects_segment_boundaries() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "vendor/lib.c");
        touch(root, "vendored.c");

        let files = FileCatalogue::new(root)
            .with_exclude(vec!["vendor".to_string()])
            .scan();
        assert_eq!(files, vec!["vendored.c"]);
    }

    #[test]
    fn missing_root_is_empty() {
        let temp = tempdir().unwrap();
        assert!(FileCatalogue::new(temp.path().join("absent")).scan().is_empty());
    }
}
