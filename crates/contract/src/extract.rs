//! Row and token extractors applied to section bodies.

use crate::sections::is_fence;

/// Box-drawing and ASCII tree connectors that prefix scope lines.
const TREE_CONNECTORS: &[char] = &[
    '│', '├', '└', '─', '┬', '┴', '┼', '┃', '┣', '┗', '━', '╰', '╭', '|', '+', '`', '-', '>',
];

/// Marks appended after a path to annotate it.
const TRAILING_MARKS: &[char] = &[
    ',', ';', ':', '✓', '✔', '✗', '✘', '✅', '❌', '⚠', '←', '→', '`', '"', '\'',
];

/// First-column backtick paths from every pipe-table row in `lines`.
///
/// Header rows, separator rows and rows whose first cell is not
/// backtick-quoted are skipped.
pub fn table_paths(lines: &[&str]) -> Vec<String> {
    let mut paths = Vec::new();
    let mut in_fence = false;
    for line in lines {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let trimmed = line.trim();
        let Some(row) = trimmed.strip_prefix('|') else {
            continue;
        };
        let first_cell = row.split('|').next().unwrap_or_default().trim();
        match backtick_quoted(first_cell) {
            Some(path) => paths.push(path.to_string()),
            None => log::trace!("Skipping table row without a quoted path: {trimmed}"),
        }
    }
    paths
}

fn backtick_quoted(cell: &str) -> Option<&str> {
    let inner = cell.strip_prefix('`')?;
    let end = inner.find('`')?;
    let path = inner[..end].trim();
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Path tokens from every fenced code block in `lines`.
///
/// Tree-drawn children are joined to the nearest entry drawn above them at
/// a shallower depth, so `north/` followed by `├── index.ts` yields
/// `north/index.ts`. A child already written from the root is kept as is.
pub fn fenced_paths(lines: &[&str]) -> Vec<String> {
    let mut paths = Vec::new();
    let mut in_fence = false;
    // (depth, joined path) of each open ancestor.
    let mut parents: Vec<(usize, String)> = Vec::new();
    for line in lines {
        if is_fence(line) {
            in_fence = !in_fence;
            parents.clear();
            continue;
        }
        if !in_fence {
            continue;
        }
        let Some(token) = scope_line_path(line) else {
            continue;
        };
        let depth = tree_depth(line);
        while parents.last().is_some_and(|(d, _)| *d >= depth) {
            parents.pop();
        }
        let path = match parents.last() {
            Some((_, parent)) => join_child(parent, &token),
            None => token,
        };
        parents.push((depth, path.clone()));
        paths.push(path);
    }
    paths
}

/// Width of the indentation and connector prefix of a scope line.
fn tree_depth(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace() || TREE_CONNECTORS.contains(c))
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn join_child(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_start_matches("./");
    if parent.is_empty() || parent == "." {
        return child.to_string();
    }
    match child.strip_prefix(parent) {
        Some(rest) if rest.starts_with('/') => child.to_string(),
        _ => format!("{parent}/{child}"),
    }
}

/// Path token of one scope line, or `None` for decoration, comments and
/// ellipsis placeholders.
pub fn scope_line_path(line: &str) -> Option<String> {
    let stripped =
        line.trim_start_matches(|c: char| c.is_whitespace() || TREE_CONNECTORS.contains(&c));
    if stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with("//") {
        return None;
    }

    let token = stripped.split_whitespace().next()?;
    let token = token
        .trim_start_matches(['`', '"', '\''])
        .trim_end_matches(TRAILING_MARKS);

    if token.is_empty() || is_placeholder(token) {
        log::trace!("Ignoring non-path scope line: {line}");
        return None;
    }
    Some(token.to_string())
}

fn is_placeholder(token: &str) -> bool {
    token.chars().all(|c| c == '.' || c == '…')
}

/// `name:` from a leading `---` front-matter block.
pub fn front_matter_name(text: &str) -> Option<String> {
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    if lines.next()?.trim() != "---" {
        return None;
    }
    for line in lines {
        let trimmed = line.trim();
        if trimmed == "---" {
            break;
        }
        if let Some(value) = trimmed.strip_prefix("name:") {
            let value = value.trim().trim_matches(['"', '\'']).trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
