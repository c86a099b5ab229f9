//! Section-boundary scanner for heading-structured documents.
//!
//! A section starts at a heading and runs until the next heading of the same
//! or a shallower level. Lines inside fenced code blocks are never headings.

/// A markdown heading found by [`headings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub title: String,
    /// Index of the heading line
    pub line: usize,
}

pub fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim().to_string();
    Some((level, title))
}

pub fn headings(lines: &[&str]) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut in_fence = false;
    for (idx, line) in lines.iter().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, title)) = parse_heading(line) {
            found.push(Heading {
                level,
                title,
                line: idx,
            });
        }
    }
    found
}

/// Body of the best section for `keyword` (case-insensitive), `None` when
/// no heading matches.
///
/// A title equal to the keyword wins over one that starts with it as a word,
/// which wins over one that merely contains it. Ties go to the first heading.
pub fn find_section<'a>(lines: &'a [&'a str], keyword: &str) -> Option<&'a [&'a str]> {
    let keyword = keyword.trim().to_lowercase();
    let all = headings(lines);
    let (pos, heading) = all
        .iter()
        .enumerate()
        .filter_map(|(pos, h)| title_rank(&h.title, &keyword).map(|rank| (rank, pos, h)))
        .min_by_key(|(rank, pos, _)| (*rank, *pos))
        .map(|(_, pos, h)| (pos, h))?;

    let end = all[pos + 1..]
        .iter()
        .find(|h| h.level <= heading.level)
        .map_or(lines.len(), |h| h.line);

    Some(&lines[heading.line + 1..end])
}

fn title_rank(title: &str, keyword: &str) -> Option<u8> {
    let title = title.trim().to_lowercase();
    if title == keyword {
        return Some(0);
    }
    if let Some(rest) = title.strip_prefix(keyword) {
        if rest.starts_with(|c: char| !c.is_alphanumeric()) {
            return Some(1);
        }
    }
    title.contains(keyword).then_some(2)
}

/// Body of `outer` → `inner`, empty when either heading is absent.
pub fn find_subsection<'a>(lines: &'a [&'a str], outer: &str, inner: &str) -> &'a [&'a str] {
    find_section(lines, outer)
        .and_then(|body| find_section(body, inner))
        .unwrap_or(&[])
}
