use coverage_analyzer::{AgentReport, CoverageReport, FileReport};
use coverage_index::RoleCompleteness;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::Path;

const MAX_CELL_CHARS: usize = 80;
const MAX_LISTED_FILES: usize = 20;

pub fn render_table(root: &Path, report: &CoverageReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Agent coverage: {}", root.display());
    let _ = writeln!(
        out,
        "Files: {}  covered: {} ({}%)  explicit: {} ({}%)  glob-only: {} ({}%)  uncovered: {}",
        stats.total_files,
        stats.covered_files,
        stats.coverage_percent,
        stats.explicitly_covered_files,
        stats.explicit_percent,
        stats.glob_only_files,
        stats.glob_only_percent,
        stats.uncovered_files
    );
    let completeness = &report.completeness;
    let _ = writeln!(
        out,
        "Specialists: builders {}  reviewers {}  combined {}",
        ratio(&completeness.builders),
        ratio(&completeness.reviewers),
        ratio(&completeness.combined)
    );

    if !report.layers.is_empty() {
        out.push_str("\nLayers\n");
        let width = report.layers.iter().map(|l| l.layer.len()).max().unwrap_or(0);
        for layer in &report.layers {
            let _ = writeln!(
                out,
                "  {:<width$}  {:>4}/{:<4} {:>3}%  {}",
                layer.layer,
                layer.covered_files,
                layer.total_files,
                layer.coverage_percent,
                layer.agents.join(", ")
            );
        }
    }

    if !completeness.agents_missing_specs.is_empty() {
        out.push_str("\nMissing references\n");
        for missing in &completeness.agents_missing_specs {
            let _ = writeln!(
                out,
                "  {} ({}) expects {}",
                missing.agent, missing.role, missing.expected_reference_path
            );
        }
    }

    if !report.conflicts.is_empty() {
        out.push_str("\nWrite conflicts\n");
        for conflict in &report.conflicts {
            let _ = writeln!(
                out,
                "  {}  [{:?}]  {}",
                conflict.folder,
                conflict.risk,
                conflict.builders.join(", ")
            );
        }
    }

    if !report.orphans.is_empty() {
        out.push_str("\nOrphaned folders\n");
        for orphan in &report.orphans {
            let _ = writeln!(out, "  {} ({} files)", orphan.folder, orphan.files);
        }
    }

    if !report.uncovered_files.is_empty() {
        out.push_str("\nUncovered files\n");
        for path in report.uncovered_files.iter().take(MAX_LISTED_FILES) {
            let _ = writeln!(out, "  {path}");
        }
        if report.uncovered_files.len() > MAX_LISTED_FILES {
            let _ = writeln!(
                out,
                "  ... {} more",
                report.uncovered_files.len() - MAX_LISTED_FILES
            );
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str("\nRecommendations\n");
        for rec in &report.recommendations {
            let _ = writeln!(out, "  [{}] {}: {}", rec.priority, rec.title, rec.description);
            let _ = writeln!(out, "      -> {}", rec.action);
        }
    }

    out
}

pub fn render_markdown(root: &Path, report: &CoverageReport) -> String {
    let stats = &report.stats;
    let mut md = String::new();
    md.push_str("# Agent coverage report\n\n");
    let _ = writeln!(md, "- Root: `{}`", root.display());
    let _ = writeln!(md, "- Agents: `{}`", report.agents.len());
    let _ = writeln!(
        md,
        "- Coverage: `{}%` ({}/{} files)",
        stats.coverage_percent, stats.covered_files, stats.total_files
    );
    let _ = writeln!(
        md,
        "- Explicit: `{}%`, glob-only: `{}%`\n",
        stats.explicit_percent, stats.glob_only_percent
    );

    md.push_str("## Specialist completeness\n\n");
    md.push_str("| role | with reference | total | percent |\n");
    md.push_str("|---|---:|---:|---:|\n");
    let completeness = &report.completeness;
    for (role, row) in [
        ("builders", &completeness.builders),
        ("reviewers", &completeness.reviewers),
        ("combined", &completeness.combined),
    ] {
        let _ = writeln!(
            md,
            "| {role} | {} | {} | {}% |",
            row.with_reference, row.total, row.percent
        );
    }
    md.push('\n');

    if !report.layers.is_empty() {
        md.push_str("## Layers\n\n");
        md.push_str("| layer | covered | total | percent | agents |\n");
        md.push_str("|---|---:|---:|---:|---|\n");
        for layer in &report.layers {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {}% | {} |",
                escape_cell(&layer.layer),
                layer.covered_files,
                layer.total_files,
                layer.coverage_percent,
                escape_cell(&truncate_one_line(&layer.agents.join(", "), MAX_CELL_CHARS))
            );
        }
        md.push('\n');
    }

    if !report.pairing.is_empty() {
        md.push_str("## Reference pairing\n\n");
        md.push_str("| document | builders | reviewers | status |\n");
        md.push_str("|---|---|---|---|\n");
        for entry in &report.pairing {
            let _ = writeln!(
                md,
                "| `{}` | {} | {} | {:?} |",
                escape_cell(&entry.path),
                escape_cell(&entry.builders.join(", ")),
                escape_cell(&entry.reviewers.join(", ")),
                entry.status
            );
        }
        md.push('\n');
    }

    if !report.conflicts.is_empty() {
        md.push_str("## Write conflicts\n\n");
        md.push_str("| folder | risk | builders |\n");
        md.push_str("|---|---|---|\n");
        for conflict in &report.conflicts {
            let _ = writeln!(
                md,
                "| `{}` | {:?} | {} |",
                escape_cell(&conflict.folder),
                conflict.risk,
                escape_cell(&conflict.builders.join(", "))
            );
        }
        md.push('\n');
    }

    if !report.uncovered_files.is_empty() {
        md.push_str("## Uncovered files\n\n");
        for path in report.uncovered_files.iter().take(MAX_LISTED_FILES) {
            let _ = writeln!(md, "- `{path}`");
        }
        if report.uncovered_files.len() > MAX_LISTED_FILES {
            let _ = writeln!(
                md,
                "- ... {} more",
                report.uncovered_files.len() - MAX_LISTED_FILES
            );
        }
        md.push('\n');
    }

    if !report.orphans.is_empty() {
        md.push_str("## Orphaned folders\n\n");
        for orphan in &report.orphans {
            let _ = writeln!(md, "- `{}` ({} files)", orphan.folder, orphan.files);
        }
        md.push('\n');
    }

    if !report.recommendations.is_empty() {
        md.push_str("## Recommendations\n\n");
        md.push_str("| priority | title | description | action |\n");
        md.push_str("|---|---|---|---|\n");
        for rec in &report.recommendations {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                rec.priority,
                escape_cell(&rec.title),
                escape_cell(&truncate_one_line(&rec.description, MAX_CELL_CHARS)),
                escape_cell(&rec.action)
            );
        }
        md.push('\n');
    }

    md
}

pub fn render_file(file: &FileReport) -> String {
    let coverage = &file.coverage;
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", file.path, file.layer);
    for (label, agents) in [
        ("known by", &coverage.known_by),
        ("explicitly", &coverage.explicitly_known_by),
        ("via glob", &coverage.glob_known_by),
        ("writable by", &coverage.writable_by),
        ("readable by", &coverage.readable_by),
    ] {
        let _ = writeln!(out, "  {label:<12} {}", join_set(agents));
    }
    out
}

pub fn render_agent(agent: &AgentReport) -> String {
    let summary = &agent.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", summary.name, summary.role);
    if let Some(domain) = &summary.domain {
        let _ = writeln!(out, "  domain: {domain}");
    }
    if let Some(reference) = &summary.expected_reference_path {
        let status = match summary.has_reference {
            Some(true) => "present",
            _ => "missing",
        };
        let _ = writeln!(out, "  reference: {reference} ({status})");
    }
    let _ = writeln!(
        out,
        "  knowledge: {} declarations ({} explicit)",
        summary.knowledge_count, summary.explicit_knowledge_count
    );
    for (label, files) in [
        ("knows", &agent.known),
        ("writes", &agent.writable),
        ("reads", &agent.readable),
    ] {
        let _ = writeln!(out, "  {label} {} files", files.len());
        for path in files.iter().take(MAX_LISTED_FILES) {
            let _ = writeln!(out, "    {path}");
        }
        if files.len() > MAX_LISTED_FILES {
            let _ = writeln!(out, "    ... {} more", files.len() - MAX_LISTED_FILES);
        }
    }
    out
}

fn ratio(row: &RoleCompleteness) -> String {
    format!("{}/{} ({}%)", row.with_reference, row.total, row.percent)
}

fn join_set(agents: &BTreeSet<String>) -> String {
    if agents.is_empty() {
        "-".to_string()
    } else {
        agents.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let mut s = text.replace(['\n', '\r', '\t'], " ");
    s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverage_analyzer::CoverageAnalyzer;
    use coverage_contract::ContractParser;
    use coverage_index::CoverageIndexBuilder;

    fn report() -> CoverageReport {
        let parser = ContractParser::default();
        let touch = "## Scope\n### Can Touch\n```\nshared/\n```\n";
        let contracts = vec![
            parser.parse(touch, "north-builder"),
            parser.parse(touch, "south-builder"),
        ];
        let files = vec!["shared/a.ts".to_string(), "notes|draft.txt".to_string()];
        let index = CoverageIndexBuilder::default()
            .build(&contracts, &files)
            .unwrap();
        CoverageAnalyzer::default().analyze(index)
    }

    #[test]
    fn table_lists_findings() {
        let text = render_table(Path::new("/repo"), &report());
        assert!(text.starts_with("Agent coverage: /repo\n"));
        assert!(text.contains("Files: 2  covered: 1 (50%)"));
        assert!(text.contains("shared  [Medium]  north-builder, south-builder"));
        assert!(text.contains("\nUncovered files\n  notes|draft.txt\n"));
        assert!(text.contains("[critical] Uncovered files"));
    }

    #[test]
    fn markdown_has_sections() {
        let md = render_markdown(Path::new("/repo"), &report());
        assert!(md.starts_with("# Agent coverage report\n"));
        assert!(md.contains("## Write conflicts"));
        assert!(md.contains("| `shared` | Medium | north-builder, south-builder |"));
        assert!(md.contains("| combined | 0 | 0 | 0% |"));
        assert!(md.contains("## Uncovered files\n\n- `notes|draft.txt`\n"));
    }

    #[test]
    fn truncates_to_one_line() {
        assert_eq!(truncate_one_line("a\nb\tc", 10), "a b c");
        assert_eq!(truncate_one_line("abcdef", 4), "abc…");
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }
}
