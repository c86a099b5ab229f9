use coverage_index::CoverageIndex;
use coverage_matcher::{CompiledDeclaration, PathMatcher};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Layer for files no rule matches. Always sorted last.
pub const OTHER_LAYER: &str = "Other";

/// One ordered layer rule; the first rule with a matching pattern wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRule {
    pub name: String,
    pub patterns: Vec<String>,
}

impl LayerRule {
    pub fn new(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

pub fn default_layer_rules() -> Vec<LayerRule> {
    vec![
        LayerRule::new("Specs", &["**/*.spec.md"]),
        LayerRule::new(
            "Tests",
            &["tests/", "**/tests/**", "**/*.test.*", "**/*_test.*"],
        ),
        LayerRule::new("CI", &[".github/", "ci/", "**/Dockerfile"]),
        LayerRule::new("Docs", &["docs/", "**/*.md"]),
        LayerRule::new("Source", &["src/", "crates/", "lib/"]),
    ]
}

/// Assigns catalogue files to layers.
#[derive(Debug, Clone)]
pub struct LayerClassifier {
    rules: Vec<(String, Vec<CompiledDeclaration>)>,
}

impl Default for LayerClassifier {
    fn default() -> Self {
        Self::new(&default_layer_rules(), &PathMatcher::default())
    }
}

impl LayerClassifier {
    pub fn new(rules: &[LayerRule], matcher: &PathMatcher) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let patterns = rule.patterns.iter().map(|p| matcher.compile(p)).collect();
                (rule.name.clone(), patterns)
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, path: &str) -> &str {
        self.rules
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.matches(path)))
            .map_or(OTHER_LAYER, |(name, _)| name.as_str())
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }
}

/// Coverage rollup for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCoverage {
    pub layer: String,
    pub total_files: usize,
    pub covered_files: usize,
    pub coverage_percent: u32,
    /// Agents knowing at least one file in the layer
    pub agents: Vec<String>,
}

/// Per-layer totals for every layer that has files, sorted by name with
/// [`OTHER_LAYER`] last.
pub fn layer_coverage(index: &CoverageIndex, classifier: &LayerClassifier) -> Vec<LayerCoverage> {
    #[derive(Default)]
    struct Tally<'a> {
        total: usize,
        covered: usize,
        agents: BTreeSet<&'a str>,
    }

    let mut tallies: BTreeMap<&str, Tally<'_>> = BTreeMap::new();
    for (path, coverage) in &index.files {
        let tally = tallies.entry(classifier.classify(path)).or_default();
        tally.total += 1;
        if coverage.is_covered() {
            tally.covered += 1;
        }
        tally.agents.extend(coverage.known_by.iter().map(String::as_str));
    }

    let mut layers: Vec<LayerCoverage> = tallies
        .into_iter()
        .map(|(layer, tally)| LayerCoverage {
            layer: layer.to_string(),
            total_files: tally.total,
            covered_files: tally.covered,
            coverage_percent: coverage_index::percent(tally.covered, tally.total),
            agents: tally.agents.into_iter().map(str::to_string).collect(),
        })
        .collect();
    layers.sort_by_key(|l| (l.layer == OTHER_LAYER, l.layer.clone()));
    layers
}
