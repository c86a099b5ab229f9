/// Upper bound on patterns produced from one declaration.
pub const MAX_BRACE_EXPANSIONS: usize = 1024;

enum Group<'a> {
    Options(Vec<&'a str>, usize),
    Literal(usize),
}

/// Expand single-level `{a,b,c}` groups into the cross product of patterns.
///
/// Every group in the pattern expands independently. Nested groups and
/// unclosed braces are kept as literal text. The output is deduplicated and
/// keeps first-seen order.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let mut expanded = vec![String::new()];
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        let (head, tail) = rest.split_at(open);
        append_all(&mut expanded, head);

        match parse_group(tail) {
            Group::Options(options, consumed) => {
                let product = expanded.len().saturating_mul(options.len());
                if product > MAX_BRACE_EXPANSIONS {
                    log::warn!(
                        "Brace expansion of `{pattern}` exceeds {MAX_BRACE_EXPANSIONS} patterns; matching the rest literally"
                    );
                    append_all(&mut expanded, rest.get(open..).unwrap_or_default());
                    return dedup(expanded);
                }
                expanded = expanded
                    .iter()
                    .flat_map(|prefix| options.iter().map(move |opt| format!("{prefix}{opt}")))
                    .collect();
                rest = &tail[consumed..];
            }
            Group::Literal(consumed) => {
                log::debug!(
                    "Unsupported brace syntax `{}` in `{pattern}` matched literally",
                    &tail[..consumed]
                );
                append_all(&mut expanded, &tail[..consumed]);
                rest = &tail[consumed..];
            }
        }
    }

    append_all(&mut expanded, rest);
    dedup(expanded)
}

fn parse_group(tail: &str) -> Group<'_> {
    let mut depth = 0usize;
    let mut nested = false;
    for (idx, ch) in tail.char_indices() {
        match ch {
            '{' => {
                depth += 1;
                if depth > 1 {
                    nested = true;
                }
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    if nested {
                        return Group::Literal(idx + 1);
                    }
                    let inner = &tail[1..idx];
                    return Group::Options(inner.split(',').collect(), idx + 1);
                }
            }
            _ => {}
        }
    }
    // Unclosed: only the opening brace is literal.
    Group::Literal(1)
}

fn append_all(expanded: &mut [String], text: &str) {
    if text.is_empty() {
        return;
    }
    for pattern in expanded.iter_mut() {
        pattern.push_str(text);
    }
}

fn dedup(patterns: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    patterns
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
