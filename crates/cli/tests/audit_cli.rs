use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const WIDGET_BUILDER: &str = r#"---
name: widget-builder
---
# Widget builder

## Knowledge

### Primary

| Path | Why |
|------|-----|
| `content/widget.spec.md` | domain reference |

## Scope

### Can Touch

```
content/
├── widget.ts      # implementation
```
"#;

const WIDGET_REVIEWER: &str = r#"# Widget reviewer

## Knowledge

### Primary

| Path | Why |
|------|-----|
| `content/widget.spec.md` | domain reference |

## Scope

### Can Read

```
content/
```
"#;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn setup_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, ".agents/widget-builder.md", WIDGET_BUILDER);
    write(root, ".agents/widget-reviewer.md", WIDGET_REVIEWER);
    write(root, "content/widget.spec.md", "# Widget\n");
    write(root, "content/widget.ts", "export {}\n");
    write(root, "legacy/old.c", "int main() {}\n");
    temp
}

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("agent-coverage").expect("binary")
}

fn audit_json(root: &Path) -> Value {
    let output = cli()
        .arg("audit")
        .arg(root)
        .args(["--format", "json"])
        .output()
        .expect("command run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn audit_emits_json_report() {
    let temp = setup_repo();
    let report = audit_json(temp.path());

    assert_eq!(report["stats"]["total_files"], 3);
    assert_eq!(report["stats"]["covered_files"], 2);
    assert_eq!(report["stats"]["explicitly_covered_files"], 1);
    assert_eq!(report["stats"]["coverage_percent"], 67);
    assert_eq!(report["completeness"]["combined"]["percent"], 100);
    assert_eq!(report["pairing"][0]["path"], "content/widget.spec.md");
    assert_eq!(report["pairing"][0]["status"], "complete");
    assert_eq!(report["orphans"][0]["folder"], "legacy");
    assert_eq!(report["uncovered_files"], serde_json::json!(["legacy/old.c"]));
    assert_eq!(
        report["files"]["content/widget.ts"]["writable_by"],
        serde_json::json!(["widget-builder"])
    );
    assert_eq!(report["recommendations"][0]["priority"], "critical");
}

#[test]
fn audit_is_reproducible() {
    let temp = setup_repo();
    assert_eq!(audit_json(temp.path()), audit_json(temp.path()));
}

#[test]
fn min_coverage_failure_exits_with_two() {
    let temp = setup_repo();
    cli()
        .arg("audit")
        .arg(temp.path())
        .args(["--min-coverage", "90"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Agent coverage:"))
        .stderr(predicate::str::contains("below the required 90%"));

    cli()
        .arg("audit")
        .arg(temp.path())
        .args(["--min-coverage", "67"])
        .assert()
        .success();
}

#[test]
fn empty_contracts_dir_is_fatal() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join(".agents")).unwrap();
    write(temp.path(), "src/lib.rs", "");

    cli()
        .arg("audit")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No usable contracts"));
}

#[test]
fn missing_contracts_dir_is_fatal() {
    let temp = tempdir().unwrap();
    cli()
        .arg("audit")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load contracts"));
}

#[test]
fn config_file_relocates_contracts() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "team/widget-builder.md", WIDGET_BUILDER);
    write(root, "content/widget.spec.md", "# Widget\n");
    write(
        root,
        "agent-coverage.toml",
        "contracts_dir = \"team\"\nexclude = [\"team\", \"agent-coverage.toml\"]\n",
    );

    let report = audit_json(root);
    assert_eq!(report["stats"]["total_files"], 1);
    assert_eq!(report["stats"]["coverage_percent"], 100);
    assert_eq!(report["agents"][0]["name"], "widget-builder");
    assert_eq!(report["agents"][0]["has_reference"], true);
}

#[test]
fn contracts_override_inside_root_is_not_audited() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "team/agents/widget-builder.md", WIDGET_BUILDER);
    write(root, "content/widget.spec.md", "# Widget\n");
    write(root, "content/widget.ts", "export {}\n");

    let output = cli()
        .arg("audit")
        .arg(root)
        .arg("--contracts")
        .arg(root.join("team/agents"))
        .args(["--format", "json"])
        .output()
        .expect("command run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");

    assert_eq!(report["stats"]["total_files"], 2);
    assert!(report["files"].get("team/agents/widget-builder.md").is_none());
}

#[test]
fn missing_root_audits_an_empty_catalogue() {
    let temp = tempdir().unwrap();
    write(temp.path(), "agents/widget-builder.md", WIDGET_BUILDER);

    let output = cli()
        .arg("audit")
        .arg(temp.path().join("not-there"))
        .arg("--contracts")
        .arg(temp.path().join("agents"))
        .args(["--format", "json"])
        .output()
        .expect("command run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");

    assert_eq!(report["stats"]["total_files"], 0);
    assert_eq!(report["stats"]["coverage_percent"], 0);
    assert_eq!(report["agents"][0]["name"], "widget-builder");
}

#[test]
fn tree_drawn_scope_children_resolve_under_their_folder() {
    let temp = setup_repo();
    write(temp.path(), "widget.ts", "export {}\n");
    let report = audit_json(temp.path());

    assert_eq!(
        report["files"]["content/widget.ts"]["writable_by"],
        serde_json::json!(["widget-builder"])
    );
    assert_eq!(report["files"]["widget.ts"]["writable_by"], serde_json::json!([]));
}

#[test]
fn invalid_config_is_fatal() {
    let temp = setup_repo();
    write(temp.path(), "agent-coverage.toml", "builder_suffix = \"\"\n");
    cli()
        .arg("audit")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid audit configuration"));
}

#[test]
fn markdown_report_written_to_file() {
    let temp = setup_repo();
    let out = temp.path().join("reports/coverage.md");
    cli()
        .arg("audit")
        .arg(temp.path())
        .args(["--format", "markdown", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let md = fs::read_to_string(out).unwrap();
    assert!(md.starts_with("# Agent coverage report"));
    assert!(md.contains("## Orphaned folders"));
}

#[test]
fn file_command_shows_agent_sets() {
    let temp = setup_repo();
    let output = cli()
        .arg("file")
        .arg("content/widget.ts")
        .arg(temp.path())
        .arg("--json")
        .output()
        .expect("command run");
    assert!(output.status.success());
    let file: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(file["path"], "content/widget.ts");
    assert_eq!(file["writable_by"], serde_json::json!(["widget-builder"]));
    assert_eq!(file["readable_by"], serde_json::json!(["widget-reviewer"]));

    cli()
        .arg("file")
        .arg("nope.rs")
        .arg(temp.path())
        .assert()
        .code(1);
}

#[test]
fn agent_command_lists_files() {
    let temp = setup_repo();
    cli()
        .arg("agent")
        .arg("widget-builder")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("widget-builder (builder)"))
        .stdout(predicate::str::contains(
            "reference: content/widget.spec.md (present)",
        ))
        .stdout(predicate::str::contains("writes 2 files"));
}
