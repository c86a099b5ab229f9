use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    coverage_cli::main_entry()
}
