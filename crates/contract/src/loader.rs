use crate::error::{ContractError, Result};
use crate::model::AgentContract;
use crate::parser::ContractParser;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CONTRACT_EXTENSION: &str = "md";

/// A contract document that was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Contracts parsed from a directory plus the documents that were skipped.
#[derive(Debug, Default)]
pub struct LoadedContracts {
    pub contracts: Vec<AgentContract>,
    pub failures: Vec<LoadFailure>,
}

/// Read and parse one contract file.
pub fn load_contract_file(parser: &ContractParser, path: &Path) -> Result<AgentContract> {
    let text = fs::read_to_string(path).map_err(|err| ContractError::io(path, err))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parser.parse(&text, &stem))
}

/// Load every `*.md` contract below `dir`, in path order.
///
/// Unreadable documents and duplicate names are logged and reported as
/// failures; the remaining contracts still load.
pub fn load_contracts_dir(parser: &ContractParser, dir: &Path) -> Result<LoadedContracts> {
    if !dir.is_dir() {
        return Err(ContractError::InvalidPath(dir.display().to_string()));
    }

    let mut loaded = LoadedContracts::default();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Failed to read contracts entry: {err}");
                loaded.failures.push(LoadFailure {
                    path: err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_contract_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let outcome = load_contract_file(parser, path).and_then(|contract| {
            if seen.insert(contract.name.clone()) {
                Ok(contract)
            } else {
                Err(ContractError::DuplicateName {
                    name: contract.name,
                    path: path.to_path_buf(),
                })
            }
        });

        match outcome {
            Ok(contract) => loaded.contracts.push(contract),
            Err(err) => {
                log::warn!("Skipping contract: {err}");
                loaded.failures.push(LoadFailure {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "Loaded {} contracts from {} ({} skipped)",
        loaded.contracts.len(),
        dir.display(),
        loaded.failures.len()
    );
    Ok(loaded)
}

fn is_contract_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTRACT_EXTENSION))
}
