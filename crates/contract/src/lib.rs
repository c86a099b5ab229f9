//! # Coverage Contract
//!
//! Parses agent contract documents into structured declarations.
//!
//! A contract is a markdown document with two heading trees:
//!
//! ```text
//! ## Knowledge
//!     ### Primary      | `path` | ... |   (pipe table, backtick paths)
//!     ### Additional   | `path` | ... |
//! ## Scope
//!     ### Can Touch    ```fenced path lines```   (builders)
//!     ### Can Read     ```fenced path lines```   (reviewers)
//! ```
//!
//! Missing sections are not errors: they declare nothing.
//!
//! ## Example
//!
//! ```rust
//! use coverage_contract::{ContractParser, Role};
//!
//! let doc = "## Knowledge\n### Primary\n| `content/widget.spec.md` | spec |\n";
//! let contract = ContractParser::default().parse(doc, "widget-builder");
//! assert_eq!(contract.role, Role::Builder);
//! assert_eq!(contract.knowledge.len(), 1);
//! assert!(contract.knowledge[0].is_explicit);
//! ```

mod error;
mod extract;
mod loader;
mod model;
mod parser;
mod sections;

pub use error::{ContractError, Result};
pub use extract::{fenced_paths, front_matter_name, scope_line_path, table_paths};
pub use loader::{load_contract_file, load_contracts_dir, LoadFailure, LoadedContracts};
pub use model::{
    AgentContract, DomainTable, KnowledgeDeclaration, Role, RoleConventions,
    DEFAULT_REFERENCE_TEMPLATE,
};
pub use parser::ContractParser;
pub use sections::{find_section, find_subsection, headings, Heading};
