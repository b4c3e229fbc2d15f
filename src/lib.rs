//! autorename - A file name sanitizing utility
//!
//! This library rewrites file and directory names through a persisted table of
//! substring substitution rules, learning new rules interactively whenever a
//! name contains characters the table does not cover yet.

pub mod cli;
pub mod config;
pub mod console;
pub mod learner;
pub mod output;
pub mod persistence;
pub mod renamer;
pub mod rule_table;

pub use config::{ConfigError, RenameConfig};
pub use console::{Console, TerminalConsole};
pub use output::{OutputFormatter, RunSummary};
pub use persistence::TableStore;
pub use renamer::{RenameError, RenameResult, TreeRenamer};
pub use rule_table::{Rule, RuleTable};

pub use cli::{Cli, rename_roots, run_cli};
