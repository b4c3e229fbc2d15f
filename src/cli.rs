//! Command-line interface module for autorename.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading
//! - Loading, threading and saving the committed rule table around a run

use crate::config::RenameConfig;
use crate::console::{Console, TerminalConsole};
use crate::output::{OutputFormatter, RunSummary, format_template};
use crate::persistence::TableStore;
use crate::renamer::{RenameResult, TreeRenamer};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Rename files and directories using a learned table of substitution rules.
#[derive(Debug, Parser)]
#[command(name = "autorename", version, about)]
pub struct Cli {
    /// Directories or files to scan. Defaults to the current directory.
    pub paths: Vec<PathBuf>,
}

/// Runs the CLI application on the given roots with an interactive terminal.
///
/// # Examples
///
/// ```no_run
/// use autorename::cli::run_cli;
/// use std::path::PathBuf;
///
/// match run_cli(&[PathBuf::from("/path/to/directory")]) {
///     Ok(summary) => println!("Renamed {} entries", summary.renamed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(paths: &[PathBuf]) -> Result<RunSummary, String> {
    let mut console = TerminalConsole::new();
    run_cli_with_config(paths, None, &mut console)
}

/// Runs the CLI application with an optional configuration file.
///
/// # Arguments
///
/// * `paths` - The roots to scan; empty means the current directory
/// * `config_path` - Optional path to configuration file
/// * `console` - Where prompts are shown and answers read from
pub fn run_cli_with_config<C: Console + ?Sized>(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    console: &mut C,
) -> Result<RunSummary, String> {
    let config = RenameConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    OutputFormatter::set_color(config.output.color);

    let store = TableStore::new(config.table.path);
    rename_roots(paths, &store, console).map_err(|e| e.to_string())
}

/// Renames everything under `paths` and persists the resulting rule table.
///
/// This function:
/// 1. Loads the committed table (or the seed table)
/// 2. Processes every root in order
/// 3. Saves the committed table once all roots are done
///
/// A fatal error stops the run before anything is saved; entries renamed so
/// far stay renamed.
pub fn rename_roots<C: Console + ?Sized>(
    paths: &[PathBuf],
    store: &TableStore,
    console: &mut C,
) -> RenameResult<RunSummary> {
    let committed = store.load_or_seed(&mut *console);
    console.status(&format_template(
        "rule table has {0} rules",
        &[committed.len().to_string()],
    ));
    console.status(&committed.to_string());

    let default_roots = [PathBuf::from(".")];
    let roots = if paths.is_empty() {
        &default_roots[..]
    } else {
        paths
    };

    let mut renamer = TreeRenamer::new(committed, &mut *console);
    for root in roots {
        renamer.process_tree(root)?;
    }
    let (committed, summary) = renamer.finish();

    store.save(&committed, console)?;
    Ok(summary)
}
