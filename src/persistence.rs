/// Loading and saving the committed rule table.
///
/// The table lives in a single JSON file holding the rules in matching order,
/// so it can be inspected and edited by hand. A missing or unreadable file
/// never stops a run: the seed table is used instead.
use crate::console::Console;
use crate::output::format_template;
use crate::renamer::{RenameError, RenameResult};
use crate::rule_table::{Rule, RuleTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name of the persisted table, relative to the working directory.
///
/// Only seed-table characters are used, so a run over the working directory
/// leaves the table file (and its backups) alone.
pub const DEFAULT_TABLE_FILE: &str = "replaceMap.json";

/// On-disk layout of the table file.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    /// RFC 3339 timestamp of the save.
    saved_at: String,
    rules: Vec<Rule>,
}

/// Reads and writes a [`RuleTable`] at a fixed location.
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The location as shown to the user.
    fn display_path(&self) -> String {
        std::path::absolute(&self.path)
            .unwrap_or_else(|_| self.path.clone())
            .display()
            .to_string()
    }

    /// Loads the table, or `None` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RenameError::TableReadFailed` if the file cannot be read and
    /// `RenameError::InvalidTableFormat` if it is not a valid table.
    pub fn load(&self) -> RenameResult<Option<RuleTable>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| RenameError::TableReadFailed { source: e })?;

        let file: TableFile =
            serde_json::from_str(&content).map_err(|e| RenameError::InvalidTableFormat {
                reason: format!("JSON parse error: {}", e),
            })?;

        let mut seen = HashSet::new();
        for rule in &file.rules {
            if rule.pattern.is_empty() {
                return Err(RenameError::InvalidTableFormat {
                    reason: "empty pattern".to_string(),
                });
            }
            if !seen.insert(rule.pattern.as_str()) {
                return Err(RenameError::InvalidTableFormat {
                    reason: format!("duplicate pattern {:?}", rule.pattern),
                });
            }
        }

        Ok(Some(file.rules.into_iter().collect()))
    }

    /// Loads the table, falling back to [`RuleTable::seed`] on any failure.
    ///
    /// A file that exists but cannot be loaded is moved aside to a timestamped
    /// backup so the end-of-run save does not overwrite it.
    pub fn load_or_seed<C: Console + ?Sized>(&self, console: &mut C) -> RuleTable {
        let shown = self.display_path();
        console.status(&format_template("loading from {0}", &[&shown]));

        match self.load() {
            Ok(Some(table)) => {
                console.status(&format_template("rule table loaded from {0}", &[&shown]));
                table
            }
            Ok(None) => {
                console.status(&format_template("not found {0}", &[&shown]));
                RuleTable::seed()
            }
            Err(e) => {
                console.warn(&e.to_string());
                let backup = self.backup_path();
                match fs::rename(&self.path, &backup) {
                    Ok(()) => console.warn(&format_template(
                        "unreadable rule table moved to {0}",
                        &[backup.display().to_string()],
                    )),
                    Err(e) => console.warn(&format_template(
                        "could not back up unreadable rule table: {0}",
                        &[e.to_string()],
                    )),
                }
                RuleTable::seed()
            }
        }
    }

    /// Writes the table, replacing any previous contents.
    pub fn save<C: Console + ?Sized>(&self, table: &RuleTable, console: &mut C) -> RenameResult<()> {
        let file = TableFile {
            saved_at: chrono::Utc::now().to_rfc3339(),
            rules: table.rules(),
        };

        let json = serde_json::to_string_pretty(&file).map_err(|e| RenameError::TableWriteFailed {
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            ),
        })?;

        fs::write(&self.path, json).map_err(|e| RenameError::TableWriteFailed { source: e })?;

        console.success(&format_template(
            "rule table saved in {0}",
            &[self.display_path()],
        ));
        Ok(())
    }

    /// Example: `replaceMap.json` becomes `replaceMap.json.bak.20251109143052`
    fn backup_path(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let filename = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_TABLE_FILE);

        let backup_name = format!("{}.bak.{}", filename, timestamp);

        match self.path.parent() {
            Some(parent) => parent.join(backup_name),
            None => PathBuf::from(backup_name),
        }
    }
}
