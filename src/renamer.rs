/// Recursive renaming of directory trees.
///
/// Every entry goes through the same steps: learn rules for unknown
/// characters on a working copy of the committed table, compute the new name,
/// rename in place, then offer to commit the working copy. Directories are
/// renamed before their children are listed, so traversal always continues
/// from the new location.
use crate::console::Console;
use crate::learner;
use crate::output::{RunSummary, format_template};
use crate::rule_table::RuleTable;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while renaming or while handling the rule table.
#[derive(Debug)]
pub enum RenameError {
    /// Renaming an entry failed. Aborts the run.
    RenameFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Listing a directory failed. Aborts the run.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A root given on the command line cannot be accessed.
    InvalidRootPath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read the rule table file.
    TableReadFailed { source: std::io::Error },
    /// Failed to write the rule table file.
    TableWriteFailed { source: std::io::Error },
    /// Rule table file has invalid format.
    InvalidTableFormat { reason: String },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RenameFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to rename {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::InvalidRootPath { path, source } => {
                write!(f, "Invalid path {}: {}", path.display(), source)
            }
            Self::TableReadFailed { source } => {
                write!(f, "Failed to read rule table: {}", source)
            }
            Self::TableWriteFailed { source } => {
                write!(f, "Failed to write rule table: {}", source)
            }
            Self::InvalidTableFormat { reason } => {
                write!(f, "Invalid rule table format: {}", reason)
            }
        }
    }
}

impl std::error::Error for RenameError {}

/// Result type for renaming operations.
pub type RenameResult<T> = Result<T, RenameError>;

/// Renames `path` to `new_name` inside the same parent directory.
///
/// Fails without touching anything if `new_name` is not a single plain path
/// component or if the destination already exists; the platform rename is
/// not allowed to replace an existing entry.
///
/// # Examples
///
/// ```no_run
/// use autorename::renamer::rename_in_place;
/// use std::path::Path;
///
/// match rename_in_place(Path::new("photos/Bär.jpg"), "Baer.jpg") {
///     Ok(path) => println!("Now at {}", path.display()),
///     Err(e) => eprintln!("Rename failed: {}", e),
/// }
/// ```
pub fn rename_in_place(path: &Path, new_name: &str) -> RenameResult<PathBuf> {
    let destination = path.with_file_name(new_name);
    let failure = |kind: std::io::ErrorKind, message: &str| RenameError::RenameFailed {
        source: path.to_path_buf(),
        destination: destination.clone(),
        source_error: std::io::Error::new(kind, message.to_string()),
    };

    let single_component = Path::new(new_name).file_name() == Some(OsStr::new(new_name));
    if new_name.is_empty() || !single_component {
        return Err(failure(
            std::io::ErrorKind::InvalidInput,
            "new name is not a single path component",
        ));
    }

    if fs::symlink_metadata(&destination).is_ok() {
        return Err(failure(
            std::io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }

    fs::rename(path, &destination).map_err(|e| RenameError::RenameFailed {
        source: path.to_path_buf(),
        destination: destination.clone(),
        source_error: e,
    })?;

    Ok(destination)
}

/// Walks directory trees and renames entries against a committed rule table.
///
/// The renamer owns the committed table for the whole run. Working copies are
/// cloned from it per entry and only replace it through [`TreeRenamer::commit`].
pub struct TreeRenamer<'c, C: Console + ?Sized> {
    committed: RuleTable,
    console: &'c mut C,
    summary: RunSummary,
}

impl<'c, C: Console + ?Sized> TreeRenamer<'c, C> {
    pub fn new(committed: RuleTable, console: &'c mut C) -> Self {
        Self {
            committed,
            console,
            summary: RunSummary::default(),
        }
    }

    /// The table that will be saved at the end of the run.
    pub fn committed(&self) -> &RuleTable {
        &self.committed
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Gives the committed table and the run counters back to the caller.
    pub fn finish(self) -> (RuleTable, RunSummary) {
        (self.committed, self.summary)
    }

    /// Replaces the committed table with `working`.
    pub fn commit(&mut self, working: RuleTable) {
        self.committed = working;
        self.summary.commits += 1;
    }

    /// Processes a single entry and returns its path after renaming.
    ///
    /// Paths without a final name component (`.`, `..`, `/`) are left alone.
    ///
    /// # Errors
    ///
    /// Returns `RenameError::RenameFailed` if the entry has to be renamed and
    /// the rename fails.
    pub fn process(&mut self, path: &Path) -> RenameResult<PathBuf> {
        let Some(file_name) = path.file_name() else {
            return Ok(path.to_path_buf());
        };
        let name = file_name.to_string_lossy().into_owned();
        self.summary.visited += 1;

        let working = learner::learn(self.committed.clone(), &name, path, &mut *self.console);
        let new_name = working.apply(&name);

        let result = if new_name == name {
            path.to_path_buf()
        } else {
            self.console
                .status(&format_template("rename {0} => {1}", &[&name, &new_name]));
            let renamed = rename_in_place(path, &new_name)?;
            self.summary.renamed += 1;
            renamed
        };

        if working != self.committed && learner::confirm_commit(&mut *self.console) {
            self.commit(working);
        }

        Ok(result)
    }

    /// Processes `root` and, if it is a directory, everything below it.
    ///
    /// A root that is a symbolic link to a directory is followed; links found
    /// during traversal are treated as leaves.
    pub fn process_tree(&mut self, root: &Path) -> RenameResult<()> {
        self.console
            .status(&format_template("scanning {0}", &[root.display().to_string()]));
        let metadata = fs::metadata(root).map_err(|e| RenameError::InvalidRootPath {
            path: root.to_path_buf(),
            source: e,
        })?;

        if metadata.is_dir() {
            self.process_dir(root)
        } else {
            self.process(root).map(|_| ())
        }
    }

    fn process_dir(&mut self, dir: &Path) -> RenameResult<()> {
        let dir = self.process(dir)?;
        for (child, is_dir) in sorted_children(&dir)? {
            if is_dir {
                self.process_dir(&child)?;
            } else {
                self.process(&child)?;
            }
        }
        Ok(())
    }
}

/// Lists `dir` sorted by file name, flagging real (non-link) directories.
fn sorted_children(dir: &Path) -> RenameResult<Vec<(PathBuf, bool)>> {
    let read_failed = |e| RenameError::ReadDirFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_failed)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_failed)?;
    entries.sort_by_key(|entry| entry.file_name());

    entries
        .into_iter()
        .map(|entry| -> RenameResult<(PathBuf, bool)> {
            let file_type = entry.file_type().map_err(read_failed)?;
            Ok((entry.path(), file_type.is_dir()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::rule_table::Rule;
    use tempfile::TempDir;

    #[test]
    fn test_rename_in_place_moves_within_parent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("Bär.txt");
        fs::write(&file_path, "content").expect("Failed to write test file");

        let renamed = rename_in_place(&file_path, "Baer.txt").expect("rename failed");

        assert_eq!(renamed, temp_dir.path().join("Baer.txt"));
        assert!(!file_path.exists());
        assert_eq!(fs::read_to_string(&renamed).unwrap(), "content");
    }

    #[test]
    fn test_rename_in_place_refuses_existing_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a b");
        let taken = temp_dir.path().join("ab");
        fs::write(&source, "source").unwrap();
        fs::write(&taken, "taken").unwrap();

        let result = rename_in_place(&source, "ab");

        match result {
            Err(RenameError::RenameFailed { source_error, .. }) => {
                assert_eq!(source_error.kind(), std::io::ErrorKind::AlreadyExists);
            }
            other => panic!("expected RenameFailed, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&taken).unwrap(), "taken");
        assert!(source.exists());
    }

    #[test]
    fn test_rename_in_place_refuses_path_separators() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a:b");
        fs::write(&source, "x").unwrap();

        assert!(rename_in_place(&source, "a/b").is_err());
        assert!(rename_in_place(&source, "").is_err());
        assert!(rename_in_place(&source, "..").is_err());
        assert!(source.exists());
    }

    #[test]
    fn test_rename_in_place_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = rename_in_place(&temp_dir.path().join("missing"), "other");
        assert!(matches!(result, Err(RenameError::RenameFailed { .. })));
    }

    #[test]
    fn test_process_unchanged_name_is_silent_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("plain.txt");
        fs::write(&file_path, "x").unwrap();

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut renamer = TreeRenamer::new(RuleTable::seed(), &mut console);
        let result = renamer.process(&file_path).expect("process failed");
        let summary = renamer.summary();

        assert_eq!(result, file_path);
        assert_eq!(summary.visited, 1);
        assert_eq!(summary.renamed, 0);
        assert!(console.lines.is_empty());
        assert!(console.prompts.is_empty());
    }

    #[test]
    fn test_process_known_rule_renames_without_prompting() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("Café.txt");
        fs::write(&file_path, "x").unwrap();

        let mut table = RuleTable::seed();
        table.insert(Rule::new("é", "e").unwrap());

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut renamer = TreeRenamer::new(table.clone(), &mut console);
        let result = renamer.process(&file_path).expect("process failed");
        let (committed, summary) = renamer.finish();

        assert_eq!(result, temp_dir.path().join("Cafe.txt"));
        assert!(result.exists());
        assert_eq!(committed, table);
        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.commits, 0);
        assert!(console.prompts.is_empty());
        assert!(console.has_line_starting_with("rename Café.txt => Cafe.txt"));
    }

    #[test]
    fn test_process_declined_commit_keeps_table_but_renames() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("a b");
        fs::write(&file_path, "x").unwrap();

        let mut console = ScriptedConsole::new(["", "_", "n"]);
        let mut renamer = TreeRenamer::new(RuleTable::seed(), &mut console);
        let result = renamer.process(&file_path).expect("process failed");

        assert_eq!(result, temp_dir.path().join("a_b"));
        assert!(result.exists());
        assert_eq!(renamer.committed(), &RuleTable::seed());
        assert_eq!(renamer.summary().commits, 0);
    }

    #[test]
    fn test_process_confirmed_commit_updates_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("a b");
        fs::write(&file_path, "x").unwrap();

        let mut console = ScriptedConsole::new(["", "-", ""]);
        let mut renamer = TreeRenamer::new(RuleTable::seed(), &mut console);
        renamer.process(&file_path).expect("process failed");

        assert_eq!(renamer.committed().get(" "), Some("-"));
        assert_eq!(renamer.summary().commits, 1);
    }

    #[test]
    fn test_process_collision_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a b"), "x").unwrap();
        fs::write(temp_dir.path().join("ab"), "y").unwrap();

        let mut table = RuleTable::seed();
        table.insert(Rule::new(" ", "").unwrap());
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut renamer = TreeRenamer::new(table, &mut console);

        let result = renamer.process_tree(temp_dir.path());
        assert!(matches!(result, Err(RenameError::RenameFailed { .. })));
    }

    #[test]
    fn test_process_tree_missing_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut renamer = TreeRenamer::new(RuleTable::seed(), &mut console);

        let result = renamer.process_tree(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(RenameError::InvalidRootPath { .. })));
    }

    #[test]
    fn test_sorted_children_orders_by_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("b"), "").unwrap();
        fs::create_dir(temp_dir.path().join("c")).unwrap();
        fs::write(temp_dir.path().join("a"), "").unwrap();

        let children = sorted_children(temp_dir.path()).unwrap();
        let names: Vec<(String, bool)> = children
            .iter()
            .map(|(p, is_dir)| (p.file_name().unwrap().to_string_lossy().into_owned(), *is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), false),
                ("b".to_string(), false),
                ("c".to_string(), true)
            ]
        );
    }
}
