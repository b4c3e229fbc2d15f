//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! positional message templates and the end-of-run summary. Everything the
//! terminal shows goes through here, which keeps styling consistent.

use colored::*;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("Invalid placeholder pattern"));

/// Fills `{0}`, `{1}`, ... in `template` with the matching entries of `args`.
///
/// Placeholders without a matching argument are left as they are.
///
/// # Example
///
/// ```
/// use autorename::output::format_template;
///
/// let line = format_template("rename {0} => {1}", &["Bär", "Baer"]);
/// assert_eq!(line, "rename Bär => Baer");
/// ```
pub fn format_template<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map(|arg| arg.as_ref().to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries whose names were examined.
    pub visited: usize,
    /// Entries that were actually renamed.
    pub renamed: usize,
    /// Times a working copy was promoted to the committed table.
    pub commits: usize,
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Prompts, written without a line break
/// - The run summary
pub struct OutputFormatter;

impl OutputFormatter {
    /// Enables or disables colors for everything printed afterwards.
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use autorename::output::OutputFormatter;
    /// OutputFormatter::success("Rule table saved");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use autorename::output::OutputFormatter;
    /// OutputFormatter::error("Failed to rename entry");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a prompt without a trailing line break.
    pub fn prompt(message: &str) {
        print!("{}", message.bold());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the summary of a finished run.
    pub fn summary(summary: &RunSummary) {
        Self::header("SUMMARY");
        let rows = [
            ("Visited", summary.visited),
            ("Renamed", summary.renamed),
            ("Table updates", summary.commits),
        ];
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, count) in rows {
            println!(
                "{:<width$} | {}",
                label,
                count.to_string().green(),
                width = width
            );
        }
    }
}
