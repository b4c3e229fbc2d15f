//! Interactive rule learning.
//!
//! While a name still contains characters the working table cannot account
//! for, the user is asked for a new rule. [`learn_step`] is one turn of that
//! loop and [`learn`] drives it until nothing is unknown.

use crate::console::Console;
use crate::output::format_template;
use crate::rule_table::{Rule, RuleTable, describe_unknown};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// A rule entered by the user that cannot be added to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRuleInput {
    /// The "from" answer was empty after defaulting, or input ended.
    EmptyFrom,
    /// Input ended before a "to" answer was given.
    MissingTo,
}

impl fmt::Display for InvalidRuleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'from' cannot be empty, 'to' cannot be null")
    }
}

impl std::error::Error for InvalidRuleInput {}

/// Asks the user for one rule, offering `default_from` as the pattern.
///
/// An empty "from" answer accepts the default. The "to" answer may be empty,
/// which makes a deleting rule, but end of input is rejected.
pub fn read_rule<C: Console + ?Sized>(
    default_from: char,
    console: &mut C,
) -> Result<Rule, InvalidRuleInput> {
    let default_from = default_from.to_string();
    let bytes = format!("{:?}", default_from.as_bytes());
    let from = console
        .prompt_line(&format_template(
            "replace from [\"{0}\" {1}]: ",
            &[default_from.as_str(), bytes.as_str()],
        ))
        .map(|answer| {
            if answer.is_empty() {
                default_from.clone()
            } else {
                answer
            }
        });
    let to = console.prompt_line("replace to: ");

    let from = from.filter(|f| !f.is_empty()).ok_or(InvalidRuleInput::EmptyFrom)?;
    let to = to.ok_or(InvalidRuleInput::MissingTo)?;
    Rule::new(from, to).ok_or(InvalidRuleInput::EmptyFrom)
}

/// Runs one turn of the learning loop.
///
/// Returns the updated table and `true` once `unknown` is empty. Otherwise the
/// first unknown character is offered as the default pattern; a valid answer
/// is inserted into the table, an invalid one is reported and leaves the table
/// untouched. Either way the caller should check again and call back.
pub fn learn_step<C: Console + ?Sized>(
    mut table: RuleTable,
    unknown: &BTreeSet<char>,
    console: &mut C,
) -> (RuleTable, bool) {
    let Some(&default_from) = unknown.first() else {
        return (table, true);
    };

    console.status("adding new rule");
    match read_rule(default_from, console) {
        Ok(rule) => {
            table.insert(rule);
        }
        Err(e) => console.warn(&e.to_string()),
    }
    (table, false)
}

/// Extends `table` until `name` contains no unknown characters.
///
/// There is no other way out: invalid answers are retried indefinitely.
pub fn learn<C: Console + ?Sized>(
    mut table: RuleTable,
    name: &str,
    entry: &Path,
    console: &mut C,
) -> RuleTable {
    loop {
        let unknown = table.find_unknown(name);
        if !unknown.is_empty() {
            console.status(&format_template(
                "processing {0}, unknown characters {1}",
                &[entry.display().to_string(), describe_unknown(&unknown)],
            ));
        }
        let (next, done) = learn_step(table, &unknown, console);
        table = next;
        if done {
            return table;
        }
    }
}

/// Asks whether a changed working table should replace the committed one.
///
/// An empty answer, `y` or `yes` (any case) confirms; anything else,
/// including end of input, declines.
pub fn confirm_commit<C: Console + ?Sized>(console: &mut C) -> bool {
    match console.prompt_line("save changed map (y/n)? ") {
        Some(answer) => {
            let answer = answer.to_lowercase();
            answer.is_empty() || answer == "y" || answer == "yes"
        }
        None => false,
    }
}
