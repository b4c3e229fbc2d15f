//! Substitution rule tables used to sanitize file names.
//!
//! A [`RuleTable`] maps patterns to replacements. Iteration is always longest
//! pattern first, then lexicographic, and that one ordering drives both name
//! transformation and unknown-character detection.
//!
//! # Examples
//!
//! ```
//! use autorename::rule_table::{Rule, RuleTable};
//!
//! let mut table = RuleTable::seed();
//! table.insert(Rule::new("ä", "ae").unwrap());
//! assert_eq!(table.apply("Bär.txt"), "Baer.txt");
//! assert!(table.find_unknown("Bär.txt").is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single pattern to replacement pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The substring to look for. Never empty.
    pub pattern: String,
    /// The text substituted for every occurrence of the pattern. May be empty.
    pub replacement: String,
}

impl Rule {
    /// Creates a rule, returning `None` when the pattern is empty.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Option<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return None;
        }
        Some(Self {
            pattern,
            replacement: replacement.into(),
        })
    }
}

/// Sort key for rule iteration: length descending, then lexicographic ascending.
pub fn order_key(pattern: &str) -> (Reverse<usize>, &str) {
    (Reverse(pattern.chars().count()), pattern)
}

/// An ordered set of substitution rules with unique patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<String, String>,
}

impl RuleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the built-in table: identity rules for `a-z`, `A-Z`, `0-9` and `.`.
    pub fn seed() -> Self {
        let mut table = Self::new();
        for c in ('a'..='z').chain('A'..='Z').chain('0'..='9').chain(['.']) {
            let s = c.to_string();
            table.rules.insert(s.clone(), s);
        }
        table
    }

    /// Inserts a rule, overwriting any rule with the same pattern.
    ///
    /// Returns the previous replacement for the pattern, if there was one.
    pub fn insert(&mut self, rule: Rule) -> Option<String> {
        self.rules.insert(rule.pattern, rule.replacement)
    }

    /// Returns the replacement registered for `pattern`.
    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.rules.get(pattern).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in matching order (see [`order_key`]).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut ordered: Vec<(&str, &str)> = self
            .rules
            .iter()
            .map(|(pattern, replacement)| (pattern.as_str(), replacement.as_str()))
            .collect();
        ordered.sort_by(|a, b| order_key(a.0).cmp(&order_key(b.0)));
        ordered.into_iter()
    }

    /// Returns owned copies of all rules in matching order.
    pub fn rules(&self) -> Vec<Rule> {
        self.iter()
            .map(|(pattern, replacement)| Rule {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            })
            .collect()
    }

    /// Rewrites `name` by applying every rule in order.
    ///
    /// Each rule replaces all occurrences of its pattern in the name as it
    /// stands after the previous rules, so longer patterns win over any
    /// shorter pattern contained in them.
    pub fn apply(&self, name: &str) -> String {
        let mut result = name.to_string();
        for (pattern, replacement) in self.iter() {
            if result.contains(pattern) {
                result = result.replace(pattern, replacement);
            }
        }
        result
    }

    /// Returns the characters of `name` that no rule accounts for.
    ///
    /// Every pattern is deleted from a scratch copy of the name in matching
    /// order; whatever survives is unknown. An empty set means the table can
    /// fully transform the name.
    pub fn find_unknown(&self, name: &str) -> BTreeSet<char> {
        let mut remaining = name.to_string();
        for (pattern, _) in self.iter() {
            if remaining.contains(pattern) {
                remaining = remaining.replace(pattern, "");
            }
        }
        remaining.chars().collect()
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut table = Self::new();
        for rule in iter {
            table.insert(rule);
        }
        table
    }
}

/// Lists the rules in matching order, quoted so that spaces and empty
/// replacements stay visible: `{"ab" => "x", "b" => "b"}`.
impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (pattern, replacement)) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?} => {:?}", pattern, replacement)?;
        }
        write!(f, "}}")
    }
}

/// Renders an unknown-character set as `[a, b]` for status lines.
pub fn describe_unknown(unknown: &BTreeSet<char>) -> String {
    let chars: Vec<String> = unknown.iter().map(|c| c.to_string()).collect();
    format!("[{}]", chars.join(", "))
}
