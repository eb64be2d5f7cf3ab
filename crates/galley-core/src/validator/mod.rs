use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

static BEGIN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\begin\{([^}]+)\}").unwrap());
static END_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\end\{([^}]+)\}").unwrap());

/// A structural problem found in the markup before compilation.
///
/// Rendering via `Display` produces the human-readable message that ends up
/// in validation reports and in `InvalidMarkup` errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind")]
pub enum EnvironmentIssue {
    /// The open and close counts for an environment differ.
    #[error("Environment '{name}' has {begins} \\begin but {ends} \\end tags")]
    Unbalanced {
        name: String,
        begins: usize,
        ends: usize,
    },
    /// An environment is closed but never opened.
    #[error("Environment '{name}' has an \\end tag without a matching \\begin")]
    EndWithoutBegin { name: String },
}

impl EnvironmentIssue {
    /// The environment name this issue refers to.
    pub fn environment(&self) -> &str {
        match self {
            EnvironmentIssue::Unbalanced { name, .. } => name,
            EnvironmentIssue::EndWithoutBegin { name } => name,
        }
    }
}

/// The outcome of one validation pass over a markup document.
///
/// Issues appear in first-seen order of environment name: unbalanced
/// environments first (ordered by their first `\begin`), then environments
/// that were closed without ever being opened (ordered by their first
/// `\end`). The order is deterministic so reports are reproducible.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<EnvironmentIssue>,
}

impl ValidationReport {
    /// `true` when no structural issues were found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable messages, one per issue, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

/// Occurrence counts for one kind of tag, remembering first-seen order.
#[derive(Debug, Default)]
struct TagCounts {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl TagCounts {
    fn collect(pattern: &Regex, markup: &str) -> Self {
        let mut tally = TagCounts::default();
        for capture in pattern.captures_iter(markup) {
            let name = &capture[1];
            match tally.counts.get_mut(name) {
                Some(count) => *count += 1,
                None => {
                    tally.counts.insert(name.to_string(), 1);
                    tally.order.push(name.to_string());
                }
            }
        }
        tally
    }

    fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }
}

/// Checks that every `\begin{name}` in `markup` is balanced by an
/// `\end{name}`.
///
/// The check compares per-name counts only; it does not verify nesting
/// order, so two documents with the same counts but different interleaving
/// validate identically. That is a documented limitation, not an oversight:
/// this pass exists to reject the common breakage cheaply, and the engine
/// remains the authority on everything else.
///
/// Pure function: no filesystem or process side effects.
pub fn validate(markup: &str) -> ValidationReport {
    let begins = TagCounts::collect(&BEGIN_TAG, markup);
    let ends = TagCounts::collect(&END_TAG, markup);

    let mut issues = Vec::new();

    for name in &begins.order {
        let opened = begins.count(name);
        let closed = ends.count(name);
        if opened != closed {
            issues.push(EnvironmentIssue::Unbalanced {
                name: name.clone(),
                begins: opened,
                ends: closed,
            });
        }
    }

    for name in &ends.order {
        if !begins.counts.contains_key(name) {
            issues.push(EnvironmentIssue::EndWithoutBegin { name: name.clone() });
        }
    }

    ValidationReport { issues }
}

#[cfg(test)]
mod tests;
