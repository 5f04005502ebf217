use std::fmt;

use crate::error::{Error, Result};

/// Ref namespaces stripped before a branch name is normalized.
const REF_PREFIXES: &[&str] = &["refs/heads/", "refs/tags/"];

/// Turn a branch name or ref into a token made only of `[A-Za-z0-9-]`.
///
/// A leading `refs/heads/` (or `refs/tags/`) is removed and every other
/// character is replaced with `-`, one dash per character. Surrounding
/// whitespace is ignored. The result may be empty.
pub fn normalize_branch(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = REF_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);

    stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// How the branch token is turned into a match pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The bare token, found anywhere in the label.
    Loose,
    /// `-<token>.`, so `feature-1` does not match versions of `feature-10`.
    #[default]
    Strict,
}

/// Substring used to recognise versions published from a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    token: String,
    mode: MatchMode,
    pattern: String,
}

impl MatchPattern {
    /// Build the pattern for `branch`.
    ///
    /// A branch whose token has no ASCII letter or digit is rejected. That
    /// covers empty input as well as names made only of punctuation, whose
    /// dash-only token would match almost any prerelease in loose mode.
    pub fn new(branch: &str, mode: MatchMode) -> Result<Self> {
        let token = normalize_branch(branch);
        if !token.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::EmptyBranch);
        }

        let pattern = match mode {
            MatchMode::Loose => token.clone(),
            MatchMode::Strict => format!("-{}.", token),
        };

        Ok(MatchPattern {
            token,
            mode,
            pattern,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, label: &str) -> bool {
        label.contains(&self.pattern)
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
