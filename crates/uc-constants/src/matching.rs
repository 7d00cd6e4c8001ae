//! Name queries: literal or regular expression.

use regex::Regex;
use uc_core::{UcError, UcResult};

/// How a constant name is queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpec {
    /// Exact name; case-insensitive matches are used only when no exact one exists.
    Literal(String),
    /// Regular expression searched within each name.
    Regex(String),
}

/// Quality of a name match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NameMatch {
    None,
    Folded,
    Exact,
}

impl MatchSpec {
    pub fn literal(name: impl Into<String>) -> Self {
        MatchSpec::Literal(name.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        MatchSpec::Regex(pattern.into())
    }

    /// Build from a pattern and a `use_regex` toggle.
    pub fn new(pattern: impl Into<String>, use_regex: bool) -> Self {
        if use_regex {
            MatchSpec::regex(pattern)
        } else {
            MatchSpec::literal(pattern)
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            MatchSpec::Literal(s) | MatchSpec::Regex(s) => s,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, MatchSpec::Regex(_))
    }

    pub(crate) fn compile(&self) -> UcResult<NameMatcher> {
        match self {
            MatchSpec::Literal(s) => Ok(NameMatcher::Literal(s.trim().to_string())),
            MatchSpec::Regex(s) => Regex::new(s)
                .map(NameMatcher::Regex)
                .map_err(|e| UcError::InvalidPattern {
                    pattern: s.clone(),
                    message: e.to_string(),
                }),
        }
    }
}

pub(crate) enum NameMatcher {
    Literal(String),
    Regex(Regex),
}

impl NameMatcher {
    pub(crate) fn quality(&self, name: &str) -> NameMatch {
        match self {
            NameMatcher::Literal(q) if q == name => NameMatch::Exact,
            NameMatcher::Literal(q) if q.to_lowercase() == name.to_lowercase() => {
                NameMatch::Folded
            }
            NameMatcher::Literal(_) => NameMatch::None,
            NameMatcher::Regex(re) if re.is_match(name) => NameMatch::Exact,
            NameMatcher::Regex(_) => NameMatch::None,
        }
    }

    /// Best quality over all of an entry's names.
    pub(crate) fn best<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> NameMatch {
        names
            .into_iter()
            .map(|n| self.quality(n))
            .max()
            .unwrap_or(NameMatch::None)
    }
}
