//! Key Patterns
//!
//! Matchers for bulk lookup and invalidation. Patterns use `regex` crate
//! syntax and are searched unanchored against the full key, so `finance`
//! matches `finance:42` and `analytics:finance`; anchor with `^`/`$` for
//! prefix or exact matches. `KeyPattern::literal` skips the regex engine
//! entirely and does a plain substring search.

use std::fmt;

use regex::Regex;

use crate::error::Result;

// == Key Pattern ==
/// A compiled key matcher.
#[derive(Clone)]
pub struct KeyPattern {
    matcher: Matcher,
}

#[derive(Clone)]
enum Matcher {
    Regex(Regex),
    Substring(String),
}

impl KeyPattern {
    /// Compiles a regular expression pattern.
    ///
    /// Fails with `CacheError::InvalidPattern` on bad syntax or when the
    /// compiled program exceeds the regex size limit.
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::Regex(Regex::new(pattern)?),
        })
    }

    /// Matches keys containing `needle` verbatim. No regex is compiled, so
    /// any needle is accepted.
    pub fn literal(needle: &str) -> Self {
        Self {
            matcher: Matcher::Substring(needle.to_string()),
        }
    }

    /// Returns true if `key` matches.
    pub fn matches(&self, key: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(key),
            Matcher::Substring(needle) => key.contains(needle.as_str()),
        }
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        match &self.matcher {
            Matcher::Regex(regex) => regex.as_str(),
            Matcher::Substring(needle) => needle,
        }
    }
}

impl fmt::Debug for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyPattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
