//! Content-type pattern matching.
//!
//! A [`ContentTypePattern`] is a predicate over a `Content-Type` header value.
//! Patterns are grouped into a [`PatternSet`], which keeps insertion order and
//! ignores a pattern whose source is already present.

use regex::Regex;
use std::fmt;

/// Predicate over a content-type string, backed by a compiled regex.
///
/// Two patterns are equal when their regex sources are equal.
#[derive(Clone)]
pub struct ContentTypePattern {
    regex: Regex,
}

impl ContentTypePattern {
    /// Compile a pattern from a regex source such as `^application/json`.
    ///
    /// # Errors
    /// Returns `regex::Error` if the source is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Pattern matching content types that start with `literal`.
    ///
    /// Regex metacharacters in `literal` are escaped, so `prefix("image/svg+xml")`
    /// matches the `+` literally.
    ///
    /// # Errors
    /// Returns `regex::Error` if the escaped literal exceeds the regex size limit.
    pub fn prefix(literal: &str) -> Result<Self, regex::Error> {
        Self::new(&format!("^{}", regex::escape(literal)))
    }

    /// Test the pattern against a content type.
    #[must_use]
    pub fn test(&self, content_type: &str) -> bool {
        self.regex.is_match(content_type)
    }

    /// The regex source this pattern was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl From<Regex> for ContentTypePattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

impl PartialEq for ContentTypePattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ContentTypePattern {}

impl fmt::Debug for ContentTypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentTypePattern")
            .field(&self.as_str())
            .finish()
    }
}

/// Ordered, duplicate-free collection of [`ContentTypePattern`]s.
///
/// Every clone owns its own storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<ContentTypePattern>,
}

impl PatternSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern.
    ///
    /// Returns `false` if an equal pattern was already present.
    pub fn insert(&mut self, pattern: ContentTypePattern) -> bool {
        if self.contains(&pattern) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    #[must_use]
    pub fn contains(&self, pattern: &ContentTypePattern) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentTypePattern> {
        self.patterns.iter()
    }
}

impl Extend<ContentTypePattern> for PatternSet {
    fn extend<I: IntoIterator<Item = ContentTypePattern>>(&mut self, iter: I) {
        for pattern in iter {
            self.insert(pattern);
        }
    }
}

impl FromIterator<ContentTypePattern> for PatternSet {
    fn from_iter<I: IntoIterator<Item = ContentTypePattern>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a ContentTypePattern;
    type IntoIter = std::slice::Iter<'a, ContentTypePattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns `true` iff any pattern in `patterns` matches `content_type`.
///
/// An absent content type or an empty set never matches.
#[must_use]
pub fn matches_content_type(content_type: Option<&str>, patterns: &PatternSet) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    patterns.iter().any(|p| p.test(content_type))
}
