//! Content-type driven body decoding policy.

use crate::content_type::{ContentTypePattern, PatternSet, matches_content_type};
use bytes::Bytes;
use regex::Regex;
use std::sync::LazyLock;

/// Patterns of the default text decoding class.
pub const DEFAULT_TEXT_PATTERNS: &[&str] = &["^text/", "^application/xml", "^image/svg"];
/// Patterns of the default JSON decoding class.
pub const DEFAULT_JSON_PATTERNS: &[&str] = &["^application/json"];
/// Patterns of the default binary decoding class.
pub const DEFAULT_BINARY_PATTERNS: &[&str] = &[
    "^image/",
    "^application/octet",
    "^application/pdf",
    "^application/zip",
];

fn compile(sources: &[&str]) -> Vec<Regex> {
    sources.iter().filter_map(|s| Regex::new(s).ok()).collect()
}

// compiled once, cloned into every default policy
static TEXT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DEFAULT_TEXT_PATTERNS));
static JSON_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DEFAULT_JSON_PATTERNS));
static BINARY_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DEFAULT_BINARY_PATTERNS));

fn pattern_set(regexes: &[Regex]) -> PatternSet {
    regexes.iter().cloned().map(ContentTypePattern::from).collect()
}

/// Decoding strategy selected for a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeClass {
    /// Decode as UTF-8 text
    Text,
    /// Parse as JSON
    Json,
    /// Keep raw bytes together with the content type
    Binary,
}

/// Three pattern sets consulted in the fixed order text, json, binary.
///
/// The first class with a matching pattern wins. A content type that matches
/// nothing is left undecoded.
///
/// Mutate the policy only while building a request; [`Request::send`](crate::Request::send)
/// consumes the request, so an in-flight policy cannot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingPolicy {
    text: PatternSet,
    json: PatternSet,
    binary: PatternSet,
}

impl Default for DecodingPolicy {
    fn default() -> Self {
        Self {
            text: pattern_set(&TEXT_REGEXES),
            json: pattern_set(&JSON_REGEXES),
            binary: pattern_set(&BINARY_REGEXES),
        }
    }
}

impl DecodingPolicy {
    /// Policy with every class empty; nothing is decoded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            text: PatternSet::new(),
            json: PatternSet::new(),
            binary: PatternSet::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &PatternSet {
        &self.text
    }

    #[must_use]
    pub fn json(&self) -> &PatternSet {
        &self.json
    }

    #[must_use]
    pub fn binary(&self) -> &PatternSet {
        &self.binary
    }

    pub fn text_mut(&mut self) -> &mut PatternSet {
        &mut self.text
    }

    pub fn json_mut(&mut self) -> &mut PatternSet {
        &mut self.json
    }

    pub fn binary_mut(&mut self) -> &mut PatternSet {
        &mut self.binary
    }

    /// Empty all three classes.
    pub fn clear(&mut self) {
        self.text.clear();
        self.json.clear();
        self.binary.clear();
    }

    /// Pick the decoding class for `content_type`.
    #[must_use]
    pub fn classify(&self, content_type: Option<&str>) -> Option<DecodeClass> {
        if matches_content_type(content_type, &self.text) {
            Some(DecodeClass::Text)
        } else if matches_content_type(content_type, &self.json) {
            Some(DecodeClass::Json)
        } else if matches_content_type(content_type, &self.binary) {
            Some(DecodeClass::Binary)
        } else {
            None
        }
    }
}

/// Raw body bytes tagged with the response content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: String,
}

impl Blob {
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Text(String),
    Json(serde_json::Value),
    Binary(Blob),
}

impl Decoded {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) | Self::Binary(_) => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) | Self::Binary(_) => None,
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Option<&Blob> {
        match self {
            Self::Binary(blob) => Some(blob),
            Self::Text(_) | Self::Json(_) => None,
        }
    }
}
