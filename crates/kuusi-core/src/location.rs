//! Router locations.
//!
//! The router owns the authoritative location; the core only reads it and
//! requests replacements. A [`Location`] is always normalized, so two paths
//! that the router would render identically compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized route path.
///
/// Normalization drops the query string and fragment, collapses repeated
/// slashes, removes a trailing slash, and maps the empty path to `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Normalize `raw` into a location.
    pub fn new(raw: &str) -> Self {
        let path = raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let mut normalized = String::with_capacity(path.len() + 1);
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }
        Self(normalized)
    }

    /// The root path.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Borrow the normalized path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, without the leading slash.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Location {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}
