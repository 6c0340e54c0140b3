//! Ordered regex tables used by the field extractors.
//!
//! Each field keeps its patterns in one `LazyLock<Vec<FieldPattern<T>>>` so the
//! priority order is visible in a single place. The first pattern whose match
//! converts successfully wins; a conversion failure (e.g. a number that does
//! not parse) moves on to the next match, then to the next pattern.

use regex::{Captures, Regex};

/// Converts one regex match into a field value. Receives the full haystack so
/// the converter can inspect surrounding context.
pub type Converter<T> = fn(&str, &Captures<'_>) -> Option<T>;

/// A compiled pattern with its converter.
pub struct FieldPattern<T> {
    regex: Regex,
    convert: Converter<T>,
    description: &'static str,
}

impl<T> FieldPattern<T> {
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// First successfully converted match of this pattern in `text`.
    pub fn find(&self, text: &str) -> Option<T> {
        self.regex
            .captures_iter(text)
            .find_map(|caps| (self.convert)(text, &caps))
    }
}

/// Compile a field pattern. Patterns are literals, so a compile failure is a
/// programming error.
pub fn pattern<T>(
    regex: &str,
    convert: Converter<T>,
    description: &'static str,
) -> FieldPattern<T> {
    FieldPattern {
        regex: Regex::new(regex).expect("valid regex"),
        convert,
        description,
    }
}

/// Walk `patterns` in priority order and return the first converted value.
pub fn first_match<T>(patterns: &[FieldPattern<T>], text: &str) -> Option<T> {
    patterns.iter().find_map(|p| {
        let value = p.find(text)?;
        tracing::trace!(pattern = p.description(), "field pattern matched");
        Some(value)
    })
}

/// Capture group `index` as trimmed text.
pub fn group<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index).map(|m| m.as_str().trim())
}
