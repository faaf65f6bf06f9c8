//! Color resolution for region markers
//!
//! Turns the raw token found inside a start marker's `[ ... ]` option list
//! into a [`CanonicalColor`]. Resolution tries, in order:
//!
//! 1. the configured named colors, under several normalized spellings of the
//!    token
//! 2. the token itself as a color literal (`#` hex, `rgb(r,g,b)` or
//!    `rgba(r,g,b,a)`)
//!
//! A token that resolves to nothing is reported as `None`; palette fallback is
//! the scanner's job, not the resolver's.

use std::borrow::Borrow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::Configuration;

static RGBA_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgba?\(\d{1,3},\d{1,3},\d{1,3}(?:,\d(?:\.\d+)?)?\)$").unwrap()
});

static HEX_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#(?:[0-9a-f]{3}|[0-9a-f]{4}|[0-9a-f]{6}|[0-9a-f]{8})$").unwrap()
});

/// A validated color string, usable as a region map key
///
/// Always either a `#` hex form with 3, 4, 6 or 8 digits or an `rgb(...)` /
/// `rgba(...)` form without whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalColor(String);

impl CanonicalColor {
    /// Get the color as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CanonicalColor {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip every whitespace character from a string
pub(crate) fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate a color literal and return its canonical form
///
/// Whitespace anywhere in the literal is removed first. Hex literals are cut
/// down to a prefix: 10 or more characters keep 7, 8 keep 7, 5 or 6 keep 4.
/// An 8-digit literal (9 characters) is kept whole.
pub fn canonicalize(literal: &str) -> Option<CanonicalColor> {
    let mut color = strip_whitespace(literal);
    if color.is_empty() {
        return None;
    }

    if RGBA_LITERAL.is_match(&color) {
        return Some(CanonicalColor(color));
    }

    if color.starts_with('#') && color.is_ascii() {
        match color.len() {
            n if n >= 10 => color.truncate(7),
            8 => color.truncate(7),
            5 | 6 => color.truncate(4),
            _ => {}
        }
        if HEX_LITERAL.is_match(&color) {
            return Some(CanonicalColor(color));
        }
    }

    None
}

/// Spellings of a token tried against the named color table, in order
fn lookup_variants(token: &str) -> [String; 6] {
    let trimmed = token.trim();
    let stripped = strip_whitespace(token);
    [
        token.to_string(),
        trimmed.to_string(),
        stripped.clone(),
        token.to_lowercase(),
        trimmed.to_lowercase(),
        stripped.to_lowercase(),
    ]
}

/// Resolve a single token: named lookup first, then literal validation
fn resolve_token(token: &str, config: &Configuration) -> Option<CanonicalColor> {
    if token.trim().is_empty() {
        return None;
    }

    let named = lookup_variants(token)
        .iter()
        .find_map(|variant| config.named_colors().get(variant));
    if let Some(color) = named.and_then(canonicalize) {
        return Some(color);
    }

    canonicalize(token)
}

/// Split an option list on commas that sit outside parentheses
fn split_options(token: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in token.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&token[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&token[start..]);
    parts
}

/// Resolve the raw token of a start marker to a color
///
/// The whole option list is tried as one token first. If that fails and the
/// list holds several comma-separated tokens, they are tried left to right
/// and the first one that resolves wins.
pub fn resolve(token: &str, config: &Configuration) -> Option<CanonicalColor> {
    if token.is_empty() {
        return None;
    }

    if let Some(color) = resolve_token(token, config) {
        return Some(color);
    }

    let parts = split_options(token);
    if parts.len() < 2 {
        return None;
    }
    parts
        .into_iter()
        .find_map(|part| resolve_token(part, config))
}
