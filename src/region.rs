//! Region spans and per-color groups
//!
//! The scanner's output: every color that appears in a document, with the
//! inclusive line ranges it covers.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::CanonicalColor;

/// An inclusive range of lines sharing one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegionSpan {
    /// First line (0-indexed)
    pub start_line: usize,
    /// Last line, inclusive
    pub end_line: usize,
}

impl RegionSpan {
    /// Create a span, or `None` if it would be empty
    pub fn new(start_line: usize, end_line: usize) -> Option<Self> {
        (end_line >= start_line).then_some(Self {
            start_line,
            end_line,
        })
    }

    /// Check if this span contains a line
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Number of lines covered
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// All spans of one color, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionGroup {
    spans: Vec<RegionSpan>,
    /// `"start-end;"` for every span, used to detect changes between scans
    composite_key: String,
}

impl RegionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a span and extend the composite key
    pub fn push(&mut self, span: RegionSpan) {
        self.composite_key
            .push_str(&format!("{}-{};", span.start_line, span.end_line));
        self.spans.push(span);
    }

    pub fn spans(&self) -> &[RegionSpan] {
        &self.spans
    }

    pub fn composite_key(&self) -> &str {
        &self.composite_key
    }
}

/// Color to region group mapping, ordered by color
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionMap {
    groups: BTreeMap<CanonicalColor, RegionGroup>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a span for a color
    pub fn add(&mut self, color: &CanonicalColor, span: RegionSpan) {
        self.groups.entry(color.clone()).or_default().push(span);
    }

    /// Get the group for a color
    pub fn get(&self, color: &str) -> Option<&RegionGroup> {
        self.groups.get(color)
    }

    pub fn contains_color(&self, color: &CanonicalColor) -> bool {
        self.groups.contains_key(color)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CanonicalColor, RegionGroup> {
        self.groups.iter()
    }

    pub fn colors(&self) -> impl Iterator<Item = &CanonicalColor> {
        self.groups.keys()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of spans across all colors
    pub fn span_count(&self) -> usize {
        self.groups.values().map(|group| group.spans.len()).sum()
    }
}

impl<'a> IntoIterator for &'a RegionMap {
    type Item = (&'a CanonicalColor, &'a RegionGroup);
    type IntoIter = btree_map::Iter<'a, CanonicalColor, RegionGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
