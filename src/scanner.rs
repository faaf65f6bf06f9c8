//! Region scanner
//!
//! A single forward pass over a document's lines that turns region markers
//! into colored line spans. Open regions are kept on a stack; only the
//! innermost one can close.
//!
//! Nested regions never share lines with their parent. When a child opens,
//! the lines the parent has accumulated so far are emitted as a span, and
//! when the child closes the parent resumes on the following line:
//!
//! ```text
//! 0  #region [#ddd]      #ddd 0-0
//! 1  #region [#aaa]      #aaa 1-3
//! 2  Test
//! 3  #endregion
//! 4  #endregion          #ddd 4-4
//! ```

use crate::color::{self, CanonicalColor};
use crate::config::Configuration;
use crate::marker::{LineKind, MarkerRules};
use crate::region::{RegionMap, RegionSpan};

/// A region that has opened but not closed yet
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenFrame {
    color: CanonicalColor,
    /// First line not yet covered by an emitted span
    start: usize,
}

/// Mutable state of one scan
///
/// Created per call so that a scanner can be shared between documents; the
/// palette cursor restarts at zero for every scan.
struct ScanSession<'a> {
    config: &'a Configuration,
    stack: Vec<OpenFrame>,
    palette_cursor: usize,
    regions: RegionMap,
}

impl<'a> ScanSession<'a> {
    fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            stack: Vec::new(),
            palette_cursor: 0,
            regions: RegionMap::new(),
        }
    }

    /// Emit a span, skipping ranges with no lines in them
    fn emit(&mut self, color: &CanonicalColor, start: usize, end: usize) {
        match RegionSpan::new(start, end) {
            Some(span) => self.regions.add(color, span),
            None => tracing::trace!(%color, start, end, "Skipping empty span"),
        }
    }

    fn handle_line(&mut self, rules: &MarkerRules, line: &str, index: usize) {
        match rules.classify(line) {
            LineKind::End => self.close(index),
            LineKind::Start { token } => self.open(&token, index),
            LineKind::Plain => {}
        }
    }

    /// Close the innermost region at `index`
    fn close(&mut self, index: usize) {
        let Some(frame) = self.stack.pop() else {
            tracing::trace!(line = index, "End marker with no open region");
            return;
        };
        self.emit(&frame.color, frame.start, index);
        if let Some(parent) = self.stack.last_mut() {
            parent.start = index + 1;
        }
        tracing::trace!(color = %frame.color, line = index, depth = self.stack.len(), "Closed region");
    }

    /// Open a region at `index`, unless no color can be found for it
    ///
    /// The parent's pending lines are flushed before the marker is resolved,
    /// so a start marker that ends up ignored still splits its parent.
    fn open(&mut self, token: &str, index: usize) {
        if let Some(parent) = self.stack.last().cloned() {
            if index > 0 {
                self.emit(&parent.color, parent.start, index - 1);
            }
        }

        let Some(color) = self.resolve(token) else {
            tracing::trace!(line = index, token, "Ignoring region without a color");
            return;
        };

        tracing::trace!(%color, line = index, depth = self.stack.len() + 1, "Opened region");
        self.stack.push(OpenFrame {
            color,
            start: index,
        });
    }

    /// Resolve a marker token, falling back to the next palette color
    fn resolve(&mut self, token: &str) -> Option<CanonicalColor> {
        if let Some(color) = color::resolve(token, self.config) {
            return Some(color);
        }

        let palette = self.config.color_range();
        if palette.is_empty() {
            return None;
        }
        let entry = &palette[self.palette_cursor % palette.len()];
        self.palette_cursor = (self.palette_cursor + 1) % palette.len();
        let color = color::canonicalize(entry);
        if color.is_none() {
            tracing::debug!(entry = entry.as_str(), "Invalid palette color");
        }
        color
    }

    /// Flush the innermost open region at the end of the document
    ///
    /// Outer frames have nothing left to emit: their lines up to the child's
    /// start were flushed when the child opened.
    fn finish(mut self, line_count: usize) -> RegionMap {
        if let Some(frame) = self.stack.pop() {
            if line_count > 0 {
                self.emit(&frame.color, frame.start, line_count - 1);
            }
        }
        self.regions
    }
}

/// Scans documents for colored regions
pub struct RegionScanner {
    rules: MarkerRules,
    config: Configuration,
}

impl RegionScanner {
    /// Create a scanner with the given configuration
    pub fn new(config: Configuration) -> Self {
        Self {
            rules: MarkerRules::new(),
            config,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Replace the configuration used by later scans
    pub fn set_configuration(&mut self, config: Configuration) {
        self.config = config;
    }

    /// Scan a whole document, splitting it on `\n`
    ///
    /// A trailing newline yields a final empty line, which an unterminated
    /// region extends over.
    pub fn scan(&self, text: &str) -> RegionMap {
        self.scan_lines(text.split('\n'))
    }

    /// Scan a document given as lines
    pub fn scan_lines<I, S>(&self, lines: I) -> RegionMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = ScanSession::new(&self.config);
        let mut line_count = 0;
        for (index, line) in lines.into_iter().enumerate() {
            session.handle_line(&self.rules, line.as_ref(), index);
            line_count = index + 1;
        }
        let regions = session.finish(line_count);
        tracing::debug!(
            lines = line_count,
            colors = regions.len(),
            spans = regions.span_count(),
            "Scanned document"
        );
        regions
    }
}

impl Default for RegionScanner {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}
