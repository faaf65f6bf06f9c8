//! Terminal rendering of colored regions
//!
//! A [`DecorationSink`] that remembers which color each line gets and then
//! prints the document with whole-line backgrounds using crossterm.

use std::io::Write;

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
};
use unicode_width::UnicodeWidthStr;

use crate::color::CanonicalColor;
use crate::decorate::DecorationSink;
use crate::error::Result;
use crate::region::RegionSpan;

/// Decode a canonical color into terminal RGB, ignoring alpha
pub fn terminal_color(color: &CanonicalColor) -> Option<Color> {
    let s = color.as_str();
    if let Some(hex) = s.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits.len() {
            3 | 4 => Some(Color::Rgb {
                r: digits[0] * 17,
                g: digits[1] * 17,
                b: digits[2] * 17,
            }),
            6 | 8 => Some(Color::Rgb {
                r: digits[0] * 16 + digits[1],
                g: digits[2] * 16 + digits[3],
                b: digits[4] * 16 + digits[5],
            }),
            _ => None,
        };
    }

    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    let mut channels = inner.split(',').map(|part| part.parse::<u16>().ok());
    let mut next = || channels.next().flatten().map(|v| v.min(255) as u8);
    Some(Color::Rgb {
        r: next()?,
        g: next()?,
        b: next()?,
    })
}

/// Per-line background painter
#[derive(Debug, Default)]
pub struct TerminalSink {
    /// Handle index -> terminal color
    palette: Vec<Option<Color>>,
    /// Handle index -> spans currently drawn with it
    spans: Vec<Vec<RegionSpan>>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background of a line, if any region covers it
    ///
    /// Later handles win where spans overlap.
    pub fn line_background(&self, line: usize) -> Option<Color> {
        self.spans
            .iter()
            .enumerate()
            .rev()
            .find(|(_, spans)| spans.iter().any(|span| span.contains(line)))
            .and_then(|(handle, _)| self.palette[handle])
    }

    /// Print lines, painting region backgrounds across `width` columns
    pub fn write_document<W, S>(&self, out: &mut W, lines: &[S], width: usize) -> Result<()>
    where
        W: Write,
        S: AsRef<str>,
    {
        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            match self.line_background(index) {
                Some(color) => {
                    let pad = width.saturating_sub(line.width());
                    queue!(
                        out,
                        SetBackgroundColor(color),
                        Print(line),
                        Print(" ".repeat(pad)),
                        ResetColor,
                        Print("\n")
                    )?;
                }
                None => queue!(out, Print(line), Print("\n"))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl DecorationSink for TerminalSink {
    type Handle = usize;

    fn create_handle(&mut self, color: &CanonicalColor) -> usize {
        self.palette.push(terminal_color(color));
        self.spans.push(Vec::new());
        self.palette.len() - 1
    }

    fn set_decorations(&mut self, handle: &usize, spans: &[RegionSpan]) {
        if let Some(slot) = self.spans.get_mut(*handle) {
            *slot = spans.to_vec();
        }
    }
}
