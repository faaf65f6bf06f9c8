//! Region marker recognition
//!
//! Classifies a single line as a region start, a region end or plain text.
//! Markers are comment lines in any of the common dialects:
//!
//! ```text
//! #region [#ddd]          // #region [warning]      <!-- #region -->
//! -- region [rgba(0,0,0,0.1)]                       /* region [#abc] */
//! #endregion              // #endregion             <!-- #endregion -->
//! ```
//!
//! End rules are tried before start rules, so a line is never both.

use regex::Regex;

/// Comment openers that may precede the `region` keyword, in any combination
const PREFIX: &str = r"(?:<!--|/\*|//|--|\[\[|'''|;#|::|%|#|pragma\b|rem\b)";

/// Classification of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Opens a region; `token` is the raw `[ ... ]` content, empty if absent
    Start { token: String },
    /// Closes the innermost open region
    End,
    /// Anything else
    Plain,
}

/// What a matching rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Start,
    End,
}

/// A single marker pattern rule
struct MarkerRule {
    /// Name for debugging
    name: &'static str,
    /// Compiled pattern, matched against the trimmed line
    pattern: Regex,
    /// Marker kind assigned to matching lines
    kind: MarkerKind,
}

impl MarkerRule {
    /// Create a new rule, or `None` if the pattern does not compile
    fn new(name: &'static str, pattern: &str, kind: MarkerKind) -> Option<Self> {
        Regex::new(pattern).ok().map(|regex| Self {
            name,
            pattern: regex,
            kind,
        })
    }

    fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Ordered marker rules plus the option-list extractor
pub struct MarkerRules {
    /// Rules in match order: all end rules, then all start rules
    rules: Vec<MarkerRule>,
    /// Captures the `[ ... ]` content of a start marker
    options: Option<Regex>,
}

impl MarkerRules {
    /// Compile the built-in marker rules
    pub fn new() -> Self {
        let end_words = r"(?:end\s*region|region\s*end)\b";
        let candidates = [
            MarkerRule::new(
                "prefixed_end",
                &format!(r"(?i)^(?:{}\s*)+{}", PREFIX, end_words),
                MarkerKind::End,
            ),
            MarkerRule::new(
                "closing_end",
                &format!(r"(?i)^{}\s*(?:\]\]|'''|\*/)", end_words),
                MarkerKind::End,
            ),
            MarkerRule::new(
                "prefixed_start",
                &format!(r"(?i)^(?:{}\s*)+region(?:\s|\[|$)", PREFIX),
                MarkerKind::Start,
            ),
        ];

        let rules = candidates.into_iter().flatten().collect();
        let options = Regex::new(&format!(
            r"(?i)^(?:{}\s*)+region\s*\[([#\w\s.,()]*)\]",
            PREFIX
        ))
        .ok();

        Self { rules, options }
    }

    /// Classify a line
    pub fn classify(&self, line: &str) -> LineKind {
        let line = line.trim();
        let Some(rule) = self.rules.iter().find(|rule| rule.is_match(line)) else {
            return LineKind::Plain;
        };

        tracing::trace!(rule = rule.name, line, "Marker matched");
        match rule.kind {
            MarkerKind::End => LineKind::End,
            MarkerKind::Start => LineKind::Start {
                token: self.option_token(line),
            },
        }
    }

    /// Extract the raw `[ ... ]` content of a start marker
    ///
    /// Missing or malformed option lists give an empty token.
    fn option_token(&self, line: &str) -> String {
        self.options
            .as_ref()
            .and_then(|options| options.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }
}

impl Default for MarkerRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(token: &str) -> LineKind {
        LineKind::Start {
            token: token.to_string(),
        }
    }

    #[test]
    fn test_all_rules_compile() {
        let rules = MarkerRules::new();
        assert_eq!(rules.rules.len(), 3);
        assert!(rules.options.is_some());
    }

    #[test]
    fn test_start_markers_across_dialects() {
        let rules = MarkerRules::new();
        let lines = [
            "#region",
            "// region",
            "//#region",
            "-- region",
            "/* region */",
            "''' region",
            "#pragma region",
            "pragma region",
            "% region",
            ";#region",
            ":: region",
            "REM region",
            "rem #region",
            "<!-- #region -->",
            "--[[ region",
            "   #Region   ",
            "#REGION Some title",
        ];
        for line in lines {
            assert_eq!(rules.classify(line), start(""), "line {:?}", line);
        }
    }

    #[test]
    fn test_end_markers_across_dialects() {
        let rules = MarkerRules::new();
        let lines = [
            "#endregion",
            "# end region",
            "//#endregion",
            "// region end",
            "-- endregion",
            "<!-- #endregion -->",
            "/* endregion */",
            "#pragma endregion",
            "REM endregion",
            ":: EndRegion",
            "endregion ]]",
            "endregion '''",
            "region end */",
        ];
        for line in lines {
            assert_eq!(rules.classify(line), LineKind::End, "line {:?}", line);
        }
    }

    #[test]
    fn test_option_token() {
        let rules = MarkerRules::new();
        assert_eq!(rules.classify("#region [#ddd]"), start("#ddd"));
        assert_eq!(rules.classify("//#region[ #f9aede55 ] note"), start("#f9aede55"));
        assert_eq!(rules.classify("//#region[ # f9 ae de ] note"), start("# f9 ae de"));
        assert_eq!(rules.classify("-- region [My Color]"), start("My Color"));
        assert_eq!(
            rules.classify("/* region [rgba(1, 2, 3, 0.5)] */"),
            start("rgba(1, 2, 3, 0.5)")
        );
    }

    #[test]
    fn test_malformed_options_give_empty_token() {
        let rules = MarkerRules::new();
        assert_eq!(rules.classify("#region [red; blue]"), start(""));
        assert_eq!(rules.classify("#region [unclosed"), start(""));
        assert_eq!(rules.classify("#region []"), start(""));
    }

    #[test]
    fn test_plain_lines() {
        let rules = MarkerRules::new();
        let lines = [
            "",
            "Test",
            "let region = 4;",
            "// regional office",
            "#regions",
            "# region: title",
            "x = 1 # region",
            "#region-name",
            "remregion",
        ];
        for line in lines {
            assert_eq!(rules.classify(line), LineKind::Plain, "line {:?}", line);
        }
    }

    #[test]
    fn test_end_checked_before_start() {
        let rules = MarkerRules::new();
        assert_eq!(rules.classify("#region end"), LineKind::End);
        assert_eq!(rules.classify("# region end [#fff]"), LineKind::End);
    }

    #[test]
    fn test_end_word_must_stand_alone() {
        let rules = MarkerRules::new();
        assert_eq!(rules.classify("#region endless"), start(""));
    }
}
