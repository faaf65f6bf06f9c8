//! colored-regions - background colors for `#region` blocks
//!
//! Scans a document for comment-style region markers in many dialects,
//! resolves each marker to a color (named, literal or from a fallback
//! palette) and reports which lines each color covers.
//!
//! ```text
//! use colored_regions::{Configuration, RegionScanner};
//!
//! let scanner = RegionScanner::new(Configuration::default());
//! let regions = scanner.scan("// #region [#ddd]\nfn main() {}\n// #endregion");
//! assert_eq!(regions.get("#ddd").unwrap().composite_key(), "0-2;");
//! ```

pub mod color;
pub mod config;
pub mod decorate;
pub mod error;
pub mod marker;
pub mod paint;
pub mod region;
pub mod scanner;

pub use color::{canonicalize, resolve, CanonicalColor};
pub use config::{Configuration, NamedColors, Settings};
pub use decorate::{DecorationSink, Decorator, RenderPlan};
pub use error::{RegionError, Result};
pub use marker::{LineKind, MarkerRules};
pub use paint::TerminalSink;
pub use region::{RegionGroup, RegionMap, RegionSpan};
pub use scanner::RegionScanner;
