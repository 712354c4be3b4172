//! # Furigana
//!
//! Dictionary-driven furigana alignment for Japanese text.
//!
//! ## Features
//!
//! - Reading dictionary normalization with a single entry shape
//! - Offline per-character reading inference for compound entries
//! - Greedy longest-match search with coverage tracking
//! - Ruby annotation that keeps every source run's formatting
//! - HTML, parenthetical and bracket renderers
//!
//! ## Example
//!
//! ```
//! use furigana::prelude::*;
//!
//! let dictionary = Dictionary::from_readings([("品質管理", "ひんしつかんり"), ("品質", "ひんしつ")]);
//! let annotator = Annotator::new(&dictionary);
//! let mut missing = MissingKanjiSet::new();
//!
//! let html = annotator.annotate_text("品質管理です", &HtmlRuby, &mut missing);
//! assert_eq!(html, "<ruby>品質管理<rt>ひんしつかんり</rt></ruby>です");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod matcher;
pub mod render;
pub mod splice;

pub mod prelude {
    pub use crate::config::FuriganaConfig;
    pub use crate::dictionary::{Dictionary, DictionaryEntry, ReadingSlice};
    pub use crate::document::{Annotator, DocumentStats};
    pub use crate::error::{FuriganaError, Result};
    pub use crate::matcher::{Match, MatchFinder, MatcherConfig, MissingKanjiSet};
    pub use crate::render::{Bracket, HtmlRuby, Parenthetical, RenderStyle, Renderer};
    pub use crate::splice::{AnnotatedUnit, Formatting, RubyStyle, RunFormatting, Splicer, TextRun};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
