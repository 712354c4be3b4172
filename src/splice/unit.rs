//! Input runs and annotated output units.

use serde::{Deserialize, Serialize};

/// One formatted run of a paragraph, as handed over by the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun<H> {
    pub text: String,
    pub formatting: H,
}

impl<H> TextRun<H> {
    pub fn new<S: Into<String>>(text: S, formatting: H) -> Self {
        TextRun {
            text: text.into(),
            formatting,
        }
    }
}

impl TextRun<()> {
    /// A run without formatting.
    pub fn plain<S: Into<String>>(text: S) -> Self {
        TextRun::new(text, ())
    }
}

/// One unit of spliced output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotatedUnit<H> {
    /// Unannotated text carrying its source formatting verbatim.
    PlainText { text: String, formatting: H },
    /// A base string with its reading rendered above it.
    RubyPair {
        base: String,
        reading: String,
        base_formatting: H,
        reading_formatting: H,
    },
}

impl<H> AnnotatedUnit<H> {
    pub fn plain<S: Into<String>>(text: S, formatting: H) -> Self {
        AnnotatedUnit::PlainText {
            text: text.into(),
            formatting,
        }
    }

    /// The text as it reads without annotation.
    pub fn text(&self) -> &str {
        match self {
            AnnotatedUnit::PlainText { text, .. } => text,
            AnnotatedUnit::RubyPair { base, .. } => base,
        }
    }

    pub fn reading(&self) -> Option<&str> {
        match self {
            AnnotatedUnit::PlainText { .. } => None,
            AnnotatedUnit::RubyPair { reading, .. } => Some(reading),
        }
    }

    pub fn is_ruby(&self) -> bool {
        matches!(self, AnnotatedUnit::RubyPair { .. })
    }
}

/// Concatenated text of a unit sequence with all readings dropped.
pub fn base_text<H>(units: &[AnnotatedUnit<H>]) -> String {
    units.iter().map(AnnotatedUnit::text).collect()
}
