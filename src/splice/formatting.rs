//! Run formatting handles and the ruby sizing overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute key for the run font size in half-points.
pub const FONT_SIZE: &str = "sz";
/// Attribute key for the complex-script font size in half-points.
pub const FONT_SIZE_CS: &str = "szCs";
pub const HIGHLIGHT: &str = "highlight";
pub const SHADING: &str = "shd";

/// An opaque formatting handle owned by the document container.
///
/// The splicer copies handles around without looking inside them. The only
/// edits it ever asks for are the two ruby overrides below.
pub trait RunFormatting: Clone {
    /// A copy of this handle rendered at `half_points` (1/2 pt units).
    fn with_font_size(&self, half_points: u32) -> Self;

    /// A copy of this handle with highlight and shading removed.
    fn without_highlight(&self) -> Self;
}

/// Runs without any formatting, such as lines of a plain-text file.
impl RunFormatting for () {
    fn with_font_size(&self, _half_points: u32) -> Self {}

    fn without_highlight(&self) -> Self {}
}

/// A generic attribute bag, keyed by container attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    attributes: BTreeMap<String, String>,
}

impl Formatting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl RunFormatting for Formatting {
    fn with_font_size(&self, half_points: u32) -> Self {
        let size = half_points.to_string();
        self.clone()
            .with(FONT_SIZE, size.clone())
            .with(FONT_SIZE_CS, size)
    }

    fn without_highlight(&self) -> Self {
        let mut formatting = self.clone();
        formatting.remove(HIGHLIGHT);
        formatting.remove(SHADING);
        formatting
    }
}

/// Sizing applied to the two halves of every ruby pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubyStyle {
    /// Base text size in half-points (22 = 11pt).
    pub base_font_size: u32,
    /// Reading text size in half-points (12 = 6pt).
    pub reading_font_size: u32,
    /// Drop highlight and shading inherited from the source run.
    pub strip_highlight: bool,
}

impl Default for RubyStyle {
    fn default() -> Self {
        RubyStyle {
            base_font_size: 22,
            reading_font_size: 12,
            strip_highlight: true,
        }
    }
}

impl RubyStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_font_size(mut self, half_points: u32) -> Self {
        self.base_font_size = half_points;
        self
    }

    pub fn reading_font_size(mut self, half_points: u32) -> Self {
        self.reading_font_size = half_points;
        self
    }

    pub fn strip_highlight(mut self, strip: bool) -> Self {
        self.strip_highlight = strip;
        self
    }

    /// Formatting for the base glyphs of a ruby pair.
    pub fn base_formatting<H: RunFormatting>(&self, source: &H) -> H {
        self.apply(source, self.base_font_size)
    }

    /// Formatting for the reading of a ruby pair.
    pub fn reading_formatting<H: RunFormatting>(&self, source: &H) -> H {
        self.apply(source, self.reading_font_size)
    }

    fn apply<H: RunFormatting>(&self, source: &H, half_points: u32) -> H {
        let sized = source.with_font_size(half_points);
        if self.strip_highlight {
            sized.without_highlight()
        } else {
            sized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighted() -> Formatting {
        Formatting::new()
            .with("b", "1")
            .with(FONT_SIZE, "28")
            .with(HIGHLIGHT, "yellow")
            .with(SHADING, "clear")
    }

    #[test]
    fn test_ruby_overrides() {
        let style = RubyStyle::default();
        let source = highlighted();

        let base = style.base_formatting(&source);
        assert_eq!(base.get(FONT_SIZE), Some("22"));
        assert_eq!(base.get(FONT_SIZE_CS), Some("22"));
        assert_eq!(base.get("b"), Some("1"));
        assert!(!base.contains(HIGHLIGHT));
        assert!(!base.contains(SHADING));

        let reading = style.reading_formatting(&source);
        assert_eq!(reading.get(FONT_SIZE), Some("12"));

        // the source handle itself is untouched
        assert_eq!(source.get(FONT_SIZE), Some("28"));
        assert_eq!(source.get(HIGHLIGHT), Some("yellow"));
    }

    #[test]
    fn test_keep_highlight() {
        let style = RubyStyle::new().strip_highlight(false).base_font_size(24);
        let base = style.base_formatting(&highlighted());
        assert_eq!(base.get(FONT_SIZE), Some("24"));
        assert_eq!(base.get(HIGHLIGHT), Some("yellow"));
    }
}
