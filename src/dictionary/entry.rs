//! Normalized dictionary records.
//!
//! Every downstream component sees only [`DictionaryEntry`]; the polymorphic
//! JSON shapes are resolved once in [`crate::dictionary::normalizer`].

use serde::{Deserialize, Serialize};

/// Reading assigned to one Kanji character of a surface.
///
/// An empty `reading` means the character's reading could not be determined
/// independently; renderers emit the character without ruby.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSlice {
    /// Zero-based character offset into the surface.
    #[serde(rename = "i")]
    pub index: usize,
    /// The Kanji at `index`.
    #[serde(rename = "ch")]
    pub ch: char,
    #[serde(rename = "rt")]
    pub reading: String,
}

impl ReadingSlice {
    pub fn new<S: Into<String>>(index: usize, ch: char, reading: S) -> Self {
        ReadingSlice {
            index,
            ch,
            reading: reading.into(),
        }
    }

    /// Whether this slice carries no reading of its own.
    pub fn is_blank(&self) -> bool {
        self.reading.is_empty()
    }
}

/// A contiguous surface range sharing one reading string.
///
/// Segments are the intermediate product of reading inference and the legacy
/// `segments` dictionary schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Half-open character range `[start, end)` into the surface.
    #[serde(rename = "s", with = "span")]
    pub span: (usize, usize),
    #[serde(rename = "rt")]
    pub reading: String,
}

impl Segment {
    pub fn new<S: Into<String>>(start: usize, end: usize, reading: S) -> Self {
        Segment {
            span: (start, end),
            reading: reading.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.span.0
    }

    pub fn end(&self) -> usize {
        self.span.1
    }
}

mod span {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(span: &(usize, usize), serializer: S) -> Result<S::Ok, S::Error> {
        [span.0, span.1].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(usize, usize), D::Error> {
        let [start, end] = <[usize; 2]>::deserialize(deserializer)?;
        Ok((start, end))
    }
}

/// A normalized dictionary entry.
///
/// Invariant: when `map` is present its indices are unique, ascending, inside
/// `0..surface.chars().count()`, and point at Kanji characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Whole-entry reading (kana), never empty.
    #[serde(rename = "rt")]
    pub reading: String,

    /// Per-character reading assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<ReadingSlice>>,

    /// True if `map` was inferred heuristically.
    #[serde(default)]
    pub uncertain: bool,
}

impl DictionaryEntry {
    /// Create a reading-only entry.
    pub fn new<S: Into<String>>(reading: S) -> Self {
        DictionaryEntry {
            reading: reading.into(),
            map: None,
            uncertain: false,
        }
    }

    /// Attach a per-character map.
    pub fn with_map(mut self, map: Vec<ReadingSlice>) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_uncertain(mut self, uncertain: bool) -> Self {
        self.uncertain = uncertain;
        self
    }

    /// Length of the whole-entry reading in characters.
    pub fn reading_len(&self) -> usize {
        self.reading.chars().count()
    }

    /// Reading slice for the character at `index`, if mapped.
    pub fn slice_at(&self, index: usize) -> Option<&ReadingSlice> {
        let map = self.map.as_ref()?;
        map.binary_search_by_key(&index, |slice| slice.index)
            .ok()
            .map(|pos| &map[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builders() {
        let entry = DictionaryEntry::new("とく")
            .with_map(vec![ReadingSlice::new(0, '取', "と"), ReadingSlice::new(1, '得', "")])
            .with_uncertain(true);
        assert_eq!(entry.reading_len(), 2);
        assert!(entry.uncertain);
        assert_eq!(entry.slice_at(0).map(|s| s.reading.as_str()), Some("と"));
        assert!(entry.slice_at(1).is_some_and(|s| s.is_blank()));
        assert!(entry.slice_at(2).is_none());
    }

    #[test]
    fn test_slice_serde_names() {
        let slice = ReadingSlice::new(1, '得', "とく");
        let json = serde_json::to_string(&slice).unwrap();
        assert_eq!(json, r#"{"i":1,"ch":"得","rt":"とく"}"#);
    }

    #[test]
    fn test_segment_serde_shape() {
        let segment = Segment::new(0, 2, "ひんしつ");
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(json, r#"{"s":[0,2],"rt":"ひんしつ"}"#);
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.start(), 0);
        assert_eq!(back.end(), 2);
    }

    #[test]
    fn test_reading_only_omits_map() {
        let json = serde_json::to_string(&DictionaryEntry::new("すし")).unwrap();
        assert_eq!(json, r#"{"rt":"すし","uncertain":false}"#);
    }
}
