//! Dictionary normalization.
//!
//! Resolves the two raw value schemas into [`DictionaryEntry`], validates keys
//! and maps, and orders the result by descending surface length.
//!
//! Invalid entries are dropped silently and counted; a malformed `map` only
//! downgrades its entry to reading-only.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::analysis::char_class::{has_latin_or_digit, is_kanji};
use crate::dictionary::entry::{DictionaryEntry, ReadingSlice};
use crate::dictionary::raw::{RawRecord, RawValue};

/// Configuration for dictionary normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Longest accepted surface, in characters.
    pub max_key_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig { max_key_length: 12 }
    }
}

/// Counters describing what normalization kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    pub total: usize,
    pub kept: usize,
    pub invalid_keys: usize,
    pub missing_readings: usize,
    pub maps_dropped: usize,
    pub maps_from_segments: usize,
}

/// Output of [`Normalizer::normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Entries sorted by descending surface length, then by surface.
    pub entries: Vec<(String, DictionaryEntry)>,
    pub stats: NormalizeStats,
}

/// Normalizes raw dictionary tables.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Normalizer { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Whether `key` may be a dictionary surface.
    ///
    /// A key must be 1 to `max_key_length` characters long, contain at least
    /// one Kanji and contain no Latin letters or ASCII digits.
    pub fn is_valid_key(&self, key: &str) -> bool {
        let len = key.chars().count();
        (1..=self.config.max_key_length).contains(&len)
            && key.chars().any(is_kanji)
            && !has_latin_or_digit(key)
    }

    /// Normalize a raw table.
    pub fn normalize<I, K>(&self, raw: I) -> Normalized
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        let mut stats = NormalizeStats::default();
        let mut entries = Vec::new();

        for (key, value) in raw {
            stats.total += 1;
            let key = key.into();
            if !self.is_valid_key(&key) {
                stats.invalid_keys += 1;
                continue;
            }
            match normalize_value(&key, &value, &mut stats) {
                Some(entry) => entries.push((key, entry)),
                None => stats.missing_readings += 1,
            }
        }

        entries.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        entries.dedup_by(|(a, _), (b, _)| a == b);
        stats.kept = entries.len();

        debug!(
            total = stats.total,
            kept = stats.kept,
            invalid_keys = stats.invalid_keys,
            missing_readings = stats.missing_readings,
            maps_dropped = stats.maps_dropped,
            "normalized dictionary"
        );

        Normalized { entries, stats }
    }
}

fn normalize_value(key: &str, value: &RawValue, stats: &mut NormalizeStats) -> Option<DictionaryEntry> {
    let reading = value.reading()?;
    let entry = DictionaryEntry::new(reading);

    let RawValue::Record(record) = value else {
        return Some(entry);
    };

    let surface: Vec<char> = key.chars().collect();
    let map = match record.explicit_map() {
        Some(map) => {
            let parsed = parse_map(map, &surface);
            if parsed.is_none() {
                stats.maps_dropped += 1;
            }
            parsed
        }
        None => {
            let expanded = expand_segments(record, &surface);
            if expanded.is_some() {
                stats.maps_from_segments += 1;
            }
            expanded
        }
    };

    Some(match map.and_then(|slices| finalize_map(slices, &surface)) {
        Some(map) => entry.with_map(map).with_uncertain(record.is_uncertain()),
        None => entry,
    })
}

/// Parse an explicit `map` array. Any malformed item rejects the whole map.
fn parse_map(value: &Value, surface: &[char]) -> Option<Vec<ReadingSlice>> {
    value
        .as_array()?
        .iter()
        .map(|item| {
            let item = item.as_object()?;
            let index = usize::try_from(item.get("i")?.as_u64()?).ok()?;
            let reading = item.get("rt")?.as_str()?;
            let ch = *surface.get(index)?;
            Some(ReadingSlice::new(index, ch, reading))
        })
        .collect()
}

/// Expand legacy `segments` into a per-character map.
///
/// Every Kanji inside a segment's span receives the segment's full reading;
/// malformed segments are skipped.
fn expand_segments(record: &RawRecord, surface: &[char]) -> Option<Vec<ReadingSlice>> {
    let segments = record.segments.as_ref()?.as_array()?;
    let mut slices = Vec::new();

    for segment in segments {
        let Some((start, end, reading)) = parse_segment(segment) else {
            continue;
        };
        for index in start..end.min(surface.len()) {
            if is_kanji(surface[index]) {
                slices.push(ReadingSlice::new(index, surface[index], reading));
            }
        }
    }

    (!slices.is_empty()).then_some(slices)
}

fn parse_segment(segment: &Value) -> Option<(usize, usize, &str)> {
    let span = segment.get("s")?.as_array()?;
    let [start, end] = span.as_slice() else {
        return None;
    };
    let start = usize::try_from(start.as_u64()?).ok()?;
    let end = usize::try_from(end.as_u64()?).ok()?;
    let reading = segment.get("rt")?.as_str()?;
    Some((start, end, reading))
}

/// Enforce the map invariant: unique ascending indices pointing at Kanji.
///
/// The first slice for an index wins. An empty result means reading-only.
fn finalize_map(mut slices: Vec<ReadingSlice>, surface: &[char]) -> Option<Vec<ReadingSlice>> {
    let mut seen = ahash::AHashSet::new();
    slices.retain(|slice| is_kanji(surface[slice.index]) && seen.insert(slice.index));
    slices.sort_by_key(|slice| slice.index);
    (!slices.is_empty()).then_some(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Vec<(String, RawValue)> {
        let table: serde_json::Map<String, Value> = serde_json::from_str(json).unwrap();
        table
            .into_iter()
            .map(|(k, v)| (k, RawValue::from(v)))
            .collect()
    }

    fn normalize(json: &str) -> Normalized {
        Normalizer::default().normalize(raw(json))
    }

    #[test]
    fn test_key_validation() {
        let normalizer = Normalizer::default();
        assert!(normalizer.is_valid_key("生産"));
        assert!(normalizer.is_valid_key("食べ物"));
        assert!(!normalizer.is_valid_key(""));
        assert!(!normalizer.is_valid_key("ひらがな"));
        assert!(!normalizer.is_valid_key("A型"));
        assert!(!normalizer.is_valid_key("第3"));
        assert!(!normalizer.is_valid_key("一二三四五六七八九十百千万"));
        assert!(normalizer.is_valid_key("一二三四五六七八九十百千"));
    }

    #[test]
    fn test_bare_string_reading() {
        let normalized = normalize(r#"{"寿司":" すし "}"#);
        assert_eq!(normalized.entries.len(), 1);
        let (key, entry) = &normalized.entries[0];
        assert_eq!(key, "寿司");
        assert_eq!(entry.reading, "すし");
        assert!(entry.map.is_none());
    }

    #[test]
    fn test_missing_reading_drops_entry() {
        let normalized = normalize(r#"{"寿司":"", "取得":{"map":[]}, "生産":7}"#);
        assert!(normalized.entries.is_empty());
        assert_eq!(normalized.stats.missing_readings, 3);
    }

    #[test]
    fn test_explicit_map() {
        let normalized =
            normalize(r#"{"取得":{"rt":"しゅとく","map":[{"i":1,"ch":"得","rt":"とく"},{"i":0,"ch":"取","rt":"しゅ"}],"uncertain":true}}"#);
        let entry = &normalized.entries[0].1;
        let map = entry.map.as_ref().unwrap();
        assert_eq!(map.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(map[0].reading, "しゅ");
        assert!(entry.uncertain);
    }

    #[test]
    fn test_out_of_range_map_falls_back_to_reading_only() {
        let normalized = normalize(r#"{"取得":{"rt":"しゅとく","map":[{"i":2,"ch":"x","rt":"と"}]}}"#);
        let entry = &normalized.entries[0].1;
        assert_eq!(entry.reading, "しゅとく");
        assert!(entry.map.is_none());
        assert_eq!(normalized.stats.maps_dropped, 1);
    }

    #[test]
    fn test_non_string_slice_reading_drops_map() {
        let normalized = normalize(r#"{"取得":{"rt":"しゅとく","map":[{"i":0,"rt":1}]}}"#);
        assert!(normalized.entries[0].1.map.is_none());
    }

    #[test]
    fn test_map_slices_on_kana_are_discarded() {
        let normalized =
            normalize(r#"{"食べ物":{"rt":"たべもの","map":[{"i":1,"rt":"べ"},{"i":0,"rt":"た"},{"i":0,"rt":"しょく"}]}}"#);
        let map = normalized.entries[0].1.map.clone().unwrap();
        assert_eq!(map, vec![ReadingSlice::new(0, '食', "た")]);
    }

    #[test]
    fn test_segments_expand() {
        let normalized =
            normalize(r#"{"品質管理":{"reading":"ひんしつかんり","segments":[{"s":[0,2],"rt":"ひんしつ"},{"s":"bad"},{"s":[2,9],"rt":"かんり"}]}}"#);
        let map = normalized.entries[0].1.map.clone().unwrap();
        let readings: Vec<_> = map.iter().map(|s| (s.index, s.reading.as_str())).collect();
        assert_eq!(
            readings,
            vec![(0, "ひんしつ"), (1, "ひんしつ"), (2, "かんり"), (3, "かんり")]
        );
        assert_eq!(normalized.stats.maps_from_segments, 1);
    }

    #[test]
    fn test_sorted_by_descending_length() {
        let normalized = normalize(r#"{"品質":"ひんしつ","品質管理":"ひんしつかんり","品":"しな"}"#);
        let keys: Vec<_> = normalized.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["品質管理", "品質", "品"]);
    }
}
