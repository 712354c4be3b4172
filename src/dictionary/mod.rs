//! Reading dictionary: loading, normalization and offline map inference.
//!
//! A dictionary file is a JSON object mapping Japanese surface strings to
//! either a bare reading or a structured record (see [`raw`]). Loading runs the
//! [`normalizer::Normalizer`] once, so lookups only ever return
//! [`DictionaryEntry`] values.
//!
//! # Examples
//!
//! ```
//! use furigana::dictionary::Dictionary;
//!
//! let dictionary = Dictionary::from_json_str(r#"{"生産": "せいさん", "abc": "x"}"#).unwrap();
//! assert_eq!(dictionary.len(), 1);
//! assert_eq!(dictionary.get("生産").unwrap().reading, "せいさん");
//! ```

pub mod builder;
pub mod entry;
pub mod inference;
pub mod normalizer;
pub mod raw;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{FuriganaError, Result};

pub use builder::{BuildStats, DictionaryBuilder, StructuredRecord};
pub use entry::{DictionaryEntry, ReadingSlice, Segment};
pub use inference::{Inference, infer};
pub use normalizer::{NormalizeStats, Normalized, Normalizer, NormalizerConfig};
pub use raw::{RawRecord, RawValue};

/// Summary of a loaded dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryStats {
    pub entries: usize,
    pub with_map: usize,
    pub uncertain: usize,
    /// Number of entries per surface length (in characters).
    pub by_key_length: BTreeMap<usize, usize>,
}

/// A normalized reading dictionary.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: AHashMap<String, DictionaryEntry>,
    /// Keys ordered by descending character length.
    by_length: Vec<String>,
    max_key_length: usize,
    normalize_stats: NormalizeStats,
}

impl Dictionary {
    /// Build a dictionary from raw values with the default normalizer.
    pub fn from_raw<I, K>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        Self::from_raw_with(raw, &Normalizer::default())
    }

    /// Build a dictionary from raw values with a specific normalizer.
    pub fn from_raw_with<I, K>(raw: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        Self::from_normalized(normalizer.normalize(raw))
    }

    /// Build a dictionary from `(surface, reading)` pairs.
    pub fn from_readings<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_raw(
            pairs
                .into_iter()
                .map(|(surface, reading)| (surface, RawValue::from(reading))),
        )
    }

    /// Build a dictionary from already-normalized entries.
    pub fn from_normalized(normalized: Normalized) -> Self {
        let Normalized { entries, stats } = normalized;
        let max_key_length = entries
            .first()
            .map(|(key, _)| key.chars().count())
            .unwrap_or(0);
        let by_length = entries.iter().map(|(key, _)| key.clone()).collect();

        Dictionary {
            entries: entries.into_iter().collect(),
            by_length,
            max_key_length,
            normalize_stats: stats,
        }
    }

    /// Parse a dictionary from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_str_with(json, &Normalizer::default())
    }

    pub fn from_json_str_with(json: &str, normalizer: &Normalizer) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            FuriganaError::dictionary_load(format!("Failed to parse dictionary JSON: {e}"))
        })?;
        let Value::Object(table) = value else {
            return Err(FuriganaError::dictionary_load(
                "Dictionary JSON must be an object mapping surfaces to readings",
            ));
        };

        Ok(Self::from_raw_with(
            table.into_iter().map(|(key, value)| (key, RawValue::from(value))),
            normalizer,
        ))
    }

    /// Load a dictionary file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with(path, &Normalizer::default())
    }

    pub fn from_path_with<P: AsRef<Path>>(path: P, normalizer: &Normalizer) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();

        let content = fs::read_to_string(path).map_err(|e| {
            FuriganaError::dictionary_load(format!(
                "Failed to read dictionary file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let dictionary = Self::from_json_str_with(&content, normalizer).map_err(|e| match e {
            FuriganaError::DictionaryLoad(msg) => {
                FuriganaError::dictionary_load(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        info!(
            path = %path.display(),
            entries = dictionary.len(),
            dropped = dictionary.normalize_stats.total - dictionary.normalize_stats.kept,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded dictionary"
        );
        Ok(dictionary)
    }

    /// Load a dictionary file, treating an empty result as fatal.
    pub fn load_required<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dictionary = Self::from_path(path)?;
        if dictionary.is_empty() {
            return Err(FuriganaError::dictionary_load(format!(
                "Dictionary '{}' contains no usable entries",
                path.display()
            )));
        }
        Ok(dictionary)
    }

    pub fn get(&self, surface: &str) -> Option<&DictionaryEntry> {
        self.entries.get(surface)
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.entries.contains_key(surface)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length in characters of the longest surface.
    pub fn max_key_length(&self) -> usize {
        self.max_key_length
    }

    /// Entries in descending surface-length order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictionaryEntry)> {
        self.by_length
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (key.as_str(), entry)))
    }

    /// Entries whose surface contains `fragment`, longest first.
    pub fn entries_containing<'a>(
        &'a self,
        fragment: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a DictionaryEntry)> + 'a {
        self.iter().filter(move |(key, _)| key.contains(fragment))
    }

    /// What normalization kept and dropped when this dictionary was built.
    pub fn normalize_stats(&self) -> &NormalizeStats {
        &self.normalize_stats
    }

    pub fn stats(&self) -> DictionaryStats {
        let mut stats = DictionaryStats {
            entries: self.len(),
            ..Default::default()
        };
        for (key, entry) in self.iter() {
            if entry.map.is_some() {
                stats.with_map += 1;
            }
            if entry.uncertain {
                stats.uncertain += 1;
            }
            *stats.by_key_length.entry(key.chars().count()).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_readings() {
        let dictionary = Dictionary::from_readings([("生産", "せいさん"), ("品質管理", "ひんしつかんり")]);
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.max_key_length(), 4);
        let keys: Vec<_> = dictionary.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["品質管理", "生産"]);
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let err = Dictionary::from_json_str("{not json").unwrap_err();
        assert!(err.is_dictionary_load());

        let err = Dictionary::from_json_str(r#"["生産"]"#).unwrap_err();
        assert!(err.is_dictionary_load());
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = Dictionary::from_path("/nonexistent/dictionary.json").unwrap_err();
        assert!(err.is_dictionary_load());
    }

    #[test]
    fn test_load_required_rejects_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"abc": "x", "かな": "かな"}}"#).unwrap();

        let dictionary = Dictionary::from_path(file.path()).unwrap();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.normalize_stats().invalid_keys, 2);

        let err = Dictionary::load_required(file.path()).unwrap_err();
        assert!(err.is_dictionary_load());
    }

    #[test]
    fn test_stats() {
        let dictionary = Dictionary::from_json_str(
            r#"{"取得":{"rt":"しゅとく","map":[{"i":0,"rt":"しゅ"}],"uncertain":true},"寿司":"すし","生":"なま"}"#,
        )
        .unwrap();
        let stats = dictionary.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.with_map, 1);
        assert_eq!(stats.uncertain, 1);
        assert_eq!(stats.by_key_length.get(&2), Some(&2));
        assert_eq!(stats.by_key_length.get(&1), Some(&1));
    }

    #[test]
    fn test_entries_containing() {
        let dictionary = Dictionary::from_readings([
            ("生産", "せいさん"),
            ("生産管理", "せいさんかんり"),
            ("管理", "かんり"),
        ]);
        let found: Vec<_> = dictionary.entries_containing("生産").map(|(k, _)| k).collect();
        assert_eq!(found, vec!["生産管理", "生産"]);
    }
}
