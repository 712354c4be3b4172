//! Offline structured-dictionary build.
//!
//! Converts a raw `surface -> reading` table into records that carry an
//! inferred per-character map, so documents never pay for inference.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::dictionary::entry::{ReadingSlice, Segment};
use crate::dictionary::inference::infer;
use crate::dictionary::normalizer::Normalizer;
use crate::dictionary::raw::RawValue;
use crate::error::{FuriganaError, Result};

/// One record of a structured dictionary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub rt: String,
    pub map: Vec<ReadingSlice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
    pub uncertain: bool,
}

/// Counters reported by a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub total: usize,
    pub kept: usize,
    /// Records whose map was inferred during this build.
    pub inferred: usize,
    pub uncertain: usize,
}

/// Builds structured dictionaries.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    normalizer: Normalizer,
}

impl DictionaryBuilder {
    pub fn new(normalizer: Normalizer) -> Self {
        DictionaryBuilder { normalizer }
    }

    /// Build structured records from a raw table.
    ///
    /// Entries that already carry a valid map are passed through; all others
    /// get a map inferred from their whole-entry reading.
    pub fn build<I, K>(&self, raw: I) -> (BTreeMap<String, StructuredRecord>, BuildStats)
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        let normalized = self.normalizer.normalize(raw);
        let mut stats = BuildStats {
            total: normalized.stats.total,
            ..Default::default()
        };
        let mut records = BTreeMap::new();

        for (surface, entry) in normalized.entries {
            let record = match entry.map {
                Some(map) => StructuredRecord {
                    rt: entry.reading,
                    map,
                    segments: Vec::new(),
                    uncertain: entry.uncertain,
                },
                None => {
                    stats.inferred += 1;
                    let inference = infer(&surface, &entry.reading);
                    StructuredRecord {
                        rt: entry.reading,
                        map: inference.map,
                        segments: inference.segments,
                        uncertain: inference.uncertain,
                    }
                }
            };
            if record.uncertain {
                stats.uncertain += 1;
            }
            records.insert(surface, record);
        }

        stats.kept = records.len();
        (records, stats)
    }

    /// Read a raw dictionary file and write the structured result as pretty JSON.
    pub fn build_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<BuildStats> {
        let input = input.as_ref();
        let output = output.as_ref();

        let content = fs::read_to_string(input).map_err(|e| {
            FuriganaError::dictionary_load(format!(
                "Failed to read dictionary file '{}': {}",
                input.display(),
                e
            ))
        })?;
        let table: serde_json::Map<String, Value> = serde_json::from_str(&content).map_err(|e| {
            FuriganaError::dictionary_load(format!(
                "Failed to parse dictionary JSON from '{}': {}",
                input.display(),
                e
            ))
        })?;

        let (records, stats) = self.build(
            table
                .into_iter()
                .map(|(key, value)| (key, RawValue::from(value))),
        );
        fs::write(output, serde_json::to_string_pretty(&records)?)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            total = stats.total,
            kept = stats.kept,
            uncertain = stats.uncertain,
            "built structured dictionary"
        );
        Ok(stats)
    }
}
