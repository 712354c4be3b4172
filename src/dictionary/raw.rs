//! Raw dictionary values as they appear in dictionary JSON files.
//!
//! Two schemas coexist in the wild:
//!
//! ```json
//! {
//!   "寿司": "すし",
//!   "取得": { "rt": "しゅとく", "map": [{ "i": 0, "ch": "取", "rt": "しゅ" }] },
//!   "品質管理": { "reading": "ひんしつかんり", "segments": [{ "s": [0, 2], "rt": "ひんしつ" }] }
//! }
//! ```
//!
//! [`RawValue`] captures both without failing on malformed members; the
//! normalizer decides what survives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dictionary value before normalization.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawValue {
    /// Legacy schema: the value is the reading itself.
    Reading(String),
    /// Structured schema.
    Record(RawRecord),
    /// Anything else (numbers, arrays, null). Always dropped.
    Unsupported(Value),
}

/// A structured dictionary value.
///
/// Members are kept as loose JSON so that one malformed `map` item degrades
/// the entry instead of failing the whole file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiragana: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertain: Option<Value>,
}

impl RawRecord {
    fn from_object(mut object: Map<String, Value>) -> Self {
        RawRecord {
            rt: object.remove("rt"),
            reading: object.remove("reading"),
            hiragana: object.remove("hiragana"),
            map: object.remove("map"),
            segments: object.remove("segments"),
            uncertain: object.remove("uncertain"),
        }
    }

    /// The first non-empty string among `rt`, `reading` and `hiragana`, trimmed.
    pub fn reading(&self) -> Option<&str> {
        [&self.rt, &self.reading, &self.hiragana]
            .into_iter()
            .filter_map(|value| value.as_ref()?.as_str())
            .map(str::trim)
            .find(|reading| !reading.is_empty())
    }

    /// The `uncertain` flag written by the dictionary builder.
    pub fn is_uncertain(&self) -> bool {
        self.uncertain.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }

    /// The `map` member, unless absent or `null`.
    pub fn explicit_map(&self) -> Option<&Value> {
        self.map.as_ref().filter(|value| !value.is_null())
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(reading) => RawValue::Reading(reading),
            Value::Object(object) => RawValue::Record(RawRecord::from_object(object)),
            other => RawValue::Unsupported(other),
        }
    }
}

impl From<&str> for RawValue {
    fn from(reading: &str) -> Self {
        RawValue::Reading(reading.to_string())
    }
}

impl RawValue {
    /// The trimmed whole-entry reading, if this value carries a usable one.
    pub fn reading(&self) -> Option<&str> {
        match self {
            RawValue::Reading(reading) => Some(reading.trim()).filter(|r| !r.is_empty()),
            RawValue::Record(record) => record.reading(),
            RawValue::Unsupported(_) => None,
        }
    }
}
