//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{FuriganaArgs, OutputFormat};
use crate::dictionary::{ReadingSlice, Segment};
use crate::error::Result;
use crate::matcher::Match;

/// Result structure for a structured dictionary build.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildDictResult {
    pub input: String,
    pub output: String,
    pub total: usize,
    pub kept: usize,
    pub inferred: usize,
    pub uncertain: usize,
    pub duration_ms: u64,
}

/// Result structure for file annotation.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotateResult {
    pub output: String,
    pub paragraphs: usize,
    pub japanese_paragraphs: usize,
    pub annotated_paragraphs: usize,
    pub ruby_pairs: usize,
    pub missing_kanji: usize,
    pub missing_report: Option<String>,
    pub duration_ms: u64,
}

/// Result structure for a lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub text: String,
    pub matches: Vec<Match>,
    pub uncovered: Vec<char>,
}

/// Result structure for reading inference.
#[derive(Debug, Serialize, Deserialize)]
pub struct InferResult {
    pub surface: String,
    pub reading: String,
    pub map: Vec<ReadingSlice>,
    pub segments: Vec<Segment>,
    pub uncertain: bool,
}

/// Dictionary statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryStatsResult {
    pub path: String,
    pub entries: usize,
    pub with_map: usize,
    pub uncertain: usize,
    pub dropped: usize,
    pub by_key_length: BTreeMap<usize, usize>,
    pub matching: Option<Vec<EntrySummary>>,
}

/// One dictionary entry in a listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntrySummary {
    pub surface: String,
    pub reading: String,
    pub mapped: bool,
    pub uncertain: bool,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &FuriganaArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &FuriganaArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match std::any::type_name::<T>() {
        name if name.ends_with("LookupResult") => output_lookup_human(&value),
        name if name.ends_with("InferResult") => output_infer_human(&value),
        name if name.ends_with("DictionaryStatsResult") => output_stats_human(&value),
        _ => output_generic_human(&value),
    }
}

/// Output lookup results in human format.
fn output_lookup_human(value: &serde_json::Value) -> Result<()> {
    if let Some(matches) = value.get("matches").and_then(|m| m.as_array()) {
        println!("Matches:");
        println!("════════");
        for m in matches {
            let start = m.get("start").and_then(|v| v.as_u64()).unwrap_or(0);
            let end = m.get("end").and_then(|v| v.as_u64()).unwrap_or(0);
            let surface = m.get("surface").and_then(|v| v.as_str()).unwrap_or("");
            let reading = m.get("reading").and_then(|v| v.as_str()).unwrap_or("");
            let flag = if m.get("uncertain").and_then(|v| v.as_bool()).unwrap_or(false) {
                " (uncertain)"
            } else {
                ""
            };
            println!("[{start}, {end})  {surface}  {reading}{flag}");
            if let Some(slices) = m.get("map").and_then(|v| v.as_array()) {
                println!("    {}", format_map(slices));
            }
        }
    }

    if let Some(uncovered) = value.get("uncovered").and_then(|u| u.as_array())
        && !uncovered.is_empty()
    {
        println!();
        println!("Uncovered kanji: {}", format_chars(uncovered));
    }
    Ok(())
}

/// Output an inference in human format.
fn output_infer_human(value: &serde_json::Value) -> Result<()> {
    let surface = value.get("surface").and_then(|v| v.as_str()).unwrap_or("");
    let reading = value.get("reading").and_then(|v| v.as_str()).unwrap_or("");
    println!("{surface} → {reading}");

    if let Some(slices) = value.get("map").and_then(|v| v.as_array()) {
        println!("Map: {}", format_map(slices));
    }
    if let Some(uncertain) = value.get("uncertain").and_then(|v| v.as_bool()) {
        println!("Uncertain: {uncertain}");
    }
    Ok(())
}

/// Output dictionary statistics in human format.
fn output_stats_human(value: &serde_json::Value) -> Result<()> {
    println!("Dictionary Statistics:");
    println!("═════════════════════");

    for (key, label) in [
        ("path", "Path"),
        ("entries", "Entries"),
        ("with_map", "Entries with map"),
        ("uncertain", "Uncertain entries"),
        ("dropped", "Dropped while loading"),
    ] {
        if let Some(val) = value.get(key) {
            println!("{label}: {}", format_value(val));
        }
    }

    if let Some(lengths) = value.get("by_key_length").and_then(|l| l.as_object()) {
        println!();
        println!("Entries by surface length:");
        println!("──────────────────────────");
        for (length, count) in lengths {
            println!("  {length:>2}: {}", format_value(count));
        }
    }

    if let Some(entries) = value.get("matching").and_then(|m| m.as_array()) {
        println!();
        println!("Matching entries:");
        println!("─────────────────");
        for entry in entries {
            let surface = entry.get("surface").and_then(|v| v.as_str()).unwrap_or("");
            let reading = entry.get("reading").and_then(|v| v.as_str()).unwrap_or("");
            println!("  {surface}  {reading}");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &FuriganaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}

/// Format serialized reading slices as `漢:かん 字:じ`.
fn format_map(slices: &[serde_json::Value]) -> String {
    slices
        .iter()
        .map(|slice| {
            let ch = slice.get("ch").and_then(|v| v.as_str()).unwrap_or("?");
            match slice.get("rt").and_then(|v| v.as_str()) {
                Some("") | None => format!("{ch}:-"),
                Some(rt) => format!("{ch}:{rt}"),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_chars(chars: &[serde_json::Value]) -> String {
    chars.iter().filter_map(|c| c.as_str()).collect()
}
