//! Command implementations for the furigana CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::FuriganaConfig;
use crate::dictionary::{Dictionary, DictionaryBuilder, infer};
use crate::document::Annotator;
use crate::error::Result;
use crate::matcher::{MatchFinder, MissingKanjiSet};
use crate::render::{RenderStyle, has_ruby_markup, render};
use crate::splice::TextRun;

/// Execute a CLI command.
pub fn execute_command(args: FuriganaArgs) -> Result<()> {
    match &args.command {
        Command::BuildDict(build_args) => build_dictionary(build_args.clone(), &args),
        Command::Annotate(annotate_args) => annotate_file(annotate_args.clone(), &args),
        Command::Lookup(lookup_args) => lookup_text(lookup_args.clone(), &args),
        Command::Infer(infer_args) => infer_reading(infer_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

/// Build a structured dictionary.
fn build_dictionary(args: BuildDictArgs, cli_args: &FuriganaArgs) -> Result<()> {
    let start_time = Instant::now();
    let stats = DictionaryBuilder::default().build_file(&args.input, &args.output)?;

    output_result(
        "Structured dictionary built successfully",
        &BuildDictResult {
            input: args.input.to_string_lossy().to_string(),
            output: args.output.to_string_lossy().to_string(),
            total: stats.total,
            kept: stats.kept,
            inferred: stats.inferred,
            uncertain: stats.uncertain,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Annotate a text file line by line.
fn annotate_file(args: AnnotateArgs, cli_args: &FuriganaArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(args.config.as_deref())?;
    let dictionary = Dictionary::load_required(&args.dictionary)?;
    let annotator = Annotator::with_config(&dictionary, config.matcher, config.ruby);
    let renderer = RenderStyle::from(args.style).renderer();

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open input '{}'", args.input.display()))?;
    let reader = BufReader::new(input);
    let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;

    // Lines that already carry ruby markup pass through untouched.
    let paragraphs: Vec<Vec<TextRun<()>>> = lines
        .iter()
        .map(|line| {
            if has_ruby_markup(line) {
                Vec::new()
            } else {
                vec![TextRun::plain(line.as_str())]
            }
        })
        .collect();

    let mut missing = MissingKanjiSet::new();
    let document = if args.parallel {
        annotator.annotate_parallel(&paragraphs, &mut missing)
    } else {
        annotator.annotate(&paragraphs, &mut missing)
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output '{}'", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for (line, units) in lines.iter().zip(&document.paragraphs) {
        if units.is_empty() && has_ruby_markup(line) {
            writeln!(writer, "{line}")?;
        } else {
            writeln!(writer, "{}", render(renderer.as_ref(), units))?;
        }
    }
    writer.flush()?;
    drop(writer);

    let missing_report = match &args.missing_report {
        Some(path) => missing
            .save_report(path)?
            .then(|| path.to_string_lossy().to_string()),
        None => None,
    };
    if !missing.is_empty() && missing_report.is_none() {
        warn!(count = missing.len(), "kanji not found in dictionary");
    }

    let result = AnnotateResult {
        output: args
            .output
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "-".to_string()),
        paragraphs: document.stats.paragraphs,
        japanese_paragraphs: document.stats.japanese_paragraphs,
        annotated_paragraphs: document.stats.annotated_paragraphs,
        ruby_pairs: document.stats.ruby_pairs,
        missing_kanji: missing.len(),
        missing_report,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    // Annotated text already went to stdout; keep the summary in the log.
    if args.output.is_none() {
        info!(
            paragraphs = result.paragraphs,
            ruby_pairs = result.ruby_pairs,
            missing_kanji = result.missing_kanji,
            duration_ms = result.duration_ms,
            "annotation finished"
        );
        return Ok(());
    }
    output_result("Annotation finished", &result, cli_args)
}

/// Show the matches for a piece of text.
fn lookup_text(args: LookupArgs, cli_args: &FuriganaArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let dictionary = Dictionary::load_required(&args.dictionary)?;
    let finder = MatchFinder::with_config(&dictionary, config.matcher);
    let result = finder.find_matches(&args.text);

    output_result(
        &format!("Matches for: {}", args.text),
        &LookupResult {
            text: args.text.clone(),
            matches: result.matches,
            uncovered: result.uncovered.into_iter().collect(),
        },
        cli_args,
    )
}

/// Infer a per-character map for one entry.
fn infer_reading(args: InferArgs, cli_args: &FuriganaArgs) -> Result<()> {
    let inference = infer(&args.surface, &args.reading);

    output_result(
        "Inferred reading map",
        &InferResult {
            surface: args.surface,
            reading: args.reading,
            map: inference.map,
            segments: inference.segments,
            uncertain: inference.uncertain,
        },
        cli_args,
    )
}

/// Show dictionary statistics.
fn show_stats(args: StatsArgs, cli_args: &FuriganaArgs) -> Result<()> {
    let dictionary = Dictionary::from_path(&args.dictionary)?;
    let stats = dictionary.stats();
    let normalize_stats = dictionary.normalize_stats();

    let matching = args.containing.as_deref().map(|fragment| {
        dictionary
            .entries_containing(fragment)
            .take(args.limit)
            .map(|(surface, entry)| EntrySummary {
                surface: surface.to_string(),
                reading: entry.reading.clone(),
                mapped: entry.map.is_some(),
                uncertain: entry.uncertain,
            })
            .collect()
    });

    output_result(
        "Dictionary statistics",
        &DictionaryStatsResult {
            path: args.dictionary.to_string_lossy().to_string(),
            entries: stats.entries,
            with_map: stats.with_map,
            uncertain: stats.uncertain,
            dropped: normalize_stats.total - normalize_stats.kept,
            by_key_length: stats.by_key_length,
            matching,
        },
        cli_args,
    )
}

fn load_config(path: Option<&Path>) -> Result<FuriganaConfig> {
    match path {
        Some(path) => FuriganaConfig::from_path(path),
        None => Ok(FuriganaConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::FuriganaError;
    use clap::Parser;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_annotate_file_writes_output_and_report() {
        let dir = TempDir::new().unwrap();
        let dictionary = write(&dir, "dict.json", r#"{"生産":"せいさん","寿司":"すし"}"#);
        let input = write(
            &dir,
            "input.txt",
            "生産管理\nplain line\n<ruby>既<rt>き</rt></ruby>存\n寿司です\n",
        );
        let output = dir.path().join("out.txt");
        let report = dir.path().join("missing.txt");

        let args = FuriganaArgs::try_parse_from([
            "furigana",
            "-q",
            "annotate",
            &dictionary,
            &input,
            "-o",
            output.to_str().unwrap(),
            "--style",
            "paren",
            "--missing-report",
            report.to_str().unwrap(),
        ])
        .unwrap();
        execute_command(args).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            "生産(せいさん)管理\nplain line\n<ruby>既<rt>き</rt></ruby>存\n寿司(すし)です\n"
        );
        let report = fs::read_to_string(&report).unwrap();
        assert!(report.contains("Total: 2"));
    }

    #[test]
    fn test_annotate_rejects_empty_dictionary() {
        let dir = TempDir::new().unwrap();
        let dictionary = write(&dir, "dict.json", r#"{"abc":"x"}"#);
        let input = write(&dir, "input.txt", "生産\n");

        let args = FuriganaArgs::try_parse_from(["furigana", "-q", "annotate", &dictionary, &input]).unwrap();
        let err = execute_command(args).unwrap_err();
        assert!(err.is_dictionary_load());
    }

    #[test]
    fn test_annotate_reports_missing_input_path() {
        let dir = TempDir::new().unwrap();
        let dictionary = write(&dir, "dict.json", r#"{"生産":"せいさん"}"#);
        let input = dir.path().join("absent.txt");

        let args = FuriganaArgs::try_parse_from([
            "furigana",
            "-q",
            "annotate",
            &dictionary,
            input.to_str().unwrap(),
        ])
        .unwrap();
        let err = execute_command(args).unwrap_err();
        assert!(matches!(err, FuriganaError::Anyhow(_)));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn test_build_dict_command() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "raw.json", r#"{"食べ物":"たべもの"}"#);
        let output = dir.path().join("struct.json");

        let args = FuriganaArgs::try_parse_from([
            "furigana",
            "-q",
            "-f",
            "json",
            "build-dict",
            &input,
            output.to_str().unwrap(),
        ])
        .unwrap();
        execute_command(args).unwrap();

        let dictionary = Dictionary::from_path(&output).unwrap();
        assert!(dictionary.get("食べ物").unwrap().map.is_some());
    }
}
