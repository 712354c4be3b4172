//! Command line argument parsing for the furigana CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::render::RenderStyle;

/// Furigana - dictionary-driven ruby annotation for Japanese text
#[derive(Parser, Debug, Clone)]
#[command(name = "furigana")]
#[command(about = "Dictionary-driven ruby annotation for Japanese text")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FuriganaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FuriganaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a structured dictionary with inferred per-character readings
    #[command(name = "build-dict")]
    BuildDict(BuildDictArgs),

    /// Add ruby annotations to a text file, one paragraph per line
    Annotate(AnnotateArgs),

    /// Show the dictionary matches found in a text
    Lookup(LookupArgs),

    /// Infer a per-character reading map for one entry
    Infer(InferArgs),

    /// Show dictionary statistics
    Stats(StatsArgs),
}

/// Arguments for building a structured dictionary
#[derive(Parser, Debug, Clone)]
pub struct BuildDictArgs {
    /// Raw dictionary (JSON object of surface to reading)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path for the structured dictionary
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

/// Arguments for annotating a text file
#[derive(Parser, Debug, Clone)]
pub struct AnnotateArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Input text file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Ruby rendering style
    #[arg(short, long, default_value = "html")]
    pub style: StyleArg,

    /// Write a report of Kanji missing from the dictionary
    #[arg(long, value_name = "PATH")]
    pub missing_report: Option<PathBuf>,

    /// Annotate paragraphs in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for looking up matches
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Text to search
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for reading inference
#[derive(Parser, Debug, Clone)]
pub struct InferArgs {
    /// Surface form, e.g. 食べ物
    #[arg(value_name = "SURFACE")]
    pub surface: String,

    /// Whole-entry reading, e.g. たべもの
    #[arg(value_name = "READING")]
    pub reading: String,
}

/// Arguments for dictionary statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Dictionary file
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// List entries whose surface contains this text
    #[arg(long, value_name = "TEXT")]
    pub containing: Option<String>,

    /// Maximum number of entries to list
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Ruby rendering styles available in the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleArg {
    /// <ruby>漢<rt>かん</rt></ruby>
    Html,
    /// 漢(かん)
    Paren,
    /// 漢[かん]
    Bracket,
}

impl From<StyleArg> for RenderStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Html => RenderStyle::Html,
            StyleArg::Paren => RenderStyle::Paren,
            StyleArg::Bracket => RenderStyle::Bracket,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_annotate_command() {
        let args = FuriganaArgs::try_parse_from([
            "furigana",
            "annotate",
            "dict.json",
            "input.txt",
            "-o",
            "out.html",
            "--style",
            "paren",
            "--missing-report",
            "missing.txt",
            "--parallel",
        ])
        .unwrap();

        if let Command::Annotate(annotate_args) = args.command {
            assert_eq!(annotate_args.dictionary, PathBuf::from("dict.json"));
            assert_eq!(annotate_args.input, PathBuf::from("input.txt"));
            assert_eq!(annotate_args.output, Some(PathBuf::from("out.html")));
            assert_eq!(annotate_args.style, StyleArg::Paren);
            assert_eq!(annotate_args.missing_report, Some(PathBuf::from("missing.txt")));
            assert!(annotate_args.parallel);
            assert!(annotate_args.config.is_none());
        } else {
            panic!("Expected annotate command");
        }
    }

    #[test]
    fn test_build_dict_command() {
        let args = FuriganaArgs::try_parse_from(["furigana", "build-dict", "raw.json", "struct.json"]).unwrap();

        if let Command::BuildDict(build_args) = args.command {
            assert_eq!(build_args.input, PathBuf::from("raw.json"));
            assert_eq!(build_args.output, PathBuf::from("struct.json"));
        } else {
            panic!("Expected build-dict command");
        }
    }

    #[test]
    fn test_infer_command() {
        let args = FuriganaArgs::try_parse_from(["furigana", "infer", "食べ物", "たべもの"]).unwrap();

        if let Command::Infer(infer_args) = args.command {
            assert_eq!(infer_args.surface, "食べ物");
            assert_eq!(infer_args.reading, "たべもの");
        } else {
            panic!("Expected infer command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = FuriganaArgs::try_parse_from(["furigana", "stats", "dict.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = FuriganaArgs::try_parse_from(["furigana", "-vvv", "stats", "dict.json"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        // Quiet wins over verbose
        let args = FuriganaArgs::try_parse_from(["furigana", "-q", "-vv", "stats", "dict.json"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            FuriganaArgs::try_parse_from(["furigana", "--format", "json", "--pretty", "stats", "dict.json"])
                .unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert!(args.pretty);
    }

    #[test]
    fn test_invalid_style_rejected() {
        let result = FuriganaArgs::try_parse_from(["furigana", "annotate", "d.json", "in.txt", "--style", "xml"]);
        assert!(result.is_err());
    }
}
