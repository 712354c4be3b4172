//! Paragraph-by-paragraph document annotation.
//!
//! A document is an ordered list of paragraphs, each an ordered list of
//! [`TextRun`]s supplied by the container reader. The [`Annotator`] splices
//! every paragraph and threads one explicit [`MissingKanjiSet`] through the
//! whole pass.
//!
//! # Examples
//!
//! ```
//! use furigana::dictionary::Dictionary;
//! use furigana::document::Annotator;
//! use furigana::matcher::MissingKanjiSet;
//! use furigana::render::Parenthetical;
//!
//! let dictionary = Dictionary::from_readings([("生産", "せいさん")]);
//! let annotator = Annotator::new(&dictionary);
//! let mut missing = MissingKanjiSet::new();
//!
//! let line = annotator.annotate_text("生産管理", &Parenthetical, &mut missing);
//! assert_eq!(line, "生産(せいさん)管理");
//! assert_eq!(missing.len(), 2);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::char_class::has_japanese;
use crate::dictionary::Dictionary;
use crate::matcher::{MatcherConfig, MissingKanjiSet};
use crate::render::{Renderer, has_ruby_markup, render};
use crate::splice::{AnnotatedUnit, RubyStyle, RunFormatting, Splicer, TextRun};

/// Counters for one annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub paragraphs: usize,
    /// Paragraphs containing any kana or Kanji.
    pub japanese_paragraphs: usize,
    /// Paragraphs that received at least one ruby pair.
    pub annotated_paragraphs: usize,
    pub ruby_pairs: usize,
}

impl DocumentStats {
    fn record<H>(&mut self, runs: &[TextRun<H>], units: &[AnnotatedUnit<H>]) {
        self.paragraphs += 1;
        if runs.iter().any(|run| has_japanese(&run.text)) {
            self.japanese_paragraphs += 1;
        }
        let pairs = units.iter().filter(|unit| unit.is_ruby()).count();
        if pairs > 0 {
            self.annotated_paragraphs += 1;
        }
        self.ruby_pairs += pairs;
    }
}

/// The annotated paragraphs of a document, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument<H> {
    pub paragraphs: Vec<Vec<AnnotatedUnit<H>>>,
    pub stats: DocumentStats,
}

/// Annotates whole documents.
#[derive(Debug, Clone)]
pub struct Annotator<'a> {
    splicer: Splicer<'a>,
}

impl<'a> Annotator<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Annotator {
            splicer: Splicer::new(dictionary),
        }
    }

    pub fn with_config(dictionary: &'a Dictionary, matcher: MatcherConfig, style: RubyStyle) -> Self {
        Annotator {
            splicer: Splicer::with_config(dictionary, matcher, style),
        }
    }

    pub fn splicer(&self) -> &Splicer<'a> {
        &self.splicer
    }

    /// Annotate paragraphs in order.
    pub fn annotate<H: RunFormatting>(
        &self,
        paragraphs: &[Vec<TextRun<H>>],
        missing: &mut MissingKanjiSet,
    ) -> AnnotatedDocument<H> {
        let mut stats = DocumentStats::default();
        let mut annotated = Vec::with_capacity(paragraphs.len());

        for (i, runs) in paragraphs.iter().enumerate() {
            let units = self.splicer.splice(runs, missing);
            stats.record(runs, &units);
            debug!(paragraph = i, runs = runs.len(), units = units.len(), "annotated paragraph");
            annotated.push(units);
        }

        log_stats(&stats, missing);
        AnnotatedDocument {
            paragraphs: annotated,
            stats,
        }
    }

    /// Annotate paragraphs on the rayon pool.
    ///
    /// Each paragraph collects its own missing set; the sets are merged into
    /// `missing` in paragraph order afterwards, so the result equals that of
    /// [`Annotator::annotate`].
    pub fn annotate_parallel<H>(
        &self,
        paragraphs: &[Vec<TextRun<H>>],
        missing: &mut MissingKanjiSet,
    ) -> AnnotatedDocument<H>
    where
        H: RunFormatting + Send + Sync,
    {
        let results: Vec<(Vec<AnnotatedUnit<H>>, MissingKanjiSet)> = paragraphs
            .par_iter()
            .map(|runs| {
                let mut local = MissingKanjiSet::new();
                let units = self.splicer.splice(runs, &mut local);
                (units, local)
            })
            .collect();

        let mut stats = DocumentStats::default();
        let mut annotated = Vec::with_capacity(results.len());
        for (runs, (units, local)) in paragraphs.iter().zip(results) {
            stats.record(runs, &units);
            missing.merge(local);
            annotated.push(units);
        }

        log_stats(&stats, missing);
        AnnotatedDocument {
            paragraphs: annotated,
            stats,
        }
    }

    /// Annotate a single line of plain text and render it.
    ///
    /// Text that already carries `<ruby>` markup is returned unchanged.
    pub fn annotate_text(&self, text: &str, renderer: &dyn Renderer, missing: &mut MissingKanjiSet) -> String {
        if has_ruby_markup(text) {
            return text.to_string();
        }
        let units = self.splicer.splice(&[TextRun::plain(text)], missing);
        render(renderer, &units)
    }
}

fn log_stats(stats: &DocumentStats, missing: &MissingKanjiSet) {
    info!(
        paragraphs = stats.paragraphs,
        japanese = stats.japanese_paragraphs,
        annotated = stats.annotated_paragraphs,
        ruby_pairs = stats.ruby_pairs,
        missing_kanji = missing.len(),
        "annotated document"
    );
}
