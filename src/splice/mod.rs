//! Format-preserving ruby annotation of formatted runs.
//!
//! The splicer works run by run: every source run is matched on its own and
//! rebuilt into [`AnnotatedUnit`]s that all derive their formatting from that
//! run. Styling is therefore never merged across runs or lost, at the price of
//! missing words that straddle a run boundary.
//!
//! # Examples
//!
//! ```
//! use furigana::dictionary::Dictionary;
//! use furigana::matcher::MissingKanjiSet;
//! use furigana::splice::{AnnotatedUnit, Splicer, TextRun};
//!
//! let dictionary = Dictionary::from_readings([("寿司", "すし")]);
//! let splicer = Splicer::new(&dictionary);
//! let mut missing = MissingKanjiSet::new();
//!
//! let units = splicer.splice(&[TextRun::plain("寿司です")], &mut missing);
//! assert_eq!(units.len(), 2);
//! assert_eq!(units[0].reading(), Some("すし"));
//! assert!(matches!(&units[1], AnnotatedUnit::PlainText { text, .. } if text == "です"));
//! ```

pub mod formatting;
pub mod unit;

use std::ops::Range;

use crate::analysis::char_class::{has_japanese, is_kanji};
use crate::analysis::char_filter::CharFilter;
use crate::dictionary::Dictionary;
use crate::matcher::{Match, MatchFinder, MatcherConfig, MissingKanjiSet};

pub use formatting::{Formatting, RubyStyle, RunFormatting};
pub use unit::{AnnotatedUnit, TextRun, base_text};

/// One character of a matched span, aligned against the matched surface.
#[derive(Debug, Clone, Copy)]
enum Slot {
    /// Survived cleaning: `index` is its position in the surface, `ch` the
    /// normalized character.
    Kept { index: usize, ch: char, original: char },
    /// Removed by cleaning; rendered as plain text.
    Stripped(char),
}

/// Splices ruby annotations into formatted runs.
#[derive(Debug, Clone)]
pub struct Splicer<'a> {
    finder: MatchFinder<'a>,
    style: RubyStyle,
}

impl<'a> Splicer<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self::with_config(dictionary, MatcherConfig::default(), RubyStyle::default())
    }

    pub fn with_config(dictionary: &'a Dictionary, matcher: MatcherConfig, style: RubyStyle) -> Self {
        Splicer {
            finder: MatchFinder::with_config(dictionary, matcher),
            style,
        }
    }

    pub fn finder(&self) -> &MatchFinder<'a> {
        &self.finder
    }

    pub fn style(&self) -> &RubyStyle {
        &self.style
    }

    /// Annotate a paragraph.
    ///
    /// Runs without Japanese text are copied through unchanged. Kanji that no
    /// match covered are recorded in `missing`.
    pub fn splice<H: RunFormatting>(
        &self,
        runs: &[TextRun<H>],
        missing: &mut MissingKanjiSet,
    ) -> Vec<AnnotatedUnit<H>> {
        let mut units = Vec::with_capacity(runs.len());
        for run in runs {
            if !has_japanese(&run.text) {
                units.push(AnnotatedUnit::plain(run.text.clone(), run.formatting.clone()));
                continue;
            }
            let result = self.finder.find_matches(&run.text);
            missing.record_all(result.uncovered.iter().copied());
            units.extend(self.splice_run(run, &result.matches));
        }
        units
    }

    /// Annotate one run given matches computed over its text.
    ///
    /// `matches` must be sorted, pairwise disjoint and within the run's
    /// character count, as returned by [`MatchFinder::find_matches`].
    pub fn splice_run<H: RunFormatting>(&self, run: &TextRun<H>, matches: &[Match]) -> Vec<AnnotatedUnit<H>> {
        let chars: Vec<char> = run.text.chars().collect();
        debug_assert!(
            matches.windows(2).all(|w| w[0].end <= w[1].start),
            "matches must be sorted and disjoint"
        );
        debug_assert!(
            matches.iter().all(|m| m.start < m.end && m.end <= chars.len()),
            "matches must lie within the run"
        );

        let mut out = UnitWriter::new(run, &self.style);
        let mut cursor = 0;
        for m in matches {
            out.plain(chars[cursor..m.start].iter().copied());
            self.splice_match(&chars[m.start..m.end], m, &mut out);
            cursor = m.end;
        }
        out.plain(chars[cursor..].iter().copied());
        out.finish()
    }

    fn splice_match<H: RunFormatting>(&self, span: &[char], m: &Match, out: &mut UnitWriter<'_, H>) {
        let slots = self.align(span);
        let surface: Vec<char> = m.surface.chars().collect();
        debug_assert_eq!(
            slots.iter().filter(|s| matches!(s, Slot::Kept { .. })).count(),
            surface.len(),
            "match surface must equal its cleaned span"
        );

        let groups = ruby_groups(&surface, m);
        let mut group_iter = groups.into_iter().peekable();
        let mut open: Option<(Range<usize>, String, String)> = None;

        for slot in slots {
            match slot {
                Slot::Stripped(c) => match open.as_mut() {
                    Some((_, base, _)) => base.push(c),
                    None => out.plain(Some(c)),
                },
                Slot::Kept { index, ch, original } => {
                    if open.is_none() && group_iter.peek().is_some_and(|(r, _)| r.start == index) {
                        if let Some((range, reading)) = group_iter.next() {
                            open = Some((range, String::new(), reading));
                        }
                    }
                    match open.take() {
                        Some((range, mut base, reading)) => {
                            base.push(ch);
                            if index + 1 >= range.end {
                                out.ruby(base, reading);
                            } else {
                                open = Some((range, base, reading));
                            }
                        }
                        None => out.plain(Some(original)),
                    }
                }
            }
        }
        if let Some((_, base, reading)) = open {
            out.ruby(base, reading);
        }
    }

    /// Pair every character of a matched span with its position in the
    /// cleaned surface.
    fn align(&self, span: &[char]) -> Vec<Slot> {
        let cleaner = self.finder.cleaner();
        let mut next = 0;
        span.iter()
            .map(|&original| match cleaner.filter_char(original) {
                Some(ch) => {
                    let index = next;
                    next += 1;
                    Slot::Kept { index, ch, original }
                }
                None => Slot::Stripped(original),
            })
            .collect()
    }
}

/// Surface ranges to render as ruby, with their readings, in order.
fn ruby_groups(surface: &[char], m: &Match) -> Vec<(Range<usize>, String)> {
    if let Some(map) = m.map.as_ref() {
        return map
            .iter()
            .filter(|slice| !slice.is_blank())
            .filter(|slice| surface.get(slice.index).copied().is_some_and(is_kanji))
            .map(|slice| (slice.index..slice.index + 1, slice.reading.clone()))
            .collect();
    }

    let reading = m.reading.trim();
    let reading_len = reading.chars().count();
    let surface_len = surface.len();

    if surface_len > 1 && reading_len == 1 {
        // A one-kana reading can only belong to a single Kanji.
        if let Some(k) = surface.iter().position(|&c| is_kanji(c)) {
            return vec![(k..k + 1, reading.to_string())];
        }
    }
    if reading_len > 0 && reading_len < surface_len {
        return vec![(0..reading_len, reading.to_string())];
    }
    vec![(0..surface_len, reading.to_string())]
}

/// Accumulates output units for one run, merging adjacent plain text.
struct UnitWriter<'r, H> {
    run: &'r TextRun<H>,
    style: &'r RubyStyle,
    units: Vec<AnnotatedUnit<H>>,
    pending: String,
}

impl<'r, H: RunFormatting> UnitWriter<'r, H> {
    fn new(run: &'r TextRun<H>, style: &'r RubyStyle) -> Self {
        UnitWriter {
            run,
            style,
            units: Vec::new(),
            pending: String::new(),
        }
    }

    fn plain<I: IntoIterator<Item = char>>(&mut self, chars: I) {
        self.pending.extend(chars);
    }

    fn ruby(&mut self, base: String, reading: String) {
        self.flush();
        self.units.push(AnnotatedUnit::RubyPair {
            base,
            reading,
            base_formatting: self.style.base_formatting(&self.run.formatting),
            reading_formatting: self.style.reading_formatting(&self.run.formatting),
        });
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.units.push(AnnotatedUnit::plain(text, self.run.formatting.clone()));
        }
    }

    fn finish(mut self) -> Vec<AnnotatedUnit<H>> {
        self.flush();
        self.units
    }
}
