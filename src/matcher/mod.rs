//! Greedy longest-match search of dictionary surfaces in running text.
//!
//! The finder claims the longest dictionary hits first and never revisits a
//! claimed position, so compound words always win over their parts and
//! single-character entries are only used for what is left over.
//!
//! All offsets in this module are character offsets, not byte offsets.
//!
//! # Examples
//!
//! ```
//! use furigana::dictionary::Dictionary;
//! use furigana::matcher::MatchFinder;
//!
//! let dictionary = Dictionary::from_readings([("生産", "せいさん")]);
//! let finder = MatchFinder::new(&dictionary);
//! let result = finder.find_matches("生産管理");
//!
//! assert_eq!(result.matches.len(), 1);
//! assert_eq!((result.matches[0].start, result.matches[0].end), (0, 2));
//! assert!(result.uncovered.contains(&'管'));
//! ```

pub mod coverage;
pub mod missing;

use std::collections::BTreeSet;
use std::ops::Range;

use bit_vec::BitVec;
use serde::{Deserialize, Serialize};

use crate::analysis::char_class::{is_choice_letter, is_choice_period, is_japanese, is_kanji};
use crate::analysis::char_filter::{CharFilter, SurfaceCleaner};
use crate::dictionary::{Dictionary, DictionaryEntry, ReadingSlice};

pub use coverage::Coverage;
pub use missing::MissingKanjiSet;

/// Configuration for the match finder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Longest span tried, in characters.
    pub max_length: usize,
    /// Shortest span tried in the compound pass. Shorter spans are only
    /// tried in the residual pass.
    pub compound_min_length: usize,
    /// Keep Japanese punctuation and digits when cleaning candidate spans.
    pub keep_punctuation: bool,
    /// Never start a match on a multiple-choice label such as `ア．`.
    pub skip_choice_markers: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            max_length: 12,
            compound_min_length: 3,
            keep_punctuation: true,
            skip_choice_markers: true,
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn compound_min_length(mut self, length: usize) -> Self {
        self.compound_min_length = length;
        self
    }

    pub fn keep_punctuation(mut self, keep: bool) -> Self {
        self.keep_punctuation = keep;
        self
    }

    pub fn skip_choice_markers(mut self, skip: bool) -> Self {
        self.skip_choice_markers = skip;
        self
    }
}

/// A dictionary hit inside a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// First character offset of the span.
    pub start: usize,
    /// One past the last character offset of the span.
    pub end: usize,
    /// The dictionary key the cleaned span matched.
    pub surface: String,
    pub reading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<ReadingSlice>>,
    #[serde(default)]
    pub uncertain: bool,
}

impl Match {
    fn new(range: Range<usize>, surface: String, entry: &DictionaryEntry) -> Self {
        Match {
            start: range.start,
            end: range.end,
            surface,
            reading: entry.reading.clone(),
            map: entry.map.clone(),
            uncertain: entry.uncertain,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Matches for one text plus the Kanji left uncovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Disjoint matches sorted by `start`.
    pub matches: Vec<Match>,
    pub uncovered: BTreeSet<char>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Finds the longest non-overlapping dictionary spans in a text.
#[derive(Debug, Clone)]
pub struct MatchFinder<'a> {
    dictionary: &'a Dictionary,
    config: MatcherConfig,
    cleaner: SurfaceCleaner,
}

impl<'a> MatchFinder<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self::with_config(dictionary, MatcherConfig::default())
    }

    pub fn with_config(dictionary: &'a Dictionary, config: MatcherConfig) -> Self {
        let cleaner = SurfaceCleaner::new(config.keep_punctuation);
        MatchFinder {
            dictionary,
            config,
            cleaner,
        }
    }

    pub fn dictionary(&self) -> &'a Dictionary {
        self.dictionary
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn cleaner(&self) -> &SurfaceCleaner {
        &self.cleaner
    }

    /// Find matches in `text`.
    ///
    /// Pure: calling it twice on the same text yields identical results.
    pub fn find_matches(&self, text: &str) -> MatchResult {
        let chars: Vec<char> = text.chars().collect();
        if !chars.iter().copied().any(is_japanese) {
            return MatchResult::default();
        }

        let blocked = self.choice_marker_positions(&chars);
        let mut coverage = Coverage::new(chars.len());
        let mut matches = Vec::new();

        let longest = self.config.max_length.min(chars.len());
        let split = self.config.compound_min_length.max(1);

        // Compound pass: long spans first so compounds win over their parts.
        for length in (split..=longest).rev() {
            self.scan_length(&chars, length, &blocked, &mut coverage, &mut matches);
        }
        // Residual pass: short forms fill what is left.
        for length in (1..split.min(longest + 1)).rev() {
            self.scan_length(&chars, length, &blocked, &mut coverage, &mut matches);
        }

        let uncovered = coverage
            .uncovered()
            .filter(|&i| !blocked[i] && is_kanji(chars[i]))
            .map(|i| chars[i])
            .collect();

        matches.sort_by_key(|m| m.start);
        MatchResult { matches, uncovered }
    }

    fn scan_length(
        &self,
        chars: &[char],
        length: usize,
        blocked: &BitVec,
        coverage: &mut Coverage,
        matches: &mut Vec<Match>,
    ) {
        if length == 0 || length > chars.len() {
            return;
        }
        for start in 0..=chars.len() - length {
            let range = start..start + length;
            if blocked[start] || !coverage.is_free(range.clone()) {
                continue;
            }

            let cleaned: String = chars[range.clone()]
                .iter()
                .filter_map(|&c| self.cleaner.filter_char(c))
                .collect();
            if cleaned.is_empty() || !cleaned.chars().any(is_kanji) {
                continue;
            }

            if let Some(entry) = self.dictionary.get(&cleaned) {
                coverage.cover(range.clone());
                matches.push(Match::new(range, cleaned, entry));
            }
        }
    }

    /// Positions belonging to a choice label (`ア．`), which may not start a match.
    fn choice_marker_positions(&self, chars: &[char]) -> BitVec {
        let mut blocked = BitVec::from_elem(chars.len(), false);
        if !self.config.skip_choice_markers {
            return blocked;
        }
        for (i, pair) in chars.windows(2).enumerate() {
            if is_choice_letter(pair[0]) && is_choice_period(pair[1]) {
                blocked.set(i, true);
                blocked.set(i + 1, true);
            }
        }
        blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(result: &MatchResult) -> Vec<(usize, usize, &str)> {
        result
            .matches
            .iter()
            .map(|m| (m.start, m.end, m.surface.as_str()))
            .collect()
    }

    #[test]
    fn test_single_compound_leaves_rest_uncovered() {
        let dictionary = Dictionary::from_readings([("生産", "せいさん")]);
        let result = MatchFinder::new(&dictionary).find_matches("生産管理");

        assert_eq!(spans(&result), vec![(0, 2, "生産")]);
        assert_eq!(result.matches[0].reading, "せいさん");
        assert_eq!(result.uncovered, BTreeSet::from(['管', '理']));
    }

    #[test]
    fn test_longest_match_wins() {
        let dictionary =
            Dictionary::from_readings([("品質管理", "ひんしつかんり"), ("品質", "ひんしつ")]);
        let result = MatchFinder::new(&dictionary).find_matches("品質管理");

        assert_eq!(spans(&result), vec![(0, 4, "品質管理")]);
        assert!(result.uncovered.is_empty());
    }

    #[test]
    fn test_single_char_entries_are_last_resort() {
        let dictionary = Dictionary::from_readings([
            ("生", "なま"),
            ("産", "さん"),
            ("生産", "せいさん"),
            ("理", "り"),
        ]);
        let result = MatchFinder::new(&dictionary).find_matches("生産と理");
        assert_eq!(spans(&result), vec![(0, 2, "生産"), (3, 4, "理")]);
    }

    #[test]
    fn test_earlier_start_wins_at_equal_length() {
        let dictionary = Dictionary::from_readings([("日本", "にほん"), ("本人", "ほんにん")]);
        let result = MatchFinder::new(&dictionary).find_matches("日本人");
        assert_eq!(spans(&result), vec![(0, 2, "日本")]);
        assert_eq!(result.uncovered, BTreeSet::from(['人']));
    }

    #[test]
    fn test_no_japanese_returns_empty() {
        let dictionary = Dictionary::from_readings([("生産", "せいさん")]);
        let result = MatchFinder::new(&dictionary).find_matches("plain ascii text 123");
        assert!(result.is_empty());
        assert!(result.uncovered.is_empty());
    }

    #[test]
    fn test_cleaning_skips_noise_inside_span() {
        let dictionary = Dictionary::from_readings([("生産", "せいさん")]);
        let result = MatchFinder::new(&dictionary).find_matches("生 産");
        assert_eq!(spans(&result), vec![(0, 3, "生産")]);
    }

    #[test]
    fn test_radicals_are_normalized() {
        let dictionary = Dictionary::from_readings([("生産", "せいさん")]);
        let result = MatchFinder::new(&dictionary).find_matches("⽣産");
        assert_eq!(spans(&result), vec![(0, 2, "生産")]);
    }

    #[test]
    fn test_choice_markers_are_not_match_starts() {
        // `．` is dropped by the cleaner, so the label would read as `ア生産`.
        let dictionary = Dictionary::from_readings([("ア生産", "あせいさん"), ("生産", "せいさん")]);
        let result = MatchFinder::new(&dictionary).find_matches("ア．生産");
        assert_eq!(spans(&result), vec![(2, 4, "生産")]);

        let config = MatcherConfig::new().skip_choice_markers(false);
        let result = MatchFinder::with_config(&dictionary, config).find_matches("ア．生産");
        assert_eq!(spans(&result), vec![(0, 4, "ア生産")]);
    }

    #[test]
    fn test_matches_are_disjoint_and_sorted() {
        let dictionary = Dictionary::from_readings([
            ("東京", "とうきょう"),
            ("京都", "きょうと"),
            ("都市", "とし"),
            ("東京都", "とうきょうと"),
            ("市", "し"),
        ]);
        let result = MatchFinder::new(&dictionary).find_matches("東京都市と京都");
        for pair in result.matches.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(
            spans(&result),
            vec![(0, 3, "東京都"), (3, 4, "市"), (5, 7, "京都")]
        );
    }

    #[test]
    fn test_idempotent() {
        let dictionary = Dictionary::from_readings([("生産", "せいさん"), ("管", "かん")]);
        let finder = MatchFinder::new(&dictionary);
        assert_eq!(finder.find_matches("生産管理です"), finder.find_matches("生産管理です"));
    }

    #[test]
    fn test_max_length_config() {
        let dictionary = Dictionary::from_readings([("品質管理", "ひんしつかんり"), ("品質", "ひんしつ")]);
        let config = MatcherConfig::new().max_length(3);
        let result = MatchFinder::with_config(&dictionary, config).find_matches("品質管理");
        assert_eq!(spans(&result), vec![(0, 2, "品質")]);
    }
}
