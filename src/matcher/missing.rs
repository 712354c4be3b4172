//! Accumulator for Kanji that no dictionary match covered.
//!
//! The set is an ordinary value threaded through document traversal. Parallel
//! callers build one set per paragraph and [`MissingKanjiSet::merge`] them at
//! the end.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Uncovered Kanji with the number of times each was observed.
///
/// A character counts once per match-finder call in which it stayed
/// uncovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingKanjiSet {
    counts: BTreeMap<char, usize>,
}

impl MissingKanjiSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `kanji`.
    pub fn record(&mut self, kanji: char) {
        *self.counts.entry(kanji).or_insert(0) += 1;
    }

    /// Record one observation of each character.
    pub fn record_all<I: IntoIterator<Item = char>>(&mut self, kanji: I) {
        for c in kanji {
            self.record(c);
        }
    }

    /// Fold another accumulator into this one, adding counts.
    pub fn merge(&mut self, other: MissingKanjiSet) {
        for (kanji, count) in other.counts {
            *self.counts.entry(kanji).or_insert(0) += count;
        }
    }

    /// Reset before a new document pass.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, kanji: char) -> bool {
        self.counts.contains_key(&kanji)
    }

    pub fn count(&self, kanji: char) -> usize {
        self.counts.get(&kanji).copied().unwrap_or(0)
    }

    /// Characters in code point order.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }

    /// Characters grouped by observation count, most frequent group first.
    pub fn grouped_by_count(&self) -> Vec<(usize, Vec<char>)> {
        let mut groups: BTreeMap<usize, Vec<char>> = BTreeMap::new();
        for (kanji, count) in self.iter() {
            groups.entry(count).or_default().push(kanji);
        }
        groups.into_iter().rev().collect()
    }

    /// Write the plain-text diagnostic report.
    pub fn write_report<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "=== Kanji not found in dictionary ===")?;
        writeln!(writer)?;
        writeln!(writer, "Total: {}", self.len())?;
        writeln!(writer)?;

        for (count, kanji) in self.grouped_by_count() {
            writeln!(writer, "=== Observed {} time(s) ({} kanji) ===", count, kanji.len())?;
            for c in kanji {
                writeln!(writer, "{c}")?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "=== Full list ===")?;
        for (kanji, _) in self.iter() {
            writeln!(writer, "{kanji}")?;
        }
        Ok(())
    }

    /// Write the report to `path`. Nothing is written for an empty set.
    pub fn save_report<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        if self.is_empty() {
            info!("every Kanji was covered by the dictionary");
            return Ok(false);
        }
        let mut buffer = Vec::new();
        self.write_report(&mut buffer)?;
        fs::write(path.as_ref(), buffer)?;
        info!(
            path = %path.as_ref().display(),
            missing = self.len(),
            "saved missing kanji report"
        );
        Ok(true)
    }
}

impl Extend<char> for MissingKanjiSet {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        self.record_all(iter);
    }
}

impl FromIterator<char> for MissingKanjiSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = MissingKanjiSet::new();
        set.record_all(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut a: MissingKanjiSet = "管理管".chars().collect();
        let b: MissingKanjiSet = "理".chars().collect();
        a.merge(b);

        assert_eq!(a.len(), 2);
        assert_eq!(a.count('管'), 2);
        assert_eq!(a.count('理'), 2);
        assert_eq!(a.count('生'), 0);

        a.clear();
        assert!(a.is_empty());
    }

    #[test]
    fn test_grouping() {
        let set: MissingKanjiSet = "甲乙乙丙丙丙".chars().collect();
        assert_eq!(
            set.grouped_by_count(),
            vec![(3, vec!['丙']), (2, vec!['乙']), (1, vec!['甲'])]
        );
    }

    #[test]
    fn test_report_text() {
        let set: MissingKanjiSet = "理管".chars().collect();
        let mut out = Vec::new();
        set.write_report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("=== Kanji not found in dictionary ===\n"));
        assert!(text.contains("Total: 2\n"));
        assert!(text.contains("=== Observed 1 time(s) (2 kanji) ===\n"));
        // 理 (U+7406) sorts before 管 (U+7BA1)
        assert!(text.ends_with("=== Full list ===\n理\n管\n"));
    }

    #[test]
    fn test_save_report_skips_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        assert!(!MissingKanjiSet::new().save_report(&path).unwrap());
        assert!(!path.exists());

        let set: MissingKanjiSet = "管".chars().collect();
        assert!(set.save_report(&path).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("管"));
    }
}
