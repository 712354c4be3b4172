//! Reading inference for entries that only carry a whole-entry reading.
//!
//! Kana written in the surface usually reappears verbatim in the reading
//! (`食べ物` / `たべもの`), so those kana runs are used as anchors. Whatever
//! reading lies between two anchors belongs to the Kanji between them. When a
//! run of several Kanji shares one reading, the reading is split into morae and
//! spread evenly, which is a guess and is flagged as such.
//!
//! ```
//! use furigana::dictionary::inference::infer;
//!
//! let inference = infer("食べ物", "たべもの");
//! let readings: Vec<_> = inference.map.iter().map(|s| s.reading.as_str()).collect();
//! assert_eq!(readings, vec!["た", "もの"]);
//! assert!(!inference.uncertain);
//! ```

use ahash::AHashSet;

use crate::analysis::char_class::{is_kana, is_kanji};
use crate::analysis::mora::split_morae;
use crate::dictionary::entry::{ReadingSlice, Segment};

/// Result of inferring a per-character map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inference {
    /// Per-Kanji reading slices, ascending by index.
    pub map: Vec<ReadingSlice>,
    /// Raw segments the map was derived from.
    pub segments: Vec<Segment>,
    /// True if any anchor was skipped or any reading was split heuristically.
    pub uncertain: bool,
}

/// A kana run of the surface located inside the reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Anchor {
    surface_start: usize,
    len: usize,
    reading_start: usize,
    reading_end: usize,
}

/// Infer a per-character reading map for `surface`.
///
/// Never fails. When nothing better is possible the whole reading lands on
/// the first Kanji and `uncertain` is set.
pub fn infer(surface: &str, reading: &str) -> Inference {
    let surface: Vec<char> = surface.chars().collect();
    let reading: Vec<char> = reading.chars().collect();

    let (segments, skipped_anchor) = infer_segments(&surface, &reading);
    let (map, split_reading) = segments_to_map(&surface, &segments, &reading);

    Inference {
        map,
        segments,
        uncertain: skipped_anchor || split_reading,
    }
}

/// Maximal runs of kana in `surface` as `(start, len)`.
fn kana_runs(surface: &[char]) -> Vec<(usize, usize)> {
    char_runs(surface, 0, surface.len(), is_kana)
}

/// Maximal runs of characters satisfying `pred` inside `[from, to)`.
fn char_runs(chars: &[char], from: usize, to: usize, pred: fn(char) -> bool) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut i = from;
    while i < to {
        if !pred(chars[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < to && pred(chars[i]) {
            i += 1;
        }
        runs.push((start, i - start));
    }
    runs
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Locate a kana run in the reading at or after `cursor`.
///
/// The whole run is tried first, then suffixes and prefixes of decreasing
/// length. Returns the matched part's offset inside the run with the anchor.
fn find_anchor(run: &[char], run_start: usize, reading: &[char], cursor: usize) -> Option<Anchor> {
    let anchor = |offset: usize, len: usize, pos: usize| Anchor {
        surface_start: run_start + offset,
        len,
        reading_start: pos,
        reading_end: pos + len,
    };

    if let Some(pos) = find_chars(reading, run, cursor) {
        return Some(anchor(0, run.len(), pos));
    }

    for len in (1..run.len()).rev() {
        let offset = run.len() - len;
        if let Some(pos) = find_chars(reading, &run[offset..], cursor) {
            return Some(anchor(offset, len, pos));
        }
        if let Some(pos) = find_chars(reading, &run[..len], cursor) {
            return Some(anchor(0, len, pos));
        }
    }

    None
}

fn infer_segments(surface: &[char], reading: &[char]) -> (Vec<Segment>, bool) {
    let mut anchors = Vec::new();
    let mut skipped_anchor = false;
    let mut cursor = 0;

    for (start, len) in kana_runs(surface) {
        match find_anchor(&surface[start..start + len], start, reading, cursor) {
            Some(anchor) => {
                cursor = anchor.reading_end;
                anchors.push(anchor);
            }
            None => skipped_anchor = true,
        }
    }

    let mut segments = Vec::new();
    let mut add_region = |s_from: usize, s_to: usize, r_from: usize, r_to: usize| {
        if s_from >= s_to || r_from > r_to {
            return;
        }
        let region_reading: String = reading[r_from..r_to].iter().collect();
        for (start, len) in char_runs(surface, s_from, s_to, is_kanji) {
            segments.push(Segment::new(start, start + len, region_reading.clone()));
        }
    };

    let (mut prev_s, mut prev_r) = (0, 0);
    for anchor in &anchors {
        add_region(prev_s, anchor.surface_start, prev_r, anchor.reading_start);
        prev_s = anchor.surface_start + anchor.len;
        prev_r = anchor.reading_end;
    }
    add_region(prev_s, surface.len(), prev_r, reading.len());

    if segments.is_empty() && surface.iter().copied().any(is_kanji) {
        let whole: String = reading.iter().collect();
        segments.push(Segment::new(0, surface.len(), whole));
        skipped_anchor = true;
    }

    (segments, skipped_anchor)
}

fn segments_to_map(
    surface: &[char],
    segments: &[Segment],
    full_reading: &[char],
) -> (Vec<ReadingSlice>, bool) {
    let mut slices = Vec::new();
    let mut split_reading = false;

    for segment in segments {
        let kanji: Vec<(usize, char)> = (segment.start()..segment.end().min(surface.len()))
            .map(|i| (i, surface[i]))
            .filter(|&(_, c)| is_kanji(c))
            .collect();

        match kanji.as_slice() {
            [] => continue,
            [(i, c)] => slices.push(ReadingSlice::new(*i, *c, segment.reading.clone())),
            [(first_i, first_c), ..] => {
                split_reading = true;
                let morae = split_morae(&segment.reading);
                if morae.len() < kanji.len() {
                    slices.push(ReadingSlice::new(*first_i, *first_c, segment.reading.clone()));
                    continue;
                }

                let base = morae.len() / kanji.len();
                let rem = morae.len() % kanji.len();
                let mut taken = 0;
                for (t, &(i, c)) in kanji.iter().enumerate() {
                    let take = base + usize::from(t < rem);
                    slices.push(ReadingSlice::new(i, c, morae[taken..taken + take].concat()));
                    taken += take;
                }
            }
        }
    }

    let mut seen = AHashSet::new();
    slices.retain(|slice| seen.insert(slice.index));
    slices.sort_by_key(|slice| slice.index);

    // Only a mora split can produce a spurious repeat.
    if split_reading {
        collapse_repeated_readings(&mut slices, full_reading);
    }

    (slices, split_reading)
}

/// Blank a slice whose reading repeats the previous populated slice.
///
/// If anything was blanked the first populated slice takes the whole-entry
/// reading instead. Reduplicated compounds such as `少々` end up with
/// `しょうしょう` on the first character and nothing on the second.
fn collapse_repeated_readings(slices: &mut [ReadingSlice], full_reading: &[char]) {
    let mut previous: Option<String> = None;
    let mut blanked_any = false;

    for slice in slices.iter_mut() {
        if slice.reading.is_empty() {
            continue;
        }
        if previous.as_deref() == Some(slice.reading.as_str()) {
            slice.reading.clear();
            blanked_any = true;
        } else {
            previous = Some(slice.reading.clone());
        }
    }

    if blanked_any {
        if let Some(first) = slices.iter_mut().find(|s| !s.reading.trim().is_empty()) {
            first.reading = full_reading.iter().collect();
        }
    }
}
