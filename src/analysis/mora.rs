//! Mora splitting for kana readings.

use crate::analysis::char_class::is_mora_continuation;

/// Split a kana string into morae.
///
/// A small kana or the prolonged sound mark attaches to the preceding mora. A
/// continuation character at the very start forms a mora of its own.
///
/// ```
/// use furigana::analysis::mora::split_morae;
///
/// assert_eq!(split_morae("きょうー"), vec!["きょ", "うー"]);
/// assert_eq!(split_morae("かんじ"), vec!["か", "ん", "じ"]);
/// ```
pub fn split_morae(reading: &str) -> Vec<String> {
    let mut morae: Vec<String> = Vec::new();
    for c in reading.chars() {
        match morae.last_mut() {
            Some(last) if is_mora_continuation(c) => last.push(c),
            _ => morae.push(c.to_string()),
        }
    }
    morae
}
