//! Character-class predicates for Japanese text.
//!
//! Every Unicode range check in the crate goes through this module so the
//! range boundaries stay consistent between the dictionary normalizer, the
//! reading inferencer and the match finder.
//!
//! # Examples
//!
//! ```
//! use furigana::analysis::char_class::{is_kana, is_kanji, CharClass};
//!
//! assert!(is_kanji('漢'));
//! assert!(is_kanji('々'));
//! assert!(is_kana('か'));
//! assert!(is_kana('ー'));
//! assert_eq!(CharClass::of('カ'), CharClass::Katakana);
//! ```

use serde::{Deserialize, Serialize};

/// Kanji iteration mark (repeats the preceding Kanji).
pub const KANJI_ITERATION_MARK: char = '々';

/// Katakana-Hiragana prolonged sound mark.
pub const PROLONGED_SOUND_MARK: char = 'ー';

/// Small kana that attach to the preceding mora.
const SMALL_KANA: &[char] = &[
    'ゃ', 'ゅ', 'ょ', 'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'ゎ', 'ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ',
    'ォ', 'ヮ',
];

/// Japanese punctuation kept by the extended cleaning variant.
const JAPANESE_PUNCTUATION: &[char] = &[
    '、', '。', '！', '？', '「', '」', '『', '』', '（', '）', '［', '］', '【', '】', '〈', '〉',
    '《', '》', '〔', '〕', '…', '‥', 'ー', '～', '—', '・', '：', '；',
];

/// Katakana letters used as multiple-choice option labels (ア．イ．ウ．…).
const CHOICE_LETTERS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";

/// Coarse classification of a single character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharClass {
    /// CJK ideographs and the iteration mark
    Kanji,
    /// Hiragana syllables
    Hiragana,
    /// Katakana syllables and the prolonged sound mark
    Katakana,
    /// Japanese punctuation from the fixed kept set
    Punctuation,
    /// ASCII or full-width digits
    Digit,
    /// Anything else (Latin letters, whitespace, symbols)
    Other,
}

impl CharClass {
    /// Classify a character.
    pub fn of(c: char) -> Self {
        if is_kanji(c) {
            CharClass::Kanji
        } else if is_hiragana(c) {
            CharClass::Hiragana
        } else if is_katakana(c) {
            CharClass::Katakana
        } else if is_japanese_punctuation(c) {
            CharClass::Punctuation
        } else if c.is_ascii_digit() || is_fullwidth_digit(c) {
            CharClass::Digit
        } else {
            CharClass::Other
        }
    }
}

/// Kanji, Kanji variants, or the iteration mark `々`.
pub fn is_kanji(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | KANJI_ITERATION_MARK)
}

pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}')
}

/// Katakana block, which includes the prolonged sound mark `ー`.
pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}')
}

/// Hiragana, Katakana, or the prolonged sound mark.
pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

pub fn is_small_kana(c: char) -> bool {
    SMALL_KANA.contains(&c)
}

/// Whether `c` attaches to the preceding mora instead of starting a new one.
pub fn is_mora_continuation(c: char) -> bool {
    is_small_kana(c) || c == PROLONGED_SOUND_MARK
}

pub fn is_japanese_punctuation(c: char) -> bool {
    JAPANESE_PUNCTUATION.contains(&c)
}

pub fn is_fullwidth_digit(c: char) -> bool {
    matches!(c, '\u{FF10}'..='\u{FF19}')
}

/// Kana or Kanji.
pub fn is_japanese(c: char) -> bool {
    is_kana(c) || is_kanji(c)
}

/// Katakana letter used as a quiz option label.
pub fn is_choice_letter(c: char) -> bool {
    CHOICE_LETTERS.contains(c)
}

/// Period that may follow a choice letter.
pub fn is_choice_period(c: char) -> bool {
    c == '．' || c == '.'
}

pub fn has_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

pub fn has_japanese(text: &str) -> bool {
    text.chars().any(is_japanese)
}

/// Latin letter or ASCII digit, which disqualify a dictionary key.
pub fn has_latin_or_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphanumeric())
}
