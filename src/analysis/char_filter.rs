//! Char filters that normalize text before dictionary lookup.
//!
//! Filters here are strictly per-character: each input character either maps
//! to exactly one output character or is dropped. That keeps the position of
//! every surviving character recoverable, which the annotation splicer relies
//! on when it walks a matched span of the original text.
//!
//! # Available Filters
//!
//! - [`RadicalCharFilter`] - Kangxi radicals standing in for look-alike Kanji
//! - [`JapaneseOnlyCharFilter`] - Drops everything that cannot be part of a surface
//! - [`SurfaceCleaner`] - Radical normalization followed by Japanese-only stripping
//!
//! # Examples
//!
//! ```
//! use furigana::analysis::char_filter::{CharFilter, SurfaceCleaner};
//!
//! let cleaner = SurfaceCleaner::new(true);
//! assert_eq!(cleaner.filter("⽣産 管理"), "生産管理");
//! ```

use ahash::AHashMap;
use lazy_static::lazy_static;

use crate::analysis::char_class::{
    is_fullwidth_digit, is_japanese, is_japanese_punctuation,
};

/// Trait for per-character filters applied before tokenization.
pub trait CharFilter: Send + Sync {
    /// Map a single character. `None` removes it from the output.
    fn filter_char(&self, c: char) -> Option<char>;

    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String {
        input.chars().filter_map(|c| self.filter_char(c)).collect()
    }

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

const RADICAL_TABLE: &[(char, char)] = &[
    ('⼀', '一'), ('⼁', '｜'), ('⼂', '丶'), ('⼃', '丿'), ('⼄', '乙'), ('⼅', '亅'),
    ('⼆', '二'), ('⼇', '亠'), ('⼈', '人'), ('⼉', '儿'), ('⼊', '入'), ('⼋', '八'),
    ('⼌', '冂'), ('⼍', '冖'), ('⼎', '冫'), ('⼏', '几'), ('⼐', '凵'), ('⼑', '刀'),
    ('⼒', '力'), ('⼓', '勹'), ('⼔', '匕'), ('⼕', '匚'), ('⼖', '匸'), ('⼗', '十'),
    ('⼘', '卜'), ('⼙', '卩'), ('⼚', '厂'), ('⼛', '厶'), ('⼜', '又'), ('⼝', '口'),
    ('⼞', '囗'), ('⼟', '土'), ('⼠', '士'), ('⼡', '夂'), ('⼢', '夊'), ('⼣', '夕'),
    ('⼤', '大'), ('⼥', '女'), ('⼦', '子'), ('⼧', '宀'), ('⼨', '寸'), ('⼩', '小'),
    ('⼪', '尢'), ('⼫', '尸'), ('⼬', '屮'), ('⼭', '山'), ('⼮', '巛'), ('⼯', '工'),
    ('⼰', '己'), ('⼱', '巾'), ('⼲', '干'), ('⼳', '幺'), ('⼴', '广'), ('⼵', '廴'),
    ('⼶', '廾'), ('⼷', '弋'), ('⼸', '弓'), ('⼹', '彐'), ('⼺', '彡'), ('⼻', '彳'),
    ('⼼', '心'), ('⼽', '戈'), ('⼾', '戸'), ('⼿', '手'), ('⽀', '支'), ('⽁', '攴'),
    ('⽂', '文'), ('⽃', '斗'), ('⽄', '斤'), ('⽅', '方'), ('⽆', '无'), ('⽇', '日'),
    ('⽈', '曰'), ('⽉', '月'), ('⽊', '木'), ('⽋', '欠'), ('⽌', '止'), ('⽍', '歹'),
    ('⽎', '殳'), ('⽏', '毋'), ('⽐', '比'), ('⽑', '毛'), ('⽒', '氏'), ('⽓', '气'),
    ('⽔', '水'), ('⽕', '火'), ('⽖', '爪'), ('⽗', '父'), ('⽘', '爻'), ('⽙', '爿'),
    ('⽚', '片'), ('⽛', '牙'), ('⽜', '牛'), ('⽝', '犬'), ('⽞', '玄'), ('⽟', '玉'),
    ('⽠', '瓜'), ('⽡', '瓦'), ('⽢', '甘'), ('⽣', '生'), ('⽤', '用'), ('⽥', '田'),
    ('⽦', '疋'), ('⽧', '疒'), ('⽨', '癶'), ('⽩', '白'), ('⽪', '皮'), ('⽫', '皿'),
    ('⽬', '目'), ('⽭', '矛'), ('⽮', '矢'), ('⽯', '石'), ('⽰', '示'), ('⽱', '禸'),
    ('⽲', '禾'), ('⽳', '穴'), ('⽴', '立'), ('⽵', '竹'), ('⽶', '米'), ('⽷', '糸'),
    ('⽸', '缶'), ('⽹', '网'), ('⽺', '羊'), ('⽻', '羽'), ('⽼', '老'), ('⽽', '而'),
    ('⽾', '耒'), ('⽿', '耳'), ('⾀', '聿'), ('⾁', '肉'), ('⾂', '臣'), ('⾃', '自'),
    ('⾄', '至'), ('⾅', '臼'), ('⾆', '舌'), ('⾇', '舛'), ('⾈', '舟'), ('⾉', '艮'),
    ('⾊', '色'), ('⾋', '艸'), ('⾌', '虍'), ('⾍', '虫'), ('⾎', '血'), ('⾏', '行'),
    ('⾐', '衣'), ('⾑', '襾'), ('⾒', '見'), ('⾓', '角'), ('⾔', '言'), ('⾕', '谷'),
    ('⾖', '豆'), ('⾗', '豕'), ('⾘', '豸'), ('⾙', '貝'), ('⾚', '赤'), ('⾛', '走'),
    ('⾜', '足'), ('⾝', '身'), ('⾞', '車'), ('⾟', '辛'), ('⾠', '辰'), ('⾡', '辵'),
    ('⾢', '邑'), ('⾣', '酉'), ('⾤', '釆'), ('⾥', '里'), ('⾦', '金'), ('⾧', '長'),
    ('⾨', '門'), ('⾩', '阜'), ('⾪', '隶'), ('⾫', '隹'), ('⾬', '雨'), ('⾭', '青'),
    ('⾮', '非'), ('⾯', '面'), ('⾰', '革'), ('⾱', '韋'), ('⾲', '韭'), ('⾳', '音'),
    ('⾴', '頁'), ('⾵', '風'), ('⾶', '飛'), ('⾷', '食'), ('⾸', '首'), ('⾹', '香'),
    ('⾺', '馬'), ('⾻', '骨'), ('⾼', '高'), ('⾽', '髟'), ('⾾', '鬥'), ('⾿', '鬯'),
    ('⿀', '鬲'), ('⿁', '鬼'), ('⿂', '魚'), ('⿃', '鳥'), ('⿄', '鹵'), ('⿅', '鹿'),
    ('⿆', '麦'), ('⿇', '麻'), ('⿈', '黄'), ('⿉', '黍'), ('⿊', '黒'), ('⿋', '黹'),
    ('⿌', '黽'), ('⿍', '鼎'), ('⿎', '鼓'), ('⿏', '鼠'), ('⿐', '鼻'), ('⿑', '齊'),
    ('⿒', '歯'), ('⿓', '竜'), ('⿔', '亀'), ('⿕', '龠'),
];

lazy_static! {
    static ref RADICAL_TO_KANJI: AHashMap<char, char> = RADICAL_TABLE.iter().copied().collect();
}

/// Replace a Kangxi radical with the Kanji it resembles.
pub fn normalize_radical(c: char) -> char {
    RADICAL_TO_KANJI.get(&c).copied().unwrap_or(c)
}

/// Maps Kangxi radicals (U+2F00..U+2FD5) to ordinary Kanji.
///
/// Text extracted from PDFs frequently carries radicals in place of the
/// visually identical Kanji, which would otherwise never hit the dictionary.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadicalCharFilter;

impl RadicalCharFilter {
    pub fn new() -> Self {
        RadicalCharFilter
    }
}

impl CharFilter for RadicalCharFilter {
    fn filter_char(&self, c: char) -> Option<char> {
        Some(normalize_radical(c))
    }

    fn name(&self) -> &'static str {
        "radical"
    }
}

/// Keeps kana and Kanji, and optionally the fixed Japanese punctuation set and digits.
#[derive(Clone, Copy, Debug)]
pub struct JapaneseOnlyCharFilter {
    keep_punctuation: bool,
}

impl JapaneseOnlyCharFilter {
    pub fn new(keep_punctuation: bool) -> Self {
        Self { keep_punctuation }
    }

    pub fn keeps(&self, c: char) -> bool {
        if is_japanese(c) {
            return true;
        }
        self.keep_punctuation
            && (is_japanese_punctuation(c) || is_fullwidth_digit(c) || c.is_ascii_digit())
    }
}

impl CharFilter for JapaneseOnlyCharFilter {
    fn filter_char(&self, c: char) -> Option<char> {
        self.keeps(c).then_some(c)
    }

    fn name(&self) -> &'static str {
        "japanese_only"
    }
}

/// The cleaning step applied to every candidate span before lookup.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceCleaner {
    radicals: RadicalCharFilter,
    strip: JapaneseOnlyCharFilter,
}

impl SurfaceCleaner {
    pub fn new(keep_punctuation: bool) -> Self {
        Self {
            radicals: RadicalCharFilter::new(),
            strip: JapaneseOnlyCharFilter::new(keep_punctuation),
        }
    }
}

impl CharFilter for SurfaceCleaner {
    fn filter_char(&self, c: char) -> Option<char> {
        self.radicals
            .filter_char(c)
            .and_then(|c| self.strip.filter_char(c))
    }

    fn name(&self) -> &'static str {
        "surface_cleaner"
    }
}
