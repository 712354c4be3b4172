//! Integration tests for dictionary loading, building and inference.

use std::fs;

use tempfile::TempDir;

use furigana::dictionary::{Dictionary, DictionaryBuilder, RawValue};
use furigana::error::Result;
use furigana::matcher::MissingKanjiSet;
use furigana::splice::{AnnotatedUnit, Splicer, TextRun};

#[test]
fn test_normalization_keeps_valid_entries_only() -> Result<()> {
    let dictionary = Dictionary::from_json_str(
        r#"{
            "生産": "せいさん",
            "寿司": {"reading": " すし "},
            "漢字": {"hiragana": "かんじ", "map": [{"i": 7, "rt": "かん"}]},
            "ABC漢": "えーびーしーかん",
            "ひらがな": "ひらがな",
            "": "から",
            "一二三四五六七八九十百千万": "ながい",
            "空": {"rt": "   "},
            "配列": ["はいれつ"]
        }"#,
    )?;

    assert_eq!(dictionary.len(), 3);
    assert_eq!(dictionary.get("寿司").unwrap().reading, "すし");

    // an out-of-range map index drops the map, not the entry
    let kanji = dictionary.get("漢字").unwrap();
    assert_eq!(kanji.reading, "かんじ");
    assert!(kanji.map.is_none());

    assert!(!dictionary.contains("ABC漢"));
    assert!(!dictionary.contains("空"));
    assert!(!dictionary.contains("配列"));
    Ok(())
}

#[test]
fn test_legacy_segments_expand_to_map() -> Result<()> {
    let dictionary = Dictionary::from_json_str(
        r#"{"明日": {"rt": "あした", "segments": [{"s": [0, 2], "rt": "あした"}]}}"#,
    )?;
    let map = dictionary.get("明日").unwrap().map.as_ref().unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.iter().all(|slice| slice.reading == "あした"));
    assert_eq!((map[0].index, map[1].index), (0, 1));
    Ok(())
}

#[test]
fn test_built_dictionary_drives_per_character_ruby() -> Result<()> {
    let dir = TempDir::new()?;
    let raw = dir.path().join("raw.json");
    let structured = dir.path().join("structured.json");
    fs::write(&raw, r#"{"食べ物": "たべもの", "abc": "x", "取得": "しゅとく"}"#)?;

    let stats = DictionaryBuilder::default().build_file(&raw, &structured)?;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.kept, 2);

    let dictionary = Dictionary::load_required(&structured)?;
    let entry = dictionary.get("取得").unwrap();
    assert!(entry.uncertain);

    let mut missing = MissingKanjiSet::new();
    let units = Splicer::new(&dictionary).splice(&[TextRun::plain("食べ物")], &mut missing);
    let rendered: Vec<(&str, Option<&str>)> = units.iter().map(|u| (u.text(), u.reading())).collect();
    assert_eq!(
        rendered,
        vec![("食", Some("た")), ("べ", None), ("物", Some("もの"))]
    );
    assert!(missing.is_empty());
    Ok(())
}

#[test]
fn test_builder_accepts_in_memory_tables() {
    let (records, stats) = DictionaryBuilder::default().build([
        ("生産", RawValue::from("せいさん")),
        ("少々", RawValue::from("しょうしょう")),
    ]);
    assert_eq!(stats.kept, 2);
    assert_eq!(records["少々"].map[1].reading, "");
    assert_eq!(records["生産"].map[0].reading, "せい");
}

#[test]
fn test_empty_dictionary_is_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("empty.json");
    fs::write(&path, "{}")?;

    assert!(Dictionary::from_path(&path)?.is_empty());
    assert!(Dictionary::load_required(&path).unwrap_err().is_dictionary_load());

    fs::write(&path, "not json")?;
    assert!(Dictionary::from_path(&path).unwrap_err().is_dictionary_load());
    Ok(())
}

#[test]
fn test_spliced_units_serialize_for_container_writers() {
    let dictionary = Dictionary::from_readings([("寿司", "すし")]);
    let mut missing = MissingKanjiSet::new();
    let units = Splicer::new(&dictionary).splice(&[TextRun::plain("寿司")], &mut missing);

    let json = serde_json::to_value(&units).unwrap();
    assert_eq!(json[0]["kind"], "ruby_pair");
    assert_eq!(json[0]["base"], "寿司");
    assert_eq!(json[0]["reading"], "すし");
    assert!(matches!(units[0], AnnotatedUnit::RubyPair { .. }));
}
