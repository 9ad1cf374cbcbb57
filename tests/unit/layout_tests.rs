/*!
 * Tests for OCR layout row reconstruction
 */

use anyhow::Result;

use bararan::app_config::{ColumnDetection, LayoutConfig};
use bararan::language_utils::Script;
use bararan::sources::layout::{
    headword_sub_entries, reconstruct_rows, row_to_entry, Column, ColumnBands, LayoutDocument, LayoutPage,
    LayoutReader, LayoutRow, TextBlock,
};
use bararan::sources::{EntrySource, SourceKind};
use crate::common::{self, LayoutRowFixture};

fn default_bands() -> ColumnBands {
    ColumnBands::from_config(&LayoutConfig::default())
}

#[test]
fn test_column_of_withDefaultBands_shouldSplitAtThresholds() {
    let bands = default_bands();
    assert_eq!(bands.column_of(0.0), Column::Headword);
    assert_eq!(bands.column_of(199.9), Column::Headword);
    assert_eq!(bands.column_of(200.0), Column::Pronunciation);
    assert_eq!(bands.column_of(349.9), Column::Pronunciation);
    assert_eq!(bands.column_of(350.0), Column::Translation);
}

#[test]
fn test_headword_sub_entries_withSingleLine_shouldUseBlockCentre() {
    let block = TextBlock::new(50.0, 100.0, 60.0, 20.0, "ջուր");
    let subs = headword_sub_entries(&block, Script::Armenian);
    assert_eq!(subs, vec![("ջուր".to_string(), 110.0)]);
}

#[test]
fn test_headword_sub_entries_withStackedLines_shouldInterpolate() {
    let block = TextBlock::new(50.0, 100.0, 60.0, 40.0, "ջուր\n\nհաց\n12");
    let subs = headword_sub_entries(&block, Script::Armenian);
    assert_eq!(subs, vec![("ջուր".to_string(), 110.0), ("հաց".to_string(), 130.0)]);
}

#[test]
fn test_reconstruct_rows_withStackedHeadwords_shouldMatchEachSubEntry() {
    let blocks = vec![
        TextBlock::new(50.0, 100.0, 80.0, 40.0, "ջուր\nհաց"),
        TextBlock::new(250.0, 108.0, 60.0, 10.0, "[jur]"),
        TextBlock::new(400.0, 108.0, 100.0, 10.0, "water"),
        TextBlock::new(250.0, 132.0, 60.0, 10.0, "[hats]"),
        TextBlock::new(400.0, 132.0, 100.0, 10.0, "bread"),
    ];

    let page = reconstruct_rows(&blocks, &default_bands(), 10.0, Script::Armenian);

    assert_eq!(page.unmatched, 0);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0].headword, "ջուր");
    assert_eq!(page.rows[0].pronunciation.as_deref(), Some("[jur]"));
    assert_eq!(page.rows[0].translation, "water");
    assert_eq!(page.rows[0].y, 110.0);
    assert_eq!(page.rows[1].headword, "հաց");
    assert_eq!(page.rows[1].pronunciation.as_deref(), Some("[hats]"));
    assert_eq!(page.rows[1].translation, "bread");
    assert_eq!(page.rows[1].y, 130.0);
}

#[test]
fn test_reconstruct_rows_withGlossAtTolerance_shouldMatchInclusively() {
    let blocks = vec![
        TextBlock::new(50.0, 100.0, 80.0, 20.0, "ջուր"),
        TextBlock::new(400.0, 120.0, 100.0, 10.0, "water"),
        TextBlock::new(50.0, 200.0, 80.0, 20.0, "հաց"),
        TextBlock::new(400.0, 220.5, 100.0, 10.0, "bread"),
    ];

    let page = reconstruct_rows(&blocks, &default_bands(), 10.0, Script::Armenian);

    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].headword, "ջուր");
    assert_eq!(page.unmatched, 1);
}

#[test]
fn test_reconstruct_rows_withEquidistantGlosses_shouldPreferEarlierBlock() {
    let blocks = vec![
        TextBlock::new(400.0, 115.0, 100.0, 10.0, "lower"),
        TextBlock::new(50.0, 100.0, 80.0, 20.0, "ջուր"),
        TextBlock::new(400.0, 105.0, 100.0, 10.0, "upper"),
    ];

    let page = reconstruct_rows(&blocks, &default_bands(), 10.0, Script::Armenian);

    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].translation, "upper");
}

#[test]
fn test_reconstruct_rows_withSplitGloss_shouldJoinSameBaseline() {
    let blocks = vec![
        TextBlock::new(50.0, 100.0, 80.0, 20.0, "ջուր"),
        TextBlock::new(480.0, 106.0, 60.0, 10.0, "aqua"),
        TextBlock::new(400.0, 106.0, 60.0, 10.0, "water"),
    ];

    let page = reconstruct_rows(&blocks, &default_bands(), 10.0, Script::Armenian);

    assert_eq!(page.rows[0].translation, "water, aqua");
}

#[test]
fn test_reconstruct_rows_withNoise_shouldIgnoreNonHeadwordsAndNonGlosses() {
    let blocks = vec![
        TextBlock::new(50.0, 40.0, 80.0, 20.0, "125"),
        TextBlock::new(400.0, 45.0, 80.0, 10.0, "- 7 -"),
        TextBlock::new(50.0, 100.0, 80.0, 20.0, "ջուր"),
        TextBlock::new(400.0, 105.0, 80.0, 10.0, "123"),
        TextBlock::new(400.0, 108.0, 80.0, 10.0, "water"),
        TextBlock::new(50.0, 300.0, 80.0, 20.0, "   "),
    ];

    let page = reconstruct_rows(&blocks, &default_bands(), 10.0, Script::Armenian);

    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].translation, "water");
    assert_eq!(page.unmatched, 0);
}

#[test]
fn test_learn_withThreeClusters_shouldSplitAtWidestGaps() {
    let blocks = vec![
        TextBlock::new(30.0, 100.0, 10.0, 10.0, "ջուր"),
        TextBlock::new(32.0, 130.0, 10.0, 10.0, "հաց"),
        TextBlock::new(180.0, 100.0, 10.0, 10.0, "[jur]"),
        TextBlock::new(185.0, 130.0, 10.0, 10.0, "[hats]"),
        TextBlock::new(420.0, 100.0, 10.0, 10.0, "water"),
    ];

    let bands = ColumnBands::learn(&blocks).expect("three clusters");

    assert_eq!(bands.pronunciation_x, 106.0);
    assert_eq!(bands.translation_x, 302.5);
    assert_eq!(bands.column_of(180.0), Column::Pronunciation);
}

#[test]
fn test_learn_withSingleColumn_shouldReturnNone() {
    let blocks = vec![
        TextBlock::new(30.0, 100.0, 10.0, 10.0, "ջուր"),
        TextBlock::new(35.0, 130.0, 10.0, 10.0, "հաց"),
    ];
    assert!(ColumnBands::learn(&blocks).is_none());
}

#[test]
fn test_row_to_entry_withPunctuatedRow_shouldClean() {
    let row = LayoutRow {
        headword: "Ջուր.".to_string(),
        pronunciation: Some("[ǰur]".to_string()),
        translation: "Water, to drink (v.), the sea; fourth".to_string(),
        y: 110.0,
    };

    let entry = row_to_entry(&row, Script::Armenian, Script::Latin).expect("usable row");

    assert_eq!(entry.headword, "Ջուր");
    assert_eq!(entry.translations, vec!["water", "drink", "sea"]);
    assert_eq!(entry.pronunciation.as_deref(), Some("ǰur"));
    assert_eq!(entry.source, SourceKind::Layout);
}

#[test]
fn test_row_to_entry_withUnusableGloss_shouldReturnNone() {
    let row = LayoutRow {
        headword: "ջուր".to_string(),
        pronunciation: None,
        translation: "a".to_string(),
        y: 110.0,
    };
    assert!(row_to_entry(&row, Script::Armenian, Script::Latin).is_none());
}

#[test]
fn test_row_to_entry_withGeorgianTranslationScript_shouldKeepOnlyGeorgianGlosses() {
    let row = LayoutRow {
        headword: "ջուր".to_string(),
        pronunciation: None,
        translation: "water, წყალი".to_string(),
        y: 110.0,
    };

    let entry = row_to_entry(&row, Script::Armenian, Script::Georgian).expect("usable row");

    assert_eq!(entry.translations, vec!["წყალი"]);
}

#[test]
fn test_reconstruct_rows_withHeadwordScriptInGlossColumn_shouldNotMatchIt() {
    let blocks = vec![
        TextBlock::new(50.0, 100.0, 80.0, 20.0, "ջուր"),
        TextBlock::new(400.0, 109.0, 80.0, 10.0, "տես"),
        TextBlock::new(400.0, 103.0, 80.0, 10.0, "water"),
    ];

    let page = reconstruct_rows(&blocks, &default_bands(), 10.0, Script::Armenian);

    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].translation, "water");
}

#[test]
fn test_extract_withGeneratedPages_shouldYieldEveryRow() {
    let words = common::armenian_words(25);
    let rows: Vec<LayoutRowFixture> = words
        .iter()
        .map(|word| LayoutRowFixture {
            headword: word,
            pronunciation: "[word]",
            translation: "word, term",
        })
        .collect();
    let document = common::layout_document(&rows, 10);

    let reader = LayoutReader::new("unused.json", &LayoutConfig::default(), Script::Armenian, Script::Latin);
    let entries = reader.extract(&document);

    assert_eq!(document.pages.len(), 3);
    assert_eq!(entries.len(), 25);
    assert_eq!(entries[0].headword, words[0]);
    assert_eq!(entries[0].translations, vec!["word", "term"]);
    assert_eq!(entries[24].headword, words[24]);
}

#[test]
fn test_extract_withLearnedColumns_shouldHandleShiftedPage() {
    let blocks = vec![
        TextBlock::new(20.0, 100.0, 80.0, 20.0, "ջուր"),
        TextBlock::new(130.0, 105.0, 60.0, 10.0, "[jur]"),
        TextBlock::new(260.0, 105.0, 100.0, 10.0, "water"),
        TextBlock::new(22.0, 130.0, 80.0, 20.0, "հաց"),
        TextBlock::new(132.0, 135.0, 60.0, 10.0, "[hats]"),
        TextBlock::new(262.0, 135.0, 100.0, 10.0, "bread"),
    ];
    let document = LayoutDocument {
        pages: vec![LayoutPage { number: 1, blocks }],
    };

    let mut config = LayoutConfig::default();
    config.column_detection = ColumnDetection::Learned;
    let entries = LayoutReader::new("unused.json", &config, Script::Armenian, Script::Latin).extract(&document);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].translations, vec!["water"]);
    assert_eq!(entries[0].pronunciation.as_deref(), Some("jur"));
    assert_eq!(entries[1].translations, vec!["bread"]);
}

#[test]
fn test_read_entries_withJsonDump_shouldParseFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "layout.json",
        r#"{"pages":[{"number":1,"blocks":[
            {"x":50,"y":100,"width":80,"height":20,"text":"ջուր"},
            {"x":400,"y":105,"width":80,"height":10,"text":"water"}
        ]}]}"#,
    )?;

    let reader = LayoutReader::new(&path, &LayoutConfig::default(), Script::Armenian, Script::Latin);
    let entries = reader.read_entries()?;

    assert_eq!(reader.kind(), SourceKind::Layout);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].headword, "ջուր");
    Ok(())
}

#[test]
fn test_read_entries_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "layout.json", "{\"pages\": [")?;

    let result = LayoutReader::new(&path, &LayoutConfig::default(), Script::Armenian, Script::Latin).read_entries();

    assert!(result.is_err());
    Ok(())
}
