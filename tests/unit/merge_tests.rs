/*!
 * Tests for merging the two sources by headword
 */

use bararan::app_config::MergeConfig;
use bararan::sources::{RawEntry, SourceKind};
use bararan::vocabulary::merge_entries;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn archive(headword: &str, translations: &[&str]) -> RawEntry {
    RawEntry::new(headword, strings(translations), SourceKind::Archive)
}

fn layout(headword: &str, translations: &[&str]) -> RawEntry {
    RawEntry::new(headword, strings(translations), SourceKind::Layout)
}

#[test]
fn test_merge_withDifferentCase_shouldMatchCaseInsensitively() {
    let merged = merge_entries(
        vec![archive("Ջուր", &["вода"])],
        vec![layout("ջուր", &["water"])],
        &MergeConfig::default(),
    );

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].headword, "ջուր");
    assert_eq!(merged[0].english, strings(&["water"]));
    assert_eq!(merged[0].russian, strings(&["вода"]));
}

#[test]
fn test_merge_withOneSidedHeadwords_shouldDropThem() {
    let merged = merge_entries(
        vec![archive("ջուր", &["вода"]), archive("հաց", &["хлеб"])],
        vec![layout("ջուր", &["water"]), layout("տուն", &["house"])],
        &MergeConfig::default(),
    );

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].headword, "ջուր");
}

#[test]
fn test_merge_withRepeatedEntries_shouldUnionAndCapInEncounterOrder() {
    let merged = merge_entries(
        vec![
            archive("ջուր", &["вода", "влага", "Вода"]),
            archive("ջուր", &["водичка", "жидкость", "аш-два-о", "лишнее"]),
        ],
        vec![
            layout("ջուր", &["water", "aqua"]),
            layout("Ջուր", &["Water", "liquid", "fluid", "moisture", "extra"]),
        ],
        &MergeConfig::default(),
    );

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].russian, strings(&["вода", "влага", "водичка", "жидкость", "аш-два-о"]));
    assert_eq!(merged[0].english, strings(&["water", "aqua", "liquid", "fluid", "moisture"]));
}

#[test]
fn test_merge_withSmallerCap_shouldRespectConfig() {
    let config = MergeConfig {
        max_translations: 2,
        ..MergeConfig::default()
    };
    let merged = merge_entries(
        vec![archive("ջուր", &["вода", "влага", "жидкость"])],
        vec![layout("ջուր", &["water", "aqua", "liquid"])],
        &config,
    );

    assert_eq!(merged[0].russian.len(), 2);
    assert_eq!(merged[0].english.len(), 2);
}

#[test]
fn test_merge_withUppercaseLayoutHeading_shouldPreferLowercaseSpelling() {
    let merged = merge_entries(
        vec![archive("ջուր", &["вода"])],
        vec![layout("ՋՈՒՐ", &["water"])],
        &MergeConfig::default(),
    );

    assert_eq!(merged[0].headword, "ջուր");
}

#[test]
fn test_merge_withArchivePrimary_shouldUseArchiveCasingAndOrder() {
    let config = MergeConfig {
        primary_source: SourceKind::Archive,
        ..MergeConfig::default()
    };
    let merged = merge_entries(
        vec![archive("Հաց", &["хлеб"]), archive("Ջուր", &["вода"])],
        vec![layout("ջուր", &["water"]), layout("հաց", &["bread"])],
        &config,
    );

    let headwords: Vec<&str> = merged.iter().map(|e| e.headword.as_str()).collect();
    assert_eq!(headwords, vec!["Հաց", "Ջուր"]);
    assert_eq!(merged[0].english, strings(&["bread"]));
}

#[test]
fn test_merge_withPronunciation_shouldTakeFirstFromLayout() {
    let merged = merge_entries(
        vec![archive("ջուր", &["вода"])],
        vec![
            layout("ջուր", &["water"]),
            layout("ջուր", &["aqua"]).with_pronunciation(Some("ǰur".to_string())),
            layout("ջուր", &["liquid"]).with_pronunciation(Some("jur".to_string())),
        ],
        &MergeConfig::default(),
    );

    assert_eq!(merged[0].pronunciation.as_deref(), Some("ǰur"));
}

#[test]
fn test_merge_withSameInputTwice_shouldProduceSameOrder() {
    let build = || {
        merge_entries(
            vec![archive("ա", &["а"]), archive("բ", &["б"]), archive("գ", &["г"])],
            vec![layout("գ", &["g"]), layout("ա", &["a"]), layout("բ", &["b"])],
            &MergeConfig::default(),
        )
    };

    let first = build();
    assert_eq!(first, build());
    let headwords: Vec<&str> = first.iter().map(|e| e.headword.as_str()).collect();
    assert_eq!(headwords, vec!["գ", "ա", "բ"]);
}
