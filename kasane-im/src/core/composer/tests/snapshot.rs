use super::*;

#[test]
fn test_snapshot_matches_composer() {
    let mut composer = new_composer();
    type_keys(&mut composer, "kan");
    composer.set_source_text("変換元");
    let data = composer.create_composer_data();

    assert_eq!(data.get_length(), composer.get_length());
    assert_eq!(data.get_cursor(), composer.get_cursor());
    assert_eq!(data.get_input_mode(), composer.get_input_mode());
    assert_eq!(data.source_text(), "変換元");
    assert_eq!(data.get_string_for_preedit(), composer.get_string_for_preedit());
    assert_eq!(
        data.get_query_for_conversion(),
        composer.get_query_for_conversion()
    );
    assert_eq!(
        data.get_query_for_prediction(),
        composer.get_query_for_prediction()
    );
    assert_eq!(data.get_raw_string(), composer.get_raw_string());
    assert_eq!(data.get_transliterations(), composer.get_transliterations());
}

#[test]
fn test_snapshot_is_immutable() {
    let mut composer = new_composer();
    type_keys(&mut composer, "ka");
    let data = composer.create_composer_data();
    assert_eq!(data.get_string_for_preedit(), "か");

    // Mutating the composer afterwards never changes the snapshot.
    type_keys(&mut composer, "kikukeko");
    composer.backspace();
    composer.edit_erase();
    assert_eq!(data.get_string_for_preedit(), "か");
    assert_eq!(data.get_raw_string(), "ka");
    assert_eq!(data.get_cursor(), 1);
}

#[test]
fn test_snapshot_queries_for_prediction() {
    let mut composer = new_composer();
    type_keys(&mut composer, "us");
    let data = composer.create_composer_data();
    let (base, expanded) = data.get_queries_for_prediction();
    assert_eq!(base, "う");
    assert!(expanded.contains("さ"));
}

#[test]
fn test_empty_snapshot() {
    let data = ComposerData::empty();
    assert_eq!(data.get_length(), 0);
    assert_eq!(data.get_cursor(), 0);
    assert_eq!(data.get_input_mode(), TransliterationType::Hiragana);
    assert_eq!(
        data.get_input_field_type(),
        crate::core::InputFieldType::Normal
    );
    assert_eq!(data.get_string_for_preedit(), "");
    assert_eq!(data.get_transliterations().len(), 11);
}

#[test]
fn test_snapshot_sub_transliterations() {
    let mut composer = new_composer();
    type_keys(&mut composer, "sashimi");
    let data = composer.create_composer_data();
    let subs = data.get_sub_transliterations(0, 2);
    assert_eq!(subs[0], "さし");
    assert_eq!(subs[2], "sashi");
    assert_eq!(data.get_raw_sub_string(1, 1), "shi");
    assert_eq!(data.get_string_for_type_correction(), "さしみ");
}

#[test]
fn test_snapshot_can_cross_threads() {
    let mut composer = new_composer();
    type_keys(&mut composer, "ka");
    let data = composer.create_composer_data();
    let handle = std::thread::spawn(move || data.get_string_for_preedit());
    assert_eq!(handle.join().unwrap(), "か");
}
