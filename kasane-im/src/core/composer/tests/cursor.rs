use super::*;

#[test]
fn test_move_left_right() {
    let mut composer = new_composer();
    type_keys(&mut composer, "aiu");
    assert_eq!(preedit_string(&composer), "あいう[]");

    composer.move_cursor_left();
    assert_eq!(preedit_string(&composer), "あい[う]");
    composer.move_cursor_left();
    assert_eq!(preedit_string(&composer), "あ[い]う");
    composer.move_cursor_right();
    assert_eq!(preedit_string(&composer), "あい[う]");
    composer.move_cursor_right();
    assert_eq!(preedit_string(&composer), "あいう[]");
}

#[test]
fn test_left_boundary() {
    let mut composer = new_composer();
    type_keys(&mut composer, "a");
    composer.move_cursor_left();
    assert_eq!(composer.get_cursor(), 0);
    composer.move_cursor_left();
    assert_eq!(composer.get_cursor(), 0);
}

#[test]
fn test_right_boundary() {
    let mut composer = new_composer();
    type_keys(&mut composer, "a");
    composer.move_cursor_right();
    assert_eq!(composer.get_cursor(), 1);
}

#[test]
fn test_beginning_and_end() {
    let mut composer = new_composer();
    type_keys(&mut composer, "aiu");
    composer.move_cursor_to_beginning();
    assert_eq!(composer.get_cursor(), 0);
    composer.move_cursor_to_end();
    assert_eq!(composer.get_cursor(), 3);
}

#[test]
fn test_move_cursor_to() {
    let mut composer = new_composer();
    type_keys(&mut composer, "aiu");
    composer.move_cursor_to(1);
    assert_eq!(composer.get_cursor(), 1);
    composer.move_cursor_to(3);
    assert_eq!(composer.get_cursor(), 3);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "cursor position out of range")]
fn test_move_cursor_past_end_asserts_in_debug() {
    // Release builds clamp this silently to the length instead.
    let mut composer = new_composer();
    type_keys(&mut composer, "aiu");
    composer.move_cursor_to(100);
}

#[test]
fn test_backspace_before_pending_chunk() {
    // S3: "kan", cursor left, backspace deletes か and leaves the pending n
    // at the start of the composition.
    let mut composer = new_composer();
    type_keys(&mut composer, "kan");
    composer.move_cursor_left();
    assert_eq!(preedit_string(&composer), "か[n]");

    composer.backspace();
    assert_eq!(preedit_string(&composer), "[n]");
    assert_eq!(composer.get_cursor(), 0);
    // The n is still pending: it resolves on commit but trims for
    // prediction.
    assert_eq!(composer.get_query_for_conversion(), "ん");
}

#[test]
fn test_backspace_at_end() {
    let mut composer = new_composer();
    type_keys(&mut composer, "kaki");
    composer.backspace();
    assert_eq!(preedit_string(&composer), "か[]");
    composer.backspace();
    assert_eq!(preedit_string(&composer), "[]");
    composer.backspace();
    assert_eq!(preedit_string(&composer), "[]");
}

#[test]
fn test_delete_at_cursor() {
    let mut composer = new_composer();
    type_keys(&mut composer, "aiu");
    composer.move_cursor_to_beginning();
    composer.delete();
    assert_eq!(preedit_string(&composer), "[い]う");
    assert_eq!(composer.get_cursor(), 0);
}

#[test]
fn test_delete_range() {
    let mut composer = new_composer();
    type_keys(&mut composer, "aiueo");
    composer.delete_range(1, 3);
    assert_eq!(composer.get_string_for_preedit(), "あお");
}

#[test]
fn test_insert_at_cursor_after_motion() {
    let mut composer = new_composer();
    type_keys(&mut composer, "au");
    composer.move_cursor_left();
    type_keys(&mut composer, "i");
    assert_eq!(composer.get_string_for_preedit(), "あいう");
    assert_eq!(composer.get_cursor(), 2);
}

#[test]
fn test_edit_erase() {
    let mut composer = new_composer();
    type_keys(&mut composer, "nanika");
    composer.edit_erase();
    assert!(composer.is_empty());
    assert_eq!(composer.get_cursor(), 0);
    type_keys(&mut composer, "ka");
    assert_eq!(composer.get_string_for_preedit(), "か");
}
