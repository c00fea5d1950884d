//! JSON round trips for the persistable types.
#![cfg(feature = "serde")]

use cranpose_text_input::{
    ManualClock, PlacedAnnotation, SavedTextFieldState, TextFieldCharSequence, TextFieldState,
    TextHighlight, TextHighlightType, TextRange, TextUndoOperation,
};
use serde_json::json;

#[test]
fn snapshot_round_trips() {
    let value = TextFieldCharSequence::with_composition(
        "héllo wörld",
        TextRange::new(8, 2),
        Some(TextRange::new(6, 11)),
    )
    .highlighted(Some(TextHighlight::new(
        TextHighlightType::HandwritingSelectPreview,
        TextRange::new(0, 5),
    )))
    .with_composing_annotations(vec![PlacedAnnotation::new(6, 11, "underline", "thick")]);

    let encoded = serde_json::to_string(&value).unwrap();
    let decoded: TextFieldCharSequence = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(decoded.composing_annotations()[0].value, "thick");
}

#[test]
fn deserialized_snapshot_ranges_are_coerced() {
    let decoded: TextFieldCharSequence = serde_json::from_value(json!({
        "text": "abc",
        "selection": { "start": 1, "end": 40 },
        "composition": { "start": 7, "end": 9 },
    }))
    .unwrap();
    assert_eq!(decoded.selection(), TextRange::new(1, 3));
    assert_eq!(decoded.composition(), Some(TextRange::cursor(3)));
    assert_eq!(decoded.highlight(), None);
    assert!(decoded.composing_annotations().is_empty());
}

#[test]
fn undo_operation_round_trips() {
    let op = TextUndoOperation::new(
        4,
        "old",
        "new text",
        TextRange::new(4, 7),
        TextRange::cursor(12),
        1_500,
        false,
    );
    let encoded = serde_json::to_value(&op).unwrap();
    let decoded: TextUndoOperation = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, op);
    assert!(!decoded.can_merge());
}

#[test]
fn saved_field_restores_text_and_history() {
    let clock = ManualClock::new(0);
    let state = TextFieldState::builder("")
        .undo_capacity(8)
        .clock(clock.clone())
        .build();
    state.edit(|buffer| buffer.append("one"));
    clock.advance(5_000);
    state.edit(|buffer| buffer.append(" two"));
    state.undo().unwrap();

    let encoded = serde_json::to_string(&state.saved_state()).unwrap();
    let saved: SavedTextFieldState = serde_json::from_str(&encoded).unwrap();
    assert_eq!(saved, state.saved_state());

    let restored = TextFieldState::from_saved_state(saved);
    assert_eq!(restored.text(), "one");
    assert!(restored.can_undo());
    assert!(restored.can_redo());
    restored.redo().unwrap();
    assert_eq!(restored.text(), "one two");
    restored.undo().unwrap();
    restored.undo().unwrap();
    assert_eq!(restored.text(), "");
}
