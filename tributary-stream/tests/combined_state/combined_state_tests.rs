// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tributary_stream::CombinedState;

#[test]
fn test_new_state_is_empty_and_not_ready() {
    let state = CombinedState::<i32>::new(3);

    assert_eq!(state.len(), 3);
    assert!(!state.is_complete());
    assert_eq!(state.values(), None);
    assert_eq!(state.get(0), None);
}

#[test]
fn test_with_slot_leaves_previous_snapshot_untouched() {
    // Arrange
    let empty = CombinedState::new(2);

    // Act
    let first = empty.with_slot(0, "a");
    let ready = first.with_slot(1, "b");
    let updated = ready.with_slot(0, "c");

    // Assert
    assert_eq!(empty.values(), None);
    assert_eq!(first.get(0), Some(&"a"));
    assert!(!first.is_complete());
    assert_eq!(ready.values(), Some(vec!["a", "b"]));
    assert_eq!(updated.values(), Some(vec!["c", "b"]));
}

#[test]
fn test_readiness_never_reverts() {
    let mut state = CombinedState::new(2).with_slot(0, 1).with_slot(1, 2);
    assert!(state.is_complete());

    for value in 3..10 {
        state = state.with_slot((value % 2) as usize, value);
        assert!(state.is_complete());
    }
}

#[test]
fn test_zero_slots() {
    let state = CombinedState::<u8>::new(0);

    assert!(state.is_empty());
    assert!(state.is_complete());
    assert_eq!(state.values(), Some(vec![]));
}
