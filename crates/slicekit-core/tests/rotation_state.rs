use proptest::prelude::*;
use slicekit_core::{Axis, RotationDirection, RotationState};

#[test]
fn test_full_turn_clockwise() {
    let mut state = RotationState::new();
    let mut seen = vec![state.angle(Axis::X)];
    for _ in 0..4 {
        state.rotate(Axis::X, RotationDirection::Clockwise);
        seen.push(state.angle(Axis::X));
    }

    assert_eq!(seen, vec![0, 90, 180, 270, 360]);
    assert_eq!(state.normalized(Axis::X), 0);
    // Other axes untouched
    assert_eq!(state.angle(Axis::Y), 0);
    assert_eq!(state.angle(Axis::Z), 0);
}

#[test]
fn test_reset_after_rotations() {
    let mut state = RotationState::new();
    state.rotate(Axis::X, RotationDirection::Clockwise);
    state.rotate(Axis::Y, RotationDirection::CounterClockwise);
    state.rotate(Axis::Z, RotationDirection::Clockwise);
    state.rotate(Axis::Z, RotationDirection::Clockwise);
    assert!(!state.is_zero());

    state.reset();
    assert!(state.is_zero());
    assert_eq!(state, RotationState { x: 0, y: 0, z: 0 });
}

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

fn direction_strategy() -> impl Strategy<Value = RotationDirection> {
    prop_oneof![
        Just(RotationDirection::Clockwise),
        Just(RotationDirection::CounterClockwise)
    ]
}

proptest! {
    #[test]
    fn prop_four_turns_restore_orientation(
        actions in prop::collection::vec((axis_strategy(), direction_strategy()), 0..32),
        axis in axis_strategy(),
        direction in direction_strategy(),
    ) {
        let mut state = RotationState::new();
        for (a, d) in &actions {
            state.rotate(*a, *d);
        }
        let before = state.normalized(axis);
        for _ in 0..4 {
            state.rotate(axis, direction);
        }
        prop_assert_eq!(state.normalized(axis), before);
    }

    #[test]
    fn prop_reset_always_zero(
        actions in prop::collection::vec((axis_strategy(), direction_strategy()), 0..32),
    ) {
        let mut state = RotationState::new();
        for (a, d) in actions {
            state.rotate(a, d);
        }
        state.reset();
        prop_assert!(state.is_zero());
    }
}
