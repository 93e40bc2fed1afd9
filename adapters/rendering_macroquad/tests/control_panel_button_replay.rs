use sim_garden_rendering::ControlAction;
use sim_garden_rendering_macroquad::ControlPanelInputState;

fn run_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = ControlPanelInputState::default();
    let mut toggles = Vec::new();
    for &pressed in sequence {
        let taken = state.take_actions();
        toggles.push(taken == vec![ControlAction::ToggleRunning]);
        if pressed {
            state.register(ControlAction::ToggleRunning);
        }
    }

    // Flush any trailing latched press so the harness observes the final toggle.
    toggles.push(!state.take_actions().is_empty());
    toggles
}

#[test]
fn start_stop_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_sequence(&button_sequence);
    let second_run = run_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn actions_are_released_in_press_order() {
    let mut state = ControlPanelInputState::default();
    state.register(ControlAction::Reset);
    state.register(ControlAction::AdjustSpeed(10));
    state.register(ControlAction::NextOption);

    assert_eq!(
        state.take_actions(),
        vec![
            ControlAction::Reset,
            ControlAction::AdjustSpeed(10),
            ControlAction::NextOption,
        ]
    );
    assert!(state.take_actions().is_empty());
}

#[test]
fn typed_tick_rate_is_submitted_trimmed() {
    let mut state = ControlPanelInputState::default();
    state.rate_text_mut().push_str("  250 ");
    state.submit_rate_text();
    assert_eq!(
        state.take_actions(),
        vec![ControlAction::SetTickRate("250".to_string())]
    );

    state.rate_text_mut().clear();
    state.submit_rate_text();
    assert!(state.take_actions().is_empty());
}
