//! Integration tests driving the oven through whole programs.
//!
//! Every tick is pushed through the event codec, the way the device process
//! does it, so these tests also cover the bytes a consumer would see.

use koven_core::{decode_command, decode_event, encode_command, encode_event, Command, Event};
use koven_core::{Oven, OvenState};

/// Ticks the oven once and returns the event as a consumer would decode it.
fn tick_over_wire(oven: &mut Oven) -> Event {
    let bytes = encode_event(&oven.tick());
    decode_event(&bytes).expect("oven events must always decode")
}

/// Applies a command after sending it through the command codec.
fn apply_over_wire(oven: &mut Oven, cmd: Command) {
    let bytes = encode_command(&cmd);
    oven.apply(&decode_command(&bytes).expect("valid command"));
}

#[test]
fn test_short_program_full_lifecycle() {
    // Arrange
    let mut oven = Oven::new();
    apply_over_wire(&mut oven, Command::start(30, 3));

    // Act & Assert: five heating ticks, 26..=30.
    for expected in 26..=30 {
        let event = tick_over_wire(&mut oven);
        assert_eq!(event.state, OvenState::Preheating);
        assert_eq!(event.current_temperature, expected);
        assert_eq!(event.remaining_time, -1);
    }

    // Tick 6 reaches baking with the full duration.
    let event = tick_over_wire(&mut oven);
    assert_eq!(event.state, OvenState::Baking);
    assert_eq!(event.current_temperature, 30);
    assert_eq!(event.remaining_time, 3);

    for expected in [2, 1, 0] {
        let event = tick_over_wire(&mut oven);
        assert_eq!(event.state, OvenState::Baking);
        assert_eq!(event.remaining_time, expected);
    }

    let event = tick_over_wire(&mut oven);
    assert_eq!(event.state, OvenState::CoolingDown);
    assert_eq!(event.current_temperature, 30);
    assert_eq!(event.programmed_duration, -1);
    assert_eq!(event.programmed_temperature, -1);

    for expected in [29, 28, 27, 26, 25] {
        let event = tick_over_wire(&mut oven);
        assert_eq!(event.state, OvenState::CoolingDown);
        assert_eq!(event.current_temperature, expected);
    }

    let event = tick_over_wire(&mut oven);
    assert_eq!(event, Oven::new().snapshot());
}

#[test]
fn test_stop_while_preheating_cools_back_to_idle() {
    // Arrange: heat to 75 °C.
    let mut oven = Oven::new();
    apply_over_wire(&mut oven, Command::start(200, 60));
    for _ in 0..50 {
        oven.tick();
    }
    assert_eq!(oven.current_temperature(), 75);

    // Act
    apply_over_wire(&mut oven, Command::stop());

    // Assert
    let snapshot = oven.snapshot();
    assert_eq!(snapshot.state, OvenState::CoolingDown);
    assert_eq!(snapshot.current_temperature, 75);
    assert_eq!(snapshot.remaining_time, -1);
    assert_eq!(snapshot.programmed_duration, -1);
    assert_eq!(snapshot.programmed_temperature, -1);

    let mut ticks = 0;
    while oven.state() != OvenState::Idle {
        oven.tick();
        ticks += 1;
        assert!(ticks <= 51, "oven never settled");
    }
    // 50 decrements to 25, then one tick to idle.
    assert_eq!(ticks, 51);
    assert_eq!(oven.snapshot(), Oven::new().snapshot());
}

#[test]
fn test_second_start_is_rejected_not_queued() {
    let mut oven = Oven::new();
    apply_over_wire(&mut oven, Command::start(27, 1));
    apply_over_wire(&mut oven, Command::start(300, 900));

    // Heat and bake through; the second program must never appear.
    let mut seen = Vec::new();
    loop {
        let event = oven.tick();
        seen.push(event);
        if event.state == OvenState::Idle {
            break;
        }
    }

    assert!(seen
        .iter()
        .filter(|e| e.state != OvenState::Idle && e.state != OvenState::CoolingDown)
        .all(|e| e.programmed_temperature == 27 && e.programmed_duration == 1));
    assert!(seen.iter().all(|e| e.current_temperature <= 27));
}

#[test]
fn test_restart_after_program_completes() {
    let mut oven = Oven::new();
    apply_over_wire(&mut oven, Command::start(25, 0));

    // Already at target: bake, finish at room temperature, idle.
    assert_eq!(oven.tick().state, OvenState::Baking);
    assert_eq!(oven.tick().state, OvenState::Idle);

    apply_over_wire(&mut oven, Command::start(26, 1));
    assert_eq!(oven.state(), OvenState::Preheating);
}
