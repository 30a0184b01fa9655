//! Integration tests for steer-remote host-testable logic.
//!
//! These drive the same path the firmware tasks do: switch levels through
//! the press classifier into the gesture ring, analog samples through the
//! aggregator into shared state, and out through the command encoder.

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use steer_remote::analog::{AnalogSource, LinearCalibration, SampleAggregator};
use steer_remote::command::{decode, Command, CommandEncoder, Coordinates, Levels};
use steer_remote::config::{COMBOS, COMBO_LEN, FILTER_LEN};
use steer_remote::encoder::{Direction, Position};
use steer_remote::gesture::GestureBuffer;
use steer_remote::press::{PressClassifier, TickTimer};
use steer_remote::state::{AnalogChannel, EncoderSide, RemoteState};
use steer_remote::Error;

struct NeverTicks;

impl TickTimer for NeverTicks {
    type Error = Error;

    fn start(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn poll_tick(&mut self) -> bool {
        false
    }
}

/// One full actuation (press then release), as the encoder task sees it.
async fn click(
    classifier: &mut PressClassifier<NeverTicks>,
    gestures: &GestureBuffer<CriticalSectionRawMutex, COMBO_LEN>,
    state: &RemoteState,
) {
    for level in [true, false] {
        if let Some(key) = classifier.update(level).register {
            gestures.push(key).await;
        }
        if let Some(action) = gestures.take_match(&COMBOS).await {
            state.flags.raise(action);
        }
    }
}

#[test]
fn combo_clicks_send_toggle_frame() {
    let state = RemoteState::new();
    let gestures = GestureBuffer::<CriticalSectionRawMutex, COMBO_LEN>::new();
    let mut a = PressClassifier::new(EncoderSide::A.key(), NeverTicks);
    let mut b = PressClassifier::new(EncoderSide::B.key(), NeverTicks);
    let mut encoder = CommandEncoder::with_cached(Coordinates::new(0, 0), Levels::new(100, 100));

    block_on(async {
        click(&mut a, &gestures, &state).await;
        click(&mut a, &gestures, &state).await;
        assert_eq!(gestures.snapshot().await.iter().flatten().count(), 2);
        click(&mut b, &gestures, &state).await;
        // Match fired and wiped the ring.
        assert_eq!(gestures.snapshot().await, [None, None, None]);
    });

    let command = encoder.select(&state.flags, &state.snapshot());
    assert_eq!(command, Command::ToggleOnOff);

    let frame = command.frame().unwrap().unwrap();
    assert_eq!(frame.len(), 9);
    assert_eq!(decode(frame.as_bytes()), Ok(Command::ToggleOnOff));

    // Flag consumed; nothing else changed.
    assert_eq!(encoder.select(&state.flags, &state.snapshot()), Command::Nop);
}

#[test]
fn combo_clicks_send_channel_frame() {
    let state = RemoteState::new();
    let gestures = GestureBuffer::<CriticalSectionRawMutex, COMBO_LEN>::new();
    let mut a = PressClassifier::new(EncoderSide::A.key(), NeverTicks);
    let mut b = PressClassifier::new(EncoderSide::B.key(), NeverTicks);

    block_on(async {
        click(&mut a, &gestures, &state).await;
        click(&mut b, &gestures, &state).await;
        click(&mut b, &gestures, &state).await;
    });

    let mut encoder = CommandEncoder::with_cached(state.coordinates(), state.levels());
    assert_eq!(
        encoder.select(&state.flags, &state.snapshot()),
        Command::ChangeChannel
    );
}

#[test]
fn encoder_steps_send_coordinate_frame() {
    let state = RemoteState::new();
    let mut encoder = CommandEncoder::with_cached(Coordinates::new(0, 0), state.levels());
    let mut azimuth = Position::default();

    for _ in 0..10 {
        azimuth.step(Direction::Clockwise);
    }
    state.set_position(EncoderSide::A, azimuth.value());

    let command = encoder.select(&state.flags, &state.snapshot());
    let frame = command.frame().unwrap().unwrap();
    assert_eq!(frame.body(), "8281E");
    assert_eq!(
        decode(frame.as_bytes()),
        Ok(Command::ChangeCoord(Coordinates::new(10, 0)))
    );
}

struct FixedCode(i32);

impl AnalogSource for FixedCode {
    async fn read_raw(&mut self) -> Result<i32, Error> {
        Ok(self.0)
    }
}

#[test]
fn pot_samples_send_volume_frame() {
    let state = RemoteState::new();
    let calibration = LinearCalibration::new(3600, 4095);
    // 1365 * 3600 / 4095 = 1200 mV, past the pot's 0 % end.
    let mut distance = SampleAggregator::<_, _, FILTER_LEN>::new(
        AnalogChannel::Distance.name(),
        FixedCode(1365),
        calibration,
        state.analog(AnalogChannel::Distance),
    );
    // 683 * 3600 / 4095 = 600 mV -> 50 %.
    let mut volume = SampleAggregator::<_, _, FILTER_LEN>::new(
        AnalogChannel::Volume.name(),
        FixedCode(683),
        calibration,
        state.analog(AnalogChannel::Volume),
    );

    block_on(async {
        for _ in 0..FILTER_LEN {
            assert!(distance.step().await.is_some());
            assert!(volume.step().await.is_some());
        }
    });

    assert_eq!(state.millivolts(AnalogChannel::Volume), 600);
    assert_eq!(state.levels(), Levels::new(50, 0));

    let mut encoder = CommandEncoder::with_cached(state.coordinates(), Levels::ZERO);
    let command = encoder.select(&state.flags, &state.snapshot());
    assert_eq!(command, Command::ChangeVolume(Levels::new(50, 0)));
    assert_eq!(command.frame().unwrap().unwrap().body(), "A3200");
}
