//! Rotary encoder tasks: quadrature position plus switch press handling.
//!
//! Each cycle waits (bounded) for an A/B channel edge, then polls the
//! switch regardless of whether an edge arrived. Switch edges feed the
//! press classifier; registered presses go into the shared gesture ring,
//! which is then checked against the configured combos.

use core::convert::Infallible;

use defmt::{debug, info};
use embassy_futures::select::select;
use embassy_nrf::gpio::Input;
use embassy_time::{with_timeout, Duration, Instant, Timer};
use steer_remote::config::{COMBOS, ENCODER_POLL_TIMEOUT_MS, GESTURE_LOCK_TIMEOUT_MS, PRESS_TICK_MS};
use steer_remote::encoder::{Position, QuadratureDecoder};
use steer_remote::press::{PressClassifier, TickTimer};
use steer_remote::state::{EncoderSide, RemoteState};

use super::Gestures;

/// GPIO lines of one encoder (all active-low with pull-ups).
pub struct EncoderPins {
    pub cha: Input<'static>,
    pub chb: Input<'static>,
    pub switch: Input<'static>,
}

/// Long-press tick source on the Embassy time driver.
pub struct SoftTimer {
    period: Duration,
    next: Option<Instant>,
}

impl SoftTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }
}

impl TickTimer for SoftTimer {
    type Error = Infallible;

    fn start(&mut self) -> Result<(), Infallible> {
        self.next = Some(Instant::now() + self.period);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        self.next = None;
        Ok(())
    }

    fn poll_tick(&mut self) -> bool {
        match self.next {
            Some(due) if Instant::now() >= due => {
                self.next = Some(due + self.period);
                true
            }
            _ => false,
        }
    }
}

#[embassy_executor::task(pool_size = 2)]
pub async fn encoder_task(
    side: EncoderSide,
    mut pins: EncoderPins,
    state: &'static RemoteState,
    gestures: &'static Gestures,
) {
    let poll_timeout = Duration::from_millis(ENCODER_POLL_TIMEOUT_MS);
    let lock_timeout = Duration::from_millis(GESTURE_LOCK_TIMEOUT_MS);

    let mut decoder = QuadratureDecoder::new(pins.cha.is_high(), pins.chb.is_high());
    let mut position = Position::default();
    let mut classifier = PressClassifier::new(
        side.key(),
        SoftTimer::new(Duration::from_millis(PRESS_TICK_MS)),
    );
    state.set_position(side, position.value());
    info!("encoder {}: ready at {}", side.label(), position.value());

    loop {
        let edge = with_timeout(
            poll_timeout,
            select(pins.cha.wait_for_any_edge(), pins.chb.wait_for_any_edge()),
        )
        .await;

        if edge.is_ok() {
            if let Some(direction) = decoder.update(pins.cha.is_high(), pins.chb.is_high()) {
                if position.step(direction) {
                    state.set_position(side, position.value());
                    debug!("encoder {}: {} -> {}", side.label(), direction, position.value());
                }
            }
        }

        let pressed = pins.switch.is_low();
        state.set_switch(side, pressed);

        if let Some(key) = classifier.update(pressed).register {
            if let Err(e) = gestures.push_within(key, Timer::after(lock_timeout)).await {
                debug!("encoder {}: press dropped: {}", side.label(), e);
            }
        }

        match gestures.take_match_within(&COMBOS, Timer::after(lock_timeout)).await {
            Ok(Some(action)) => {
                info!("encoder {}: combo -> {}", side.label(), action);
                state.flags.raise(action);
            }
            Ok(None) => {}
            Err(e) => debug!("encoder {}: match skipped: {}", side.label(), e),
        }
    }
}
