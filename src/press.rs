//! Short/long press classification for one encoder switch.
//!
//! States:
//!
//! ```text
//!            press edge (timer start)
//!   ┌──────┐ ───────────────────────► ┌──────────┐  ticks >= threshold  ┌───────────┐
//!   │ Idle │                          │ Actuated │ ───────────────────► │ LongPress │
//!   └──────┘ ◄─────────────────────── └──────────┘                      └───────────┘
//!            release edge (timer stop)        ▲                               │
//!                                             └───── release edge ──── Idle ◄─┘
//! ```
//!
//! Every other switch edge (even parity: the press edge when starting from
//! released) registers the key id for gesture matching.

use crate::gesture::KeyId;

/// Number of timer ticks a switch must stay pressed to count as a long press.
pub const LONG_PRESS_TICKS: u32 = 32;

/// Periodic tick source backing long-press timing.
///
/// Implementations wrap a hardware or software periodic timer. `poll_tick`
/// reports at most one elapsed period per call.
pub trait TickTimer {
    type Error;

    fn start(&mut self) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Returns `true` if a period elapsed since the previous call.
    fn poll_tick(&mut self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    /// Switch released, timer stopped.
    Idle,
    /// Switch pressed, timer counting.
    Actuated,
    /// Switch held past the long-press threshold.
    LongPress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Press,
    Release,
}

/// Result of one classifier update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PressOutcome {
    /// Switch edge seen this cycle, if any.
    pub edge: Option<Edge>,
    /// Key to push into the gesture buffer.
    pub register: Option<KeyId>,
    /// The long-press threshold was crossed this cycle.
    pub long_press: bool,
}

/// Per-encoder press state machine.
pub struct PressClassifier<T: TickTimer> {
    key: KeyId,
    timer: T,
    pressed: bool,
    timer_running: bool,
    long_pressed: bool,
    degraded: bool,
    ticks: u32,
    edges: u32,
    threshold: u32,
}

impl<T: TickTimer> PressClassifier<T> {
    /// New classifier in `Idle` with the timer stopped.
    pub fn new(key: KeyId, timer: T) -> Self {
        Self::with_threshold(key, timer, LONG_PRESS_TICKS)
    }

    pub fn with_threshold(key: KeyId, timer: T, threshold: u32) -> Self {
        Self {
            key,
            timer,
            pressed: false,
            timer_running: false,
            long_pressed: false,
            degraded: false,
            ticks: 0,
            edges: 0,
            threshold,
        }
    }

    /// Run one cycle with the current switch level.
    pub fn update(&mut self, pressed: bool) -> PressOutcome {
        let mut outcome = PressOutcome::default();

        if pressed != self.pressed {
            self.ticks = 0;
            self.pressed = pressed;
            self.long_pressed = false;
            self.retime();

            // Register every other edge.
            if self.edges % 2 == 0 {
                outcome.register = Some(self.key);
            }
            self.edges = self.edges.wrapping_add(1);
            outcome.edge = Some(if pressed { Edge::Press } else { Edge::Release });
        } else if self.ticks >= self.threshold {
            info!("key {}: long press", self.key.get());
            self.ticks = 0;
            self.long_pressed = true;
            outcome.long_press = true;
        }

        if self.timer_running && self.timer.poll_tick() {
            self.ticks += 1;
        }

        outcome
    }

    fn retime(&mut self) {
        if self.pressed {
            match self.timer.start() {
                Ok(()) => {
                    if self.degraded {
                        info!("key {}: tick timer recovered", self.key.get());
                    }
                    self.timer_running = true;
                    self.degraded = false;
                }
                Err(_) => {
                    warn!(
                        "key {}: tick timer failed to start, long-press detection disabled",
                        self.key.get()
                    );
                    self.timer_running = false;
                    self.degraded = true;
                }
            }
        } else {
            if self.timer_running && self.timer.stop().is_err() {
                warn!("key {}: tick timer failed to stop", self.key.get());
            }
            self.timer_running = false;
        }
    }

    pub fn state(&self) -> PressState {
        match (self.pressed, self.long_pressed) {
            (false, _) => PressState::Idle,
            (true, false) => PressState::Actuated,
            (true, true) => PressState::LongPress,
        }
    }

    pub fn key(&self) -> KeyId {
        self.key
    }

    /// Ticks counted since the last edge or long-press report.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Long-press detection is unavailable because the timer failed.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
