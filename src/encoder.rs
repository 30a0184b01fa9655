//! Rotary encoder decoding and bounded position tracking.
//!
//! Quadrature encoding (channels idle high, pulled up):
//! CW:  A leads B (A falls first when rotating clockwise)
//! CCW: B leads A (B falls first)
//!
//! ```text
//! CW:  Idle (1,1) -> CwStep1 (0,1) -> CwStep2 (0,0) -> A or B rises -> step
//! CCW: Idle (1,1) -> CcwStep1 (1,0) -> CcwStep2 (0,0) -> A or B rises -> step
//! ```
//!
//! A half-completed excursion that returns to (1,1) is bounce and emits
//! nothing.

use crate::config::{ENCODER_MAX, ENCODER_MIN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DecodeState {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Detent decoder fed with raw A/B channel levels.
#[derive(Clone, Debug)]
pub struct QuadratureDecoder {
    state: DecodeState,
    last_a: bool,
    last_b: bool,
    flipped: bool,
}

impl QuadratureDecoder {
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            state: DecodeState::Idle,
            last_a: a,
            last_b: b,
            flipped: false,
        }
    }

    /// Swap the reported direction (encoder mounted mirrored).
    pub fn flipped(mut self) -> Self {
        self.flipped = !self.flipped;
        self
    }

    /// Feed the current channel levels; returns a direction when a full
    /// detent completes.
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;

        let step = self.decode(a, b)?;
        Some(match (step, self.flipped) {
            (dir, false) => dir,
            (Direction::Clockwise, true) => Direction::CounterClockwise,
            (Direction::CounterClockwise, true) => Direction::Clockwise,
        })
    }

    fn decode(&mut self, a: bool, b: bool) -> Option<Direction> {
        match self.state {
            DecodeState::Idle => {
                if !a && b {
                    self.state = DecodeState::CwStep1;
                } else if a && !b {
                    self.state = DecodeState::CcwStep1;
                }
                None
            }
            DecodeState::CwStep1 => {
                if !a && !b {
                    self.state = DecodeState::CwStep2;
                } else if a && b {
                    self.state = DecodeState::Idle;
                }
                None
            }
            DecodeState::CcwStep1 => {
                if !a && !b {
                    self.state = DecodeState::CcwStep2;
                } else if a && b {
                    self.state = DecodeState::Idle;
                }
                None
            }
            DecodeState::CwStep2 => {
                self.state = DecodeState::Idle;
                Some(Direction::Clockwise)
            }
            DecodeState::CcwStep2 => {
                self.state = DecodeState::Idle;
                Some(Direction::CounterClockwise)
            }
        }
    }
}

/// Encoder position clamped to `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    value: i32,
    min: i32,
    max: i32,
}

impl Position {
    /// Starts at 0, or the nearest bound if 0 lies outside the range.
    pub const fn new(min: i32, max: i32) -> Self {
        assert!(min <= max, "position range is empty");
        let value = if 0 < min {
            min
        } else if 0 > max {
            max
        } else {
            0
        };
        Self { value, min, max }
    }

    /// Move one detent; saturates at the bounds. Returns `true` if the
    /// value changed.
    pub fn step(&mut self, direction: Direction) -> bool {
        let delta = match direction {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        };
        self.offset(delta)
    }

    /// Apply a signed delta, clamping to the bounds.
    pub fn offset(&mut self, delta: i32) -> bool {
        let next = self.value.saturating_add(delta).clamp(self.min, self.max);
        let changed = next != self.value;
        self.value = next;
        changed
    }

    pub fn set(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub const fn value(&self) -> i32 {
        self.value
    }

    pub const fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(ENCODER_MIN, ENCODER_MAX)
    }
}
