//! Shared remote state.
//!
//! Every scalar has exactly one writer task (an encoder task or an analog
//! task) and any number of readers (transmit loop, display, heartbeat).
//! Values are plain atomics with relaxed ordering: a reader may see a
//! value one period stale, never a torn one.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::analog::{battery_volts, scale_pot_inverted};
use crate::battery::BatteryLevel;
use crate::command::{ControlSnapshot, Coordinates, Levels};
use crate::config::{KEY_A, KEY_B};
use crate::gesture::{GestureFlags, KeyId};

/// Which of the two encoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderSide {
    /// Azimuth.
    A,
    /// Elevation.
    B,
}

impl EncoderSide {
    pub const fn key(self) -> KeyId {
        match self {
            EncoderSide::A => KEY_A,
            EncoderSide::B => KEY_B,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EncoderSide::A => "A",
            EncoderSide::B => "B",
        }
    }
}

/// Analog inputs published by the sample tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    Volume,
    Distance,
    Battery,
}

impl AnalogChannel {
    pub const fn name(self) -> &'static str {
        match self {
            AnalogChannel::Volume => "pot volume",
            AnalogChannel::Distance => "pot distance",
            AnalogChannel::Battery => "battery",
        }
    }
}

pub struct RemoteState {
    azimuth: AtomicI32,
    elevation: AtomicI32,
    volume_mv: AtomicI32,
    distance_mv: AtomicI32,
    battery_mv: AtomicI32,
    switch_a: AtomicBool,
    switch_b: AtomicBool,
    /// Gesture actions waiting for the transmit loop.
    pub flags: GestureFlags,
}

impl RemoteState {
    pub const fn new() -> Self {
        Self {
            azimuth: AtomicI32::new(0),
            elevation: AtomicI32::new(0),
            volume_mv: AtomicI32::new(0),
            distance_mv: AtomicI32::new(0),
            battery_mv: AtomicI32::new(0),
            switch_a: AtomicBool::new(false),
            switch_b: AtomicBool::new(false),
            flags: GestureFlags::new(),
        }
    }

    /// Output slot for an analog channel's filtered millivolts.
    pub fn analog(&self, channel: AnalogChannel) -> &AtomicI32 {
        match channel {
            AnalogChannel::Volume => &self.volume_mv,
            AnalogChannel::Distance => &self.distance_mv,
            AnalogChannel::Battery => &self.battery_mv,
        }
    }

    pub fn millivolts(&self, channel: AnalogChannel) -> i32 {
        self.analog(channel).load(Ordering::Relaxed)
    }

    pub fn set_position(&self, side: EncoderSide, value: i32) {
        self.position_slot(side).store(value, Ordering::Relaxed);
    }

    pub fn position(&self, side: EncoderSide) -> i32 {
        self.position_slot(side).load(Ordering::Relaxed)
    }

    pub fn set_switch(&self, side: EncoderSide, pressed: bool) {
        self.switch_slot(side).store(pressed, Ordering::Relaxed);
    }

    pub fn is_pressed(&self, side: EncoderSide) -> bool {
        self.switch_slot(side).load(Ordering::Relaxed)
    }

    /// Both encoder switches held at once.
    pub fn both_pressed(&self) -> bool {
        self.is_pressed(EncoderSide::A) && self.is_pressed(EncoderSide::B)
    }

    pub fn coordinates(&self) -> Coordinates {
        let angle = |side| self.position(side).clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        Coordinates::new(angle(EncoderSide::A), angle(EncoderSide::B))
    }

    /// Pot percentages (inverted scale).
    pub fn levels(&self) -> Levels {
        Levels::new(
            scale_pot_inverted(self.millivolts(AnalogChannel::Volume)),
            scale_pot_inverted(self.millivolts(AnalogChannel::Distance)),
        )
    }

    pub fn battery_volts(&self) -> f32 {
        battery_volts(self.millivolts(AnalogChannel::Battery))
    }

    pub fn battery_level(&self) -> BatteryLevel {
        BatteryLevel::from_volts(self.battery_volts())
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            coords: self.coordinates(),
            levels: self.levels(),
        }
    }

    fn position_slot(&self, side: EncoderSide) -> &AtomicI32 {
        match side {
            EncoderSide::A => &self.azimuth,
            EncoderSide::B => &self.elevation,
        }
    }

    fn switch_slot(&self, side: EncoderSide) -> &AtomicBool {
        match side {
            EncoderSide::A => &self.switch_a,
            EncoderSide::B => &self.switch_b,
        }
    }
}

impl Default for RemoteState {
    fn default() -> Self {
        Self::new()
    }
}
