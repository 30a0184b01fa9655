//! Status display view model.
//!
//! Pure text layout for the 128×64 panel (21 columns of 6×10 font), so
//! the rendering task only draws lines.

use core::fmt::Write;

use heapless::String;

use crate::battery::BatteryLevel;
use crate::command::{Coordinates, Levels};
use crate::error::Error;
use crate::state::{EncoderSide, RemoteState};

/// Characters per line at 6 px per glyph.
pub const LINE_LEN: usize = 21;

/// Lines on the readout page.
pub const READOUT_LINES: usize = 4;

pub type Line = String<LINE_LEN>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    Readout,
    Title,
}

impl Page {
    pub fn flipped(self) -> Self {
        match self {
            Page::Readout => Page::Title,
            Page::Title => Page::Readout,
        }
    }
}

/// Flips the page once each time both switches go down together.
#[derive(Clone, Debug)]
pub struct PageToggle {
    page: Page,
    both_held: bool,
}

impl PageToggle {
    pub const fn new() -> Self {
        Self {
            page: Page::Readout,
            both_held: false,
        }
    }

    /// Returns `true` if the page flipped this call.
    pub fn update(&mut self, both_pressed: bool) -> bool {
        let rising = both_pressed && !self.both_held;
        self.both_held = both_pressed;
        if rising {
            self.page = self.page.flipped();
        }
        rising
    }

    pub fn page(&self) -> Page {
        self.page
    }
}

impl Default for PageToggle {
    fn default() -> Self {
        Self::new()
    }
}

/// Values shown on the readout page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusView {
    pub coords: Coordinates,
    pub levels: Levels,
    pub battery_volts: f32,
    pub battery: BatteryLevel,
    pub switch_a: bool,
    pub switch_b: bool,
}

impl StatusView {
    pub fn capture(state: &RemoteState) -> Self {
        Self {
            coords: state.coordinates(),
            levels: state.levels(),
            battery_volts: state.battery_volts(),
            battery: state.battery_level(),
            switch_a: state.is_pressed(EncoderSide::A),
            switch_b: state.is_pressed(EncoderSide::B),
        }
    }

    pub fn lines(&self) -> Result<[Line; READOUT_LINES], Error> {
        let mut lines: [Line; READOUT_LINES] = Default::default();
        write!(
            lines[0],
            "AZ {:+3}   EL {:+3}",
            self.coords.azimuth, self.coords.elevation
        )
        .map_err(|_| Error::BufferOverflow)?;
        write!(
            lines[1],
            "VOL {:3}%  DST {:3}%",
            self.levels.volume, self.levels.distance
        )
        .map_err(|_| Error::BufferOverflow)?;
        write!(
            lines[2],
            "BAT {:.2}V {}",
            self.battery_volts,
            self.battery.label()
        )
        .map_err(|_| Error::BufferOverflow)?;
        write!(
            lines[3],
            "SW A:{} B:{}",
            switch_mark(self.switch_a),
            switch_mark(self.switch_b)
        )
        .map_err(|_| Error::BufferOverflow)?;
        Ok(lines)
    }
}

fn switch_mark(pressed: bool) -> &'static str {
    if pressed {
        "ON"
    } else {
        "--"
    }
}

/// Panel contrast for a distance percentage (0..=100 → 0..=255).
pub fn contrast_for(distance_pct: u8) -> u8 {
    (distance_pct.min(100) as u16 * 255 / 100) as u8
}
