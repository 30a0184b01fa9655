//! Outbound command protocol for the controller link.
//!
//! Frames are ASCII hex with no delimiters: a one-digit verb, a
//! verb-dependent payload of two-digit bytes, then the CRC-32 of the
//! preceding text as 8 uppercase hex digits.
//!
//! ```text
//! 2                 + CRC   TOGGLE_ON_OFF            (9 chars)
//! 4                 + CRC   CHANGE_CHANNEL           (9 chars)
//! 8 AZ EL           + CRC   CHANGE_COORD             (13 chars)
//! A VOL DST         + CRC   CHANGE_VOLUME            (13 chars)
//! C AZ EL VOL DST   + CRC   CHANGE_COORD_AND_VOLUME  (17 chars)
//! ```
//!
//! AZ/EL are sent as `angle + 30` so the signed ±30 range fits one
//! unsigned byte; VOL/DST are percentages sent as-is.

mod crc;

#[cfg(test)]
mod tests;

use core::fmt::Write;

use heapless::String;

use crate::error::Error;
use crate::gesture::{GestureAction, GestureFlags};

pub use crc::crc32_ieee;

/// Offset applied to coordinates on the wire.
pub const COORD_OFFSET: i32 = 30;

/// Number of hex digits in the CRC trailer.
pub const CRC_HEX_LEN: usize = 8;

/// Longest frame (`CHANGE_COORD_AND_VOLUME`).
pub const FRAME_MAX_LEN: usize = 17;

/// Highest percentage accepted in a level byte.
pub const LEVEL_MAX: u8 = 100;

/// Command-type code prefixing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Verb {
    /// Nothing to send this cycle.
    Nop = 0x0,
    /// Toggle power to the array.
    ToggleOnOff = 0x2,
    /// Switch the controller's audio channel.
    ChangeChannel = 0x4,
    /// New azimuth/elevation.
    ChangeCoord = 0x8,
    /// New volume/distance levels.
    ChangeVolume = 0xA,
    /// Coordinates and levels in one transaction.
    ChangeCoordAndVolume = 0xC,
    /// Ask the controller for a readback. Reserved.
    RequestInfo = 0xE,
}

impl Verb {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x0 => Some(Verb::Nop),
            0x2 => Some(Verb::ToggleOnOff),
            0x4 => Some(Verb::ChangeChannel),
            0x8 => Some(Verb::ChangeCoord),
            0xA => Some(Verb::ChangeVolume),
            0xC => Some(Verb::ChangeCoordAndVolume),
            0xE => Some(Verb::RequestInfo),
            _ => None,
        }
    }

    /// Payload size in bytes (each byte is two hex digits on the wire).
    pub const fn payload_len(self) -> usize {
        match self {
            Verb::ChangeCoord | Verb::ChangeVolume => 2,
            Verb::ChangeCoordAndVolume => 4,
            Verb::Nop | Verb::ToggleOnOff | Verb::ChangeChannel | Verb::RequestInfo => 0,
        }
    }

    /// Total frame length in characters, CRC included.
    pub const fn frame_len(self) -> usize {
        1 + 2 * self.payload_len() + CRC_HEX_LEN
    }
}

/// Steering angles in degrees, each within ±30.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinates {
    pub azimuth: i8,
    pub elevation: i8,
}

impl Coordinates {
    /// Both axes at the lower bound.
    pub const MIN: Self = Self {
        azimuth: -30,
        elevation: -30,
    };

    pub const fn new(azimuth: i8, elevation: i8) -> Self {
        Self { azimuth, elevation }
    }
}

/// Volume and distance pot percentages, each within `[0, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Levels {
    pub volume: u8,
    pub distance: u8,
}

impl Levels {
    pub const ZERO: Self = Self {
        volume: 0,
        distance: 0,
    };

    pub const fn new(volume: u8, distance: u8) -> Self {
        Self { volume, distance }
    }
}

/// Values read from the shared state at the start of a transmit cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSnapshot {
    pub coords: Coordinates,
    pub levels: Levels,
}

/// A verb together with its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Nop,
    ToggleOnOff,
    ChangeChannel,
    ChangeCoord(Coordinates),
    ChangeVolume(Levels),
    ChangeCoordAndVolume(Coordinates, Levels),
    RequestInfo,
}

impl Command {
    pub fn verb(&self) -> Verb {
        match self {
            Command::Nop => Verb::Nop,
            Command::ToggleOnOff => Verb::ToggleOnOff,
            Command::ChangeChannel => Verb::ChangeChannel,
            Command::ChangeCoord(_) => Verb::ChangeCoord,
            Command::ChangeVolume(_) => Verb::ChangeVolume,
            Command::ChangeCoordAndVolume(..) => Verb::ChangeCoordAndVolume,
            Command::RequestInfo => Verb::RequestInfo,
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, Command::Nop)
    }

    /// Build the wire frame. `Nop` produces no frame.
    pub fn frame(&self) -> Result<Option<Frame>, Error> {
        if self.is_nop() {
            return Ok(None);
        }
        Frame::encode(self).map(Some)
    }
}

/// An encoded frame ready for the serial link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    verb: Verb,
    crc: u32,
    text: String<FRAME_MAX_LEN>,
}

impl Frame {
    /// Encode `command` as verb + payload + CRC.
    pub fn encode(command: &Command) -> Result<Self, Error> {
        let verb = command.verb();
        let mut text: String<FRAME_MAX_LEN> = String::new();

        write!(text, "{:01X}", verb.code()).map_err(|_| Error::BufferOverflow)?;
        match command {
            Command::ChangeCoord(coords) => write_coords(&mut text, coords)?,
            Command::ChangeVolume(levels) => write_levels(&mut text, levels)?,
            Command::ChangeCoordAndVolume(coords, levels) => {
                write_coords(&mut text, coords)?;
                write_levels(&mut text, levels)?;
            }
            Command::Nop | Command::ToggleOnOff | Command::ChangeChannel | Command::RequestInfo => {}
        }

        let crc = crc32_ieee(text.as_bytes());
        write!(text, "{:08X}", crc).map_err(|_| Error::BufferOverflow)?;

        Ok(Self { verb, crc, text })
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Verb and payload, without the CRC trailer.
    pub fn body(&self) -> &str {
        &self.text[..self.text.len() - CRC_HEX_LEN]
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Wire byte for a signed coordinate.
pub fn coord_byte(angle: i8) -> u8 {
    (angle as i32 + COORD_OFFSET).clamp(0, u8::MAX as i32) as u8
}

fn write_coords(text: &mut String<FRAME_MAX_LEN>, coords: &Coordinates) -> Result<(), Error> {
    write!(
        text,
        "{:02X}{:02X}",
        coord_byte(coords.azimuth),
        coord_byte(coords.elevation)
    )
    .map_err(|_| Error::BufferOverflow)
}

fn write_levels(text: &mut String<FRAME_MAX_LEN>, levels: &Levels) -> Result<(), Error> {
    write!(text, "{:02X}{:02X}", levels.volume, levels.distance).map_err(|_| Error::BufferOverflow)
}

/// Parse and verify a received frame.
pub fn decode(frame: &[u8]) -> Result<Command, Error> {
    if frame.len() < 1 + CRC_HEX_LEN {
        return Err(Error::FrameLength(frame.len()));
    }

    let code = hex_digit(frame[0]).ok_or(Error::UnknownVerb(frame[0]))?;
    let verb = Verb::from_code(code).ok_or(Error::UnknownVerb(frame[0]))?;
    if frame.len() != verb.frame_len() {
        return Err(Error::FrameLength(frame.len()));
    }

    let (body, trailer) = frame.split_at(frame.len() - CRC_HEX_LEN);
    let mut actual = 0u32;
    for &c in trailer {
        actual = (actual << 4) | hex_digit(c).ok_or(Error::InvalidHex)? as u32;
    }
    let expected = crc32_ieee(body);
    if actual != expected {
        return Err(Error::CrcMismatch { expected, actual });
    }

    let payload = &body[1..];
    let byte = |i: usize| -> Result<u8, Error> {
        let hi = hex_digit(payload[2 * i]).ok_or(Error::InvalidHex)?;
        let lo = hex_digit(payload[2 * i + 1]).ok_or(Error::InvalidHex)?;
        Ok((hi << 4) | lo)
    };

    Ok(match verb {
        Verb::Nop => Command::Nop,
        Verb::ToggleOnOff => Command::ToggleOnOff,
        Verb::ChangeChannel => Command::ChangeChannel,
        Verb::RequestInfo => Command::RequestInfo,
        Verb::ChangeCoord => Command::ChangeCoord(coords_from(byte(0)?, byte(1)?)?),
        Verb::ChangeVolume => Command::ChangeVolume(levels_from(byte(0)?, byte(1)?)?),
        Verb::ChangeCoordAndVolume => Command::ChangeCoordAndVolume(
            coords_from(byte(0)?, byte(1)?)?,
            levels_from(byte(2)?, byte(3)?)?,
        ),
    })
}

fn coords_from(az: u8, el: u8) -> Result<Coordinates, Error> {
    let angle = |b: u8| -> Result<i8, Error> {
        if b as i32 > 2 * COORD_OFFSET {
            return Err(Error::PayloadRange(b));
        }
        Ok((b as i32 - COORD_OFFSET) as i8)
    };
    Ok(Coordinates::new(angle(az)?, angle(el)?))
}

fn levels_from(volume: u8, distance: u8) -> Result<Levels, Error> {
    for b in [volume, distance] {
        if b > LEVEL_MAX {
            return Err(Error::PayloadRange(b));
        }
    }
    Ok(Levels::new(volume, distance))
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Chooses the single verb to send each transmit cycle.
///
/// Priority: power toggle, then channel change, then the coordinate/level
/// combination. Coordinate and level changes are detected against the
/// values sent last, so they fire once per change.
#[derive(Clone, Debug)]
pub struct CommandEncoder {
    last_coords: Coordinates,
    last_levels: Levels,
}

impl CommandEncoder {
    /// Cache starts at the lowest coordinates and zero levels, so the
    /// first cycle after power-up reports the live values.
    pub const fn new() -> Self {
        Self::with_cached(Coordinates::MIN, Levels::ZERO)
    }

    pub const fn with_cached(coords: Coordinates, levels: Levels) -> Self {
        Self {
            last_coords: coords,
            last_levels: levels,
        }
    }

    /// Pick this cycle's command. Consumes a gesture flag only when its
    /// verb is chosen.
    pub fn select(&mut self, flags: &GestureFlags, snapshot: &ControlSnapshot) -> Command {
        if flags.take(GestureAction::TogglePower) {
            return Command::ToggleOnOff;
        }
        if flags.take(GestureAction::ChangeChannel) {
            return Command::ChangeChannel;
        }

        let coords_changed = snapshot.coords != self.last_coords;
        let levels_changed = snapshot.levels != self.last_levels;
        if coords_changed {
            self.last_coords = snapshot.coords;
        }
        if levels_changed {
            self.last_levels = snapshot.levels;
        }

        match (coords_changed, levels_changed) {
            (false, false) => Command::Nop,
            (true, false) => Command::ChangeCoord(snapshot.coords),
            (false, true) => Command::ChangeVolume(snapshot.levels),
            (true, true) => Command::ChangeCoordAndVolume(snapshot.coords, snapshot.levels),
        }
    }

    pub fn last_coords(&self) -> Coordinates {
        self.last_coords
    }

    pub fn last_levels(&self) -> Levels {
        self.last_levels
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}
