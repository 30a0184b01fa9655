//! Unit tests for command selection, framing and decoding.
//!
//! Expected CRCs are the standard CRC-32 of the verb + payload text.

use super::*;
use crate::error::Error;
use crate::gesture::{GestureAction, GestureFlags};

fn snapshot(az: i8, el: i8, volume: u8, distance: u8) -> ControlSnapshot {
    ControlSnapshot {
        coords: Coordinates::new(az, el),
        levels: Levels::new(volume, distance),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CRC Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn crc_check_value() {
    assert_eq!(crc32_ieee(b"123456789"), 0xCBF4_3926);
}

#[test]
fn crc_short_inputs() {
    assert_eq!(crc32_ieee(b""), 0);
    assert_eq!(crc32_ieee(b"a"), 0xE8B7_BE43);
    assert_eq!(crc32_ieee(b"abc"), 0x3524_41C2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Verb Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn verb_codes_match_wire_values() {
    assert_eq!(Verb::Nop.code(), 0x0);
    assert_eq!(Verb::ToggleOnOff.code(), 0x2);
    assert_eq!(Verb::ChangeChannel.code(), 0x4);
    assert_eq!(Verb::ChangeCoord.code(), 0x8);
    assert_eq!(Verb::ChangeVolume.code(), 0xA);
    assert_eq!(Verb::ChangeCoordAndVolume.code(), 0xC);
    assert_eq!(Verb::RequestInfo.code(), 0xE);
}

#[test]
fn verb_from_code_rejects_odd_codes() {
    assert_eq!(Verb::from_code(0x8), Some(Verb::ChangeCoord));
    assert_eq!(Verb::from_code(0x1), None);
    assert_eq!(Verb::from_code(0xF), None);
}

#[test]
fn verb_frame_lengths() {
    assert_eq!(Verb::ToggleOnOff.frame_len(), 9);
    assert_eq!(Verb::ChangeChannel.frame_len(), 9);
    assert_eq!(Verb::ChangeCoord.frame_len(), 13);
    assert_eq!(Verb::ChangeVolume.frame_len(), 13);
    assert_eq!(Verb::ChangeCoordAndVolume.frame_len(), FRAME_MAX_LEN);
}

// ═══════════════════════════════════════════════════════════════════════════
// Encoding Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn encode_coordinate_change() {
    let frame = Frame::encode(&Command::ChangeCoord(Coordinates::new(10, 0))).unwrap();
    assert_eq!(frame.body(), "8281E");
    assert_eq!(frame.crc(), crc32_ieee(b"8281E"));
    assert_eq!(frame.as_str(), "8281EE7C232F5");
    assert_eq!(frame.len(), 13);
}

#[test]
fn encode_minimum_coordinates_as_zero_bytes() {
    let frame = Frame::encode(&Command::ChangeCoord(Coordinates::MIN)).unwrap();
    assert_eq!(frame.body(), "80000");
    assert_eq!(frame.as_str(), "800007AAC1F34");
}

#[test]
fn encode_toggle_and_channel() {
    assert_eq!(Frame::encode(&Command::ToggleOnOff).unwrap().as_str(), "21AD5BE0D");
    assert_eq!(Frame::encode(&Command::ChangeChannel).unwrap().as_str(), "4F3B61B38");
}

#[test]
fn encode_volume_has_no_offset() {
    let frame = Frame::encode(&Command::ChangeVolume(Levels::new(50, 100))).unwrap();
    assert_eq!(frame.body(), "A3264");
    assert_eq!(frame.as_str(), "A3264CE688595");
}

#[test]
fn encode_combined_frame_is_full_length() {
    let command = Command::ChangeCoordAndVolume(Coordinates::new(10, 0), Levels::new(10, 20));
    let frame = Frame::encode(&command).unwrap();
    assert_eq!(frame.body(), "C281E0A14");
    assert_eq!(frame.as_str(), "C281E0A1464DD7B39");
    assert_eq!(frame.len(), FRAME_MAX_LEN);
}

#[test]
fn nop_produces_no_frame() {
    assert_eq!(Command::Nop.frame(), Ok(None));
    assert!(Command::ToggleOnOff.frame().unwrap().is_some());
}

#[test]
fn coord_byte_clamps_below_range() {
    assert_eq!(coord_byte(-30), 0);
    assert_eq!(coord_byte(30), 60);
    assert_eq!(coord_byte(-100), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Decoding Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn decode_accepts_encoded_frames() {
    assert_eq!(
        decode(b"8281EE7C232F5"),
        Ok(Command::ChangeCoord(Coordinates::new(10, 0)))
    );
    assert_eq!(decode(b"21AD5BE0D"), Ok(Command::ToggleOnOff));
    assert_eq!(
        decode(b"C281E0A1464DD7B39"),
        Ok(Command::ChangeCoordAndVolume(
            Coordinates::new(10, 0),
            Levels::new(10, 20)
        ))
    );
}

#[test]
fn decode_accepts_lowercase_crc() {
    assert_eq!(decode(b"21ad5be0d"), Ok(Command::ToggleOnOff));
}

#[test]
fn decode_rejects_short_frame() {
    assert_eq!(decode(b"2"), Err(Error::FrameLength(1)));
    assert_eq!(decode(b""), Err(Error::FrameLength(0)));
}

#[test]
fn decode_rejects_length_mismatch_for_verb() {
    // Toggle CRC padded out to a coordinate frame's length.
    assert_eq!(decode(b"21AD5BE0D0000"), Err(Error::FrameLength(13)));
}

#[test]
fn decode_rejects_unknown_verb() {
    assert_eq!(decode(b"31AD5BE0D"), Err(Error::UnknownVerb(b'3')));
    assert_eq!(decode(b"Z1AD5BE0D"), Err(Error::UnknownVerb(b'Z')));
}

#[test]
fn decode_reports_crc_mismatch() {
    assert_eq!(
        decode(b"21AD5BE0E"),
        Err(Error::CrcMismatch {
            expected: 0x1AD5_BE0D,
            actual: 0x1AD5_BE0E
        })
    );
}

#[test]
fn decode_rejects_non_hex_crc() {
    assert_eq!(decode(b"21AD5BE0G"), Err(Error::InvalidHex));
}

#[test]
fn decode_rejects_out_of_range_coordinate() {
    // 0x3D is +31 degrees once the offset is removed.
    let mut text: heapless::String<FRAME_MAX_LEN> = heapless::String::new();
    let body = "83D00";
    text.push_str(body).unwrap();
    write!(text, "{:08X}", crc32_ieee(body.as_bytes())).unwrap();
    assert_eq!(decode(text.as_bytes()), Err(Error::PayloadRange(0x3D)));
}

// ═══════════════════════════════════════════════════════════════════════════
// Selection Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn select_nop_when_nothing_changed() {
    let flags = GestureFlags::new();
    let mut encoder = CommandEncoder::with_cached(Coordinates::new(0, 0), Levels::new(5, 5));
    assert_eq!(encoder.select(&flags, &snapshot(0, 0, 5, 5)), Command::Nop);
}

#[test]
fn select_coordinate_change_from_cached_origin() {
    let flags = GestureFlags::new();
    let mut encoder = CommandEncoder::with_cached(Coordinates::new(0, 0), Levels::ZERO);

    let command = encoder.select(&flags, &snapshot(10, 0, 0, 0));
    assert_eq!(command, Command::ChangeCoord(Coordinates::new(10, 0)));
    assert_eq!(command.frame().unwrap().unwrap().body(), "8281E");

    // Cache updated: same values again produce nothing.
    assert_eq!(encoder.select(&flags, &snapshot(10, 0, 0, 0)), Command::Nop);
}

#[test]
fn select_volume_then_combined() {
    let flags = GestureFlags::new();
    let mut encoder = CommandEncoder::with_cached(Coordinates::new(0, 0), Levels::ZERO);

    assert_eq!(
        encoder.select(&flags, &snapshot(0, 0, 40, 0)),
        Command::ChangeVolume(Levels::new(40, 0))
    );
    assert_eq!(
        encoder.select(&flags, &snapshot(1, 2, 41, 3)),
        Command::ChangeCoordAndVolume(Coordinates::new(1, 2), Levels::new(41, 3))
    );
    assert_eq!(encoder.last_coords(), Coordinates::new(1, 2));
    assert_eq!(encoder.last_levels(), Levels::new(41, 3));
}

#[test]
fn select_first_cycle_reports_live_values() {
    let flags = GestureFlags::new();
    let mut encoder = CommandEncoder::new();
    assert_eq!(encoder.last_coords(), Coordinates::MIN);

    assert_eq!(
        encoder.select(&flags, &snapshot(0, 0, 0, 0)),
        Command::ChangeCoord(Coordinates::new(0, 0))
    );
}

#[test]
fn select_toggle_takes_priority_and_is_consumed() {
    let flags = GestureFlags::new();
    flags.raise(GestureAction::TogglePower);
    flags.raise(GestureAction::ChangeChannel);
    let mut encoder = CommandEncoder::with_cached(Coordinates::new(0, 0), Levels::ZERO);

    // Coordinates changed too, but the flags win.
    assert_eq!(encoder.select(&flags, &snapshot(5, 5, 0, 0)), Command::ToggleOnOff);
    assert!(!flags.is_raised(GestureAction::TogglePower));
    assert!(flags.is_raised(GestureAction::ChangeChannel));

    assert_eq!(encoder.select(&flags, &snapshot(5, 5, 0, 0)), Command::ChangeChannel);
    assert!(!flags.is_raised(GestureAction::ChangeChannel));

    // Value change deferred, not lost.
    assert_eq!(
        encoder.select(&flags, &snapshot(5, 5, 0, 0)),
        Command::ChangeCoord(Coordinates::new(5, 5))
    );
}
