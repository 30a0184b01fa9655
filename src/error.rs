//! Unified error type for steer-remote.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Derives `defmt::Format` (with the `defmt` feature) for on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Analog
    /// The ADC did not produce a sample within the read timeout.
    AdcTimeout,

    /// The ADC driver reported a failure.
    AdcRead,

    /// A raw code fell outside the calibrated range.
    CalibrationOutOfRange(i32),

    // Gestures
    /// The gesture ring lock was not acquired before the deadline.
    GestureLockBusy,

    // Press timer
    /// The long-press tick timer could not be started.
    TimerStart,

    // Framing
    /// Buffer too small for the requested operation.
    BufferOverflow,

    /// Frame length does not match its verb.
    FrameLength(usize),

    /// First character of a frame is not a known verb code (raw byte).
    UnknownVerb(u8),

    /// A payload or CRC field contains a non-hex character.
    InvalidHex,

    /// A payload byte is outside the range its field allows.
    PayloadRange(u8),

    /// Received CRC differs from the one computed over the frame body.
    CrcMismatch { expected: u32, actual: u32 },

    // Peripherals
    /// I²C transaction to the display failed.
    Display,
}
