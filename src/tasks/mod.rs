//! Embassy tasks, one per periodic activity.
//!
//! ```text
//!   encoder A ─┐                    ┌─► tx ──► UARTE0 ──► controller
//!   encoder B ─┼─► RemoteState ─────┼─► display (SSD1306)
//!   analog ×3 ─┘   + GestureBuffer  └─► heartbeat (LEDs)
//!                                        rx ◄── UARTE0
//! ```

pub mod analog;
pub mod display;
pub mod encoder;
pub mod heartbeat;
pub mod serial;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use steer_remote::config::COMBO_LEN;
use steer_remote::gesture::GestureBuffer;

/// Gesture ring shared by both encoder tasks.
pub type Gestures = GestureBuffer<CriticalSectionRawMutex, COMBO_LEN>;
