//! Library interface for steer-remote.
//!
//! Holds every piece of pure logic (filters, gesture matching, press
//! classification, encoder decoding, command framing, state) so it can
//! be tested on the host with no embedded hardware.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary (main.rs + tasks/) is built with the
//! `embedded` feature and wires these modules to the nRF52840 peripherals.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod analog;
pub mod battery;
pub mod command;
pub mod config;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod gesture;
pub mod press;
pub mod state;
pub mod ui;

pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
