//! Controller link over UARTE0.
//!
//! The transmit loop sends at most one frame per period; the receive loop
//! lets the UARTE's idle-line detection delimit bursts, then logs each
//! burst and tries to decode it as a frame.

use defmt::{debug, error, info, warn};
use embassy_nrf::peripherals::{TIMER0, UARTE0};
use embassy_nrf::uarte::{UarteRxWithIdle, UarteTx};
use embassy_time::{Duration, Ticker};
use steer_remote::command::{decode, CommandEncoder};
use steer_remote::config::{RX_BUFFER_LEN, TX_PERIOD_MS, VERBOSE_TX};
use steer_remote::state::RemoteState;
use steer_remote::Error;

#[embassy_executor::task]
pub async fn tx_task(mut tx: UarteTx<'static, UARTE0>, state: &'static RemoteState) {
    let mut encoder = CommandEncoder::new();
    let mut ticker = Ticker::every(Duration::from_millis(TX_PERIOD_MS));

    loop {
        ticker.next().await;

        let command = encoder.select(&state.flags, &state.snapshot());
        let frame = match command.frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                error!("tx: failed to encode {}: {}", command, e);
                continue;
            }
        };

        if VERBOSE_TX {
            info!("tx: {}", frame.as_str());
        }
        if let Err(e) = tx.write(frame.as_bytes()).await {
            warn!("tx: uart write failed: {}", e);
        }
    }
}

/// Receive half; RX stays armed between bytes and TIMER0 flags the idle gap.
pub type SerialRx = UarteRxWithIdle<'static, UARTE0, TIMER0>;

#[embassy_executor::task]
pub async fn rx_task(mut rx: SerialRx) {
    let mut burst = [0u8; RX_BUFFER_LEN];

    loop {
        match rx.read_until_idle(&mut burst).await {
            Ok(0) => {}
            Ok(len) => report(&burst[..len]),
            Err(e) => warn!("rx: uart read failed: {}", e),
        }
    }
}

fn report(bytes: &[u8]) {
    info!("rx: {=[u8]:a}", bytes);
    match decode(bytes) {
        Ok(command) => info!("rx: decoded {}", command),
        Err(Error::CrcMismatch { expected, actual }) => {
            warn!("rx: crc mismatch, expected {=u32:X} got {=u32:X}", expected, actual)
        }
        Err(e) => debug!("rx: not a command frame: {}", e),
    }
}
