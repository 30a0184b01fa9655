//! Heartbeat LED and low-battery LED.

use embassy_nrf::gpio::Output;
use embassy_time::{Duration, Ticker};
use steer_remote::battery::LowBatteryIndicator;
use steer_remote::config::HEARTBEAT_PERIOD_MS;
use steer_remote::state::{AnalogChannel, RemoteState};

#[embassy_executor::task]
pub async fn heartbeat_task(
    mut heartbeat: Output<'static>,
    mut low_battery: Output<'static>,
    state: &'static RemoteState,
) {
    let mut indicator = LowBatteryIndicator::new();
    let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_PERIOD_MS));

    loop {
        heartbeat.toggle();

        // No battery sample published yet.
        if state.millivolts(AnalogChannel::Battery) > 0 {
            match indicator.update(state.battery_level()) {
                Some(true) => low_battery.set_high(),
                Some(false) => low_battery.set_low(),
                None => {}
            }
        }

        ticker.next().await;
    }
}
