//! SAADC sampling tasks (two pots, battery sense).
//!
//! The three channels share one SAADC behind a mutex; each task runs one
//! multi-channel conversion and keeps its own channel's result.

use defmt::info;
use embassy_nrf::saadc::Saadc;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration, Ticker};
use steer_remote::analog::{AnalogSource, LinearCalibration, SampleAggregator};
use steer_remote::config::{
    ADC_FULL_SCALE_MV, ADC_MAX_CODE, ADC_READ_TIMEOUT_MS, BATTERY_SAMPLE_PERIOD_MS, FILTER_LEN,
    POT_SAMPLE_PERIOD_MS,
};
use steer_remote::state::{AnalogChannel, RemoteState};
use steer_remote::Error;

/// Channels configured on the SAADC, in scan order.
pub const ADC_CHANNELS: usize = 3;

pub type SharedAdc = Mutex<CriticalSectionRawMutex, Saadc<'static, ADC_CHANNELS>>;

/// Scan-order slot of each input.
pub const fn adc_slot(channel: AnalogChannel) -> usize {
    match channel {
        AnalogChannel::Volume => 0,
        AnalogChannel::Distance => 1,
        AnalogChannel::Battery => 2,
    }
}

/// One channel of the shared SAADC.
pub struct SaadcChannel {
    adc: &'static SharedAdc,
    slot: usize,
}

impl SaadcChannel {
    pub fn new(adc: &'static SharedAdc, channel: AnalogChannel) -> Self {
        Self {
            adc,
            slot: adc_slot(channel),
        }
    }
}

impl AnalogSource for SaadcChannel {
    async fn read_raw(&mut self) -> Result<i32, Error> {
        let mut buf = [0i16; ADC_CHANNELS];
        let conversion = async {
            let mut adc = self.adc.lock().await;
            adc.sample(&mut buf).await;
        };
        with_timeout(Duration::from_millis(ADC_READ_TIMEOUT_MS), conversion)
            .await
            .map_err(|_| Error::AdcTimeout)?;
        Ok(buf[self.slot] as i32)
    }
}

#[embassy_executor::task(pool_size = 3)]
pub async fn analog_task(
    channel: AnalogChannel,
    source: SaadcChannel,
    state: &'static RemoteState,
) {
    let period_ms = match channel {
        AnalogChannel::Battery => BATTERY_SAMPLE_PERIOD_MS,
        AnalogChannel::Volume | AnalogChannel::Distance => POT_SAMPLE_PERIOD_MS,
    };
    let calibration = LinearCalibration::new(ADC_FULL_SCALE_MV, ADC_MAX_CODE);
    let mut aggregator = SampleAggregator::<_, _, FILTER_LEN>::new(
        channel.name(),
        source,
        calibration,
        state.analog(channel),
    );
    info!("{}: sampling every {} ms", channel.name(), period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms));
    loop {
        aggregator.step().await;
        ticker.next().await;
    }
}
