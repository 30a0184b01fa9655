//! Analog sampling: raw read → calibration → running average → publish.
//!
//! Each analog input (two pots, battery sense) gets its own
//! [`SampleAggregator`] driven by a periodic task. The filtered millivolt
//! value is stored in a shared atomic; readers always see the latest
//! published value, and a failed cycle leaves the previous one in place.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::config::{BATTERY_DIVIDER, POT_MAX_MV, POT_MIN_MV};
use crate::error::Error;
use crate::filter::RunningAverage;

/// Raw sample source (one ADC channel).
#[allow(async_fn_in_trait)]
pub trait AnalogSource {
    /// Read one raw conversion code.
    async fn read_raw(&mut self) -> Result<i32, Error>;
}

/// Raw code → millivolts.
pub trait Calibration {
    fn to_millivolts(&self, raw: i32) -> Result<i32, Error>;
}

/// Straight-line calibration from code 0 to `max_code`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearCalibration {
    full_scale_mv: i32,
    max_code: i32,
}

impl LinearCalibration {
    pub const fn new(full_scale_mv: i32, max_code: i32) -> Self {
        assert!(max_code > 0, "calibration needs a positive code range");
        Self {
            full_scale_mv,
            max_code,
        }
    }
}

impl Calibration for LinearCalibration {
    /// Small negative codes are single-ended noise around ground and read
    /// as 0 mV; codes past `max_code` are rejected.
    fn to_millivolts(&self, raw: i32) -> Result<i32, Error> {
        if raw > self.max_code {
            return Err(Error::CalibrationOutOfRange(raw));
        }
        Ok(raw.max(0) * self.full_scale_mv / self.max_code)
    }
}

/// Periodic read/calibrate/filter/publish pipeline for one channel.
pub struct SampleAggregator<'a, S, C, const N: usize> {
    name: &'static str,
    source: S,
    calibration: C,
    filter: RunningAverage<N>,
    output: &'a AtomicI32,
}

impl<'a, S, C, const N: usize> SampleAggregator<'a, S, C, N>
where
    S: AnalogSource,
    C: Calibration,
{
    pub fn new(name: &'static str, source: S, calibration: C, output: &'a AtomicI32) -> Self {
        Self {
            name,
            source,
            calibration,
            filter: RunningAverage::new(),
            output,
        }
    }

    /// One cycle. On success the filtered value (truncated to whole
    /// millivolts) is published and returned; on error nothing is published.
    pub async fn sample(&mut self) -> Result<i32, Error> {
        let raw = self.source.read_raw().await?;
        let mv = self.calibration.to_millivolts(raw)?;
        let filtered = self.filter.observe(mv) as i32;
        self.output.store(filtered, Ordering::Relaxed);
        Ok(filtered)
    }

    /// [`sample`](Self::sample), logging and swallowing errors so the
    /// caller simply retries next period.
    pub async fn step(&mut self) -> Option<i32> {
        match self.sample().await {
            Ok(mv) => Some(mv),
            Err(Error::AdcTimeout) => {
                warn!("{}: adc read timed out", self.name);
                None
            }
            Err(Error::CalibrationOutOfRange(raw)) => {
                warn!("{}: raw code {} out of calibrated range", self.name, raw);
                None
            }
            Err(e) => {
                error!("{}: adc read failed: {}", self.name, e);
                None
            }
        }
    }

    /// Last published value.
    pub fn published(&self) -> i32 {
        self.output.load(Ordering::Relaxed)
    }

    pub fn filter(&self) -> &RunningAverage<N> {
        &self.filter
    }
}

/// Pot millivolts → percentage, inverted so the low-voltage end reads 100.
///
/// Integer arithmetic truncating toward zero, clamped to `[0, 100]`.
pub fn scale_pot_inverted(mv: i32) -> u8 {
    let pct = 100 - (mv - POT_MIN_MV) * 100 / (POT_MAX_MV - POT_MIN_MV);
    pct.clamp(0, 100) as u8
}

/// Battery sense millivolts → cell volts.
pub fn battery_volts(mv: i32) -> f32 {
    mv as f32 * BATTERY_DIVIDER * 0.001
}
