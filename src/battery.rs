//! Battery level classification and the low-battery LED policy.

use crate::config::{BATTERY_FULL_VOLTS, BATTERY_MEDIUM_VOLTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryLevel {
    Low,
    Medium,
    Full,
}

impl BatteryLevel {
    /// Classify a cell voltage. Thresholds are exclusive.
    pub fn from_volts(volts: f32) -> Self {
        if volts > BATTERY_FULL_VOLTS {
            BatteryLevel::Full
        } else if volts > BATTERY_MEDIUM_VOLTS {
            BatteryLevel::Medium
        } else {
            BatteryLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BatteryLevel::Low => "LOW",
            BatteryLevel::Medium => "MED",
            BatteryLevel::Full => "FULL",
        }
    }
}

/// Tracks the battery level and reports when the low-battery LED must
/// change. The LED starts off.
#[derive(Clone, Debug)]
pub struct LowBatteryIndicator {
    level: Option<BatteryLevel>,
    lit: bool,
}

impl LowBatteryIndicator {
    pub const fn new() -> Self {
        Self {
            level: None,
            lit: false,
        }
    }

    /// Feed the current level. Returns the new LED state only when it
    /// changes: `Some(true)` entering `Low`, `Some(false)` leaving it.
    pub fn update(&mut self, level: BatteryLevel) -> Option<bool> {
        if self.level != Some(level) {
            info!("battery: level {}", level.label());
            self.level = Some(level);
        }

        let lit = level == BatteryLevel::Low;
        if lit == self.lit {
            return None;
        }
        self.lit = lit;
        Some(lit)
    }

    pub fn level(&self) -> Option<BatteryLevel> {
        self.level
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Default for LowBatteryIndicator {
    fn default() -> Self {
        Self::new()
    }
}
