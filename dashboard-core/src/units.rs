//! Metric/imperial conversion.
//!
//! Every physical quantity is stored in metric (°C, m/s). Imperial values are
//! derived on demand for display and never stored as the source of truth.

use serde::{Deserialize, Serialize};
use std::fmt;

/// m/s to mph factor used throughout the dashboard.
pub const MPS_TO_MPH: f64 = 2.237;

/// Process-wide display unit preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Unit] {
        &[Unit::Metric, Unit::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Unit::Metric => "°C",
            Unit::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Unit::Metric => "m/s",
            Unit::Imperial => "mph",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Unit::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Unit::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

/// Temperature in the requested unit, from a canonical °C value.
pub fn temperature(celsius: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Metric => celsius,
        Unit::Imperial => celsius_to_fahrenheit(celsius),
    }
}

/// Wind speed in the requested unit, from a canonical m/s value.
pub fn speed(mps: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Metric => mps,
        Unit::Imperial => mps_to_mph(mps),
    }
}

/// One decimal, no symbol: `"21.5"`.
pub fn format_temperature(celsius: f64, unit: Unit) -> String {
    format!("{:.1}", temperature(celsius, unit))
}

/// One decimal plus the unit symbol: `"3.4 m/s"`.
pub fn format_speed(mps: f64, unit: Unit) -> String {
    format!("{:.1} {}", speed(mps, unit), unit.speed_symbol())
}

/// Humidity and averages are shown without decimals.
pub fn format_rounded(value: f64) -> String {
    format!("{value:.0}")
}

/// A canonical metric value next to its derived imperial counterpart.
///
/// This is what a rendered element keeps so a later unit toggle can redraw
/// without going back to the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualValue {
    pub metric: f64,
    pub imperial: f64,
}

impl DualValue {
    pub fn temperature(celsius: f64) -> Self {
        Self {
            metric: celsius,
            imperial: celsius_to_fahrenheit(celsius),
        }
    }

    pub fn speed(mps: f64) -> Self {
        Self {
            metric: mps,
            imperial: mps_to_mph(mps),
        }
    }

    pub fn value(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Metric => self.metric,
            Unit::Imperial => self.imperial,
        }
    }

    pub fn display(&self, unit: Unit) -> String {
        format!("{:.1}", self.value(unit))
    }
}
