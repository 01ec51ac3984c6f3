use core::str::FromStr;

use heapless::Vec;
use math::common::within;
use math::spline::{SplineError, MAX_KNOTS};

use crate::error::ConfigError;

pub const MAX_POINTS: usize = MAX_KNOTS;

pub const DEFAULT_RESISTANCE_KOHM: f64 = 10.0;
pub const DEFAULT_TEMPERATURE_K: f64 = 298.0;

// Datasheet of a 10 kOhm / B3435 NTC, -40 C to 105 C in 5 C steps.
const DATASHEET_RESISTANCE: [f64; 30] = [
    188.5, 144.1, 111.3, 86.43, 67.77, 53.41, 42.47, 33.90, 27.28, 22.05, 17.96, 14.69, 12.09,
    10.00, 8.313, 6.940, 5.827, 4.911, 4.160, 3.536, 3.020, 2.588, 2.228, 1.924, 1.668, 1.451,
    1.266, 1.108, 0.9731, 0.8572,
];
const DATASHEET_TEMPERATURE: [f64; 30] = [
    233.0, 238.0, 243.0, 248.0, 253.0, 258.0, 263.0, 268.0, 273.0, 278.0, 283.0, 288.0, 293.0,
    298.0, 303.0, 308.0, 313.0, 318.0, 323.0, 328.0, 333.0, 338.0, 343.0, 348.0, 353.0, 358.0,
    363.0, 368.0, 373.0, 378.0,
];

// Bench measurements of a B3470 part, 1 C to 98 C.
const FIELD_RESISTANCE: [f64; 21] = [
    0.94, 1.04, 1.16, 1.32, 1.52, 1.74, 2.03, 2.33, 2.71, 3.16, 3.73, 4.43, 5.2, 6.2, 7.5, 9.8,
    11.28, 13.5, 16.15, 18.5, 25.5,
];
const FIELD_TEMPERATURE: [f64; 21] = [
    371.0, 368.0, 363.0, 358.0, 353.0, 348.0, 343.0, 338.0, 333.0, 328.0, 323.0, 318.0, 313.0,
    308.0, 303.0, 298.0, 293.0, 288.0, 283.0, 278.0, 274.0,
];

/// Matched resistance (kilo-ohm) and temperature (kelvin) samples of one
/// thermistor. Entry `i` of both sequences is the same physical point.
///
/// Each table carries the defaults a model substitutes for out of range
/// queries. Both lie inside the table so they are never extrapolated.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    resistance: Vec<f64, MAX_POINTS>,
    temperature: Vec<f64, MAX_POINTS>,
    default_resistance: f64,
    default_temperature: f64,
}

impl CalibrationTable {
    /// Table using [`DEFAULT_RESISTANCE_KOHM`] and [`DEFAULT_TEMPERATURE_K`]
    /// as its defaults.
    pub fn new(resistance: &[f64], temperature: &[f64]) -> Result<Self, ConfigError> {
        Self::with_defaults(
            resistance,
            temperature,
            DEFAULT_RESISTANCE_KOHM,
            DEFAULT_TEMPERATURE_K,
        )
    }

    pub fn with_defaults(
        resistance: &[f64],
        temperature: &[f64],
        default_resistance: f64,
        default_temperature: f64,
    ) -> Result<Self, ConfigError> {
        if resistance.len() != temperature.len() {
            return Err(SplineError::LengthMismatch.into());
        }
        if resistance.len() < 4 {
            return Err(SplineError::TooFewKnots.into());
        }
        let resistance: Vec<f64, MAX_POINTS> =
            Vec::from_slice(resistance).map_err(|_| SplineError::TooManyKnots)?;
        let temperature: Vec<f64, MAX_POINTS> =
            Vec::from_slice(temperature).map_err(|_| SplineError::TooManyKnots)?;

        if resistance
            .iter()
            .chain(temperature.iter())
            .any(|v| !(v.is_finite() && *v > 0.0))
        {
            return Err(ConfigError::NonPositiveTableEntry);
        }

        let r_direction = direction(&resistance).ok_or(SplineError::NotStrictlyMonotonic)?;
        let t_direction = direction(&temperature).ok_or(SplineError::NotStrictlyMonotonic)?;
        if r_direction == t_direction {
            return Err(ConfigError::SameTableDirection);
        }

        let (r_min, r_max) = range(&resistance);
        let (t_min, t_max) = range(&temperature);
        if within(default_resistance, r_min, r_max).is_none()
            || within(default_temperature, t_min, t_max).is_none()
        {
            return Err(ConfigError::DefaultOutsideTable);
        }

        Ok(Self {
            resistance,
            temperature,
            default_resistance,
            default_temperature,
        })
    }

    pub fn resistance(&self) -> &[f64] {
        &self.resistance
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// resistance substituted for queries outside the table, in kilo-ohms
    pub fn default_resistance(&self) -> f64 {
        self.default_resistance
    }

    /// temperature substituted for queries outside the table, in kelvin
    pub fn default_temperature(&self) -> f64 {
        self.default_temperature
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.resistance
            .iter()
            .copied()
            .zip(self.temperature.iter().copied())
    }

    pub fn resistance_range(&self) -> (f64, f64) {
        range(&self.resistance)
    }

    pub fn temperature_range(&self) -> (f64, f64) {
        range(&self.temperature)
    }
}

// Some(true) for strictly increasing, Some(false) for strictly decreasing
fn direction(values: &[f64]) -> Option<bool> {
    if values.windows(2).all(|w| w[1] > w[0]) {
        Some(true)
    } else if values.windows(2).all(|w| w[1] < w[0]) {
        Some(false)
    } else {
        None
    }
}

// values are monotonic, so the extremes are at the ends
fn range(values: &[f64]) -> (f64, f64) {
    let first = values[0];
    let last = values[values.len() - 1];
    if first < last {
        (first, last)
    } else {
        (last, first)
    }
}

#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePreset {
    /// manufacturer datasheet, -40 C to 105 C
    Datasheet,
    /// field calibrated B3470, 1 C to 98 C
    FieldCalibrated,
}

impl TablePreset {
    pub const ALL: [TablePreset; 2] = [TablePreset::Datasheet, TablePreset::FieldCalibrated];

    pub fn name(&self) -> &'static str {
        match self {
            TablePreset::Datasheet => "datasheet",
            TablePreset::FieldCalibrated => "field",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name.trim()))
            .ok_or(ConfigError::UnknownTable)
    }

    pub fn table(&self) -> Result<CalibrationTable, ConfigError> {
        match self {
            TablePreset::Datasheet => {
                CalibrationTable::new(&DATASHEET_RESISTANCE, &DATASHEET_TEMPERATURE)
            }
            TablePreset::FieldCalibrated => {
                CalibrationTable::new(&FIELD_RESISTANCE, &FIELD_TEMPERATURE)
            }
        }
    }
}

impl FromStr for TablePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
