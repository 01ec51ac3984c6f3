use math::common::within;
use math::measurements::{Resistance, Temperature};
use math::spline::{CubicSpline, SplineKind};

use crate::error::ConfigError;
use crate::model::{Conversion, ThermistorModel};
use crate::table::{CalibrationTable, TablePreset};

/// Thermistor model interpolated from a calibration table.
///
/// Queries outside the table are not extrapolated: the input is replaced by
/// the table's [default resistance](CalibrationTable::default_resistance) or
/// [default temperature](CalibrationTable::default_temperature) and the
/// result is flagged as substituted.
///
/// The default [`SplineKind::NotAKnot`] curve passes through every table
/// point but is not guaranteed to be monotonic between them. On the field
/// calibrated preset it dips to about 271.9 K between 18.5 and 25.5 kOhm,
/// below the 274 K end of the table. Use [`SplineKind::Monotone`] when the
/// result must never leave the range of its neighbouring points.
#[derive(Debug, Clone)]
pub struct InterpolatedModel {
    table: CalibrationTable,
    // resistance ascending -> temperature
    by_resistance: CubicSpline,
    // temperature ascending -> resistance
    by_temperature: CubicSpline,
}

impl InterpolatedModel {
    pub fn new(table: CalibrationTable, interpolation: SplineKind) -> Result<Self, ConfigError> {
        let by_resistance =
            CubicSpline::new(table.resistance(), table.temperature(), interpolation)?;
        let by_temperature =
            CubicSpline::new(table.temperature(), table.resistance(), interpolation)?;
        Ok(Self {
            table,
            by_resistance,
            by_temperature,
        })
    }

    pub fn from_preset(preset: TablePreset) -> Result<Self, ConfigError> {
        Self::new(preset.table()?, SplineKind::default())
    }

    pub fn from_preset_with(
        preset: TablePreset,
        interpolation: SplineKind,
    ) -> Result<Self, ConfigError> {
        Self::new(preset.table()?, interpolation)
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::from_preset(TablePreset::from_name(name)?)
    }

    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    pub fn interpolation(&self) -> SplineKind {
        self.by_resistance.kind()
    }
}

impl ThermistorModel for InterpolatedModel {
    fn temperature_to_resistance(&self, temperature: Temperature) -> Conversion<Resistance> {
        let (min, max) = self.table.temperature_range();
        let t = temperature.as_kelvin();
        let (t, substituted) = match within(t, min, max) {
            Some(t) => (t, false),
            None => {
                #[cfg(feature = "defmt-log")]
                defmt::warn!(
                    "temperature {} K outside table, using {} K",
                    t,
                    self.table.default_temperature()
                );
                (self.table.default_temperature(), true)
            }
        };
        Conversion {
            value: Resistance::from_kiloohms(self.by_temperature.evaluate(t)),
            substituted,
        }
    }

    fn resistance_to_temperature(&self, resistance: Resistance) -> Conversion<Temperature> {
        let (min, max) = self.table.resistance_range();
        let r = resistance.as_kiloohms();
        let (r, substituted) = match within(r, min, max) {
            Some(r) => (r, false),
            None => {
                #[cfg(feature = "defmt-log")]
                defmt::warn!(
                    "resistance {} kOhm outside table, using {} kOhm",
                    r,
                    self.table.default_resistance()
                );
                (self.table.default_resistance(), true)
            }
        };
        Conversion {
            value: Temperature::from_kelvin(self.by_resistance.evaluate(r)),
            substituted,
        }
    }
}
