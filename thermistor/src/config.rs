use math::measurements::{Resistance, Temperature};
use math::spline::SplineKind;

use crate::beta::{BetaModel, BetaParameters};
use crate::error::ConfigError;
use crate::interpolated::InterpolatedModel;
use crate::model::{Conversion, ThermistorModel};
use crate::table::TablePreset;

/// Selects a conversion strategy at run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelConfig {
    Beta(BetaParameters),
    Table {
        preset: TablePreset,
        interpolation: SplineKind,
    },
}

impl ModelConfig {
    pub fn table(preset: TablePreset) -> Self {
        ModelConfig::Table {
            preset,
            interpolation: SplineKind::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::Beta(BetaParameters::default())
    }
}

#[derive(Debug, Clone)]
pub enum AnyModel {
    Beta(BetaModel),
    Interpolated(InterpolatedModel),
}

impl AnyModel {
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        match *config {
            ModelConfig::Beta(params) => Ok(AnyModel::Beta(BetaModel::new(params)?)),
            ModelConfig::Table {
                preset,
                interpolation,
            } => Ok(AnyModel::Interpolated(InterpolatedModel::from_preset_with(
                preset,
                interpolation,
            )?)),
        }
    }
}

impl From<BetaModel> for AnyModel {
    fn from(value: BetaModel) -> Self {
        AnyModel::Beta(value)
    }
}

impl From<InterpolatedModel> for AnyModel {
    fn from(value: InterpolatedModel) -> Self {
        AnyModel::Interpolated(value)
    }
}

impl ThermistorModel for AnyModel {
    fn temperature_to_resistance(&self, temperature: Temperature) -> Conversion<Resistance> {
        match self {
            AnyModel::Beta(m) => m.temperature_to_resistance(temperature),
            AnyModel::Interpolated(m) => m.temperature_to_resistance(temperature),
        }
    }

    fn resistance_to_temperature(&self, resistance: Resistance) -> Conversion<Temperature> {
        match self {
            AnyModel::Beta(m) => m.resistance_to_temperature(resistance),
            AnyModel::Interpolated(m) => m.resistance_to_temperature(resistance),
        }
    }
}
