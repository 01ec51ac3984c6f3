#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Resistance and temperature conversion for NTC thermistors read through a
//! voltage divider with a parallel linearization resistor.
//!
//! Resistances are handled in kilo-ohms and temperatures in kelvin. Two
//! interchangeable models implement [`ThermistorModel`]: the closed form
//! [`BetaModel`] and the table driven [`InterpolatedModel`]. Both can be fed
//! to [`linearization::solve`] and to a [`DividerCircuit`].
//!
//! ```
//! use thermistor::{BetaModel, BetaParameters, CircuitParameters, DividerCircuit, Voltage};
//!
//! let model = BetaModel::new(BetaParameters::default()).unwrap();
//! let circuit = DividerCircuit::new(model, CircuitParameters::default());
//! let reading = circuit.temperature_from_voltage(Voltage::from_volts(2.0));
//! assert!(reading.temperature.as_kelvin() > 298.0);
//! ```

pub mod beta;
pub mod circuit;
pub mod config;
pub mod error;
pub mod interpolated;
pub mod linearization;
pub mod model;
pub mod table;

pub use beta::{BetaModel, BetaParameters};
pub use circuit::{
    CircuitCondition, CircuitParameters, DividerCircuit, DividerReading, ReadingComparison,
};
pub use config::{AnyModel, ModelConfig};
pub use error::{ConfigError, LinearizationError};
pub use interpolated::InterpolatedModel;
pub use linearization::{LinearizationComparison, TemperatureWindow};
pub use math::measurements::{Resistance, Temperature, Voltage};
pub use math::spline::SplineKind as Interpolation;
pub use model::{Conversion, ThermistorModel};
pub use table::{CalibrationTable, TablePreset};
