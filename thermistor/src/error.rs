use core::fmt;

use math::spline::SplineError;

/// Rejected construction parameters. Never produced by a conversion call.
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveB,
    NonPositiveNominalResistance,
    NonPositiveNominalTemperature,
    NonPositiveSupply,
    NonPositiveSeriesResistor,
    NonPositiveLinearizationResistor,
    NonPositiveTableEntry,
    /// resistance has to fall while temperature rises
    SameTableDirection,
    /// the table's default resistance or temperature lies outside its range
    DefaultOutsideTable,
    Table(SplineError),
    UnknownTable,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveB => write!(f, "B constant must be positive"),
            ConfigError::NonPositiveNominalResistance => {
                write!(f, "nominal resistance must be positive")
            }
            ConfigError::NonPositiveNominalTemperature => {
                write!(f, "nominal temperature must be positive")
            }
            ConfigError::NonPositiveSupply => write!(f, "supply voltage must be positive"),
            ConfigError::NonPositiveSeriesResistor => write!(f, "series resistor must be positive"),
            ConfigError::NonPositiveLinearizationResistor => {
                write!(f, "linearization resistor must be positive")
            }
            ConfigError::NonPositiveTableEntry => {
                write!(f, "calibration table entries must be positive")
            }
            ConfigError::SameTableDirection => write!(
                f,
                "calibration table resistance must decrease as temperature increases"
            ),
            ConfigError::DefaultOutsideTable => {
                write!(f, "calibration table defaults must lie inside the table")
            }
            ConfigError::Table(e) => write!(f, "invalid calibration table: {}", e),
            ConfigError::UnknownTable => write!(f, "unknown calibration table"),
        }
    }
}

impl From<SplineError> for ConfigError {
    fn from(value: SplineError) -> Self {
        ConfigError::Table(value)
    }
}

#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearizationError {
    /// the three resistances are collinear, no finite resistor exists
    Degenerate,
    /// a window temperature is not a finite value above 0 K
    InvalidWindow,
    /// the model returned a non finite resistance for one of the window points
    NonFinite,
}

impl fmt::Display for LinearizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearizationError::Degenerate => {
                write!(f, "linearization is degenerate over this temperature window")
            }
            LinearizationError::InvalidWindow => {
                write!(f, "window temperatures must be finite and above 0 K")
            }
            LinearizationError::NonFinite => {
                write!(f, "model produced a non finite resistance")
            }
        }
    }
}
