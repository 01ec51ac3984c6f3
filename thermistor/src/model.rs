use math::measurements::{Resistance, Temperature};

/// Result of a conversion. `substituted` is set when the input was outside
/// the model's valid range and the model's default input was used instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion<T> {
    pub value: T,
    pub substituted: bool,
}

impl<T> Conversion<T> {
    pub fn exact(value: T) -> Self {
        Self {
            value,
            substituted: false,
        }
    }

    pub fn substituted(value: T) -> Self {
        Self {
            value,
            substituted: true,
        }
    }

    pub fn is_substituted(&self) -> bool {
        self.substituted
    }
}

/// Conversion between thermistor resistance and temperature.
///
/// Implementations never fail at call time: out of range inputs are replaced
/// by a documented default and flagged in the returned [`Conversion`].
pub trait ThermistorModel {
    fn temperature_to_resistance(&self, temperature: Temperature) -> Conversion<Resistance>;

    fn resistance_to_temperature(&self, resistance: Resistance) -> Conversion<Temperature>;
}

impl<M: ThermistorModel + ?Sized> ThermistorModel for &M {
    fn temperature_to_resistance(&self, temperature: Temperature) -> Conversion<Resistance> {
        (**self).temperature_to_resistance(temperature)
    }

    fn resistance_to_temperature(&self, resistance: Resistance) -> Conversion<Temperature> {
        (**self).resistance_to_temperature(resistance)
    }
}
