use core::fmt;

use math::common::{exp, ln, within};
use math::measurements::{Resistance, Temperature};
use math::temperature::{celsius_to_kelvin, kelvin_to_celsius};

use crate::error::ConfigError;
use crate::model::{Conversion, ThermistorModel};

// resistance range of the calibrated B3470 part, the law itself is unbounded
pub const MIN_RESISTANCE_KOHM: f64 = 0.94;
pub const MAX_RESISTANCE_KOHM: f64 = 25.5;
pub const DEFAULT_RESISTANCE_KOHM: f64 = 10.0;

/*
R(T) = Rn * exp(B * (1/T - 1/Tn))
T(R) = 1 / (ln(R/Rn)/B + 1/Tn)
*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BetaParameters {
    /// material constant, in kelvin
    pub b: Temperature,
    pub r_nominal: Resistance,
    pub t_nominal: Temperature,
}

impl Default for BetaParameters {
    fn default() -> Self {
        Self {
            b: Temperature::from_kelvin(3470.0),
            r_nominal: Resistance::from_kiloohms(10.0),
            t_nominal: celsius_to_kelvin(25.0),
        }
    }
}

/// Closed form B-parameter model of an NTC thermistor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BetaModel {
    // kelvin
    b: f64,
    // kilo-ohm
    r_nominal: f64,
    // kelvin
    t_nominal: f64,
}

impl BetaModel {
    pub fn new(params: BetaParameters) -> Result<Self, ConfigError> {
        let b = params.b.as_kelvin();
        let r_nominal = params.r_nominal.as_kiloohms();
        let t_nominal = params.t_nominal.as_kelvin();
        if !is_positive(b) {
            return Err(ConfigError::NonPositiveB);
        }
        if !is_positive(r_nominal) {
            return Err(ConfigError::NonPositiveNominalResistance);
        }
        if !is_positive(t_nominal) {
            return Err(ConfigError::NonPositiveNominalTemperature);
        }
        Ok(Self {
            b,
            r_nominal,
            t_nominal,
        })
    }

    pub fn parameters(&self) -> BetaParameters {
        BetaParameters {
            b: Temperature::from_kelvin(self.b),
            r_nominal: Resistance::from_kiloohms(self.r_nominal),
            t_nominal: Temperature::from_kelvin(self.t_nominal),
        }
    }
}

impl ThermistorModel for BetaModel {
    /// Temperatures at or below 0 K are outside the law and give a non finite
    /// or meaningless resistance.
    fn temperature_to_resistance(&self, temperature: Temperature) -> Conversion<Resistance> {
        let t = temperature.as_kelvin();
        let r = self.r_nominal * exp(self.b * (1.0 / t - 1.0 / self.t_nominal));
        Conversion::exact(Resistance::from_kiloohms(r))
    }

    fn resistance_to_temperature(&self, resistance: Resistance) -> Conversion<Temperature> {
        let r = resistance.as_kiloohms();
        let (r, substituted) = match within(r, MIN_RESISTANCE_KOHM, MAX_RESISTANCE_KOHM) {
            Some(r) => (r, false),
            None => {
                #[cfg(feature = "defmt-log")]
                defmt::warn!(
                    "resistance {} kOhm out of range, using {} kOhm",
                    r,
                    DEFAULT_RESISTANCE_KOHM
                );
                (DEFAULT_RESISTANCE_KOHM, true)
            }
        };

        let t = 1.0 / (ln(r / self.r_nominal) / self.b + 1.0 / self.t_nominal);
        Conversion {
            value: Temperature::from_kelvin(t),
            substituted,
        }
    }
}

impl fmt::Display for BetaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NTC thermistor B={} K, Rn={} kOhm, Tn={} C",
            self.b,
            self.r_nominal,
            kelvin_to_celsius(Temperature::from_kelvin(self.t_nominal))
        )
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn b3470() -> BetaModel {
        BetaModel::new(BetaParameters::default()).unwrap()
    }

    fn kelvin(value: f64) -> Temperature {
        Temperature::from_kelvin(value)
    }

    fn kohm(value: f64) -> Resistance {
        Resistance::from_kiloohms(value)
    }

    #[test]
    fn test_default_parameters() {
        let p = BetaParameters::default();
        assert_abs_diff_eq!(p.b.as_kelvin(), 3470.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.r_nominal.as_kiloohms(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.t_nominal.as_kelvin(), 298.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        let p = BetaParameters {
            b: kelvin(0.0),
            ..BetaParameters::default()
        };
        assert_eq!(BetaModel::new(p), Err(ConfigError::NonPositiveB));

        let p = BetaParameters {
            r_nominal: kohm(-10.0),
            ..BetaParameters::default()
        };
        assert_eq!(BetaModel::new(p), Err(ConfigError::NonPositiveNominalResistance));

        let p = BetaParameters {
            t_nominal: kelvin(0.0),
            ..BetaParameters::default()
        };
        assert_eq!(BetaModel::new(p), Err(ConfigError::NonPositiveNominalTemperature));

        let p = BetaParameters {
            b: kelvin(f64::NAN),
            ..BetaParameters::default()
        };
        assert_eq!(BetaModel::new(p), Err(ConfigError::NonPositiveB));
    }

    #[test]
    fn test_parameters_round_trip() {
        let model = b3470();
        let p = model.parameters();
        assert_abs_diff_eq!(p.b.as_kelvin(), 3470.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.r_nominal.as_kiloohms(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.t_nominal.as_kelvin(), 298.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nominal_point() {
        let model = b3470();
        let r = model.temperature_to_resistance(kelvin(298.0));
        assert!(!r.substituted);
        assert_abs_diff_eq!(r.value.as_kiloohms(), 10.0, epsilon = 1e-9);
        let t = model.resistance_to_temperature(kohm(10.0));
        assert!(!t.substituted);
        assert_abs_diff_eq!(t.value.as_kelvin(), 298.0, epsilon = 1e-9);
    }

    #[test]
    fn test_resistance_to_temperature() {
        let model = b3470();
        let t = model.resistance_to_temperature(kohm(8.0));
        assert!(!t.is_substituted());
        assert_abs_diff_eq!(t.value.as_kelvin(), 303.822, epsilon = 0.001);
    }

    #[test]
    fn test_temperature_to_resistance() {
        let model = b3470();
        let r = model.temperature_to_resistance(kelvin(343.0));
        assert_abs_diff_eq!(r.value.as_kiloohms(), 2.170392, epsilon = 0.00001);
    }

    #[test]
    fn test_round_trip_inside_range() {
        let model = b3470();
        let mut t = 276.0;
        while t <= 372.0 {
            let r = model.temperature_to_resistance(kelvin(t)).value;
            let back = model.resistance_to_temperature(r);
            assert!(!back.substituted, "clamped at {} K", t);
            assert_abs_diff_eq!(back.value.as_kelvin(), t, epsilon = 1e-6);
            t += 2.0;
        }
    }

    #[test]
    fn test_round_trip_breaks_outside_range() {
        let model = b3470();
        let r = model.temperature_to_resistance(kelvin(420.0)).value;
        assert!(r.as_kiloohms() < MIN_RESISTANCE_KOHM);
        let back = model.resistance_to_temperature(r);
        assert!(back.substituted);
        assert_abs_diff_eq!(back.value.as_kelvin(), 298.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clamp_uses_default() {
        let model = b3470();
        let default = model.resistance_to_temperature(kohm(10.0)).value.as_kelvin();
        for r in [0.5, 0.0, -3.0, 25.6, 1000.0, f64::NAN, f64::INFINITY] {
            let t = model.resistance_to_temperature(kohm(r));
            assert!(t.substituted);
            assert_abs_diff_eq!(t.value.as_kelvin(), default, epsilon = 1e-12);
        }
        // range limits are inclusive
        assert!(!model.resistance_to_temperature(kohm(0.94)).substituted);
        assert!(!model.resistance_to_temperature(kohm(25.5)).substituted);
    }

    #[test]
    fn test_monotonic_decreasing() {
        let model = b3470();
        let mut prev = model.temperature_to_resistance(kelvin(250.0)).value.as_kiloohms();
        for k in 251..400 {
            let r = model.temperature_to_resistance(kelvin(k as f64)).value.as_kiloohms();
            assert!(r < prev);
            prev = r;
        }

        let mut prev = model.resistance_to_temperature(kohm(0.94)).value.as_kelvin();
        let mut r = 1.0;
        while r <= 25.5 {
            let t = model.resistance_to_temperature(kohm(r)).value.as_kelvin();
            assert!(t < prev);
            prev = t;
            r += 0.25;
        }
    }

    #[test]
    fn test_display() {
        let text = format!("{}", b3470());
        assert!(text.contains("B=3470 K"));
        assert!(text.contains("Rn=10 kOhm"));
        assert!(text.contains("Tn=25 C"));
    }
}
