//! Parallel resistor that linearizes a thermistor over a temperature window.
//!
//! With `R_lo`, `R_mid` and `R_hi` the thermistor resistances at the low end,
//! the centre and the high end of the window, the parallel combination
//! changes by equal steps between the three points when
//!
//! ```text
//! R_lin = (R_mid * (R_lo + R_hi) - 2 * R_lo * R_hi) / (R_lo + R_hi - 2 * R_mid)
//! ```

use math::common::is_negligible;
use math::measurements::{Resistance, Temperature};
use math::temperature::celsius_to_kelvin;

use crate::error::LinearizationError;
use crate::model::{Conversion, ThermistorModel};

pub const DEFAULT_LOW_K: f64 = 298.0;
pub const DEFAULT_HIGH_K: f64 = 343.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureWindow {
    pub low: Temperature,
    pub high: Temperature,
}

impl TemperatureWindow {
    pub fn new(low: Temperature, high: Temperature) -> Self {
        Self { low, high }
    }

    pub fn from_celsius(low: f64, high: f64) -> Self {
        Self {
            low: celsius_to_kelvin(low),
            high: celsius_to_kelvin(high),
        }
    }

    pub fn midpoint(&self) -> Temperature {
        Temperature::from_kelvin((self.low.as_kelvin() + self.high.as_kelvin()) / 2.0)
    }
}

impl Default for TemperatureWindow {
    /// 25 C to 70 C
    fn default() -> Self {
        Self {
            low: Temperature::from_kelvin(DEFAULT_LOW_K),
            high: Temperature::from_kelvin(DEFAULT_HIGH_K),
        }
    }
}

/// Compute the linearization resistor for `model` over `window`.
///
/// The result is flagged as substituted when the model had to replace any of
/// the three window temperatures with its default, in which case the value
/// does not describe the requested window.
pub fn solve<M: ThermistorModel + ?Sized>(
    model: &M,
    window: TemperatureWindow,
) -> Result<Conversion<Resistance>, LinearizationError> {
    if !(is_absolute(window.low) && is_absolute(window.high)) {
        #[cfg(feature = "defmt-log")]
        defmt::warn!(
            "invalid linearization window {} K .. {} K",
            window.low.as_kelvin(),
            window.high.as_kelvin()
        );
        return Err(LinearizationError::InvalidWindow);
    }

    let hi = model.temperature_to_resistance(window.high);
    let mid = model.temperature_to_resistance(window.midpoint());
    let lo = model.temperature_to_resistance(window.low);
    let substituted = hi.substituted || mid.substituted || lo.substituted;

    let r_hi = hi.value.as_kiloohms();
    let r_mid = mid.value.as_kiloohms();
    let r_lo = lo.value.as_kiloohms();
    if !(r_hi.is_finite() && r_mid.is_finite() && r_lo.is_finite()) {
        return Err(LinearizationError::NonFinite);
    }

    let denominator = r_lo + r_hi - 2.0 * r_mid;
    if is_negligible(denominator, r_lo + r_hi) {
        #[cfg(feature = "defmt-log")]
        defmt::warn!(
            "degenerate linearization: R_lo={} R_mid={} R_hi={} kOhm",
            r_lo,
            r_mid,
            r_hi
        );
        return Err(LinearizationError::Degenerate);
    }

    let r_lin = (r_mid * (r_lo + r_hi) - 2.0 * r_lo * r_hi) / denominator;
    if !r_lin.is_finite() {
        return Err(LinearizationError::NonFinite);
    }

    #[cfg(feature = "defmt-log")]
    defmt::debug!(
        "linearization resistor {} kOhm for {} K .. {} K",
        r_lin,
        window.low.as_kelvin(),
        window.high.as_kelvin()
    );

    Ok(Conversion {
        value: Resistance::from_kiloohms(r_lin),
        substituted,
    })
}

fn is_absolute(temperature: Temperature) -> bool {
    let t = temperature.as_kelvin();
    t.is_finite() && t > 0.0
}

/// Linearization resistors of a measured and a theoretical characteristic of
/// the same part over the same window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearizationComparison {
    pub window: TemperatureWindow,
    pub measured: Conversion<Resistance>,
    pub theoretical: Conversion<Resistance>,
}

impl LinearizationComparison {
    /// measured minus theoretical
    pub fn difference(&self) -> Resistance {
        Resistance::from_kiloohms(
            self.measured.value.as_kiloohms() - self.theoretical.value.as_kiloohms(),
        )
    }

    /// difference relative to the theoretical value
    pub fn relative_difference(&self) -> f64 {
        self.difference().as_kiloohms() / self.theoretical.value.as_kiloohms()
    }
}

pub fn compare<A, B>(
    measured: &A,
    theoretical: &B,
    window: TemperatureWindow,
) -> Result<LinearizationComparison, LinearizationError>
where
    A: ThermistorModel + ?Sized,
    B: ThermistorModel + ?Sized,
{
    Ok(LinearizationComparison {
        window,
        measured: solve(measured, window)?,
        theoretical: solve(theoretical, window)?,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::beta::{BetaModel, BetaParameters};
    use crate::interpolated::InterpolatedModel;
    use crate::table::TablePreset;

    // R = a - b * T, a straight line has nothing to linearize
    struct Linear;

    impl ThermistorModel for Linear {
        fn temperature_to_resistance(&self, temperature: Temperature) -> Conversion<Resistance> {
            Conversion::exact(Resistance::from_kiloohms(40.0 - 0.1 * temperature.as_kelvin()))
        }

        fn resistance_to_temperature(&self, resistance: Resistance) -> Conversion<Temperature> {
            Conversion::exact(Temperature::from_kelvin(
                (40.0 - resistance.as_kiloohms()) / 0.1,
            ))
        }
    }

    fn b3470() -> BetaModel {
        BetaModel::new(BetaParameters::default()).unwrap()
    }

    #[test]
    fn test_default_window() {
        let w = TemperatureWindow::default();
        assert_eq!(w.low.as_kelvin(), 298.0);
        assert_eq!(w.high.as_kelvin(), 343.0);
        assert_eq!(w.midpoint().as_kelvin(), 320.5);
        assert_eq!(TemperatureWindow::from_celsius(25.0, 70.0), w);
    }

    #[test]
    fn test_beta_default_window() {
        let model = b3470();
        let r = solve(&model, TemperatureWindow::default()).unwrap();
        assert!(!r.substituted);
        assert_abs_diff_eq!(r.value.as_kiloohms(), 3.093577, epsilon = 0.00001);

        let r_hot = model.temperature_to_resistance(Temperature::from_kelvin(343.0));
        let r_cold = model.temperature_to_resistance(Temperature::from_kelvin(298.0));
        assert!(r.value.as_kiloohms() > r_hot.value.as_kiloohms());
        assert!(r.value.as_kiloohms() < r_cold.value.as_kiloohms());
    }

    #[test]
    fn test_window_order_does_not_matter() {
        let model = b3470();
        let forward = solve(&model, TemperatureWindow::from_celsius(15.0, 50.0)).unwrap();
        let backward = solve(&model, TemperatureWindow::from_celsius(50.0, 15.0)).unwrap();
        assert_abs_diff_eq!(forward.value.as_kiloohms(), 5.330411, epsilon = 0.00001);
        assert_abs_diff_eq!(
            forward.value.as_kiloohms(),
            backward.value.as_kiloohms(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_field_table_default_window() {
        let model = InterpolatedModel::from_preset(TablePreset::FieldCalibrated).unwrap();
        let r = solve(&model, TemperatureWindow::default()).unwrap();
        assert!(!r.substituted);
        assert_abs_diff_eq!(r.value.as_kiloohms(), 2.272350, epsilon = 0.00001);
    }

    #[test]
    fn test_window_outside_table_is_flagged() {
        let model = InterpolatedModel::from_preset(TablePreset::FieldCalibrated).unwrap();
        let r = solve(&model, TemperatureWindow::from_celsius(-20.0, 70.0)).unwrap();
        assert!(r.substituted);
    }

    #[test]
    fn test_degenerate_empty_window() {
        let model = b3470();
        let w = TemperatureWindow::from_celsius(40.0, 40.0);
        assert_eq!(solve(&model, w), Err(LinearizationError::Degenerate));
    }

    #[test]
    fn test_degenerate_linear_model() {
        let w = TemperatureWindow::default();
        assert_eq!(solve(&Linear, w), Err(LinearizationError::Degenerate));
    }

    #[test]
    fn test_rejects_window_at_or_below_absolute_zero() {
        let model = b3470();
        for low in [-10.0, 0.0, f64::NAN, f64::NEG_INFINITY] {
            let w = TemperatureWindow::new(Temperature::from_kelvin(low), Temperature::from_kelvin(343.0));
            assert_eq!(solve(&model, w), Err(LinearizationError::InvalidWindow));
        }
        let w = TemperatureWindow::new(Temperature::from_kelvin(298.0), Temperature::from_kelvin(-1.0));
        assert_eq!(solve(&model, w), Err(LinearizationError::InvalidWindow));
    }

    #[test]
    fn test_non_finite() {
        // exp(3470 * (1 - 1/298)) overflows
        let model = b3470();
        let w = TemperatureWindow::new(Temperature::from_kelvin(1.0), Temperature::from_kelvin(343.0));
        assert_eq!(solve(&model, w), Err(LinearizationError::NonFinite));
    }

    #[test]
    fn test_compare_measured_and_theoretical() {
        let measured = InterpolatedModel::from_preset(TablePreset::FieldCalibrated).unwrap();
        let theoretical = b3470();
        let c = compare(&measured, &theoretical, TemperatureWindow::default()).unwrap();
        assert_abs_diff_eq!(c.measured.value.as_kiloohms(), 2.272350, epsilon = 0.00001);
        assert_abs_diff_eq!(c.theoretical.value.as_kiloohms(), 3.093577, epsilon = 0.00001);
        assert_abs_diff_eq!(c.difference().as_kiloohms(), -0.821227, epsilon = 0.00002);
        assert!(c.relative_difference() < 0.0);
    }
}
