use measurements::Temperature;

// calibration tables were recorded with this offset, keep it at 273
pub const KELVIN_OFFSET: f64 = 273.0;

pub fn celsius_to_kelvin(celsius: f64) -> Temperature {
    Temperature::from_kelvin(celsius + KELVIN_OFFSET)
}

pub fn kelvin_to_celsius(temperature: Temperature) -> f64 {
    temperature.as_kelvin() - KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_celsius_to_kelvin() {
        assert_abs_diff_eq!(celsius_to_kelvin(25.0).as_kelvin(), 298.0, epsilon = 1e-9);
        assert_abs_diff_eq!(celsius_to_kelvin(70.0).as_kelvin(), 343.0, epsilon = 1e-9);
    }

    #[test]
    fn test_kelvin_to_celsius() {
        let t = Temperature::from_kelvin(301.9);
        assert_abs_diff_eq!(kelvin_to_celsius(t), 28.9, epsilon = 1e-9);
    }
}
