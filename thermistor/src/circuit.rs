use math::measurements::{Resistance, Temperature, Voltage};

use crate::error::ConfigError;
use crate::model::ThermistorModel;

/// Resistance used when no current flows through the thermistor.
pub const OPEN_CIRCUIT_KOHM: f64 = 1000.0;

/*
        Vs
        |
       [Rs]
        |
        +------+------ Vadc
        |      |
     [Rlin]  [NTC]
        |      |
       GND    GND

i_s = (Vs - Vadc) / Rs
i_lin = Vadc / Rlin
R_ntc = Vadc / (i_s - i_lin)
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitParameters {
    supply: Voltage,
    series: Resistance,
    linearization: Resistance,
}

impl CircuitParameters {
    pub fn new(
        supply: Voltage,
        series: Resistance,
        linearization: Resistance,
    ) -> Result<Self, ConfigError> {
        if !is_positive(supply.as_volts()) {
            return Err(ConfigError::NonPositiveSupply);
        }
        if !is_positive(series.as_kiloohms()) {
            return Err(ConfigError::NonPositiveSeriesResistor);
        }
        if !is_positive(linearization.as_kiloohms()) {
            return Err(ConfigError::NonPositiveLinearizationResistor);
        }
        Ok(Self {
            supply,
            series,
            linearization,
        })
    }

    pub fn supply(&self) -> Voltage {
        self.supply
    }

    pub fn series(&self) -> Resistance {
        self.series
    }

    pub fn linearization(&self) -> Resistance {
        self.linearization
    }
}

impl Default for CircuitParameters {
    /// 5 V supply, 2.2 kOhm series, 2 kOhm linearization resistor
    fn default() -> Self {
        Self {
            supply: Voltage::from_volts(5.0),
            series: Resistance::from_kiloohms(2.2),
            linearization: Resistance::from_kiloohms(2.0),
        }
    }
}

/// How the thermistor resistance of a reading was obtained.
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitCondition {
    Nominal,
    /// series and parallel currents balance, [`OPEN_CIRCUIT_KOHM`] was used
    OpenCircuit,
    /// the node voltage is outside `[0, Vs)` or the derived resistance is
    /// not positive; the value was still handed to the model, which clamps it
    Implausible,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerReading {
    /// thermistor resistance derived from the node voltage
    pub resistance: Resistance,
    pub temperature: Temperature,
    pub condition: CircuitCondition,
    /// the model replaced the resistance with its default
    pub substituted: bool,
}

impl DividerReading {
    pub fn is_trustworthy(&self) -> bool {
        self.condition == CircuitCondition::Nominal && !self.substituted
    }
}

/// Thermistor resistance seen at node voltage `v_adc`.
pub fn thermistor_resistance(
    params: &CircuitParameters,
    v_adc: Voltage,
) -> (Resistance, CircuitCondition) {
    let vs = params.supply.as_volts();
    let v = v_adc.as_volts();

    let i_series = (vs - v) / params.series.as_kiloohms();
    let i_lin = v / params.linearization.as_kiloohms();
    let i_ntc = i_series - i_lin;

    if i_ntc == 0.0 {
        #[cfg(feature = "defmt-log")]
        defmt::warn!("no thermistor current at {} V, assuming open circuit", v);
        return (
            Resistance::from_kiloohms(OPEN_CIRCUIT_KOHM),
            CircuitCondition::OpenCircuit,
        );
    }

    let r_ntc = v / i_ntc;
    let condition = if v < 0.0 || v >= vs || r_ntc <= 0.0 || !r_ntc.is_finite() {
        #[cfg(feature = "defmt-log")]
        defmt::warn!("implausible reading {} V gives {} kOhm", v, r_ntc);
        CircuitCondition::Implausible
    } else {
        CircuitCondition::Nominal
    };
    (Resistance::from_kiloohms(r_ntc), condition)
}

/// Temperature seen at node voltage `v_adc`, converted with `model`.
pub fn temperature_from_voltage<M: ThermistorModel + ?Sized>(
    model: &M,
    params: &CircuitParameters,
    v_adc: Voltage,
) -> DividerReading {
    let (resistance, condition) = thermistor_resistance(params, v_adc);
    let temperature = model.resistance_to_temperature(resistance);
    DividerReading {
        resistance,
        temperature: temperature.value,
        condition,
        substituted: temperature.substituted,
    }
}

/// Temperatures a measured and a theoretical characteristic give for the
/// same node voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingComparison {
    pub measured: DividerReading,
    pub theoretical: DividerReading,
}

impl ReadingComparison {
    /// measured minus theoretical, in kelvin
    pub fn difference(&self) -> f64 {
        self.measured.temperature.as_kelvin() - self.theoretical.temperature.as_kelvin()
    }
}

pub fn compare_readings<A, B>(
    measured: &A,
    theoretical: &B,
    params: &CircuitParameters,
    v_adc: Voltage,
) -> ReadingComparison
where
    A: ThermistorModel + ?Sized,
    B: ThermistorModel + ?Sized,
{
    ReadingComparison {
        measured: temperature_from_voltage(measured, params, v_adc),
        theoretical: temperature_from_voltage(theoretical, params, v_adc),
    }
}

/// Divider circuit bound to a thermistor model.
pub struct DividerCircuit<M: ThermistorModel> {
    model: M,
    params: CircuitParameters,
}

impl<M: ThermistorModel> DividerCircuit<M> {
    pub fn new(model: M, params: CircuitParameters) -> Self {
        Self { model, params }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn params(&self) -> &CircuitParameters {
        &self.params
    }

    pub fn thermistor_resistance(&self, v_adc: Voltage) -> (Resistance, CircuitCondition) {
        thermistor_resistance(&self.params, v_adc)
    }

    pub fn temperature_from_voltage(&self, v_adc: Voltage) -> DividerReading {
        temperature_from_voltage(&self.model, &self.params, v_adc)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
