#[cfg(not(feature = "std"))]
use micromath::F32Ext;

pub fn abs(value: f64) -> f64 {
    let mut v = value;
    if value.is_sign_negative() {
        v = -value;
    }
    v
}

// without std the f32 approximations from micromath are used,
// expect around 5 significant digits
#[cfg(feature = "std")]
pub fn ln(value: f64) -> f64 {
    value.ln()
}

#[cfg(not(feature = "std"))]
pub fn ln(value: f64) -> f64 {
    (value as f32).ln() as f64
}

#[cfg(feature = "std")]
pub fn exp(value: f64) -> f64 {
    value.exp()
}

#[cfg(not(feature = "std"))]
pub fn exp(value: f64) -> f64 {
    (value as f32).exp() as f64
}

/// True when `value` vanishes relative to `scale`, i.e. it is within a few
/// ulps of zero for numbers of that magnitude.
pub fn is_negligible(value: f64, scale: f64) -> bool {
    abs(value) <= 4.0 * f64::EPSILON * abs(scale)
}

/// Returns `value` if it lies inside the closed interval `[min, max]`,
/// `None` otherwise (NaN included).
pub fn within(value: f64, min: f64, max: f64) -> Option<f64> {
    if value >= min && value <= max {
        Some(value)
    } else {
        None
    }
}
