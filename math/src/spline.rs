//! Piecewise cubic interpolation over a small set of knots.
//!
//! Both supported spline kinds are stored in Hermite form (value and first
//! derivative at every knot), so evaluation is the same whichever way the
//! derivatives were obtained.

use core::fmt;

use heapless::Vec;

use crate::common::abs;

pub const MAX_KNOTS: usize = 32;

#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplineError {
    TooFewKnots,
    TooManyKnots,
    LengthMismatch,
    NotStrictlyMonotonic,
    Singular,
}

impl fmt::Display for SplineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineError::TooFewKnots => write!(f, "at least 4 knots are required"),
            SplineError::TooManyKnots => write!(f, "at most {} knots are supported", MAX_KNOTS),
            SplineError::LengthMismatch => write!(f, "abscissa and ordinate lengths differ"),
            SplineError::NotStrictlyMonotonic => write!(f, "abscissae are not strictly monotonic"),
            SplineError::Singular => write!(f, "spline system is singular"),
        }
    }
}

#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplineKind {
    /// Twice differentiable cubic spline whose third derivative is continuous
    /// across the second and the penultimate knot. Can overshoot between
    /// unevenly spaced knots.
    #[default]
    NotAKnot,
    /// Fritsch-Carlson derivatives: the curve never leaves the range of its
    /// two neighbouring knots and keeps the monotonicity of the data.
    Monotone,
}

#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64, MAX_KNOTS>,
    ys: Vec<f64, MAX_KNOTS>,
    slopes: Vec<f64, MAX_KNOTS>,
    kind: SplineKind,
}

impl CubicSpline {
    /// Build a spline through `(xs[i], ys[i])`. The abscissae must be strictly
    /// increasing or strictly decreasing; decreasing input is reversed.
    pub fn new(xs: &[f64], ys: &[f64], kind: SplineKind) -> Result<Self, SplineError> {
        if xs.len() != ys.len() {
            return Err(SplineError::LengthMismatch);
        }
        if xs.len() < 4 {
            return Err(SplineError::TooFewKnots);
        }
        if xs.len() > MAX_KNOTS {
            return Err(SplineError::TooManyKnots);
        }

        let ascending = xs[1] > xs[0];
        let mut sorted_x: Vec<f64, MAX_KNOTS> = Vec::new();
        let mut sorted_y: Vec<f64, MAX_KNOTS> = Vec::new();
        for i in 0..xs.len() {
            let j = if ascending { i } else { xs.len() - 1 - i };
            // capacity has been checked above
            sorted_x.push(xs[j]).map_err(|_| SplineError::TooManyKnots)?;
            sorted_y.push(ys[j]).map_err(|_| SplineError::TooManyKnots)?;
        }
        if !is_strictly_increasing(&sorted_x) || sorted_y.iter().any(|y| !y.is_finite()) {
            return Err(SplineError::NotStrictlyMonotonic);
        }

        let slopes = match kind {
            SplineKind::NotAKnot => not_a_knot_slopes(&sorted_x, &sorted_y)?,
            SplineKind::Monotone => monotone_slopes(&sorted_x, &sorted_y),
        };

        Ok(Self {
            xs: sorted_x,
            ys: sorted_y,
            slopes,
            kind,
        })
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    /// Smallest and largest knot abscissa.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluate the spline. Points outside the domain are extrapolated with the
    /// polynomial of the nearest end segment.
    pub fn evaluate(&self, x: f64) -> f64 {
        let last_segment = self.xs.len() - 2;
        let i = self
            .xs
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(last_segment);

        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.ys[i]
            + h10 * h * self.slopes[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}

fn is_strictly_increasing(xs: &[f64]) -> bool {
    xs.iter().all(|x| x.is_finite()) && xs.windows(2).all(|w| w[1] > w[0])
}

// Solve for the second derivatives (moments) of the not-a-knot spline and
// convert them into first derivatives at the knots.
fn not_a_knot_slopes(xs: &[f64], ys: &[f64]) -> Result<Vec<f64, MAX_KNOTS>, SplineError> {
    let n = xs.len();
    let mut h = [0f64; MAX_KNOTS];
    let mut delta = [0f64; MAX_KNOTS];
    for i in 0..n - 1 {
        h[i] = xs[i + 1] - xs[i];
        delta[i] = (ys[i + 1] - ys[i]) / h[i];
    }

    let mut a = [[0f64; MAX_KNOTS]; MAX_KNOTS];
    let mut b = [0f64; MAX_KNOTS];

    // third derivative continuous at xs[1]
    a[0][0] = h[1];
    a[0][1] = -(h[0] + h[1]);
    a[0][2] = h[0];
    for i in 1..n - 1 {
        a[i][i - 1] = h[i - 1];
        a[i][i] = 2.0 * (h[i - 1] + h[i]);
        a[i][i + 1] = h[i];
        b[i] = 6.0 * (delta[i] - delta[i - 1]);
    }
    // third derivative continuous at xs[n - 2]
    a[n - 1][n - 3] = h[n - 2];
    a[n - 1][n - 2] = -(h[n - 3] + h[n - 2]);
    a[n - 1][n - 1] = h[n - 3];

    let moments = solve_linear_system(&mut a, &mut b, n)?;

    let mut slopes: Vec<f64, MAX_KNOTS> = Vec::new();
    for i in 0..n - 1 {
        let d = delta[i] - h[i] * (2.0 * moments[i] + moments[i + 1]) / 6.0;
        slopes.push(d).map_err(|_| SplineError::TooManyKnots)?;
    }
    let d_last = delta[n - 2] + h[n - 2] * (moments[n - 2] + 2.0 * moments[n - 1]) / 6.0;
    slopes.push(d_last).map_err(|_| SplineError::TooManyKnots)?;
    Ok(slopes)
}

// Gaussian elimination with partial pivoting on the leading n x n block.
// The not-a-knot rows break the tridiagonal shape, so a dense solve is used;
// n never exceeds MAX_KNOTS.
fn solve_linear_system(
    a: &mut [[f64; MAX_KNOTS]; MAX_KNOTS],
    b: &mut [f64; MAX_KNOTS],
    n: usize,
) -> Result<[f64; MAX_KNOTS], SplineError> {
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if abs(a[row][col]) > abs(a[pivot][col]) {
                pivot = row;
            }
        }
        if a[pivot][col] == 0.0 || !a[pivot][col].is_finite() {
            return Err(SplineError::Singular);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0f64; MAX_KNOTS];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}

fn monotone_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64, MAX_KNOTS> {
    let n = xs.len();
    let mut h = [0f64; MAX_KNOTS];
    let mut delta = [0f64; MAX_KNOTS];
    for i in 0..n - 1 {
        h[i] = xs[i + 1] - xs[i];
        delta[i] = (ys[i + 1] - ys[i]) / h[i];
    }

    let mut slopes = [0f64; MAX_KNOTS];
    for k in 1..n - 1 {
        if delta[k - 1] * delta[k] <= 0.0 {
            slopes[k] = 0.0;
        } else {
            // weighted harmonic mean of the neighbouring secants
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            slopes[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
        }
    }
    slopes[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);

    slopes[..n].iter().copied().collect()
}

// three point estimate at an end knot, limited so the end segment stays monotone
fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if d.is_sign_positive() != m0.is_sign_positive() {
        0.0
    } else if m0.is_sign_positive() != m1.is_sign_positive() && abs(d) > abs(3.0 * m0) {
        3.0 * m0
    } else {
        d
    }
}
