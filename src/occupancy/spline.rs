//! Piecewise cubic interpolation with not-a-knot end conditions.
//!
//! With not-a-knot ends the third derivative is continuous across the second and the
//! second-to-last knot, so four points yield a single cubic and any cubic polynomial is
//! reproduced exactly. Outside the sampled range the first and last pieces are extended.

use crate::occupancy::error::OccupancyError;

/// An interpolant through strictly increasing `x` knots.
///
/// Fewer than four knots cannot carry a not-a-knot cubic; those fall back to the unique
/// polynomial of lower degree through the knots (quadratic, line, constant).
#[derive(Debug, Clone, PartialEq)]
pub enum Spline {
    Constant(f64),
    Linear { x: [f64; 2], y: [f64; 2] },
    Quadratic { x: [f64; 3], y: [f64; 3] },
    Cubic(CubicSpline),
}

impl Spline {
    /// Fits an interpolant through `(x, y)` pairs. `x` must be strictly increasing.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, OccupancyError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(OccupancyError::NoSamples);
        }
        if let Some(pair) = x.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(OccupancyError::DuplicateHour(pair[1]));
        }
        Ok(match x.len() {
            1 => Spline::Constant(y[0]),
            2 => Spline::Linear {
                x: [x[0], x[1]],
                y: [y[0], y[1]],
            },
            3 => Spline::Quadratic {
                x: [x[0], x[1], x[2]],
                y: [y[0], y[1], y[2]],
            },
            _ => Spline::Cubic(CubicSpline::not_a_knot(x, y)?),
        })
    }

    pub fn eval(&self, at: f64) -> f64 {
        match self {
            Spline::Constant(value) => *value,
            Spline::Linear { x, y } => y[0] + (y[1] - y[0]) * (at - x[0]) / (x[1] - x[0]),
            Spline::Quadratic { x, y } => {
                let l0 = (at - x[1]) * (at - x[2]) / ((x[0] - x[1]) * (x[0] - x[2]));
                let l1 = (at - x[0]) * (at - x[2]) / ((x[1] - x[0]) * (x[1] - x[2]));
                let l2 = (at - x[0]) * (at - x[1]) / ((x[2] - x[0]) * (x[2] - x[1]));
                y[0] * l0 + y[1] * l1 + y[2] * l2
            }
            Spline::Cubic(spline) => spline.eval(at),
        }
    }
}

/// Cubic spline stored as knot values and second derivatives at the knots.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    /// Requires at least four strictly increasing knots.
    fn not_a_knot(x: &[f64], y: &[f64]) -> Result<Self, OccupancyError> {
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slopes: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        let mut matrix = vec![vec![0.0; n]; n];
        let mut rhs = vec![0.0; n];

        matrix[0][0] = h[1];
        matrix[0][1] = -(h[0] + h[1]);
        matrix[0][2] = h[0];

        for i in 1..n - 1 {
            matrix[i][i - 1] = h[i - 1];
            matrix[i][i] = 2.0 * (h[i - 1] + h[i]);
            matrix[i][i + 1] = h[i];
            rhs[i] = 6.0 * (slopes[i] - slopes[i - 1]);
        }

        matrix[n - 1][n - 3] = h[n - 2];
        matrix[n - 1][n - 2] = -(h[n - 3] + h[n - 2]);
        matrix[n - 1][n - 1] = h[n - 3];

        let second_derivatives = solve(matrix, rhs).ok_or(OccupancyError::Interpolation)?;
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            second_derivatives,
        })
    }

    fn eval(&self, at: f64) -> f64 {
        let last_piece = self.x.len() - 2;
        let i = self
            .x
            .partition_point(|knot| *knot <= at)
            .saturating_sub(1)
            .min(last_piece);

        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.second_derivatives[i], self.second_derivatives[i + 1]);
        let h = x1 - x0;
        let left = x1 - at;
        let right = at - x0;

        m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 - m0 * h * h / 6.0) * left / h
            + (y1 - m1 * h * h / 6.0) * right / h
    }
}

/// Gaussian elimination with partial pivoting. `None` when the system is singular.
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|a, b| matrix[*a][col].abs().total_cmp(&matrix[*b][col].abs()))?;
        if matrix[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }
    Some(solution)
}
