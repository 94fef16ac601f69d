use nalgebra::{Matrix6, Matrix6x2};

use crate::dynamics::planar::gravity_comp_input;
use crate::dynamics::state::{
    Input, Params, State, THETA, THETA_DOT, X, X_DOT, Y, Y_DOT,
};

/// State/input pair the dynamics are expanded around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub state: State,
    pub input: Input,
}

impl OperatingPoint {
    /// Level hover at the origin with gravity-compensating thrust.
    pub fn hover(params: &Params) -> Self {
        Self {
            state: State::zeros(),
            input: gravity_comp_input(params),
        }
    }
}

/// Analytic Jacobians `(A, B) = (∂f/∂x, ∂f/∂u)` of the planar dynamics.
///
/// Only `theta` and the thrusts enter nonlinearly, so `A` is the rate
/// coupling plus the attitude column and `B` carries the tilted thrust
/// direction and the arm torque.
pub fn linearize(params: &Params, point: &OperatingPoint) -> (Matrix6<f64>, Matrix6x2<f64>) {
    let theta = point.state[THETA];
    let collective = point.input[0] + point.input[1];
    let (sin, cos) = theta.sin_cos();
    let m = params.mass;
    let torque_gain = params.arm_length / params.inertia;

    let mut a = Matrix6::zeros();
    a[(X, X_DOT)] = 1.0;
    a[(Y, Y_DOT)] = 1.0;
    a[(THETA, THETA_DOT)] = 1.0;
    a[(X_DOT, THETA)] = -collective * cos / m;
    a[(Y_DOT, THETA)] = -collective * sin / m;

    let mut b = Matrix6x2::zeros();
    for j in 0..2 {
        b[(X_DOT, j)] = -sin / m;
        b[(Y_DOT, j)] = cos / m;
    }
    b[(THETA_DOT, 0)] = torque_gain;
    b[(THETA_DOT, 1)] = -torque_gain;

    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Matrix3x2};

    use crate::dynamics::planar::derivatives;

    #[test]
    fn hover_jacobians_match_closed_form() {
        let p = Params::default();
        let (a, b) = linearize(&p, &OperatingPoint::hover(&p));

        assert_abs_diff_eq!(a[(X_DOT, THETA)], -p.gravity, epsilon = 1e-12);
        for j in 0..6 {
            if j != THETA {
                assert_eq!(a[(X_DOT, j)], 0.0);
            }
        }
        assert_eq!(a.fixed_view::<3, 3>(0, 3), Matrix3::identity());
        assert_eq!(a.fixed_view::<3, 3>(0, 0), Matrix3::zeros());
        assert_eq!(a.row(Y_DOT).sum(), 0.0);
        assert_eq!(a.row(THETA_DOT).sum(), 0.0);

        assert_eq!(b[(X_DOT, 0)], 0.0);
        assert_eq!(b[(X_DOT, 1)], 0.0);
        assert_abs_diff_eq!(b[(Y_DOT, 0)], 1.0 / p.mass);
        assert_abs_diff_eq!(b[(Y_DOT, 1)], 1.0 / p.mass);
        assert_abs_diff_eq!(b[(THETA_DOT, 0)], p.arm_length / p.inertia);
        assert_abs_diff_eq!(b[(THETA_DOT, 1)], -p.arm_length / p.inertia);
        assert_eq!(b.fixed_view::<3, 2>(0, 0), Matrix3x2::zeros());
    }

    #[test]
    fn jacobians_agree_with_finite_differences_off_hover() {
        let p = Params::default();
        let point = OperatingPoint {
            state: State::new(1.0, -2.0, 0.3, 0.5, -0.1, 0.2),
            input: Input::new(5.5, 4.0),
        };
        let (a, b) = linearize(&p, &point);
        let h = 1e-6;

        for j in 0..6 {
            let mut plus = point.state;
            let mut minus = point.state;
            plus[j] += h;
            minus[j] -= h;
            let col = (derivatives(&plus, &point.input, &p) - derivatives(&minus, &point.input, &p))
                / (2.0 * h);
            assert_abs_diff_eq!(a.column(j).into_owned(), col, epsilon = 1e-6);
        }
        for j in 0..2 {
            let mut plus = point.input;
            let mut minus = point.input;
            plus[j] += h;
            minus[j] -= h;
            let col = (derivatives(&point.state, &plus, &p) - derivatives(&point.state, &minus, &p))
                / (2.0 * h);
            assert_abs_diff_eq!(b.column(j).into_owned(), col, epsilon = 1e-6);
        }
    }
}
