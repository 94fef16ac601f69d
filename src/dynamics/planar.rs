use crate::dynamics::state::{Deriv, Input, Params, State, THETA, THETA_DOT, X_DOT, Y_DOT};

// ---------------------------------------------------------------------------
// Planar rigid-body equations of motion
// ---------------------------------------------------------------------------

/// Compute state derivatives for a given state and rotor thrusts.
///
/// Forces & moments:
///   1. Collective thrust `u1 + u2` along the body axis, tilted by `theta`
///   2. Gravity, acting along -y
///   3. Differential thrust `u1 - u2` acting on the arm, producing torque
pub fn derivatives(state: &State, input: &Input, params: &Params) -> Deriv {
    let theta = state[THETA];
    let collective = input[0] + input[1];
    let (sin, cos) = theta.sin_cos();

    let x_ddot = -collective * sin / params.mass;
    let y_ddot = collective * cos / params.mass - params.gravity;
    let theta_ddot = params.arm_length * (input[0] - input[1]) / params.inertia;

    Deriv::new(
        state[X_DOT],
        state[Y_DOT],
        state[THETA_DOT],
        x_ddot,
        y_ddot,
        theta_ddot,
    )
}

/// Symmetric thrust pair `(mg/2, mg/2)` that holds the vehicle level at hover.
pub fn gravity_comp_input(params: &Params) -> Input {
    let half = params.hover_thrust() / 2.0;
    Input::new(half, half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::dynamics::state::{ParamsBuilder, X, Y};

    #[test]
    fn hover_input_balances_gravity() {
        let p = Params::default();
        let u = gravity_comp_input(&p);
        assert_eq!(u, Input::new(p.mass * p.gravity / 2.0, p.mass * p.gravity / 2.0));
        let d = derivatives(&State::zeros(), &u, &p);
        assert_abs_diff_eq!(d, Deriv::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn hover_input_independent_of_params_choice() {
        for (m, i, l, g) in [(1.0, 1.0, 0.5, 9.81), (2.5, 0.3, 0.2, 3.7), (0.1, 4.0, 1.0, 0.0)] {
            let p = ParamsBuilder::new().mass(m).inertia(i).arm_length(l).gravity(g).build().unwrap();
            let u = gravity_comp_input(&p);
            assert_abs_diff_eq!(u[0], m * g / 2.0, epsilon = 1e-12);
            assert_abs_diff_eq!(u[1], m * g / 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rates_pass_through_to_positions() {
        let p = Params::default();
        let s = State::new(3.0, -2.0, 0.0, 1.5, -0.5, 0.25);
        let d = derivatives(&s, &gravity_comp_input(&p), &p);
        assert_eq!(d[X], 1.5);
        assert_eq!(d[Y], -0.5);
        assert_eq!(d[THETA], 0.25);
    }

    #[test]
    fn tilt_pushes_opposite_to_sine() {
        let p = Params::default();
        let s = State::new(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
        let d = derivatives(&s, &gravity_comp_input(&p), &p);
        // Positive tilt → thrust vector leans toward -x
        assert!(d[X_DOT] < 0.0);
        // Tilted thrust no longer fully cancels gravity
        assert!(d[Y_DOT] < 0.0);
    }

    #[test]
    fn differential_thrust_creates_torque() {
        let p = Params::default();
        let d = derivatives(&State::zeros(), &Input::new(6.0, 4.0), &p);
        assert_abs_diff_eq!(d[THETA_DOT], p.arm_length * 2.0 / p.inertia, epsilon = 1e-12);
    }

    #[test]
    fn zero_thrust_is_free_fall() {
        let p = Params::default();
        let d = derivatives(&State::new(0.0, 0.0, 0.7, 0.0, 0.0, 0.0), &Input::zeros(), &p);
        assert_abs_diff_eq!(d[X_DOT], 0.0);
        assert_abs_diff_eq!(d[Y_DOT], -p.gravity);
    }
}
