use nalgebra::Matrix2x6;

use crate::control::cost::CostWeights;
use crate::control::lqr::{dlqr, LqrConfig};
use crate::dynamics::planar::gravity_comp_input;
use crate::dynamics::state::{Input, Params, State};
use crate::error::Result;

// ---------------------------------------------------------------------------
// LQR hover controller: u = u_eq - K (x - x_goal)
// ---------------------------------------------------------------------------

/// Fixed-gain linear feedback around the hover equilibrium.
///
/// Valid near level flight; large position or attitude errors fall outside
/// the region the linearisation describes and are not saturated here.
#[derive(Debug, Clone)]
pub struct LqrController {
    k: Matrix2x6<f64>,
    u_eq: Input,
}

impl LqrController {
    pub fn new(k: Matrix2x6<f64>, params: &Params) -> Self {
        Self {
            k,
            u_eq: gravity_comp_input(params),
        }
    }

    /// Synthesise the hover gain for `params` at step `dt` and wrap it.
    pub fn from_params(
        params: &Params,
        dt: f64,
        weights: &CostWeights,
        config: &LqrConfig,
    ) -> Result<Self> {
        let solution = dlqr(params, dt, weights, config)?;
        Ok(Self::new(solution.k, params))
    }

    pub fn gain(&self) -> &Matrix2x6<f64> {
        &self.k
    }

    pub fn equilibrium_input(&self) -> Input {
        self.u_eq
    }

    /// Feedback law on a precomputed error `state - goal`.
    pub fn input_for_error(&self, error: &State) -> Input {
        self.u_eq - self.k * error
    }

    pub fn compute(&self, state: &State, goal: &State) -> Input {
        self.input_for_error(&(state - goal))
    }
}

impl super::Controller for LqrController {
    fn control(&mut self, state: &State, goal: &State) -> Input {
        self.compute(state, goal)
    }

    fn name(&self) -> &str {
        "LqrController"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::control::Controller;
    use crate::dynamics::state::hover_at;

    fn controller() -> LqrController {
        LqrController::from_params(
            &Params::default(),
            0.01,
            &CostWeights::identity(),
            &LqrConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn zero_error_gives_hover_thrust() {
        let mut c = controller();
        let s = hover_at(12.0, -3.0);
        let u = c.control(&s, &s);
        assert_eq!(u, gravity_comp_input(&Params::default()));
    }

    #[test]
    fn below_goal_increases_collective() {
        let c = controller();
        let u = c.compute(&hover_at(0.0, -1.0), &hover_at(0.0, 0.0));
        let hover = c.equilibrium_input();
        assert!(u[0] + u[1] > hover[0] + hover[1]);
        // Pure altitude error → no differential thrust
        assert_abs_diff_eq!(u[0], u[1], epsilon = 1e-9);
    }

    #[test]
    fn lateral_error_commands_differential_thrust() {
        let c = controller();
        let u = c.compute(&hover_at(-1.0, 0.0), &hover_at(0.0, 0.0));
        // Goal at +x needs a negative tilt, i.e. u2 > u1
        assert!(u[1] > u[0]);
    }

    #[test]
    fn law_is_affine_in_error() {
        let c = controller();
        let e = State::new(0.3, -0.2, 0.05, 0.1, 0.0, -0.02);
        let u1 = c.input_for_error(&e);
        let u2 = c.input_for_error(&(e * 2.0));
        let u0 = c.equilibrium_input();
        assert_abs_diff_eq!(u2 - u0, (u1 - u0) * 2.0, epsilon = 1e-12);
    }
}
