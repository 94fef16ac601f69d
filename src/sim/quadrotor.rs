use nalgebra::{Matrix6, Matrix6x2};

use crate::control::GoalHandle;
use crate::dynamics::linearize::{linearize, OperatingPoint};
use crate::dynamics::planar::gravity_comp_input;
use crate::dynamics::state::{input_from_slice, Input, IntegrationScheme, Params, State};
use crate::error::{QuadrotorError, Result};
use crate::sim::integrator;

// ---------------------------------------------------------------------------
// Simulated plant: state, last applied input, goal
// ---------------------------------------------------------------------------

/// A planar quadrotor being simulated.
///
/// The state is only ever changed by [`PlanarQuadrotor::update`]; the goal
/// lives behind a [`GoalHandle`] so it can be replaced from another thread.
#[derive(Debug, Clone)]
pub struct PlanarQuadrotor {
    params: Params,
    state: State,
    input: Input,
    goal: GoalHandle,
    scheme: IntegrationScheme,
}

impl PlanarQuadrotor {
    pub fn new(initial_state: State, params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: initial_state,
            input: Input::zeros(),
            goal: GoalHandle::default(),
            scheme: IntegrationScheme::Euler,
        })
    }

    /// Use an existing goal handle, e.g. one already shared with an input source.
    pub fn with_goal_handle(mut self, goal: GoalHandle) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_scheme(mut self, scheme: IntegrationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    /// Tracking error `state - goal` fed to the feedback law.
    pub fn get_control_state(&self) -> State {
        self.state - self.goal.get()
    }

    pub fn goal(&self) -> State {
        self.goal.get()
    }

    pub fn goal_handle(&self) -> GoalHandle {
        self.goal.clone()
    }

    pub fn set_goal(&mut self, goal: &[f64]) -> Result<()> {
        self.goal.set(goal)
    }

    pub fn set_goal_state(&mut self, goal: State) {
        self.goal.set_state(goal);
    }

    pub fn input(&self) -> Input {
        self.input
    }

    pub fn set_input(&mut self, input: &[f64]) -> Result<()> {
        self.input = input_from_slice(input)?;
        Ok(())
    }

    pub fn set_input_vec(&mut self, input: Input) {
        self.input = input;
    }

    /// Advance the state by `dt` with the last input held over the step.
    pub fn update(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(QuadrotorError::InvalidTimestep(dt));
        }
        self.state = integrator::step(self.scheme, &self.state, &self.input, &self.params, dt);
        Ok(())
    }

    pub fn linearize(&self, point: &OperatingPoint) -> (Matrix6<f64>, Matrix6x2<f64>) {
        linearize(&self.params, point)
    }

    /// Jacobians at level hover with gravity-compensating thrust.
    pub fn linearize_hover(&self) -> (Matrix6<f64>, Matrix6x2<f64>) {
        self.linearize(&OperatingPoint::hover(&self.params))
    }

    pub fn gravity_comp_input(&self) -> Input {
        gravity_comp_input(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::hover_at;

    fn quad() -> PlanarQuadrotor {
        PlanarQuadrotor::new(hover_at(100.0, 50.0), Params::default()).unwrap()
    }

    #[test]
    fn control_state_is_error_to_goal() {
        let mut q = quad();
        assert_eq!(q.get_control_state(), hover_at(100.0, 50.0));
        q.set_goal(&[10.0, 20.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(q.get_control_state(), hover_at(90.0, 30.0));
    }

    #[test]
    fn short_goal_rejected() {
        let mut q = quad();
        let err = q.set_goal(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap_err();
        assert!(matches!(err, QuadrotorError::Dimension { expected: 6, got: 5, .. }));
        assert_eq!(q.goal(), State::zeros());
    }

    #[test]
    fn wrong_input_length_leaves_input_unchanged() {
        let mut q = quad();
        q.set_input(&[4.0, 5.0]).unwrap();
        assert!(q.set_input(&[1.0]).is_err());
        assert_eq!(q.input(), Input::new(4.0, 5.0));
    }

    #[test]
    fn update_zero_is_identity() {
        let mut q = quad();
        q.set_input(&[40.0, -3.0]).unwrap();
        let before = q.get_state();
        q.update(0.0).unwrap();
        assert_eq!(q.get_state(), before);
    }

    #[test]
    fn negative_step_rejected() {
        let mut q = quad();
        assert!(matches!(q.update(-0.1), Err(QuadrotorError::InvalidTimestep(_))));
        assert!(q.update(f64::NAN).is_err());
    }

    #[test]
    fn gravity_comp_ignores_state() {
        let mut q = quad();
        let u = q.gravity_comp_input();
        q.set_input(&[0.0, 0.0]).unwrap();
        q.update(0.5).unwrap();
        assert_eq!(q.gravity_comp_input(), u);
        assert_eq!(u, Input::new(4.905, 4.905));
    }

    #[test]
    fn invalid_params_rejected() {
        let p = Params { inertia: 0.0, ..Params::default() };
        assert!(PlanarQuadrotor::new(State::zeros(), p).is_err());
    }
}
