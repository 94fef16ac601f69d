use crate::dynamics::state::{Input, State};

/// Trait for flight controllers.
///
/// Implement this to plug a custom feedback law into the simulation loop.
pub trait Controller {
    /// Compute rotor thrusts from the current state and the goal state.
    fn control(&mut self, state: &State, goal: &State) -> Input;

    /// Reset controller internal state, if any.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

impl<T: Controller + ?Sized> Controller for &mut T {
    fn control(&mut self, state: &State, goal: &State) -> Input {
        (**self).control(state, goal)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
