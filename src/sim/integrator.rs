use crate::dynamics::planar::derivatives;
use crate::dynamics::state::{Input, IntegrationScheme, Params, State};

// ---------------------------------------------------------------------------
// Fixed-step integrators with the input held constant over the step
// ---------------------------------------------------------------------------

/// Forward Euler: `x + dt f(x, u)`.
///
/// Same first-order approximation the gain is synthesised with; the local
/// error grows with `dt` and accumulates over long runs.
pub fn euler_step(state: &State, input: &Input, params: &Params, dt: f64) -> State {
    state + derivatives(state, input, params) * dt
}

/// Single RK4 step with constant input over the step.
pub fn rk4_step(state: &State, input: &Input, params: &Params, dt: f64) -> State {
    let k1 = derivatives(state, input, params);
    let k2 = derivatives(&(state + k1 * (dt * 0.5)), input, params);
    let k3 = derivatives(&(state + k2 * (dt * 0.5)), input, params);
    let k4 = derivatives(&(state + k3 * dt), input, params);

    state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

pub fn step(
    scheme: IntegrationScheme,
    state: &State,
    input: &Input,
    params: &Params,
    dt: f64,
) -> State {
    match scheme {
        IntegrationScheme::Euler => euler_step(state, input, params, dt),
        IntegrationScheme::Rk4 => rk4_step(state, input, params, dt),
    }
}
