use nalgebra::{Vector2, Vector6};

use crate::error::{QuadrotorError, Result};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G_EARTH: f64 = 9.81; // m/s^2

// ---------------------------------------------------------------------------
// State and input vectors
// ---------------------------------------------------------------------------

/// Planar rigid-body state `[x, y, theta, x_dot, y_dot, theta_dot]`.
pub type State = Vector6<f64>;

/// Rotor thrusts `[u1, u2]`, N.
pub type Input = Vector2<f64>;

/// Time derivative of [`State`].
pub type Deriv = Vector6<f64>;

pub const STATE_DIM: usize = 6;
pub const INPUT_DIM: usize = 2;

pub const X: usize = 0;
pub const Y: usize = 1;
pub const THETA: usize = 2;
pub const X_DOT: usize = 3;
pub const Y_DOT: usize = 4;
pub const THETA_DOT: usize = 5;

/// Build a [`State`] from a slice, rejecting anything but exactly six values.
pub fn state_from_slice(what: &'static str, values: &[f64]) -> Result<State> {
    if values.len() != STATE_DIM {
        return Err(QuadrotorError::Dimension {
            what,
            expected: STATE_DIM,
            got: values.len(),
        });
    }
    Ok(State::from_column_slice(values))
}

/// Build an [`Input`] from a slice, rejecting anything but exactly two values.
pub fn input_from_slice(values: &[f64]) -> Result<Input> {
    if values.len() != INPUT_DIM {
        return Err(QuadrotorError::Dimension {
            what: "input",
            expected: INPUT_DIM,
            got: values.len(),
        });
    }
    Ok(Input::new(values[0], values[1]))
}

/// Hover target at a planar position: zero angle and zero rates.
pub fn hover_at(x: f64, y: f64) -> State {
    State::new(x, y, 0.0, 0.0, 0.0, 0.0)
}

// ---------------------------------------------------------------------------
// Vehicle parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub mass: f64,       // kg
    pub inertia: f64,    // kg·m^2, about the out-of-plane axis
    pub arm_length: f64, // m, rotor to centre of mass
    pub gravity: f64,    // m/s^2
}

impl Params {
    pub fn new(mass: f64, inertia: f64, arm_length: f64, gravity: f64) -> Self {
        Self { mass, inertia, arm_length, gravity }
    }

    /// Reject parameter sets the equations of motion are not defined for.
    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.mass, self.inertia, self.arm_length, self.gravity]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(QuadrotorError::InvalidParameters(format!(
                "non-finite value in {:?}",
                self
            )));
        }
        if self.mass <= 0.0 {
            return Err(QuadrotorError::InvalidParameters(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if self.inertia <= 0.0 {
            return Err(QuadrotorError::InvalidParameters(format!(
                "inertia must be positive, got {}",
                self.inertia
            )));
        }
        Ok(())
    }

    /// Total thrust needed to hold altitude.
    pub fn hover_thrust(&self) -> f64 {
        self.mass * self.gravity
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: 1.0,
            arm_length: 0.5,
            gravity: G_EARTH,
        }
    }
}

pub struct ParamsBuilder {
    mass: f64,
    inertia: f64,
    arm_length: f64,
    gravity: f64,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        let p = Params::default();
        Self {
            mass: p.mass,
            inertia: p.inertia,
            arm_length: p.arm_length,
            gravity: p.gravity,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn inertia(mut self, v: f64) -> Self { self.inertia = v; self }
    pub fn arm_length(mut self, v: f64) -> Self { self.arm_length = v; self }
    pub fn gravity(mut self, v: f64) -> Self { self.gravity = v; self }

    pub fn build(self) -> Result<Params> {
        let params = Params::new(self.mass, self.inertia, self.arm_length, self.gravity);
        params.validate()?;
        Ok(params)
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Time-stepping scheme used by the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationScheme {
    /// Forward Euler, matching the discretisation used for gain synthesis.
    #[default]
    Euler,
    /// Classical 4th-order Runge-Kutta with the input held over the step.
    Rk4,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
    pub scheme: IntegrationScheme,
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(QuadrotorError::InvalidTimestep(self.dt));
        }
        Ok(())
    }

    /// Number of ticks needed to cover `max_time`.
    pub fn steps(&self) -> usize {
        if self.dt > 0.0 {
            (self.max_time / self.dt).ceil() as usize
        } else {
            0
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.001,        // 1 kHz
            max_time: 150.0,
            scheme: IntegrationScheme::Euler,
        }
    }
}
