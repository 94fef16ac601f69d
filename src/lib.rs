pub mod control;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod sim;

pub use error::{QuadrotorError, Result};

// Flat re-exports for the common path: build a vehicle, synthesise the gain, run.
pub mod prelude {
    pub use crate::control::{Controller, CostWeights, GoalHandle, LqrConfig, LqrController};
    pub use crate::dynamics::state::{hover_at, Input, IntegrationScheme, Params, ParamsBuilder, SimConfig, State};
    pub use crate::error::{QuadrotorError, Result};
    pub use crate::sim::{PlanarQuadrotor, Simulation};
}
