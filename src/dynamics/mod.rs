pub mod state;
pub mod planar;
pub mod linearize;

pub use linearize::{linearize, OperatingPoint};
pub use planar::{derivatives, gravity_comp_input};
pub use state::{Input, Params, ParamsBuilder, SimConfig, State};
