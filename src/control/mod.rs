pub mod controller;
pub mod cost;
pub mod discretize;
pub mod feedback;
pub mod goal;
pub mod lqr;

pub use controller::Controller;
pub use cost::CostWeights;
pub use discretize::{discretize, DiscreteModel};
pub use feedback::LqrController;
pub use goal::GoalHandle;
pub use lqr::{dlqr, lqr, solve_dare, spectral_radius, LqrConfig, LqrSolution};
