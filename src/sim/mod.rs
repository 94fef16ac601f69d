pub mod event;
pub mod history;
pub mod integrator;
pub mod observer;
pub mod quadrotor;
pub mod runner;

pub use history::{PlotWorker, Sample, TrajectoryHistory, TrajectorySnapshot};
pub use integrator::{euler_step, rk4_step};
pub use quadrotor::PlanarQuadrotor;
pub use runner::{simulate, simulate_with, RunOutcome, Simulation, Tick};
