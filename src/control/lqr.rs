//! Discrete-time LQR gain synthesis.
//!
//! The discrete algebraic Riccati equation is solved by fixed-point
//! iteration from `P = Q`. The iteration is bounded, and every failure
//! (budget exhausted, non-finite iterate, singular `R + B'PB`) is reported
//! instead of returning a partially converged gain.

use log::{debug, info};
use nalgebra::{Matrix2, Matrix2x6, Matrix6};

use crate::control::cost::CostWeights;
use crate::control::discretize::{discretize, DiscreteModel};
use crate::dynamics::{linearize, OperatingPoint, Params};
use crate::error::{QuadrotorError, Result};

/// Iteration budget and stopping tolerance for the Riccati solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LqrConfig {
    pub max_iterations: usize,
    /// Max absolute entrywise change of `P` between iterations.
    pub tolerance: f64,
}

impl Default for LqrConfig {
    fn default() -> Self {
        Self {
            max_iterations: 250_000,
            tolerance: 1e-9,
        }
    }
}

/// Converged Riccati solution and the resulting feedback gain.
#[derive(Debug, Clone)]
pub struct LqrSolution {
    pub k: Matrix2x6<f64>,
    pub p: Matrix6<f64>,
    pub iterations: usize,
}

impl LqrSolution {
    /// `A_d - B_d K` for the model the gain was synthesised on.
    pub fn closed_loop(&self, model: &DiscreteModel) -> Matrix6<f64> {
        model.a - model.b * self.k
    }
}

/// Inverse of the control-cost term, or `SingularMatrix` when it is not
/// safely invertible.
fn invert_control_cost(s: &Matrix2<f64>, iteration: usize) -> Result<Matrix2<f64>> {
    let scale = s.abs().max();
    let det = s.determinant();
    if !det.is_finite() || det.abs() <= f64::EPSILON * scale * scale {
        return Err(QuadrotorError::SingularMatrix { iteration });
    }
    s.try_inverse()
        .ok_or(QuadrotorError::SingularMatrix { iteration })
}

/// Solve the DARE for `P`. Returns `P` and the number of iterations used.
pub fn solve_dare(
    model: &DiscreteModel,
    weights: &CostWeights,
    config: &LqrConfig,
) -> Result<(Matrix6<f64>, usize)> {
    let a = &model.a;
    let b = &model.b;
    let at = a.transpose();
    let bt = b.transpose();

    let mut p = weights.q;
    let mut residual = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let pa = p * a;
        let pb = p * b;
        let s_inv = invert_control_cost(&(weights.r + bt * pb), iteration)?;

        let next = weights.q + at * pa - at * pb * s_inv * (bt * pa);
        // P is symmetric; drop the rounding asymmetry before it accumulates
        let next = (next + next.transpose()) * 0.5;

        if !next.iter().all(|v| v.is_finite()) {
            return Err(QuadrotorError::Convergence {
                iterations: iteration,
                residual: f64::INFINITY,
            });
        }

        residual = (next - p).abs().max();
        p = next;

        if residual < config.tolerance {
            return Ok((p, iteration));
        }
        if iteration % 50_000 == 0 {
            debug!("Riccati iteration {}: residual {:e}", iteration, residual);
        }
    }

    Err(QuadrotorError::Convergence {
        iterations: config.max_iterations,
        residual,
    })
}

/// Gain `K = (R + B'PB)^-1 B'PA` for a solved `P`.
pub fn gain(
    model: &DiscreteModel,
    weights: &CostWeights,
    p: &Matrix6<f64>,
    iteration: usize,
) -> Result<Matrix2x6<f64>> {
    let bt = model.b.transpose();
    let s_inv = invert_control_cost(&(weights.r + bt * p * model.b), iteration)?;
    Ok(s_inv * bt * p * model.a)
}

/// Solve for the feedback gain of an already discretised model.
pub fn lqr(model: &DiscreteModel, weights: &CostWeights, config: &LqrConfig) -> Result<LqrSolution> {
    let (p, iterations) = solve_dare(model, weights, config)?;
    let k = gain(model, weights, &p, iterations)?;
    Ok(LqrSolution { k, p, iterations })
}

/// Hover gain for a vehicle: linearise at hover, discretise with `dt`, solve.
pub fn dlqr(
    params: &Params,
    dt: f64,
    weights: &CostWeights,
    config: &LqrConfig,
) -> Result<LqrSolution> {
    params.validate()?;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(QuadrotorError::InvalidTimestep(dt));
    }
    let (a, b) = linearize(params, &OperatingPoint::hover(params));
    let model = discretize(&a, &b, dt);
    let solution = lqr(&model, weights, config)?;
    info!(
        "LQR gain synthesised in {} Riccati iterations (dt = {} s)",
        solution.iterations, dt
    );
    Ok(solution)
}

/// Largest eigenvalue modulus of a square matrix.
pub fn spectral_radius(m: &Matrix6<f64>) -> f64 {
    m.complex_eigenvalues()
        .iter()
        .map(|c| c.norm())
        .fold(0.0, f64::max)
}
