use std::f64::consts::PI;

use nalgebra::{Matrix2, Matrix6, Vector2, Vector6};

// ---------------------------------------------------------------------------
// Quadratic cost weights for the regulator
// ---------------------------------------------------------------------------

/// State (`q`) and control-effort (`r`) weights of the LQR cost.
#[derive(Debug, Clone, PartialEq)]
pub struct CostWeights {
    pub q: Matrix6<f64>,
    pub r: Matrix2<f64>,
}

impl CostWeights {
    pub fn new(q: Matrix6<f64>, r: Matrix2<f64>) -> Self {
        Self { q, r }
    }

    /// Diagonal weights, one entry per state / input component.
    pub fn diagonal(q: [f64; 6], r: [f64; 2]) -> Self {
        Self {
            q: Matrix6::from_diagonal(&Vector6::from(q)),
            r: Matrix2::from_diagonal(&Vector2::from(r)),
        }
    }

    pub fn identity() -> Self {
        Self {
            q: Matrix6::identity(),
            r: Matrix2::identity(),
        }
    }
}

impl Default for CostWeights {
    /// Hover tuning: a heavy attitude penalty keeps the linearisation valid
    /// during long translations, and the coupled `r` discourages fighting
    /// rotors.
    fn default() -> Self {
        let q = Matrix6::from_diagonal(&Vector6::new(
            4e-3,
            4e-3,
            4e2,
            8e-3,
            4.5e-2,
            1.0 / PI,
        ));
        let r = Matrix2::new(
            30.0, 7.0,
            7.0, 30.0,
        );
        Self { q, r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_symmetric_positive_definite() {
        let w = CostWeights::default();
        assert_eq!(w.q, w.q.transpose());
        assert_eq!(w.r, w.r.transpose());
        assert!(w.q.diagonal().iter().all(|&v| v > 0.0));
        assert!(w.r.cholesky().is_some());
    }

    #[test]
    fn diagonal_builder_places_entries() {
        let w = CostWeights::diagonal([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [7.0, 8.0]);
        assert_eq!(w.q[(2, 2)], 3.0);
        assert_eq!(w.q[(2, 3)], 0.0);
        assert_eq!(w.r[(1, 1)], 8.0);
    }
}
