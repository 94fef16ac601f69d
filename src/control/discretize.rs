use nalgebra::{Matrix6, Matrix6x2};

/// Discrete-time model `x[k+1] = a x[k] + b u[k]` for a fixed step.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteModel {
    pub a: Matrix6<f64>,
    pub b: Matrix6x2<f64>,
    pub dt: f64,
}

/// First-order (forward Euler) discretisation: `A_d = I + dt A`, `B_d = dt B`.
///
/// Not the matrix exponential; accuracy degrades as `dt` grows relative to
/// the fastest closed-loop mode.
pub fn discretize(a: &Matrix6<f64>, b: &Matrix6x2<f64>, dt: f64) -> DiscreteModel {
    DiscreteModel {
        a: Matrix6::identity() + a * dt,
        b: b * dt,
        dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{linearize, OperatingPoint, Params};

    #[test]
    fn zero_step_is_identity() {
        let p = Params::default();
        let (a, b) = linearize(&p, &OperatingPoint::hover(&p));
        let d = discretize(&a, &b, 0.0);
        assert_eq!(d.a, Matrix6::identity());
        assert_eq!(d.b, Matrix6x2::zeros());
    }

    #[test]
    fn entries_scale_with_step() {
        let p = Params::default();
        let (a, b) = linearize(&p, &OperatingPoint::hover(&p));
        let d = discretize(&a, &b, 0.01);
        assert_eq!(d.a[(0, 3)], 0.01);
        assert_eq!(d.a[(3, 3)], 1.0);
        assert!((d.a[(3, 2)] + p.gravity * 0.01).abs() < 1e-12);
        assert!((d.b[(4, 0)] - 0.01 / p.mass).abs() < 1e-12);
        assert_eq!(d.dt, 0.01);
    }
}
