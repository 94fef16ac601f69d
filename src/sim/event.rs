use crate::dynamics::state::{State, THETA, X, Y};

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Position and attitude error came within tolerance of the goal.
    Settled,
    /// State left the numerically meaningful region (non-finite or huge).
    Diverged,
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect each new state against the goal and report events.
pub trait EventDetector {
    fn check(&mut self, time: f64, state: &State, goal: &State) -> Option<EventKind>;
}

/// Fires once each time the vehicle enters the tolerance band around the goal.
/// Re-arms when the error leaves the band again, e.g. after a goal change.
pub struct SettledDetector {
    pub position_tol: f64,
    pub angle_tol: f64,
    inside: bool,
}

impl SettledDetector {
    pub fn new(position_tol: f64, angle_tol: f64) -> Self {
        Self { position_tol, angle_tol, inside: false }
    }
}

impl Default for SettledDetector {
    fn default() -> Self {
        Self::new(1e-2, 1e-3)
    }
}

impl EventDetector for SettledDetector {
    fn check(&mut self, _time: f64, state: &State, goal: &State) -> Option<EventKind> {
        let error = state - goal;
        let within = error[X].abs() < self.position_tol
            && error[Y].abs() < self.position_tol
            && error[THETA].abs() < self.angle_tol;
        let entered = within && !self.inside;
        self.inside = within;
        entered.then_some(EventKind::Settled)
    }
}

/// Flags numerical blow-up: any non-finite component or one beyond `bound`.
pub struct DivergenceDetector {
    pub bound: f64,
    fired: bool,
}

impl DivergenceDetector {
    pub fn new(bound: f64) -> Self {
        Self { bound, fired: false }
    }
}

impl Default for DivergenceDetector {
    fn default() -> Self {
        Self::new(1e6)
    }
}

impl EventDetector for DivergenceDetector {
    fn check(&mut self, _time: f64, state: &State, _goal: &State) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let diverged = state.iter().any(|v| !v.is_finite() || v.abs() > self.bound);
        if diverged {
            self.fired = true;
            Some(EventKind::Diverged)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::hover_at;

    #[test]
    fn settled_fires_on_entry_only() {
        let mut det = SettledDetector::default();
        let goal = hover_at(0.0, 0.0);
        assert_eq!(det.check(0.0, &hover_at(1.0, 0.0), &goal), None);
        assert_eq!(det.check(0.1, &hover_at(0.001, 0.0), &goal), Some(EventKind::Settled));
        assert_eq!(det.check(0.2, &hover_at(0.0, 0.0), &goal), None);
        // Goal moves away, then the vehicle catches up again
        let goal = hover_at(5.0, 0.0);
        assert_eq!(det.check(0.3, &hover_at(0.0, 0.0), &goal), None);
        assert_eq!(det.check(0.4, &hover_at(5.0, 0.0), &goal), Some(EventKind::Settled));
    }

    #[test]
    fn settled_requires_level_attitude() {
        let mut det = SettledDetector::default();
        let tilted = State::new(0.0, 0.0, 0.01, 0.0, 0.0, 0.0);
        assert_eq!(det.check(0.0, &tilted, &State::zeros()), None);
    }

    #[test]
    fn divergence_detected_once() {
        let mut det = DivergenceDetector::default();
        let goal = State::zeros();
        assert_eq!(det.check(0.0, &hover_at(1e5, 0.0), &goal), None);
        let nan = State::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(det.check(0.1, &nan, &goal), Some(EventKind::Diverged));
        assert_eq!(det.check(0.2, &nan, &goal), None);
    }
}
