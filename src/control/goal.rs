use std::sync::{Arc, RwLock};

use log::info;

use crate::dynamics::state::{state_from_slice, State};
use crate::error::Result;

/// Shared, externally settable goal state.
///
/// Cloning yields another handle to the same goal, so an input thread can
/// hold one while the simulation reads through another. The six components
/// are replaced under a single lock, so readers never see a mix of old and
/// new values.
#[derive(Debug, Clone)]
pub struct GoalHandle {
    inner: Arc<RwLock<State>>,
}

impl GoalHandle {
    pub fn new(goal: State) -> Self {
        Self {
            inner: Arc::new(RwLock::new(goal)),
        }
    }

    pub fn get(&self) -> State {
        // A poisoned lock still holds a complete value; State is Copy
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_state(&self, goal: State) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = goal;
        info!(
            "Goal set to x={:.3}, y={:.3}, theta={:.3}",
            goal[0], goal[1], goal[2]
        );
    }

    /// Replace the goal from a slice; anything but six values is rejected
    /// and the previous goal is left untouched.
    pub fn set(&self, values: &[f64]) -> Result<()> {
        let goal = state_from_slice("goal", values)?;
        self.set_state(goal);
        Ok(())
    }
}

impl Default for GoalHandle {
    fn default() -> Self {
        Self::new(State::zeros())
    }
}
