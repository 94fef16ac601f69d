use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use crate::control::{Controller, CostWeights, GoalHandle, LqrConfig, LqrController};
use crate::dynamics::state::{Input, Params, SimConfig, State};
use crate::error::Result;
use super::event::{DivergenceDetector, EventDetector, EventKind, SettledDetector, SimEvent};
use super::history::{TrajectoryHistory, TrajectorySnapshot};
use super::quadrotor::PlanarQuadrotor;

/// What one tick produced: the input that was applied and the state after it.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub time: f64,
    pub input: Input,
    pub state: State,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub steps: usize,
    pub time: f64,
    pub diverged: bool,
    pub stopped: bool,
}

// ---------------------------------------------------------------------------
// Tick loop: controller → integrator → publish
// ---------------------------------------------------------------------------

/// Single-threaded closed-loop simulation.
///
/// Owns the plant, the controller and the pose history. The goal may be
/// changed at any time through [`Simulation::goal_handle`]; it is read once
/// per tick.
pub struct Simulation<C: Controller> {
    quadrotor: PlanarQuadrotor,
    controller: C,
    config: SimConfig,
    steps: usize,
    history: TrajectoryHistory,
    record_history: bool,
    detectors: Vec<Box<dyn EventDetector>>,
    events: Vec<SimEvent>,
    diverged: bool,
}

impl<C: Controller> Simulation<C> {
    pub fn new(quadrotor: PlanarQuadrotor, controller: C, config: SimConfig) -> Result<Self> {
        config.validate()?;
        let quadrotor = quadrotor.with_scheme(config.scheme);
        let mut history = TrajectoryHistory::with_capacity(config.steps().min(200_000) + 1);
        history.push(0.0, &quadrotor.get_state());

        Ok(Self {
            quadrotor,
            controller,
            config,
            steps: 0,
            history,
            record_history: true,
            detectors: vec![
                Box::new(SettledDetector::default()),
                Box::new(DivergenceDetector::default()),
            ],
            events: Vec::new(),
            diverged: false,
        })
    }

    pub fn with_detector(mut self, detector: Box<dyn EventDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Bound the pose history for open-ended runs; see [`TrajectoryHistory::set_limit`].
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history.set_limit(limit);
        self
    }

    /// Skip pose recording, for callers that collect their own trajectory.
    pub fn without_history(mut self) -> Self {
        self.history = TrajectoryHistory::new();
        self.record_history = false;
        self
    }

    pub fn time(&self) -> f64 {
        self.steps as f64 * self.config.dt
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.quadrotor.get_state()
    }

    pub fn quadrotor(&self) -> &PlanarQuadrotor {
        &self.quadrotor
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn goal_handle(&self) -> GoalHandle {
        self.quadrotor.goal_handle()
    }

    pub fn history(&self) -> &TrajectoryHistory {
        &self.history
    }

    pub fn snapshot(&self) -> TrajectorySnapshot {
        self.history.snapshot()
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn has_diverged(&self) -> bool {
        self.diverged
    }

    /// Advance one step: compute the input, integrate, record, run detectors.
    pub fn tick(&mut self) -> Result<Tick> {
        let state = self.quadrotor.get_state();
        let goal = self.quadrotor.goal();

        let input = self.controller.control(&state, &goal);
        self.quadrotor.set_input_vec(input);
        self.quadrotor.update(self.config.dt)?;
        self.steps += 1;

        let time = self.time();
        let state = self.quadrotor.get_state();
        if self.record_history {
            self.history.push(time, &state);
        }

        for detector in &mut self.detectors {
            if let Some(kind) = detector.check(time, &state, &goal) {
                match &kind {
                    EventKind::Diverged => {
                        warn!("State diverged at t={:.3}s: {:?}", time, state.as_slice());
                        self.diverged = true;
                    }
                    other => debug!("{:?} at t={:.3}s", other, time),
                }
                self.events.push(SimEvent { time, kind, state });
            }
        }

        Ok(Tick { time, input, state })
    }

    /// Tick until `max_time`, divergence, or `stop` is observed between ticks.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunOutcome> {
        let max_steps = self.config.steps();
        let mut outcome = RunOutcome::default();

        while self.steps < max_steps {
            if stop.load(Ordering::Relaxed) {
                outcome.stopped = true;
                break;
            }
            self.tick()?;
            if self.diverged {
                outcome.diverged = true;
                break;
            }
        }

        outcome.steps = self.steps;
        outcome.time = self.time();
        info!(
            "Simulation ran {} steps ({:.3} s) with {}{}",
            outcome.steps,
            outcome.time,
            self.controller.name(),
            if outcome.diverged { ", diverged" } else { "" }
        );
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Batch helpers
// ---------------------------------------------------------------------------

/// Simulate with a custom controller until `max_time` or divergence.
/// Returns the trajectory and the input applied at each step.
pub fn simulate_with(
    quadrotor: PlanarQuadrotor,
    config: &SimConfig,
    controller: &mut dyn Controller,
) -> Result<(Vec<State>, Vec<Input>)> {
    let mut sim = Simulation::new(quadrotor, controller, config.clone())?.without_history();

    let cap = config.steps().min(200_000) + 1;
    let mut trajectory = Vec::with_capacity(cap);
    let mut inputs = Vec::with_capacity(cap);

    trajectory.push(sim.state());
    inputs.push(Input::zeros());

    for _ in 0..config.steps() {
        let tick = sim.tick()?;
        trajectory.push(tick.state);
        inputs.push(tick.input);
        if sim.has_diverged() {
            break;
        }
    }

    Ok((trajectory, inputs))
}

/// Simulate with the default hover LQR controller (convenience wrapper).
pub fn simulate(
    initial_state: State,
    goal: State,
    params: &Params,
    config: &SimConfig,
) -> Result<(Vec<State>, Vec<Input>)> {
    let mut controller = LqrController::from_params(
        params,
        config.dt,
        &CostWeights::default(),
        &LqrConfig::default(),
    )?;
    let mut quadrotor = PlanarQuadrotor::new(initial_state, *params)?;
    quadrotor.set_goal_state(goal);
    simulate_with(quadrotor, config, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
